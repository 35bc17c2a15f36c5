use mo_reader::{Catalog, MoCatalog};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <path-to-mo-file> [--msgid <MSGID>] [--plural <MSGID_PLURAL> <N>]",
            args[0]
        );
        std::process::exit(1);
    }

    let mo_path = &args[1];
    let msgid = flag_value(&args, "--msgid", 1).map(|values| values[0].as_str());
    let mut plural: Option<(&str, u32)> = None;
    if let Some(values) = flag_value(&args, "--plural", 2) {
        match values[1].parse::<u32>() {
            Ok(n) => plural = Some((values[0].as_str(), n)),
            Err(_) => {
                eprintln!("ERROR: --plural count must be a non-negative integer, got '{}'", values[1]);
                std::process::exit(1);
            }
        }
    }
    if plural.is_some() && msgid.is_none() {
        eprintln!("ERROR: --plural requires --msgid.");
        std::process::exit(1);
    }

    println!("Reading MO file: {}", mo_path);
    println!("{}", "=".repeat(60));

    let catalog = match MoCatalog::open(mo_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("\nERROR: Failed to read MO file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let header = catalog.header();
    println!("\nCatalog Information:");
    println!("  Revision: {}.{}", header.major_version(), header.minor_version());
    println!("  Byte order: {}", header.endianness);
    println!("  Language: {}", catalog.language().unwrap_or("(none)"));
    println!("  Charset: {}", catalog.charset().unwrap_or("(none)"));
    println!("  Encoding: {}", catalog.encoding().name());
    match catalog.plural_forms() {
        Some(forms) => {
            println!("  Plural forms: {}", forms.nplurals.map_or("?".to_string(), |n| n.to_string()));
            println!("  Plural rule: {}", forms.expression);
        }
        None => println!("  Plural rule: (none, always form 0)"),
    }

    println!("\nStatistics:");
    println!("  Total messages: {}", catalog.len());

    let mut keys: Vec<&str> = catalog.keys().filter(|key| !key.is_empty()).collect();
    keys.sort_unstable();
    println!("\nSample Messages (first 10):");
    for (i, key) in keys.iter().take(10).enumerate() {
        println!("  {}. {:?} -> {:?}", i + 1, key, catalog.variants(key).unwrap_or_default());
    }
    if keys.len() > 10 {
        println!("  ... and {} more", keys.len() - 10);
    }

    if let Some(msgid) = msgid {
        println!("\nLookup:");
        println!("  gettext({:?}) = {:?}", msgid, catalog.gettext(msgid));
        if let Some((msgid_plural, n)) = plural {
            println!(
                "  ngettext({:?}, {:?}, {}) = {:?}",
                msgid,
                msgid_plural,
                n,
                catalog.ngettext(msgid, msgid_plural, n)
            );
        }
    }
}

/// Returns the `count` arguments following `flag`, exiting if they are missing.
fn flag_value<'a>(args: &'a [String], flag: &str, count: usize) -> Option<&'a [String]> {
    let index = args.iter().position(|arg| arg == flag)?;
    match args.get(index + 1..index + 1 + count) {
        Some(values) => Some(values),
        None => {
            eprintln!("ERROR: {} flag requires {} argument(s).", flag, count);
            std::process::exit(1);
        }
    }
}
