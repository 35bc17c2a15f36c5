//! Compiler for the C-like `plural=` rules found in catalog metadata.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! expr := test '?' expr ':' expr | integer
//! test := test ('||' | '&&') test
//!       | operand ('==' | '!=' | '>=' | '>' | '<=' | '<') operand
//!       | '(' test ')'
//! operand := 'n' | 'n' '%' integer | integer
//! ```
//!
//! Tests are split on the first operator found from a fixed priority list
//! (`||`, `&&`, `==`, `!=`, `>=`, `>`, `<=`, `<`) rather than by position.
//! Parenthesized groups are kept as single tokens and only re-tokenized when
//! that sub-expression is compiled.

use std::str::FromStr;
use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use super::ast::{Comparison, Expression, Math, Test};
use crate::mo::types::error::CompileError;

type Result<T> = std::result::Result<T, CompileError>;

/// Deepest nesting of sub-expressions accepted before giving up.
const MAX_DEPTH: usize = 64;

/// Matches one operator, integer literal or the variable `n`.
static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| {
        Regex::new(r"\?|:|\|\||&&|==|!=|>=|>|<=|<|%|[0-9]+|n")
            .expect("Invalid plural token regex pattern")
    })
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Or,
    And,
    Compare(Comparison),
}

/// Operators in the order tests are split on them.
const PRECEDENCE: &[(&str, Operator)] = &[
    ("||", Operator::Or),
    ("&&", Operator::And),
    ("==", Operator::Compare(Comparison::Equal)),
    ("!=", Operator::Compare(Comparison::NotEqual)),
    (">=", Operator::Compare(Comparison::GreaterOrEqual)),
    (">", Operator::Compare(Comparison::GreaterThan)),
    ("<=", Operator::Compare(Comparison::LessOrEqual)),
    ("<", Operator::Compare(Comparison::LessThan)),
];

/// Compiles a plural rule such as `n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2`.
///
/// A bare test without `?` is read as `test ? 1 : 0`, and the rule `0`
/// compiles to a constant. Parentheses and ternaries may nest up to 64
/// levels; flat `||`/`&&` chains of any length are accepted.
///
/// # Errors
/// Returns a [`CompileError`] carrying the offending text for anything
/// outside the grammar. Malformed input never panics.
pub fn compile(rule: &str) -> Result<Expression> {
    let source: String = rule.chars().filter(|c| !c.is_whitespace()).collect();
    if source == "0" {
        return Ok(Expression::Const(0));
    }
    if source.is_empty() {
        return Err(CompileError::Empty);
    }

    let source = if source.contains('?') {
        source
    } else {
        format!("{}?1:0", source)
    };

    let expr = compile_expression(&source, 0)?;
    trace!("Compiled plural rule '{}' to '{}'", rule, expr);
    Ok(expr)
}

impl FromStr for Expression {
    type Err = CompileError;

    fn from_str(rule: &str) -> Result<Self> {
        compile(rule)
    }
}

/// Compiles a ternary or an integer constant.
fn compile_expression(source: &str, depth: usize) -> Result<Expression> {
    check_depth(source, depth)?;
    let tokens = tokenize(source)?;

    let Some(question) = position(&tokens, "?") else {
        return compile_const(source, &tokens);
    };

    let test = compile_test(&tokens[..question].concat(), depth + 1)?;
    let actions = &tokens[question + 1..];
    let colon = position(actions, ":").ok_or_else(|| CompileError::MissingToken {
        token: ":",
        input: source.to_string(),
    })?;
    let if_true = compile_expression(&actions[..colon].concat(), depth + 1)?;
    let if_false = compile_expression(&actions[colon + 1..].concat(), depth + 1)?;

    Ok(Expression::Ternary {
        test,
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
    })
}

fn compile_const(source: &str, tokens: &[&str]) -> Result<Expression> {
    match tokens {
        [value] => Ok(Expression::Const(parse_u32(value)?)),
        _ => Err(CompileError::InvalidConstant(source.to_string())),
    }
}

/// Compiles a boolean test by splitting on the highest-priority operator present.
fn compile_test(source: &str, depth: usize) -> Result<Test> {
    check_depth(source, depth)?;
    let tokens = tokenize(source)?;

    for &(symbol, operator) in PRECEDENCE {
        let Some(at) = position(&tokens, symbol) else {
            continue;
        };
        let (left, right) = (&tokens[..at], &tokens[at + 1..]);
        return match operator {
            Operator::Or => compile_chain(&tokens, symbol, depth, Test::Or),
            Operator::And => compile_chain(&tokens, symbol, depth, Test::And),
            Operator::Compare(op) => compile_comparison(source, op, left, right),
        };
    }

    Err(CompileError::NoOperator(source.to_string()))
}

/// Compiles `a || b || c` (or the `&&` equivalent) as `a || (b || c)`.
///
/// Every operand of a flat chain sits one level below the chain itself, so
/// long chains do not count against the nesting limit.
fn compile_chain(
    tokens: &[&str],
    symbol: &str,
    depth: usize,
    join: fn(Box<Test>, Box<Test>) -> Test,
) -> Result<Test> {
    let mut operands = tokens
        .split(|token| *token == symbol)
        .map(|operand| compile_test(&operand.concat(), depth + 1))
        .collect::<Result<Vec<_>>>()?;

    let mut chain = operands.pop().ok_or(CompileError::Empty)?;
    while let Some(operand) = operands.pop() {
        chain = join(Box::new(operand), Box::new(chain));
    }
    Ok(chain)
}

/// Resolves `n <op> k`, `k <op> n` or `n % m <op> k`.
fn compile_comparison(source: &str, op: Comparison, left: &[&str], right: &[&str]) -> Result<Test> {
    match (left, right) {
        (["n"], [value]) => Ok(Test::Compare {
            op,
            value: parse_u32(value)?,
            flipped: false,
        }),
        ([value], ["n"]) => Ok(Test::Compare {
            op,
            value: parse_u32(value)?,
            flipped: true,
        }),
        (["n"], _) | (_, ["n"]) => Err(CompileError::InvalidOperand(source.to_string())),
        _ if left.contains(&"n") && left.contains(&"%") => {
            let modifier = compile_mod(left)?;
            let [value] = right else {
                return Err(CompileError::InvalidModulus(source.to_string()));
            };
            Ok(Test::Pipe {
                modifier,
                action: Box::new(Test::Compare {
                    op,
                    value: parse_u32(value)?,
                    flipped: false,
                }),
            })
        }
        _ => Err(CompileError::InvalidOperand(source.to_string())),
    }
}

fn compile_mod(tokens: &[&str]) -> Result<Math> {
    match tokens {
        ["n", "%", divisor] => match parse_u32(divisor)? {
            0 => Err(CompileError::ZeroDivisor(tokens.concat())),
            divisor => Ok(Math::Mod(divisor)),
        },
        _ => Err(CompileError::InvalidModulus(tokens.concat())),
    }
}

fn parse_u32(token: &str) -> Result<u32> {
    token
        .parse()
        .map_err(|_| CompileError::InvalidInteger(token.to_string()))
}

fn position(tokens: &[&str], needle: &str) -> Option<usize> {
    tokens.iter().position(|token| *token == needle)
}

fn check_depth(source: &str, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(CompileError::TooDeep(source.to_string()));
    }
    Ok(())
}

/// Splits whitespace-free rule text into tokens.
///
/// One layer of parentheses wrapping the whole input is removed first.
/// Top-level parenthesized groups come back as single tokens with their
/// inner text untouched; everything else is split into operators, integer
/// literals and `n`.
fn tokenize(source: &str) -> Result<Vec<&str>> {
    let source = strip_wrapping_parens(source);
    if source.is_empty() {
        return Err(CompileError::Empty);
    }

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for (open, close) in scan_groups(source)? {
        lex(source, cursor, open, &mut tokens)?;
        tokens.push(&source[open..close]);
        cursor = close;
    }
    lex(source, cursor, source.len(), &mut tokens)?;

    Ok(tokens)
}

/// Lexes `source[start..end]`, which holds no parentheses.
fn lex<'a>(source: &'a str, start: usize, end: usize, tokens: &mut Vec<&'a str>) -> Result<()> {
    let mut cursor = start;
    for found in token_regex().find_iter(&source[start..end]) {
        let found_start = start + found.start();
        if found_start != cursor {
            return Err(unexpected(source, cursor));
        }
        tokens.push(found.as_str());
        cursor = start + found.end();
    }
    if cursor != end {
        return Err(unexpected(source, cursor));
    }
    Ok(())
}

fn unexpected(source: &str, position: usize) -> CompileError {
    CompileError::UnexpectedCharacter {
        input: source.to_string(),
        position,
        found: source[position..].chars().next().unwrap_or_default(),
    }
}

/// Byte spans `[open, close)` of the top-level parenthesized groups.
fn scan_groups(source: &str) -> Result<Vec<(usize, usize)>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut opener = 0;
    for (index, byte) in source.bytes().enumerate() {
        match byte {
            b'(' => {
                if depth == 0 {
                    opener = index;
                }
                depth += 1;
            }
            b')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| unexpected(source, index))?;
                if depth == 0 {
                    groups.push((opener, index + 1));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CompileError::MissingToken {
            token: ")",
            input: source.to_string(),
        });
    }
    Ok(groups)
}

/// Removes parentheses wrapping the whole input, e.g. `((n==1))` -> `n==1`.
///
/// `(a)&&(b)` starts and ends with a parenthesis but is left alone, since
/// the first group closes before the end.
fn strip_wrapping_parens(mut source: &str) -> &str {
    while source.starts_with('(') && source.ends_with(')') {
        match closing_paren(source) {
            Some(close) if close == source.len() - 1 => source = &source[1..close],
            _ => break,
        }
    }
    source
}

/// Index of the parenthesis closing the one at index 0.
fn closing_paren(source: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, byte) in source.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(value: u32) -> Test {
        Test::Compare {
            op: Comparison::Equal,
            value,
            flipped: false,
        }
    }

    #[test]
    fn zero_is_a_constant() {
        assert_eq!(compile("0").unwrap(), Expression::Const(0));
        assert_eq!(compile(" 0 ").unwrap(), Expression::Const(0));
    }

    #[test]
    fn bare_test_becomes_ternary() {
        let expr = compile("n != 1").unwrap();
        assert_eq!(
            expr,
            Expression::Ternary {
                test: Test::Compare {
                    op: Comparison::NotEqual,
                    value: 1,
                    flipped: false,
                },
                if_true: Box::new(Expression::Const(1)),
                if_false: Box::new(Expression::Const(0)),
            }
        );
    }

    #[test]
    fn tokenizer_keeps_groups_whole() {
        let tokens = tokenize("n==1?0:(n==0||(n%100>0&&n%100<20))?1:2").unwrap();
        assert_eq!(
            tokens,
            vec!["n", "==", "1", "?", "0", ":", "(n==0||(n%100>0&&n%100<20))", "?", "1", ":", "2"]
        );
    }

    #[test]
    fn tokenizer_strips_only_matching_outer_parens() {
        assert_eq!(tokenize("((n==1))").unwrap(), vec!["n", "==", "1"]);
        assert_eq!(
            tokenize("(n==0)||(n==1)").unwrap(),
            vec!["(n==0)", "||", "(n==1)"]
        );
    }

    #[test]
    fn tokenizer_distinguishes_two_char_operators() {
        assert_eq!(
            tokenize("n>=2&&n<=4").unwrap(),
            vec!["n", ">=", "2", "&&", "n", "<=", "4"]
        );
    }

    #[test]
    fn modulus_becomes_pipe() {
        let expr = compile("n%10==1").unwrap();
        let Expression::Ternary { test, .. } = expr else {
            panic!("expected ternary");
        };
        assert_eq!(
            test,
            Test::Pipe {
                modifier: Math::Mod(10),
                action: Box::new(eq(1)),
            }
        );
    }

    #[test]
    fn constant_on_the_left_is_flipped() {
        let expr = compile("2 > n ? 0 : 1").unwrap();
        assert_eq!(expr.eval(0), 0);
        assert_eq!(expr.eval(1), 0);
        assert_eq!(expr.eval(2), 1);
        assert_eq!(expr.eval(3), 1);
    }

    #[test]
    fn or_splits_before_and() {
        let expr = compile("n==1 || n==2 && n==3").unwrap();
        let Expression::Ternary { test, .. } = expr else {
            panic!("expected ternary");
        };
        assert!(matches!(test, Test::Or(..)));
    }

    #[test]
    fn rejects_malformed_rules() {
        assert_eq!(compile(""), Err(CompileError::Empty));
        assert_eq!(compile("()"), Err(CompileError::Empty));
        assert!(matches!(compile("x"), Err(CompileError::UnexpectedCharacter { found: 'x', .. })));
        assert!(matches!(compile("n==1?0"), Err(CompileError::MissingToken { token: ":", .. })));
        assert!(matches!(compile("(n==1"), Err(CompileError::MissingToken { token: ")", .. })));
        assert!(matches!(compile("n==1)"), Err(CompileError::UnexpectedCharacter { found: ')', .. })));
        assert!(matches!(compile("1==2"), Err(CompileError::InvalidOperand(_))));
        assert!(matches!(compile("n%0==1"), Err(CompileError::ZeroDivisor(_))));
        assert!(matches!(compile("1%n==1"), Err(CompileError::InvalidModulus(_))));
        assert!(matches!(compile("n%10==n"), Err(CompileError::InvalidOperand(_))));
        assert!(matches!(compile("n==99999999999"), Err(CompileError::InvalidInteger(_))));
        assert!(matches!(compile("n?1:n"), Err(CompileError::NoOperator(_))));
        assert!(matches!(compile("n==1?0:1%2"), Err(CompileError::InvalidConstant(_))));
        assert!(matches!(compile("n==1?0:n"), Err(CompileError::InvalidInteger(_))));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let rule = format!("{}n==1{}", "(".repeat(10), ")".repeat(10));
        assert!(compile(&rule).is_ok());

        let mut chain = String::new();
        for i in 0..100 {
            chain.push_str(&format!("n=={}?{}:", i, i));
        }
        chain.push('0');
        assert!(matches!(compile(&chain), Err(CompileError::TooDeep(_))));
    }

    #[test]
    fn long_flat_chains_compile() {
        let terms: Vec<String> = (0..200).map(|i| format!("n=={}", i * 2)).collect();
        let or_chain = compile(&terms.join("||")).unwrap();
        assert_eq!(or_chain.eval(0), 1);
        assert_eq!(or_chain.eval(398), 1);
        assert_eq!(or_chain.eval(3), 0);
        assert_eq!(or_chain.eval(400), 0);

        let terms: Vec<String> = (0..200).map(|i| format!("n!={}", i)).collect();
        let and_chain = compile(&terms.join("&&")).unwrap();
        assert_eq!(and_chain.eval(199), 0);
        assert_eq!(and_chain.eval(200), 1);
    }

    #[test]
    fn chains_nest_to_the_right() {
        let expr = compile("n==1||n==2||n==3").unwrap();
        let Expression::Ternary { test, .. } = expr else {
            panic!("expected a ternary");
        };
        assert_eq!(
            test,
            Test::Or(
                Box::new(eq(1)),
                Box::new(Test::Or(Box::new(eq(2)), Box::new(eq(3)))),
            )
        );
    }

    #[test]
    fn empty_chain_operand_is_rejected() {
        assert!(matches!(compile("n==1||||n==2"), Err(CompileError::Empty)));
        assert!(matches!(compile("n==1&&"), Err(CompileError::Empty)));
    }

    #[test]
    fn from_str_compiles() {
        let expr: Expression = "n>1".parse().unwrap();
        assert_eq!(expr.eval(1), 0);
        assert_eq!(expr.eval(2), 1);
    }
}
