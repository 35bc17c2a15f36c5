//! Plural-forms rules: compilation and evaluation.
//!
//! Catalog metadata carries a rule such as
//! `nplurals=3; plural=n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2;`.
//! The `plural=` part is compiled once by [`compile`] into an
//! [`Expression`] tree, which then picks the translation variant for each
//! count at lookup time.
//!
//! # Example
//! ```
//! use mo_reader::plural::compile;
//!
//! let rule = compile("n%10==1 && n%100!=11 ? 0 : n!=0 ? 1 : 2").unwrap();
//! assert_eq!(rule.eval(1), 0);
//! assert_eq!(rule.eval(2), 1);
//! assert_eq!(rule.eval(11), 2);
//! assert_eq!(rule.eval(21), 0);
//! assert_eq!(rule.eval(0), 2);
//! ```

pub mod ast;
pub mod compiler;

pub use ast::{Comparison, Expression, Math, Test};
pub use compiler::compile;
