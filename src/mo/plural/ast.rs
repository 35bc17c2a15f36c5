//! Compiled plural-forms rules.
//!
//! A rule is a tree of three closed families of nodes:
//!
//! - [`Expression`]: yields a plural-form index (`Const` or `Ternary`)
//! - [`Test`]: a boolean condition over `n`
//! - [`Math`]: an arithmetic modifier applied to `n` before a test
//!
//! Nodes are immutable once compiled. Evaluation is pure, never allocates,
//! and is defined for every `u32` input.

use std::fmt;

/// Selects a zero-based plural-form index for a cardinal `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Always the same index.
    Const(u32),
    /// `test ? if_true : if_false`
    Ternary {
        test: Test,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
}

impl Expression {
    /// The rule used when a catalog carries no `plural-forms` metadata.
    pub const fn always_first() -> Self {
        Expression::Const(0)
    }

    /// Evaluates the rule for `n`, returning a plural-form index.
    ///
    /// Every result is a valid index value; callers check it against the
    /// number of stored forms.
    pub fn eval(&self, n: u32) -> u32 {
        let mut node = self;
        loop {
            match node {
                Expression::Const(value) => return *value,
                Expression::Ternary { test, if_true, if_false } => {
                    node = if test.test(n) { if_true } else { if_false };
                }
            }
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::always_first()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Const(value) => write!(f, "{}", value),
            // A nested true branch needs parentheses, or its `:` would end
            // the outer condition's branch early.
            Expression::Ternary { test, if_true, if_false } => match if_true.as_ref() {
                Expression::Ternary { .. } => write!(f, "{} ? ({}) : {}", test, if_true, if_false),
                Expression::Const(_) => write!(f, "{} ? {} : {}", test, if_true, if_false),
            },
        }
    }
}

/// The six comparison operators of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    /// Applies `left <op> right`.
    fn apply(self, left: u32, right: u32) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::GreaterThan => left > right,
            Comparison::LessThan => left < right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::LessOrEqual => left <= right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        }
    }
}

/// A boolean condition over `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    /// `n <op> value`, or `value <op> n` when `flipped`.
    Compare {
        op: Comparison,
        value: u32,
        flipped: bool,
    },
    /// Short-circuit conjunction.
    And(Box<Test>, Box<Test>),
    /// Short-circuit disjunction.
    Or(Box<Test>, Box<Test>),
    /// Applies `modifier` to `n` and runs `action` on the result.
    Pipe { modifier: Math, action: Box<Test> },
}

impl Test {
    pub fn test(&self, n: u32) -> bool {
        match self {
            Test::Compare { op, value, flipped: false } => op.apply(n, *value),
            Test::Compare { op, value, flipped: true } => op.apply(*value, n),
            Test::And(left, right) => left.test(n) && right.test(n),
            Test::Or(left, right) => left.test(n) || right.test(n),
            // A modulus by zero has no result, so nothing can match it.
            Test::Pipe { modifier, action } => {
                modifier.calc(n).is_some_and(|m| action.test(m))
            }
        }
    }

    fn fmt_with_subject(&self, f: &mut fmt::Formatter<'_>, subject: &str) -> fmt::Result {
        match self {
            Test::Compare { op, value, flipped: false } => {
                write!(f, "{} {} {}", subject, op.symbol(), value)
            }
            Test::Compare { op, value, flipped: true } => {
                write!(f, "{} {} {}", value, op.symbol(), subject)
            }
            Test::And(left, right) => {
                f.write_str("(")?;
                left.fmt_with_subject(f, subject)?;
                f.write_str(" && ")?;
                right.fmt_with_subject(f, subject)?;
                f.write_str(")")
            }
            Test::Or(left, right) => {
                f.write_str("(")?;
                left.fmt_with_subject(f, subject)?;
                f.write_str(" || ")?;
                right.fmt_with_subject(f, subject)?;
                f.write_str(")")
            }
            Test::Pipe { modifier, action } => {
                let Math::Mod(divisor) = modifier;
                action.fmt_with_subject(f, &format!("{} % {}", subject, divisor))
            }
        }
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_subject(f, "n")
    }
}

/// An arithmetic modifier applied to `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Math {
    /// `n % value`
    Mod(u32),
}

impl Math {
    /// Returns `None` for a modulus by zero.
    pub fn calc(&self, n: u32) -> Option<u32> {
        match self {
            Math::Mod(value) => n.checked_rem(*value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(op: Comparison, value: u32, flipped: bool) -> Test {
        Test::Compare { op, value, flipped }
    }

    #[test]
    fn const_ignores_input() {
        let expr = Expression::Const(3);
        assert_eq!(expr.eval(0), 3);
        assert_eq!(expr.eval(u32::MAX), 3);
    }

    #[test]
    fn flipped_comparisons_swap_operands() {
        // n > 5
        assert!(cmp(Comparison::GreaterThan, 5, false).test(6));
        assert!(!cmp(Comparison::GreaterThan, 5, false).test(5));
        // 5 > n
        assert!(cmp(Comparison::GreaterThan, 5, true).test(4));
        assert!(!cmp(Comparison::GreaterThan, 5, true).test(5));
        // 5 <= n
        assert!(cmp(Comparison::LessOrEqual, 5, true).test(5));
        assert!(!cmp(Comparison::LessOrEqual, 5, true).test(4));
        // equality does not care
        assert_eq!(
            cmp(Comparison::Equal, 7, true).test(7),
            cmp(Comparison::Equal, 7, false).test(7)
        );
    }

    #[test]
    fn pipe_applies_modulus() {
        let test = Test::Pipe {
            modifier: Math::Mod(10),
            action: Box::new(cmp(Comparison::Equal, 1, false)),
        };
        assert!(test.test(1));
        assert!(test.test(21));
        assert!(!test.test(12));
    }

    #[test]
    fn modulus_by_zero_never_matches() {
        assert_eq!(Math::Mod(0).calc(5), None);
        let test = Test::Pipe {
            modifier: Math::Mod(0),
            action: Box::new(cmp(Comparison::Equal, 0, false)),
        };
        assert!(!test.test(0));
        assert!(!test.test(u32::MAX));
    }

    #[test]
    fn ternary_selects_branch() {
        let expr = Expression::Ternary {
            test: cmp(Comparison::NotEqual, 1, false),
            if_true: Box::new(Expression::Const(1)),
            if_false: Box::new(Expression::Const(0)),
        };
        assert_eq!(expr.eval(0), 1);
        assert_eq!(expr.eval(1), 0);
        assert_eq!(expr.eval(u32::MAX), 1);
    }

    #[test]
    fn display_renders_source_form() {
        let expr = Expression::Ternary {
            test: Test::And(
                Box::new(Test::Pipe {
                    modifier: Math::Mod(10),
                    action: Box::new(cmp(Comparison::Equal, 1, false)),
                }),
                Box::new(cmp(Comparison::LessThan, 4, true)),
            ),
            if_true: Box::new(Expression::Const(0)),
            if_false: Box::new(Expression::Const(1)),
        };
        assert_eq!(expr.to_string(), "(n % 10 == 1 && 4 < n) ? 0 : 1");
    }

    #[test]
    fn display_parenthesizes_nested_true_branch() {
        let expr = Expression::Ternary {
            test: cmp(Comparison::Equal, 1, false),
            if_true: Box::new(Expression::Ternary {
                test: cmp(Comparison::Equal, 2, false),
                if_true: Box::new(Expression::Const(1)),
                if_false: Box::new(Expression::Const(2)),
            }),
            if_false: Box::new(Expression::Const(3)),
        };
        assert_eq!(expr.to_string(), "n == 1 ? (n == 2 ? 1 : 2) : 3");
    }
}
