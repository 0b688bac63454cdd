//! Common error types.

use crate::Term;
use core::fmt::{self, Display};

/// Violation of a shape or scoping contract.
///
/// Fatal errors pass through all combinators.
#[derive(Clone, Debug, PartialEq)]
pub enum Fatal {
    /// a list operation was applied to a term that is not a list
    NotAList(Term),
    /// an application was constructed with a functor name that is not a string
    NotAString(Term),
    NotAnInt(Term),
    /// a term was expected to be a list of two elements
    NotAPair(Term),
    /// a wildcard was built, but no more captures were available
    EmptyCaptures,
    UndeclaredVar(String),
    UnboundVar(String),
    UndeclaredTable(String),
    /// a recursive strategy was applied after its body was dropped
    UnsetRec,
}

/// Result of a strategy that did not produce a term.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// the strategy does not apply; caught by choice, negation and guards
    Failure,
    Fatal(Fatal),
}

impl From<Fatal> for Error {
    fn from(err: Fatal) -> Self {
        Self::Fatal(err)
    }
}

impl Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotAList(tm) => write!(f, "list expected, found {}", tm),
            Self::NotAString(tm) => write!(f, "string expected, found {}", tm),
            Self::NotAnInt(tm) => write!(f, "integer expected, found {}", tm),
            Self::NotAPair(tm) => write!(f, "pair expected, found {}", tm),
            Self::EmptyCaptures => write!(f, "no captured term left to build wildcard"),
            Self::UndeclaredVar(x) => write!(f, "undeclared variable {}", x),
            Self::UnboundVar(x) => write!(f, "unbound variable {}", x),
            Self::UndeclaredTable(t) => write!(f, "undeclared table {}", t),
            Self::UnsetRec => write!(f, "recursive strategy applied outside of its definition"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Failure => write!(f, "strategy failed"),
            Self::Fatal(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Fatal {}

impl std::error::Error for Error {}
