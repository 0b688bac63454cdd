//! Parser for the textual ATerm format
//!
//! Example usage:
//!
//! ~~~
//! use aterm_parse::{Error, Term, TermIter};
//!
//! let tms = "Binary(Plus, Lit(1), x) [1, 2, *rest]";
//! let tms: Result<Vec<_>, _> = TermIter::new(&tms).collect();
//! assert_eq!(tms?.len(), 2);
//!
//! assert_eq!(Term::parse_str("[*1]"), Err(Error::SpreadNotList));
//! # Ok::<_, Error>(())
//! ~~~
#![no_std]

extern crate alloc;

pub mod lex;
pub mod term;
mod termiter;

pub use lex::Token;
pub use term::{Error, Functor, Term};
pub use termiter::TermIter;

use logos::Logos;

pub fn lex(s: &str) -> impl Iterator<Item = Token<'_>> {
    Token::lexer(s)
}
