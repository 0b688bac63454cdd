#![forbid(unsafe_code)]

//! Strategic rewriting of annotated terms.
//!
//! This library transforms *terms*, which are
//! integers, reals, strings, lists, and applications of functor names to lists.
//! Every term may carry a list of annotations.
//! Terms are immutable and shared, such that
//! transformations that do not change a subterm return the very same subterm.
//!
//! # Usage
//!
//! Terms are constructed and parsed by a [`Factory`].
//! The same syntax is used to write *patterns*, which may additionally
//! contain variables (`x`, `x=C(_)`), wildcards (`_`), and
//! spreads (`[1, *rest]`) that stand for the remainder of a list.
//!
//! Transformations are *strategies*, which either rewrite a term or fail.
//! Strategies are built from rewrite rules and combined by
//! combinators such as [`comb::seq`] and [`comb::choice`] and
//! traversals such as [`traverse::bottomup`] and [`traverse::innermost`].
//!
//! The following example removes additions of zero from an expression.
//!
//! ~~~
//! # use transf::{Factory, rule::rule, traverse::innermost};
//! let f = Factory::new();
//! let plus0 = rule(f.parse("Binary(Plus, x, Lit(0))")?, f.parse("x")?);
//!
//! let tm = f.parse(r#"Binary(Plus, Binary(Plus, Sym("a"), Lit(0)), Lit(0))"#)?;
//! let nf = innermost(plus0).run(&tm);
//! assert_eq!(nf, Ok(Some(f.parse(r#"Sym("a")"#)?)));
//! # Ok::<_, aterm_parse::Error>(())
//! ~~~
//!
//! # Errors
//!
//! A strategy that does not apply to a term yields [`Error::Failure`],
//! which is recovered from by combinators like [`comb::choice`].
//! Violations of shape or scoping contracts, such as
//! applying a list operation to a non-list, yield [`Error::Fatal`],
//! which passes through all combinators.

#[macro_use]
extern crate log;

pub mod annotation;
pub mod arith;
pub mod builder;
pub mod comb;
pub mod congruent;
mod context;
pub mod debug;
pub mod error;
mod factory;
mod fmt;
pub mod lists;
pub mod matcher;
pub mod rule;
pub mod scope;
mod stack;
pub mod table;
mod term;
pub mod traverse;

pub use comb::{Strategy, Transf};
pub use context::{Context, Frame};
pub use error::{Error, Fatal};
pub use factory::{Factory, DEFAULT_CAPACITY};
pub use matcher::Bindings;
pub use stack::Stack;
pub use table::Table;
pub use term::{Elems, Kind, Term};
