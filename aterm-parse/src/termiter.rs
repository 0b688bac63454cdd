use crate::{term, Term, Token};
use core::iter::Peekable;
use logos::Logos;

/// Iterator over the terms in a text, separated by whitespace.
///
/// Iteration stops after the first error.
pub struct TermIter<'s> {
    tokens: Peekable<logos::Lexer<'s, Token<'s>>>,
    failed: bool,
}

impl<'s> TermIter<'s> {
    pub fn new(s: &'s str) -> Self {
        Self {
            tokens: Token::lexer(s).peekable(),
            failed: false,
        }
    }
}

impl<'s> Iterator for TermIter<'s> {
    type Item = Result<Term<&'s str>, term::Error>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.tokens.peek()?;
        let tm = Term::parse(&mut self.tokens);
        self.failed = tm.is_err();
        Some(tm)
    }
}

#[test]
fn positive() -> Result<(), term::Error> {
    let tms: Result<alloc::vec::Vec<_>, _> = TermIter::new("1 [2, 3]\nC(x){A}  \"s\"").collect();
    assert_eq!(tms?.len(), 4);
    assert_eq!(TermIter::new("  \n").count(), 0);
    Ok(())
}

#[test]
fn negative() {
    let mut iter = TermIter::new("C(1) [2 3] D");
    assert!(matches!(iter.next(), Some(Ok(_))));
    assert_eq!(iter.next(), Some(Err(term::Error::ExpectedCommaOrRBrk)));
    assert_eq!(iter.next(), None);
}
