use crate::Token;
use alloc::{boxed::Box, string::String, vec::Vec};
use core::iter::Peekable;

/// Functor of an application.
#[derive(Clone, Debug, PartialEq)]
pub enum Functor<S> {
    /// literal functor name (`C(...)`)
    Name(S),
    /// functor name variable (`f(...)`)
    Var(S),
    /// functor name wildcard (`_(...)`)
    Wildcard,
}

/// Unshared term, as it appears in the source text.
///
/// Lists and applications store their elements together with
/// an optional spread element (`*x`), which stands for the rest of the list.
#[derive(Clone, Debug, PartialEq)]
pub enum Term<S> {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Self>, Option<Box<Self>>),
    Appl(Functor<S>, Vec<Self>, Option<Box<Self>>),
    Wildcard,
    /// Variable, possibly constrained by a pattern (`x=C(_)`)
    Var(S, Option<Box<Self>>),
    /// Term followed by its annotations (`t{a1, ..., an}`)
    Annotated(Box<Self>, Vec<Self>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    ExpectedTerm,
    ExpectedCommaOrRBrk,
    ExpectedCommaOrRPar,
    ExpectedCommaOrRBrc,
    /// a spread element `*x` was followed by another element
    SpreadNotLast,
    /// a spread element was neither a variable, a wildcard, nor a list
    SpreadNotList,
    /// a list consisted only of a spread variable or wildcard (`[*x]`),
    /// which would not be distinguishable from the variable itself
    SpreadAlone,
    /// the lexer did not recognise the input
    UnknownToken,
    TrailingInput,
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::ExpectedTerm => write!(f, "term expected"),
            Self::ExpectedCommaOrRBrk => write!(f, "',' or ']' expected"),
            Self::ExpectedCommaOrRPar => write!(f, "',' or ')' expected"),
            Self::ExpectedCommaOrRBrc => write!(f, "',' or '}}' expected"),
            Self::SpreadNotLast => write!(f, "spread element must be last"),
            Self::SpreadNotList => write!(f, "spread element must be a variable, wildcard, or list"),
            Self::SpreadAlone => write!(f, "spread variable must be preceded by a list element"),
            Self::UnknownToken => write!(f, "unknown token"),
            Self::TrailingInput => write!(f, "trailing input after term"),
        }
    }
}

impl<S> Functor<S> {
    pub fn map<T>(self, f: impl Fn(S) -> T) -> Functor<T> {
        match self {
            Self::Name(s) => Functor::Name(f(s)),
            Self::Var(s) => Functor::Var(f(s)),
            Self::Wildcard => Functor::Wildcard,
        }
    }
}

impl<S> Term<S> {
    /// Apply a function to all identifiers in the term.
    pub fn map<T>(self, f: &impl Fn(S) -> T) -> Term<T> {
        let elems = |v: Vec<Self>| v.into_iter().map(|t| t.map(f)).collect();
        let spread = |s: Option<Box<Self>>| s.map(|s| Box::new(s.map(f)));
        match self {
            Self::Int(i) => Term::Int(i),
            Self::Real(r) => Term::Real(r),
            Self::Str(s) => Term::Str(s),
            Self::List(v, s) => Term::List(elems(v), spread(s)),
            Self::Appl(fun, v, s) => Term::Appl(fun.map(f), elems(v), spread(s)),
            Self::Wildcard => Term::Wildcard,
            Self::Var(x, p) => Term::Var(f(x), spread(p)),
            Self::Annotated(tm, annos) => Term::Annotated(Box::new(tm.map(f)), elems(annos)),
        }
    }

    /// Return true if the term may stand for the rest of a list.
    fn is_spreadable(&self) -> bool {
        matches!(self, Self::Var(..) | Self::Wildcard | Self::List(..))
    }
}

fn next_is<'s, I>(iter: &mut Peekable<I>, tok: &Token<'s>) -> bool
where
    I: Iterator<Item = Token<'s>>,
{
    iter.next_if(|t| t == tok).is_some()
}

impl<'s> Term<&'s str> {
    /// Parse a term, including its annotations.
    pub fn parse<I>(iter: &mut Peekable<I>) -> Result<Self>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let tm = Self::atom(iter)?;
        if !next_is(iter, &Token::LBrc) {
            return Ok(tm);
        }
        match Self::elems(iter, Token::RBrc, Error::ExpectedCommaOrRBrc)? {
            (annos, None) => Ok(Self::Annotated(Box::new(tm), annos)),
            (_, Some(_)) => Err(Error::SpreadNotList),
        }
    }

    fn atom<I>(iter: &mut Peekable<I>) -> Result<Self>
    where
        I: Iterator<Item = Token<'s>>,
    {
        match iter.next() {
            Some(Token::Int(i)) => Ok(Self::Int(i)),
            Some(Token::Real(r)) => Ok(Self::Real(r)),
            Some(Token::Str(s)) => Ok(Self::Str(s)),
            Some(Token::LBrk) => {
                if next_is(iter, &Token::RBrk) {
                    return Ok(Self::List(Vec::new(), None));
                }
                let (elems, spread) = Self::elems(iter, Token::RBrk, Error::ExpectedCommaOrRBrk)?;
                match spread.as_deref() {
                    Some(Self::Var(..) | Self::Wildcard) if elems.is_empty() => Err(Error::SpreadAlone),
                    _ => Ok(Self::List(elems, spread)),
                }
            }
            Some(Token::ConsId(s)) => Self::appl(Functor::Name(s), iter),
            Some(Token::LowerId(s)) => {
                if iter.peek() == Some(&Token::LPar) {
                    Self::appl(Functor::Var(s), iter)
                } else if next_is(iter, &Token::Eq) {
                    Ok(Self::Var(s, Some(Box::new(Self::parse(iter)?))))
                } else {
                    Ok(Self::Var(s, None))
                }
            }
            Some(Token::Underscore) => {
                if iter.peek() == Some(&Token::LPar) {
                    Self::appl(Functor::Wildcard, iter)
                } else {
                    Ok(Self::Wildcard)
                }
            }
            Some(Token::Error) => Err(Error::UnknownToken),
            _ => Err(Error::ExpectedTerm),
        }
    }

    /// Parse the arguments of an application, if there are any.
    fn appl<I>(fun: Functor<&'s str>, iter: &mut Peekable<I>) -> Result<Self>
    where
        I: Iterator<Item = Token<'s>>,
    {
        if !next_is(iter, &Token::LPar) || next_is(iter, &Token::RPar) {
            return Ok(Self::Appl(fun, Vec::new(), None));
        }
        let (args, spread) = Self::elems(iter, Token::RPar, Error::ExpectedCommaOrRPar)?;
        Ok(Self::Appl(fun, args, spread))
    }

    /// Parse a non-empty, comma-separated sequence of elements up to `close`.
    fn elems<I>(
        iter: &mut Peekable<I>,
        close: Token<'s>,
        err: Error,
    ) -> Result<(Vec<Self>, Option<Box<Self>>)>
    where
        I: Iterator<Item = Token<'s>>,
    {
        let mut elems = Vec::new();
        loop {
            if next_is(iter, &Token::Star) {
                let spread = Self::parse(iter)?;
                if !spread.is_spreadable() {
                    return Err(Error::SpreadNotList);
                }
                return match iter.next() {
                    Some(tok) if tok == close => Ok((elems, Some(Box::new(spread)))),
                    Some(Token::Comma) => Err(Error::SpreadNotLast),
                    _ => Err(err),
                };
            }
            elems.push(Self::parse(iter)?);
            match iter.next() {
                Some(Token::Comma) => (),
                Some(tok) if tok == close => return Ok((elems, None)),
                _ => return Err(err),
            }
        }
    }

    /// Parse a string that contains exactly one term.
    pub fn parse_str(s: &'s str) -> Result<Self> {
        let mut iter = crate::lex(s).peekable();
        let tm = Self::parse(&mut iter)?;
        match iter.next() {
            None => Ok(tm),
            Some(_) => Err(Error::TrailingInput),
        }
    }
}

#[test]
fn positive() -> Result<()> {
    Term::parse_str("1")?;
    Term::parse_str("-1.5e3")?;
    Term::parse_str(r#""a\"b""#)?;
    Term::parse_str("[]")?;
    Term::parse_str("[1, 2, *x]")?;
    Term::parse_str("[1, *[2, 3]]")?;
    Term::parse_str("[*[2, 3]]")?;
    Term::parse_str("C(*args)")?;
    Term::parse_str("C")?;
    Term::parse_str("C()")?;
    Term::parse_str("C(1, D(x), *rest)")?;
    Term::parse_str("f(x, y)")?;
    Term::parse_str("_(_, *_)")?;
    Term::parse_str("x=C(_)")?;
    Term::parse_str("C(1){A(1), B}")?;
    Ok(())
}

#[test]
fn shapes() -> Result<()> {
    use alloc::vec;
    assert_eq!(
        Term::parse_str("[1,*x]")?,
        Term::List(vec![Term::Int(1)], Some(Box::new(Term::Var("x", None))))
    );
    assert_eq!(
        Term::parse_str("f(_)")?,
        Term::Appl(Functor::Var("f"), vec![Term::Wildcard], None)
    );
    assert_eq!(
        Term::parse_str("C{A}")?,
        Term::Annotated(
            Box::new(Term::Appl(Functor::Name("C"), vec![], None)),
            vec![Term::Appl(Functor::Name("A"), vec![], None)]
        )
    );
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    assert_eq!(Term::parse_str("").unwrap_err(), ExpectedTerm);
    assert_eq!(Term::parse_str(")").unwrap_err(), ExpectedTerm);
    assert_eq!(Term::parse_str("[1 2]").unwrap_err(), ExpectedCommaOrRBrk);
    assert_eq!(Term::parse_str("[1,").unwrap_err(), ExpectedTerm);
    assert_eq!(Term::parse_str("C(1]").unwrap_err(), ExpectedCommaOrRPar);
    assert_eq!(Term::parse_str("C{A").unwrap_err(), ExpectedCommaOrRBrc);
    assert_eq!(Term::parse_str("[*x, 1]").unwrap_err(), SpreadNotLast);
    assert_eq!(Term::parse_str("[*1]").unwrap_err(), SpreadNotList);
    assert_eq!(Term::parse_str("[*x]").unwrap_err(), SpreadAlone);
    assert_eq!(Term::parse_str("[*_]").unwrap_err(), SpreadAlone);
    assert_eq!(Term::parse_str("[*x=[1]]").unwrap_err(), SpreadAlone);
    assert_eq!(Term::parse_str("C{*x}").unwrap_err(), SpreadNotList);
    assert_eq!(Term::parse_str("#").unwrap_err(), UnknownToken);
    assert_eq!(Term::parse_str("1 2").unwrap_err(), TrailingInput);
}
