use alloc::string::String;
use core::fmt::{self, Display, Write};
use logos::{Lexer, Logos};

#[derive(Logos, Clone, Debug, PartialEq)]
pub enum Token<'s> {
    #[token("[")]
    LBrk,

    #[token("]")]
    RBrk,

    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token("{")]
    LBrc,

    #[token("}")]
    RBrc,

    #[token(",")]
    Comma,

    #[token("*")]
    Star,

    #[token("=")]
    Eq,

    #[token("_")]
    Underscore,

    #[regex("-?[0-9]+", |lex| lex.slice().parse().ok())]
    Int(i64),

    #[regex(r"-?([0-9]+\.[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?", |lex| lex.slice().parse().ok())]
    Real(f64),

    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    Str(String),

    /// Uppercase-initial identifier, denoting a literal functor name
    #[regex("[A-Z][a-zA-Z0-9_]*")]
    ConsId(&'s str),

    /// Lowercase-initial identifier, denoting a variable
    #[regex("[a-z][a-zA-Z0-9_]*|_[a-zA-Z0-9_]+")]
    LowerId(&'s str),

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    // Logos requires one token variant to handle errors,
    // it can be named anything you wish.
    #[error]
    Error,
}

impl<'s> Display for Token<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match self {
            Self::LBrk => "[",
            Self::RBrk => "]",
            Self::LPar => "(",
            Self::RPar => ")",
            Self::LBrc => "{",
            Self::RBrc => "}",
            Self::Comma => ",",
            Self::Star => "*",
            Self::Eq => "=",
            Self::Underscore => "_",
            Self::Int(i) => return i.fmt(f),
            Self::Real(r) => return Real(*r).fmt(f),
            Self::Str(s) => return Escaped(s).fmt(f),
            Self::ConsId(s) | Self::LowerId(s) => *s,
            Self::Error => return Err(Default::default()),
        };
        s.fmt(f)
    }
}

fn unescape<'s>(lex: &mut Lexer<'s, Token<'s>>) -> String {
    let slice = lex.slice();
    let mut out = String::with_capacity(slice.len());
    // strip the surrounding quotes
    let mut chars = slice[1..slice.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(c) => out.push(c),
            None => (),
        }
    }
    out
}

/// A string that is displayed quoted and escaped.
pub struct Escaped<'a>(pub &'a str);

impl<'a> Display for Escaped<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '\t' => f.write_str(r"\t")?,
                '\r' => f.write_str(r"\r")?,
                '\n' => f.write_str(r"\n")?,
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str(r"\\")?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

/// A real number that is displayed such that it is lexed again as a real.
///
/// Rust omits the fractional part of integral floats,
/// which would make them indistinguishable from integers.
pub struct Real(pub f64);

impl Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        write!(s, "{:?}", self.0)?;
        if !self.0.is_finite() || s.contains('.') {
            return f.write_str(&s);
        }
        match s.find('e') {
            Some(e) => write!(f, "{}.0{}", &s[..e], &s[e..]),
            None => write!(f, "{}.0", s),
        }
    }
}

#[test]
fn strings() {
    let mut lexer = Token::lexer(r#""a\"b\\c\n" "\q""#);
    assert_eq!(lexer.next(), Some(Token::Str("a\"b\\c\n".into())));
    assert_eq!(lexer.next(), Some(Token::Str("q".into())));
    assert_eq!(lexer.next(), None);
}

#[test]
fn numbers() {
    use alloc::{string::ToString, vec::Vec};
    let tokens: Vec<_> = Token::lexer("1 -2 1.5 -.5 3.0e-7").collect();
    assert_eq!(tokens[0], Token::Int(1));
    assert_eq!(tokens[1], Token::Int(-2));
    assert_eq!(tokens[2], Token::Real(1.5));
    assert_eq!(tokens[3], Token::Real(-0.5));
    assert_eq!(tokens[4], Token::Real(3.0e-7));

    assert_eq!(Real(1.0).to_string(), "1.0");
    assert_eq!(Real(1e20).to_string(), "1.0e20");
    assert_eq!(Real(-0.25).to_string(), "-0.25");
}
