//! Printing of terms in their textual form.
//!
//! Printed terms are read back as equivalent terms, with two exceptions
//! that the text syntax cannot express:
//! functor names that are not uppercase-initial identifiers
//! (`plus(1)` would be read as an application of a functor variable), and
//! reals that are not finite (`NaN`, `inf`).

use crate::term::{Kind, Term};
use aterm_parse::lex::{Escaped, Real};
use core::fmt::{self, Debug, Display};

/// Print the elements of a list, separated by commas,
/// marking a non-list tail with `*`.
fn elems(list: &Term, f: &mut fmt::Formatter) -> fmt::Result {
    let mut cur = list;
    let mut first = true;
    loop {
        let sep = if first { "" } else { "," };
        first = false;
        match cur.kind() {
            Kind::Cons(head, tail) => {
                write!(f, "{}{}", sep, head)?;
                cur = tail
            }
            Kind::Nil => return Ok(()),
            _ => return write!(f, "{}*{}", sep, cur),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            Kind::Int(i) => write!(f, "{}", i)?,
            Kind::Real(r) => Real(*r).fmt(f)?,
            Kind::Str(s) => Escaped(s).fmt(f)?,
            Kind::Nil | Kind::Cons(..) => {
                write!(f, "[")?;
                elems(self, f)?;
                write!(f, "]")?
            }
            Kind::Appl(name, args) => {
                match name.kind() {
                    Kind::Str(s) => write!(f, "{}", s)?,
                    _ => write!(f, "{}", name)?,
                }
                match args.kind() {
                    // a variable name without arguments would be read as variable
                    Kind::Nil if name.as_str().is_some() => (),
                    _ => {
                        write!(f, "(")?;
                        elems(args, f)?;
                        write!(f, ")")?
                    }
                }
            }
            Kind::Wildcard => write!(f, "_")?,
            Kind::Var(x, p) => match p.kind() {
                Kind::Wildcard if p.annotations().is_none() => write!(f, "{}", x)?,
                _ => write!(f, "{}={}", x, p)?,
            },
        }
        if let Some(annos) = self.annotations() {
            write!(f, "{{")?;
            elems(annos, f)?;
            write!(f, "}}")?
        }
        Ok(())
    }
}

impl Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::Factory;

    #[test]
    fn round_trip() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let literals = [
            "0",
            "-42",
            "1.5",
            "-0.25",
            "3.0e-7",
            r#""""#,
            r#""tab\tquote\"backslash\\newline\n""#,
            "[]",
            "[1,[2,[]],\"x\"]",
            "C",
            "Binary(Plus,Lit(1),Sym(\"a\"))",
            "C(1,2){A(1)}",
            "[1,2]{Pos(3,4),Type(\"int\")}",
        ];
        for s in literals {
            let tm = f.parse(s)?;
            assert_eq!(tm.to_string(), s);
            assert_eq!(f.parse(&tm.to_string())?, tm);
        }
        Ok(())
    }

    #[test]
    fn patterns() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        for s in ["_", "x", "x=C(_)", "[1,*x]", "C(*_)", "f(x,y)", "_(x)", "f()", "x{A}"] {
            assert_eq!(f.parse(s)?.to_string(), s);
        }
        assert_eq!(f.parse("C()")?.to_string(), "C");
        assert_eq!(f.parse("[1, *[2, 3]]")?.to_string(), "[1,2,3]");
        Ok(())
    }

    #[test]
    fn unreadable() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let plus = f.appl("plus", [f.int(1)]);
        assert_eq!(plus.to_string(), "plus(1)");
        assert!(!f.parse(&plus.to_string())?.equivalent(&plus));
        let spaced = f.appl("A B", []);
        assert!(f.parse(&spaced.to_string()).is_err());

        assert_eq!(f.real(f64::INFINITY).to_string(), "inf");
        assert!(!f.parse("inf")?.equivalent(&f.real(f64::INFINITY)));
        Ok(())
    }
}
