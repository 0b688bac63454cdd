//! Pattern matching.

use crate::term::{Kind, Term};
use fnv::FnvHashMap;
use std::collections::VecDeque;

/// Variable bindings and wildcard captures obtained from matching.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    vars: FnvHashMap<String, Term>,
    captures: VecDeque<Term>,
}

impl Bindings {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.vars.get(name)
    }

    pub fn bind(&mut self, name: String, tm: Term) {
        self.vars.insert(name, tm);
    }

    /// Terms matched by wildcards, in order of matching.
    pub fn captures(&self) -> &VecDeque<Term> {
        &self.captures
    }

    pub fn captures_mut(&mut self) -> &mut VecDeque<Term> {
        &mut self.captures
    }
}

/// Match a pattern against a term, extending the bindings.
///
/// On failure, the bindings may have been partially extended;
/// callers that need to roll back should match into a scratch copy.
///
/// ~~~
/// # use transf::{Factory, Bindings, matcher::matches};
/// let f = Factory::new();
/// let mut bnd = Bindings::new();
/// assert!(matches(&f.parse("[1, *x]")?, &f.parse("[1, 2, 3]")?, &mut bnd));
/// assert_eq!(bnd.get("x"), Some(&f.parse("[2, 3]")?));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn matches(pat: &Term, tm: &Term, bnd: &mut Bindings) -> bool {
    match pat.annotations() {
        None => matches_kind(pat, tm, bnd),
        Some(annos) => {
            let nil = Term::nil();
            let tm_annos = tm.annotations().unwrap_or(&nil);
            matches_kind(pat, tm, bnd) && matches(annos, tm_annos, bnd)
        }
    }
}

/// Match the shape of a term, walking along list tails without recursion.
fn matches_kind(pat: &Term, tm: &Term, bnd: &mut Bindings) -> bool {
    use Kind::*;
    let (mut pat, mut tm) = (pat, tm);
    loop {
        if pat.is_ground() && pat.ptr_eq(tm) {
            return true;
        }
        match (pat.kind(), tm.kind()) {
            (Int(i1), Int(i2)) => return i1 == i2,
            (Real(r1), Real(r2)) => return r1.to_bits() == r2.to_bits(),
            (Str(s1), Str(s2)) => return s1 == s2,
            (Nil, Nil) => return true,
            (Cons(ph, pt), Cons(th, tt)) | (Appl(ph, pt), Appl(th, tt)) => {
                if !matches(ph, th, bnd) {
                    return false;
                }
                if pt.annotations().is_some() {
                    return matches(pt, tt, bnd);
                }
                (pat, tm) = (pt, tt)
            }
            (Wildcard, _) => {
                bnd.captures.push_back(tm.clone());
                return true;
            }
            (Var(x, p), _) => {
                if let Some(bound) = bnd.get(x) {
                    return bound.equivalent(tm);
                }
                // an unconstrained variable does not capture
                let any = matches!(p.kind(), Wildcard) && p.annotations().is_none();
                if !any && !matches(p, tm, bnd) {
                    return false;
                }
                bnd.bind(x.clone(), tm.clone());
                return true;
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Factory;

    fn parse_match(pat: &str, tm: &str) -> Option<Bindings> {
        let f = Factory::new();
        let mut bnd = Bindings::new();
        let (pat, tm) = (f.parse(pat).unwrap(), f.parse(tm).unwrap());
        matches(&pat, &tm, &mut bnd).then_some(bnd)
    }

    #[test]
    fn literals() {
        assert!(parse_match("1", "1").is_some());
        assert!(parse_match("1", "2").is_none());
        assert!(parse_match("1", "1.0").is_none());
        assert!(parse_match("\"a\"", "\"a\"").is_some());
        assert!(parse_match("[]", "[]").is_some());
        assert!(parse_match("[]", "[1]").is_none());
        assert!(parse_match("C(1, [2])", "C(1, [2])").is_some());
        assert!(parse_match("C(1, [2])", "D(1, [2])").is_none());
        assert!(parse_match("C(1)", "C(1, 2)").is_none());
        // annotations of the subject are ignored when the pattern has none
        assert!(parse_match("C(1)", "C(1){A}").is_some());
    }

    #[test]
    fn identity() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let tm = f.parse("C([1, 2], \"x\")")?;
        assert!(matches(&tm, &tm, &mut Bindings::new()));
        Ok(())
    }

    #[test]
    fn spread() {
        let f = Factory::new();
        let bnd = parse_match("[1, *x]", "[1, 2, 3]").unwrap();
        assert_eq!(bnd.get("x"), Some(&f.parse("[2, 3]").unwrap()));

        let bnd = parse_match("[1, *x]", "[1]").unwrap();
        assert_eq!(bnd.get("x"), Some(&f.nil()));
        assert!(parse_match("[1, *x]", "[]").is_none());

        let bnd = parse_match("C(x, *_)", "C(1, 2, 3)").unwrap();
        assert_eq!(bnd.captures(), &[f.parse("[2, 3]").unwrap()]);
    }

    #[test]
    fn nonlinear() {
        assert!(parse_match("[x, y, x, y]", "[1, 2, 1, 2]").is_some());
        assert!(parse_match("[x, y, x, y]", "[1, 2, 1, 3]").is_none());
        // bound variables are compared modulo annotations
        assert!(parse_match("[x, x]", "[C{A}, C]").is_some());
    }

    #[test]
    fn constrained() {
        let f = Factory::new();
        let bnd = parse_match("x=C(_)", "C(1)").unwrap();
        assert_eq!(bnd.get("x"), Some(&f.parse("C(1)").unwrap()));
        assert_eq!(bnd.captures(), &[f.int(1)]);
        assert!(parse_match("x=C(_)", "D(1)").is_none());
    }

    #[test]
    fn functor() {
        let f = Factory::new();
        let bnd = parse_match("f(x)", "Succ(0)").unwrap();
        assert_eq!(bnd.get("f"), Some(&f.str("Succ")));
        assert_eq!(bnd.get("x"), Some(&f.int(0)));

        let bnd = parse_match("_(1, _)", "Pair(1, 2)").unwrap();
        assert_eq!(bnd.captures(), &[f.str("Pair"), f.int(2)]);
    }

    #[test]
    fn annotations() {
        let f = Factory::new();
        let bnd = parse_match("C{x}", "C{A(1)}").unwrap();
        assert_eq!(bnd.get("x"), Some(&f.parse("A(1)").unwrap()));
        assert!(parse_match("C{A}", "C").is_none());
        assert!(parse_match("C{A}", "C{B}").is_none());
        let bnd = parse_match("x{A, b}", "C{A, B}").unwrap();
        assert_eq!(bnd.get("b"), Some(&f.parse("B").unwrap()));
        assert_eq!(bnd.get("x"), Some(&f.parse("C{A, B}").unwrap()));
    }
}
