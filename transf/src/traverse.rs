//! Recursive strategies and generic traversals.

use crate::comb::{choice, seq, try_, Strategy, Transf};
use crate::congruent::{all, one};
use crate::error::{Error, Fatal};
use crate::{Context, Term};
use std::cell::OnceCell;
use std::rc::{Rc, Weak};

/// Placeholder for a recursive strategy, set once the strategy is constructed.
///
/// The reference is weak, because the strategy contains the placeholder.
struct Proxy(OnceCell<Weak<dyn Transf>>);

impl Transf for Proxy {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let s = self.0.get().and_then(|s| s.upgrade());
        s.ok_or(Fatal::UnsetRec)?.apply(tm, ctx)
    }
}

/// Construct a recursive strategy.
///
/// The function receives the strategy that is being constructed.
///
/// ~~~
/// # use transf::{comb::{seq, try_}, congruent::all, rule::rule, traverse::rec, Factory};
/// let f = Factory::new();
/// let zero = rule(f.int(1), f.int(0));
/// let everywhere = rec(|x| seq(try_(zero.clone()), all(x)));
/// let tm = f.parse("[1, C(1, [2, 1])]")?;
/// assert_eq!(everywhere.run(&tm), Ok(Some(f.parse("[0, C(0, [2, 0])]")?)));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn rec(f: impl FnOnce(Strategy) -> Strategy) -> Strategy {
    let proxy = Rc::new(Proxy(OnceCell::new()));
    let s = f(Strategy::from_rc(proxy.clone()));
    // the cell is fresh, so setting it cannot fail
    let _ = proxy.0.set(s.downgrade());
    s
}

/// Apply `s` to a term, then recursively to the subterms of the result.
pub fn topdown(s: Strategy) -> Strategy {
    rec(|x| seq(s, all(x)))
}

/// Like [`topdown`], but do not descend into terms on which `stop` succeeds.
pub fn topdown_stop(s: Strategy, stop: Strategy) -> Strategy {
    rec(|x| seq(s, choice(stop, all(x))))
}

/// Apply `s` recursively to the subterms of a term, then to the term itself.
pub fn bottomup(s: Strategy) -> Strategy {
    rec(|x| seq(all(x), s))
}

/// Like [`bottomup`], but do not descend into terms on which `stop` succeeds.
pub fn bottomup_stop(s: Strategy, stop: Strategy) -> Strategy {
    rec(|x| seq(choice(stop, all(x)), s))
}

/// Apply `d` on the way down and `u` on the way up.
pub fn downup(d: Strategy, u: Strategy) -> Strategy {
    rec(|x| seq(d, seq(all(x), u)))
}

/// Apply `s` to all outermost terms on which it succeeds.
pub fn alltd(s: Strategy) -> Strategy {
    rec(|x| choice(s, all(x)))
}

/// Apply `s` to the first term on which it succeeds, searching top-down.
pub fn oncetd(s: Strategy) -> Strategy {
    rec(|x| choice(s, one(x)))
}

/// Apply `s` to the first term on which it succeeds, searching bottom-up.
pub fn oncebu(s: Strategy) -> Strategy {
    rec(|x| choice(one(x), s))
}

/// Normalise a term by rewriting innermost terms first.
///
/// ~~~
/// # use transf::{rule::rule, traverse::innermost, Factory};
/// let f = Factory::new();
/// let plus0 = rule(f.parse("Binary(Plus, x, Lit(0))")?, f.parse("x")?);
/// let tm = f.parse(r#"Binary(Plus, Binary(Plus, Sym("a"), Lit(0)), Lit(0))"#)?;
/// assert_eq!(innermost(plus0).run(&tm), Ok(Some(f.parse(r#"Sym("a")"#)?)));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn innermost(s: Strategy) -> Strategy {
    rec(|x| bottomup(try_(seq(s, x))))
}

struct Repeat(Strategy);

impl Transf for Repeat {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let mut tm = tm.clone();
        loop {
            match self.0.apply(&tm, ctx) {
                Ok(y) => tm = y,
                Err(Error::Failure) => return Ok(tm),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Apply `s` until it fails, returning the last result.
pub fn repeat(s: Strategy) -> Strategy {
    Strategy::new(Repeat(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comb::{fail, ident};
    use crate::rule::rule;
    use crate::term::Kind;
    use crate::Factory;

    #[test]
    fn sharing() -> Result<(), Fatal> {
        let f = Factory::new();
        let tm = f.parse("[-1, 0, 1]").unwrap();
        let s = bottomup(try_(rule(f.int(-1), f.int(1))));
        let out = s.run(&tm)?.unwrap();
        assert_eq!(out, f.parse("[1, 0, 1]").unwrap());
        let (Kind::Cons(_, t1), Kind::Cons(_, t2)) = (tm.kind(), out.kind()) else {
            panic!("list expected")
        };
        assert!(t1.ptr_eq(t2));

        let tm = f.parse("C([1, D(2)], \"x\"){A}").unwrap();
        assert!(bottomup(ident()).run(&tm)?.unwrap().ptr_eq(&tm));
        assert!(topdown(try_(fail())).run(&tm)?.unwrap().ptr_eq(&tm));
        Ok(())
    }

    #[test]
    fn order() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let fg = rule(parse("F(G(x))"), parse("H(x)"));
        let g = rule(parse("G(x)"), parse("K(x)"));
        let s = try_(choice(fg, g));
        let tm = parse("F(G(1))");
        assert_eq!(topdown(s.clone()).run(&tm)?, Some(parse("H(1)")));
        assert_eq!(bottomup(s).run(&tm)?, Some(parse("F(K(1))")));

        let w = rule(parse("W(x)"), parse("x"));
        let stop = rule(parse("Stop(_)"), parse("Stopped"));
        let tm = parse("W([Stop(W(1)), W(2)])");
        let out = topdown_stop(try_(w.clone()), stop.clone()).run(&tm)?;
        assert_eq!(out, Some(parse("[Stopped, 2]")));
        let out = bottomup_stop(try_(w.clone()), stop).run(&tm)?;
        assert_eq!(out, Some(parse("[Stopped, 2]")));

        assert_eq!(alltd(w.clone()).run(&tm)?, Some(parse("[Stop(W(1)), W(2)]")));
        assert_eq!(oncetd(w.clone()).run(&tm)?, Some(parse("[Stop(W(1)), W(2)]")));
        assert_eq!(oncebu(w.clone()).run(&tm)?, Some(parse("W([Stop(1), W(2)])")));
        assert_eq!(oncetd(fail()).run(&tm)?, None);

        let up = try_(rule(parse("Up(x)"), parse("x")));
        let down = try_(rule(parse("[x]"), parse("[Up(x)]")));
        assert_eq!(downup(down, up).run(&parse("[[1]]"))?, Some(parse("[[1]]")));
        Ok(())
    }

    #[test]
    fn normalise() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        // Peano addition
        let add0 = rule(parse("Add(Z, y)"), parse("y"));
        let adds = rule(parse("Add(S(x), y)"), parse("S(Add(x, y))"));
        let s = innermost(choice(add0, adds));
        let tm = parse("Add(S(S(Z)), Add(S(Z), Z))");
        assert_eq!(s.run(&tm)?, Some(parse("S(S(S(Z)))")));

        let dec = rule(parse("S(x)"), parse("x"));
        assert_eq!(repeat(dec.clone()).run(&parse("S(S(Z))"))?, Some(parse("Z")));
        assert_eq!(repeat(dec).run(&parse("Z"))?, Some(parse("Z")));
        Ok(())
    }

    #[test]
    fn unset() {
        let f = Factory::new();
        let mut inner = None;
        let outer = rec(|x| {
            inner = Some(x);
            all(ident())
        });
        drop(outer);
        let inner = inner.unwrap();
        assert_eq!(inner.run(&f.int(0)), Err(Fatal::UnsetRec));
    }
}
