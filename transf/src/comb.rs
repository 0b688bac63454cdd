//! Strategies and their basic combinators.
//!
//! The combinator constructors simplify their arguments where
//! an algebraic law allows it, e.g. `seq(ident(), s)` yields `s` itself.

use crate::error::{Error, Fatal};
use crate::{Context, Term};
use std::rc::{Rc, Weak};

/// Transformation of a term in a context.
pub trait Transf {
    /// Rewrite a term, or fail.
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error>;

    /// Return true if the transformation always returns its input.
    fn is_ident(&self) -> bool {
        false
    }

    /// Return true if the transformation always fails.
    fn is_fail(&self) -> bool {
        false
    }
}

impl<F> Transf for F
where
    F: Fn(&Term, &mut Context) -> Result<Term, Error>,
{
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        self(tm, ctx)
    }
}

/// Pointer to a shared transformation.
#[derive(Clone)]
pub struct Strategy(Rc<dyn Transf>);

impl Strategy {
    pub fn new(t: impl Transf + 'static) -> Self {
        Self(Rc::new(t))
    }

    pub(crate) fn from_rc(t: Rc<dyn Transf>) -> Self {
        Self(t)
    }

    pub(crate) fn downgrade(&self) -> Weak<dyn Transf> {
        Rc::downgrade(&self.0)
    }

    pub fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        self.0.apply(tm, ctx)
    }

    /// Apply the strategy in a fresh context.
    ///
    /// Returns `None` if the strategy does not apply to the term.
    pub fn run(&self, tm: &Term) -> Result<Option<Term>, Fatal> {
        match self.apply(tm, &mut Context::new()) {
            Ok(tm) => Ok(Some(tm)),
            Err(Error::Failure) => Ok(None),
            Err(Error::Fatal(e)) => Err(e),
        }
    }

    /// Compare the memory addresses of two strategies.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        let ptr = |s: &Self| Rc::as_ptr(&s.0) as *const ();
        ptr(self) == ptr(other)
    }

    pub fn is_ident(&self) -> bool {
        self.0.is_ident()
    }

    pub fn is_fail(&self) -> bool {
        self.0.is_fail()
    }
}

struct Ident;

impl Transf for Ident {
    fn apply(&self, tm: &Term, _: &mut Context) -> Result<Term, Error> {
        Ok(tm.clone())
    }

    fn is_ident(&self) -> bool {
        true
    }
}

struct Fail;

impl Transf for Fail {
    fn apply(&self, _: &Term, _: &mut Context) -> Result<Term, Error> {
        Err(Error::Failure)
    }

    fn is_fail(&self) -> bool {
        true
    }
}

struct Seq(Strategy, Strategy);

impl Transf for Seq {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let tm = self.0.apply(tm, ctx)?;
        self.1.apply(&tm, ctx)
    }
}

struct Choice(Strategy, Strategy);

impl Transf for Choice {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        match self.0.apply(tm, ctx) {
            Err(Error::Failure) => self.1.apply(tm, ctx),
            y => y,
        }
    }
}

struct Not(Strategy);

impl Transf for Not {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        match self.0.apply(tm, ctx) {
            Ok(_) => Err(Error::Failure),
            Err(Error::Failure) => Ok(tm.clone()),
            Err(e) => Err(e),
        }
    }
}

struct Where(Strategy);

impl Transf for Where {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        self.0.apply(tm, ctx)?;
        Ok(tm.clone())
    }
}

struct Guarded {
    cond: Strategy,
    then: Strategy,
    els: Strategy,
}

impl Transf for Guarded {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        match self.cond.apply(tm, ctx) {
            Ok(y) => self.then.apply(&y, ctx),
            Err(Error::Failure) => self.els.apply(tm, ctx),
            Err(e) => Err(e),
        }
    }
}

/// Return the input.
pub fn ident() -> Strategy {
    Strategy::new(Ident)
}

/// Fail on every input.
pub fn fail() -> Strategy {
    Strategy::new(Fail)
}

/// Apply `s1`, then `s2` to its result.
pub fn seq(s1: Strategy, s2: Strategy) -> Strategy {
    if s1.is_ident() {
        s2
    } else if s2.is_ident() || s1.is_fail() {
        s1
    } else {
        Strategy::new(Seq(s1, s2))
    }
}

/// Apply `s1`; if it fails, apply `s2` to the original input.
pub fn choice(s1: Strategy, s2: Strategy) -> Strategy {
    if s1.is_ident() || s2.is_fail() {
        s1
    } else if s1.is_fail() {
        s2
    } else {
        Strategy::new(Choice(s1, s2))
    }
}

/// Return the input if `s` fails, and fail otherwise.
pub fn not(s: Strategy) -> Strategy {
    if s.is_ident() {
        fail()
    } else if s.is_fail() {
        ident()
    } else {
        Strategy::new(Not(s))
    }
}

/// Apply `s`, returning the input if `s` fails.
pub fn try_(s: Strategy) -> Strategy {
    choice(s, ident())
}

/// Return the input if `s` succeeds, and fail otherwise.
pub fn where_(s: Strategy) -> Strategy {
    if s.is_ident() || s.is_fail() {
        s
    } else {
        Strategy::new(Where(s))
    }
}

/// If `cond` succeeds, apply `then` to its result,
/// otherwise apply `els` to the original input.
pub fn guarded(cond: Strategy, then: Strategy, els: Strategy) -> Strategy {
    if cond.is_ident() {
        then
    } else if cond.is_fail() {
        els
    } else {
        Strategy::new(Guarded { cond, then, els })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{build, rule};
    use crate::Factory;

    fn fatal() -> Strategy {
        Strategy::new(|_: &Term, _: &mut Context| -> Result<Term, Error> {
            Err(Fatal::EmptyCaptures.into())
        })
    }

    #[test]
    fn laws() {
        let f = Factory::new();
        let x = build(f.int(1));
        assert!(seq(ident(), x.clone()).ptr_eq(&x));
        assert!(seq(x.clone(), ident()).ptr_eq(&x));
        assert!(seq(fail(), x.clone()).is_fail());
        assert!(choice(fail(), x.clone()).ptr_eq(&x));
        assert!(choice(x.clone(), fail()).ptr_eq(&x));
        assert!(choice(ident(), x.clone()).is_ident());
        assert!(try_(ident()).is_ident());
        assert!(try_(fail()).is_ident());
        assert!(not(ident()).is_fail());
        assert!(not(fail()).is_ident());
        assert!(where_(fail()).is_fail());
        assert!(guarded(ident(), x.clone(), fail()).ptr_eq(&x));
        assert!(guarded(fail(), fail(), x.clone()).ptr_eq(&x));
    }

    #[test]
    fn semantics() -> Result<(), Fatal> {
        let f = Factory::new();
        let tm = f.int(0);
        let one = rule(f.int(0), f.int(1));
        let two = rule(f.int(1), f.int(2));

        assert_eq!(seq(one.clone(), two.clone()).run(&tm)?, Some(f.int(2)));
        assert_eq!(seq(two.clone(), one.clone()).run(&tm)?, None);
        assert_eq!(choice(two.clone(), one.clone()).run(&tm)?, Some(f.int(1)));
        assert_eq!(not(one.clone()).run(&tm)?, None);
        assert!(not(two.clone()).run(&tm)?.unwrap().ptr_eq(&tm));
        assert!(try_(two.clone()).run(&tm)?.unwrap().ptr_eq(&tm));
        assert!(where_(one.clone()).run(&tm)?.unwrap().ptr_eq(&tm));
        assert_eq!(where_(two.clone()).run(&tm)?, None);

        let g = |c: &Strategy| guarded(c.clone(), two.clone(), build(f.int(3)));
        assert_eq!(g(&one).run(&tm)?, Some(f.int(2)));
        assert_eq!(g(&two).run(&tm)?, Some(f.int(3)));
        Ok(())
    }

    #[test]
    fn fatal_passes() {
        let f = Factory::new();
        let tm = f.int(0);
        let err = Err(Fatal::EmptyCaptures);
        assert_eq!(choice(fatal(), ident()).run(&tm), err);
        assert_eq!(try_(fatal()).run(&tm), err);
        assert_eq!(not(fatal()).run(&tm), err);
        assert_eq!(where_(fatal()).run(&tm), err);
        assert_eq!(guarded(fatal(), ident(), ident()).run(&tm), err);
        assert_eq!(seq(ident(), fatal()).run(&tm), err);
    }
}
