//! Matching, building, and rewriting with patterns.

use crate::builder::{self, Vars};
use crate::comb::{Strategy, Transf};
use crate::error::Error;
use crate::matcher::{matches, Bindings};
use crate::{Context, Term};
use std::collections::VecDeque;

struct Match {
    pat: Term,
    vars: Vec<String>,
}

impl Transf for Match {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let mut bnd = Bindings::new();
        for x in &self.vars {
            if let Some(v) = ctx.get(x)? {
                bnd.bind(x.clone(), v)
            }
        }
        if !matches(&self.pat, tm, &mut bnd) {
            return Err(Error::Failure);
        }
        for x in &self.vars {
            if let Some(v) = bnd.get(x) {
                ctx.set(x, v.clone())?
            }
        }
        Ok(tm.clone())
    }
}

/// Match the input against a pattern, binding its variables in the context.
///
/// All variables of the pattern must have been declared.
/// Variables that already have a value must match terms equivalent to it.
pub fn match_(pat: Term) -> Strategy {
    let vars = pat.vars();
    Strategy::new(Match { pat, vars })
}

struct Build(Term);

impl Transf for Build {
    fn apply(&self, _: &Term, ctx: &mut Context) -> Result<Term, Error> {
        Ok(builder::build(&self.0, &mut VecDeque::new(), &*ctx)?)
    }
}

/// Build a term from a pattern, taking variable values from the context.
pub fn build(pat: Term) -> Strategy {
    Strategy::new(Build(pat))
}

struct Rule {
    lhs: Term,
    rhs: Term,
}

impl Rule {
    fn rewrite(&self, tm: &Term, vars: &impl Vars) -> Result<Term, Error> {
        let mut bnd = Bindings::new();
        if !matches(&self.lhs, tm, &mut bnd) {
            return Err(Error::Failure);
        }
        let mut caps = core::mem::take(bnd.captures_mut());
        Ok(builder::build(&self.rhs, &mut caps, &(&bnd, vars))?)
    }
}

impl Transf for Rule {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let out = self.rewrite(tm, &*ctx)?;
        trace!("rewrite: {} ~> {}", tm, out);
        Ok(out)
    }
}

/// Rewrite the input with a rule.
///
/// The variables and wildcards of the left-hand side are local to the rule.
/// Variables on the right-hand side that do not occur on the left-hand side
/// are taken from the context.
///
/// ~~~
/// # use transf::{rule::rule, Factory};
/// let f = Factory::new();
/// let swap = rule(f.parse("Pair(x, y)")?, f.parse("Pair(y, x)")?);
/// let tm = f.parse("Pair(1, [2])")?;
/// assert_eq!(swap.run(&tm), Ok(Some(f.parse("Pair([2], 1)")?)));
/// assert_eq!(swap.run(&f.int(0)), Ok(None));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn rule(lhs: Term, rhs: Term) -> Strategy {
    Strategy::new(Rule { lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comb::seq;
    use crate::error::Fatal;
    use crate::scope::local;
    use crate::Factory;

    #[test]
    fn rules() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let tail = rule(parse("[_, *xs]"), parse("xs"));
        assert_eq!(tail.run(&parse("[1, 2, 3]"))?, Some(parse("[2, 3]")));
        assert_eq!(tail.run(&parse("[]"))?, None);

        // wildcards are built from the captures of the left-hand side
        let wrap = rule(parse("C(_, _)"), parse("D([_], _)"));
        assert_eq!(wrap.run(&parse("C(1, 2)"))?, Some(parse("D([1], 2)")));

        let fun = rule(parse("f(x)"), parse("Appl(f, x)"));
        assert_eq!(fun.run(&parse("Succ(0)"))?, Some(parse("Appl(\"Succ\", 0)")));

        let undeclared = rule(parse("C(x)"), parse("[x, y]"));
        let err = Fatal::UndeclaredVar("y".into());
        assert_eq!(undeclared.run(&parse("C(1)")), Err(err));
        let extra = rule(parse("[_]"), parse("[_, _]"));
        assert_eq!(extra.run(&parse("[1]")), Err(Fatal::EmptyCaptures));
        Ok(())
    }

    #[test]
    fn context_fallback() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let s = seq(build(f.int(2)), rule(parse("x"), parse("[x, y]")));
        let s = local(&["x", "y"], seq(match_(parse("[x, y]")), s));
        // the rule's `x` is independent of the context's
        assert_eq!(s.run(&parse("[0, 1]"))?, Some(parse("[2, 1]")));
        Ok(())
    }

    #[test]
    fn stand_alone_build() {
        let f = Factory::new();
        assert_eq!(build(f.parse("[_]").unwrap()).run(&f.nil()), Err(Fatal::EmptyCaptures));
    }
}
