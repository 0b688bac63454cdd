//! Strategies that introduce and modify variable scopes.

use crate::comb::{Strategy, Transf};
use crate::context::Frame;
use crate::error::Error;
use crate::{Context, Term};

struct Local(Vec<String>, Strategy);

impl Transf for Local {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let mut frame = Frame::new();
        self.0.iter().for_each(|x| frame.declare(x.clone()));
        ctx.with_frame(frame, |ctx| self.1.apply(tm, ctx))
    }
}

/// Run `s` in a scope that declares the given variables without value.
///
/// ~~~
/// # use transf::{comb::seq, rule::{build, match_}, scope::local, Factory};
/// let f = Factory::new();
/// let swap = seq(match_(f.parse("[x, y]")?), build(f.parse("[y, x]")?));
/// let swap = local(&["x", "y"], swap);
/// assert_eq!(swap.run(&f.parse("[1, 2]")?), Ok(Some(f.parse("[2, 1]")?)));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn local(names: &[&str], s: Strategy) -> Strategy {
    let names = names.iter().map(|x| x.to_string()).collect();
    Strategy::new(Local(names, s))
}

struct Let(Vec<(String, Strategy)>, Strategy);

impl Transf for Let {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let mut frame = Frame::new();
        for (x, s) in &self.0 {
            frame.bind(x.clone(), s.apply(tm, ctx)?);
        }
        ctx.with_frame(frame, |ctx| self.1.apply(tm, ctx))
    }
}

/// Run `s` in a scope that binds every variable to
/// the result of its strategy applied to the input.
pub fn let_(bindings: Vec<(&str, Strategy)>, s: Strategy) -> Strategy {
    let bindings = bindings.into_iter().map(|(x, b)| (x.to_string(), b));
    Strategy::new(Let(bindings.collect(), s))
}

/// Remove the value of a variable.
pub fn unset(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        ctx.unset(&name)?;
        Ok(tm.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comb::{ident, seq};
    use crate::error::Fatal;
    use crate::rule::{build, match_};
    use crate::Factory;

    #[test]
    fn locals() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let x1 = seq(match_(parse("x")), build(parse("[x, x]")));
        assert_eq!(local(&["x"], x1.clone()).run(&f.int(1))?, Some(parse("[1, 1]")));
        assert_eq!(x1.run(&f.int(1)), Err(Fatal::UndeclaredVar("x".into())));

        // a bound variable constrains subsequent matches
        let twice = seq(match_(parse("x")), match_(parse("x")));
        assert!(local(&["x"], twice).run(&f.int(1))?.is_some());
        let differ = seq(match_(parse("x")), seq(build(f.int(2)), match_(parse("x"))));
        assert_eq!(local(&["x"], differ).run(&f.int(1))?, None);
        let rebind = seq(unset("x"), seq(build(f.int(2)), match_(parse("x"))));
        let rebind = seq(match_(parse("x")), rebind);
        assert_eq!(local(&["x"], rebind).run(&f.int(1))?, Some(f.int(2)));

        let build_x = build(parse("x"));
        assert_eq!(local(&["x"], build_x).run(&f.int(1)), Err(Fatal::UnboundVar("x".into())));
        Ok(())
    }

    #[test]
    fn lets() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let bindings = vec![("x", ident()), ("y", build(f.int(2)))];
        let s = let_(bindings, build(parse("C(x, y)")));
        assert_eq!(s.run(&f.int(1))?, Some(parse("C(1, 2)")));

        // bindings are computed in the enclosing scope, from the original input
        let pair = let_(vec![("y", build(parse("[x, x]")))], build(parse("C(x, y)")));
        let s = local(&["x"], seq(match_(parse("x")), seq(build(f.int(2)), pair)));
        assert_eq!(s.run(&f.int(1))?, Some(parse("C(1, [1, 1])")));

        let shadow = let_(vec![("x", build(f.int(3)))], build(parse("[x, z]")));
        let s = local(&["x", "z"], seq(match_(parse("z")), seq(match_(parse("x")), shadow)));
        assert_eq!(s.run(&f.int(1))?, Some(parse("[3, 1]")));
        Ok(())
    }
}
