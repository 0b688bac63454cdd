//! Construction of terms from patterns.

use crate::error::Fatal;
use crate::matcher::Bindings;
use crate::term::{Kind, Term};
use std::collections::VecDeque;

/// Lookup of variable values.
pub trait Vars {
    /// Return the value of a variable.
    ///
    /// This yields `Ok(None)` if the variable is known, but has no value.
    fn lookup(&self, name: &str) -> Result<Option<Term>, Fatal>;
}

impl Vars for Bindings {
    fn lookup(&self, name: &str) -> Result<Option<Term>, Fatal> {
        Ok(self.get(name).cloned())
    }
}

/// Look up variables first in `A`, then in `B`.
impl<A: Vars, B: Vars> Vars for (&A, &B) {
    fn lookup(&self, name: &str) -> Result<Option<Term>, Fatal> {
        match self.0.lookup(name)? {
            Some(tm) => Ok(Some(tm)),
            None => self.1.lookup(name),
        }
    }
}

/// Build a term from a pattern.
///
/// Wildcards are replaced by captures (consumed from the front),
/// variables by their values.
/// Ground parts of the pattern are reused as they are.
///
/// ~~~
/// # use transf::{Factory, Bindings, builder::build};
/// # use std::collections::VecDeque;
/// let f = Factory::new();
/// let mut bnd = Bindings::new();
/// bnd.bind("x".to_string(), f.parse("[2, 3]")?);
/// let mut caps = VecDeque::from([f.str("a")]);
/// let tm = build(&f.parse("C(_, [1, *x])")?, &mut caps, &bnd);
/// assert_eq!(tm, Ok(f.parse(r#"C("a", [1, 2, 3])"#)?));
/// assert!(caps.is_empty());
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn build(pat: &Term, caps: &mut VecDeque<Term>, vars: &impl Vars) -> Result<Term, Fatal> {
    if pat.is_ground() {
        return Ok(pat.clone());
    }
    let tm = match pat.kind() {
        Kind::Int(_) | Kind::Real(_) | Kind::Str(_) | Kind::Nil => Term::new(pat.kind().clone()),
        Kind::Wildcard => caps.pop_front().ok_or(Fatal::EmptyCaptures)?,
        Kind::Var(x, _) => vars.lookup(x)?.ok_or_else(|| Fatal::UnboundVar(x.clone()))?,
        Kind::Cons(head, tail) => {
            let head = build(head, caps, vars)?;
            let tail = build(tail, caps, vars)?;
            if !tail.is_list() {
                return Err(Fatal::NotAList(tail));
            }
            Term::new(Kind::Cons(head, tail))
        }
        Kind::Appl(name, args) => {
            let name = build(name, caps, vars)?;
            if name.as_str().is_none() {
                return Err(Fatal::NotAString(name));
            }
            let args = build(args, caps, vars)?;
            if !args.is_list() {
                return Err(Fatal::NotAList(args));
            }
            Term::new(Kind::Appl(name, args))
        }
    };
    match pat.annotations() {
        Some(annos) => tm.set_annotations(build(annos, caps, vars)?),
        None => Ok(tm),
    }
}
