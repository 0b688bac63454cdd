//! Congruences and strategies over immediate subterms.
//!
//! Terms are only rebuilt if a subterm changed (with respect to pointer equality).
//! When a list is rebuilt, its elements after the last changed one are shared.

use crate::comb::{Strategy, Transf};
use crate::error::{Error, Fatal};
use crate::term::Kind;
use crate::{Context, Term};

/// A list node together with its head.
type Node<'a> = (&'a Term, &'a Term);

/// Return the nodes of a list and the tail after its last node.
fn spine(list: &Term) -> Result<(Vec<Node>, &Term), Fatal> {
    if !list.is_list() {
        return Err(Fatal::NotAList(list.clone()));
    }
    let mut nodes = Vec::new();
    let mut cur = list;
    while let Kind::Cons(head, tail) = cur.kind() {
        nodes.push((cur, head));
        cur = tail
    }
    Ok((nodes, cur))
}

/// Rebuild a list with new elements, where `None` drops an element.
fn rebuild(list: &Term, nodes: &[Node], tail: &Term, mut new: Vec<Option<Term>>) -> Term {
    let changed = |(n, (_, head)): (&Option<Term>, &Node)| match n {
        Some(n) => !n.ptr_eq(head),
        None => true,
    };
    let last = match new.iter().zip(nodes).rposition(changed) {
        Some(last) => last,
        None => return list.clone(),
    };
    let dropped_first = new[0].is_none();
    new.truncate(last + 1);

    let mut acc = nodes.get(last + 1).map_or(tail, |(node, _)| *node).clone();
    for ((node, _), n) in nodes.iter().zip(new).rev() {
        if let Some(n) = n {
            acc = node.with_kind(Kind::Cons(n, acc))
        }
    }
    match list.annotations() {
        Some(annos) if dropped_first => Term::annotated(acc.kind().clone(), Some(annos.clone())),
        _ => acc,
    }
}

/// Rewrite all elements of a list, dropping elements mapped to `None`.
fn map_list<F>(list: &Term, mut f: F) -> Result<Term, Error>
where
    F: FnMut(&Term) -> Result<Option<Term>, Error>,
{
    let (nodes, tail) = spine(list)?;
    let new = nodes.iter().map(|&(_, head)| f(head));
    let new = new.collect::<Result<Vec<_>, _>>()?;
    Ok(rebuild(list, &nodes, tail, new))
}

/// Rewrite the first element of a list for which `s` succeeds.
fn fetch_list(list: &Term, s: &Strategy, ctx: &mut Context) -> Result<Term, Error> {
    let (nodes, tail) = spine(list)?;
    for (i, &(_, head)) in nodes.iter().enumerate() {
        match s.apply(head, ctx) {
            Ok(y) => {
                let mut new: Vec<_> = nodes.iter().map(|&(_, h)| Some(h.clone())).collect();
                new[i] = Some(y);
                return Ok(rebuild(list, &nodes, tail, new));
            }
            Err(Error::Failure) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(Error::Failure)
}

/// Rewrite all elements of a list for which `s` succeeds, failing if there are none.
fn some_list(list: &Term, s: &Strategy, ctx: &mut Context) -> Result<Term, Error> {
    let mut any = false;
    let out = map_list(list, |head| match s.apply(head, ctx) {
        Ok(y) => {
            any = true;
            Ok(Some(y))
        }
        Err(Error::Failure) => Ok(Some(head.clone())),
        Err(e) => Err(e),
    })?;
    any.then_some(out).ok_or(Error::Failure)
}

/// Apply `f` to the list of immediate subterms of a term, and rebuild the term.
///
/// The immediate subterms of a list are its elements, and
/// the immediate subterms of an application are its arguments.
/// Other terms have no list of immediate subterms, yielding `None`.
fn children<F>(tm: &Term, f: F) -> Option<Result<Term, Error>>
where
    F: FnOnce(&Term) -> Result<Term, Error>,
{
    match tm.kind() {
        Kind::Nil | Kind::Cons(..) => Some(f(tm)),
        Kind::Appl(name, args) if args.is_list() => Some(f(args).map(|new| {
            if new.ptr_eq(args) {
                tm.clone()
            } else {
                tm.with_kind(Kind::Appl(name.clone(), new))
            }
        })),
        _ => None,
    }
}

struct Map(Strategy);

impl Transf for Map {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        map_list(tm, |head| self.0.apply(head, ctx).map(Some))
    }
}

/// Apply `s` to all elements of a list, failing if `s` fails for any element.
pub fn map(s: Strategy) -> Strategy {
    Strategy::new(Map(s))
}

struct Filter(Strategy);

impl Transf for Filter {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        map_list(tm, |head| match self.0.apply(head, ctx) {
            Ok(y) => Ok(Some(y)),
            Err(Error::Failure) => Ok(None),
            Err(e) => Err(e),
        })
    }
}

/// Apply `s` to all elements of a list, keeping only those for which it succeeds.
pub fn filter(s: Strategy) -> Strategy {
    Strategy::new(Filter(s))
}

struct Fetch(Strategy);

impl Transf for Fetch {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        fetch_list(tm, &self.0, ctx)
    }
}

/// Apply `s` to the first element of a list for which it succeeds.
pub fn fetch(s: Strategy) -> Strategy {
    Strategy::new(Fetch(s))
}

struct All(Strategy);

impl Transf for All {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let map = |list: &Term| map_list(list, |head| self.0.apply(head, ctx).map(Some));
        children(tm, map).unwrap_or_else(|| Ok(tm.clone()))
    }
}

/// Apply `s` to all immediate subterms, failing if it fails for any of them.
///
/// ~~~
/// # use transf::{congruent::all, rule::rule, Factory};
/// let f = Factory::new();
/// let inc = all(rule(f.int(0), f.int(1)));
/// assert_eq!(inc.run(&f.parse("C(0, 0)")?), Ok(Some(f.parse("C(1, 1)")?)));
/// assert_eq!(inc.run(&f.parse("C(0, 2)")?), Ok(None));
/// // terms without subterms are returned unchanged
/// assert_eq!(inc.run(&f.int(2)), Ok(Some(f.int(2))));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub fn all(s: Strategy) -> Strategy {
    Strategy::new(All(s))
}

struct One(Strategy);

impl Transf for One {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        children(tm, |list| fetch_list(list, &self.0, ctx)).unwrap_or(Err(Error::Failure))
    }
}

/// Apply `s` to the first immediate subterm for which it succeeds.
pub fn one(s: Strategy) -> Strategy {
    Strategy::new(One(s))
}

struct Some_(Strategy);

impl Transf for Some_ {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        children(tm, |list| some_list(list, &self.0, ctx)).unwrap_or(Err(Error::Failure))
    }
}

/// Apply `s` to all immediate subterms for which it succeeds,
/// failing if it succeeds for none of them.
pub fn some(s: Strategy) -> Strategy {
    Strategy::new(Some_(s))
}

/// Succeed only on the empty list.
pub fn nil() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        match tm.kind() {
            Kind::Nil => Ok(tm.clone()),
            _ => Err(Error::Failure),
        }
    })
}

struct Cons(Strategy, Strategy);

impl Transf for Cons {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let (head, tail) = match tm.kind() {
            Kind::Cons(head, tail) => (head, tail),
            _ => return Err(Error::Failure),
        };
        let (h, t) = (self.0.apply(head, ctx)?, self.1.apply(tail, ctx)?);
        if !t.is_list() {
            return Err(Fatal::NotAList(t).into());
        }
        if h.ptr_eq(head) && t.ptr_eq(tail) {
            return Ok(tm.clone());
        }
        Ok(tm.with_kind(Kind::Cons(h, t)))
    }
}

/// Apply `h` to the head and `t` to the tail of a non-empty list.
pub fn cons(h: Strategy, t: Strategy) -> Strategy {
    Strategy::new(Cons(h, t))
}

struct Appl(Strategy, Strategy);

impl Transf for Appl {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let (name, args) = match tm.kind() {
            Kind::Appl(name, args) => (name, args),
            _ => return Err(Error::Failure),
        };
        let (n, a) = (self.0.apply(name, ctx)?, self.1.apply(args, ctx)?);
        if n.as_str().is_none() {
            return Err(Fatal::NotAString(n).into());
        }
        if !a.is_list() {
            return Err(Fatal::NotAList(a).into());
        }
        if n.ptr_eq(name) && a.ptr_eq(args) {
            return Ok(tm.clone());
        }
        Ok(tm.with_kind(Kind::Appl(n, a)))
    }
}

/// Apply `name` to the functor name (as string) and `args` to
/// the argument list of an application.
pub fn appl(name: Strategy, args: Strategy) -> Strategy {
    Strategy::new(Appl(name, args))
}

struct Congruent(String, Vec<Strategy>);

impl Transf for Congruent {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let args = match tm.kind() {
            Kind::Appl(name, args) if name.as_str() == Some(self.0.as_str()) => args,
            _ => return Err(Error::Failure),
        };
        if !args.is_list() || args.iter().count() != self.1.len() {
            return Err(Error::Failure);
        }
        let mut strategies = self.1.iter();
        let map = |list: &Term| {
            map_list(list, |arg| match strategies.next() {
                Some(s) => s.apply(arg, ctx).map(Some),
                None => Err(Error::Failure),
            })
        };
        children(tm, map).unwrap_or(Err(Error::Failure))
    }
}

/// Apply the `i`-th strategy to the `i`-th argument of
/// an application of the given name with as many arguments as strategies.
pub fn congruent(name: &str, args: Vec<Strategy>) -> Strategy {
    Strategy::new(Congruent(name.to_string(), args))
}
