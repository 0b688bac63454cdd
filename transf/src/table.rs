//! Dynamic tables.
//!
//! A table maps terms to terms and is declared by a scope.
//! Tables are persistent maps, so taking a snapshot of a table is cheap.

use crate::comb::{Strategy, Transf};
use crate::context::Frame;
use crate::error::{Error, Fatal};
use crate::{Context, Term};
use fnv::FnvBuildHasher;

pub type Table = im::HashMap<Term, Term, FnvBuildHasher>;

/// Union of two tables, preferring entries from `l`.
pub fn union(l: Table, r: Table) -> Table {
    l.union(r)
}

/// Entries of `l` that are also contained in `r`.
pub fn intersection(mut l: Table, r: &Table) -> Table {
    l.retain(|k, v| r.get(k) == Some(v));
    l
}

/// Names of tables to be merged by union and by intersection.
struct Merge {
    union: Vec<String>,
    inter: Vec<String>,
}

impl Merge {
    fn new(union: Vec<String>, inter: Vec<String>) -> Self {
        Self { union, inter }
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.union.iter().chain(self.inter.iter())
    }

    fn snapshot(&self, ctx: &Context) -> Result<Vec<Table>, Fatal> {
        self.names().map(|n| ctx.table(n).cloned()).collect()
    }

    fn restore(&self, ctx: &mut Context, tables: Vec<Table>) -> Result<(), Fatal> {
        for (name, table) in self.names().zip(tables) {
            *ctx.table_mut(name)? = table;
        }
        Ok(())
    }

    /// Replace every table `t` in the context by the merge of `tables[i]` and `t`.
    ///
    /// Return true if any merged table differs from `tables[i]`.
    fn merge(&self, ctx: &mut Context, tables: Vec<Table>) -> Result<bool, Fatal> {
        let mut changed = false;
        for (i, (name, l)) in self.names().zip(tables).enumerate() {
            let r = ctx.table_mut(name)?;
            let merged = if i < self.union.len() {
                union(l.clone(), r.clone())
            } else {
                intersection(l.clone(), r)
            };
            changed |= merged != l;
            *r = merged;
        }
        Ok(changed)
    }
}

/// Insert into a table the key-value pair given as input `[k, v]`.
pub fn set(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        let (k, v) = tm.as_pair().ok_or_else(|| Fatal::NotAPair(tm.clone()))?;
        ctx.table_mut(&name)?.insert(k.clone(), v.clone());
        Ok(tm.clone())
    })
}

/// Insert the input into a table as key, with the empty list as value.
pub fn add(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        ctx.table_mut(&name)?.insert(tm.clone(), Term::nil());
        Ok(tm.clone())
    })
}

/// Return the value stored for the input in a table, failing if there is none.
pub fn get(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        ctx.table(&name)?.get(tm).cloned().ok_or(Error::Failure)
    })
}

/// Remove the input from a table.
pub fn del(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        ctx.table_mut(&name)?.remove(tm);
        Ok(tm.clone())
    })
}

/// Remove all entries from a table.
pub fn clear(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        *ctx.table_mut(&name)? = Table::default();
        Ok(tm.clone())
    })
}

struct WithTables(Vec<String>, Strategy);

impl Transf for WithTables {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let mut frame = Frame::new();
        self.0.iter().for_each(|name| frame.declare_table(name.clone()));
        ctx.with_frame(frame, |ctx| self.1.apply(tm, ctx))
    }
}

/// Run `s` in a scope that declares empty tables with the given names.
pub fn with_tables(names: &[&str], s: Strategy) -> Strategy {
    let names = names.iter().map(|n| n.to_string()).collect();
    Strategy::new(WithTables(names, s))
}

struct Join {
    left: Strategy,
    right: Strategy,
    merge: Merge,
}

impl Join {
    fn join(&self, tm: &Term, ctx: &mut Context, before: Vec<Table>) -> Result<Term, Error> {
        let tm = self.left.apply(tm, ctx)?;
        let left = self.merge.snapshot(ctx)?;
        self.merge.restore(ctx, before)?;
        let tm = self.right.apply(&tm, ctx)?;
        self.merge.merge(ctx, left)?;
        Ok(tm)
    }
}

impl Transf for Join {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let before = self.merge.snapshot(ctx)?;
        self.join(tm, ctx, before.clone()).or_else(|e| {
            self.merge.restore(ctx, before)?;
            Err(e)
        })
    }
}

/// Run `left` and `right` on the same tables, then merge their tables.
///
/// Both strategies start from the same state of the named tables.
/// Afterwards, the tables named by `union` contain the union of
/// the entries written by `left` and by `right`, and
/// the tables named by `inter` contain their common entries.
/// The strategy returns the result of applying `right` to the result of `left`.
///
/// ~~~
/// # use transf::{comb::seq, rule::build, table::{add, join}, Context, Factory};
/// let f = Factory::new();
/// let add = |x| seq(build(f.str(x)), add("needed"));
/// let s = join(add("x"), add("y"), &["needed"], &[]);
///
/// let mut ctx = Context::new();
/// ctx.declare_table("needed".to_string());
/// s.apply(&f.nil(), &mut ctx)?;
/// let needed = ctx.table("needed")?;
/// assert_eq!(needed.len(), 2);
/// assert!(needed.contains_key(&f.str("x")) && needed.contains_key(&f.str("y")));
/// # Ok::<_, transf::Error>(())
/// ~~~
pub fn join(left: Strategy, right: Strategy, union: &[&str], inter: &[&str]) -> Strategy {
    let merge = Merge::new(names(union), names(inter));
    Strategy::new(Join { left, right, merge })
}

struct Iterate {
    body: Strategy,
    merge: Merge,
}

impl Iterate {
    fn iterate(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        loop {
            let before = self.merge.snapshot(ctx)?;
            let out = self.body.apply(tm, ctx)?;
            if !self.merge.merge(ctx, before)? {
                trace!("iterate: fixpoint reached");
                return Ok(out);
            }
        }
    }
}

impl Transf for Iterate {
    fn apply(&self, tm: &Term, ctx: &mut Context) -> Result<Term, Error> {
        let before = self.merge.snapshot(ctx)?;
        self.iterate(tm, ctx).or_else(|e| {
            self.merge.restore(ctx, before)?;
            Err(e)
        })
    }
}

/// Apply `s` to the input until the named tables do not change any more.
///
/// After every application, the tables are merged with their previous state.
/// The strategy returns the result of the last application.
pub fn iterate(s: Strategy, union: &[&str], inter: &[&str]) -> Strategy {
    let merge = Merge::new(names(union), names(inter));
    Strategy::new(Iterate { body: s, merge })
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
