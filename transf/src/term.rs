//! Immutable, shared terms.

use crate::error::Fatal;
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use fnv::FnvHasher;
use std::rc::Rc;

/// Pointer to a shared term.
///
/// Cloning a term only clones the pointer.
/// Operations that do not change a term return the very same pointer,
/// such that changes can be detected with [`Term::ptr_eq`].
#[derive(Clone)]
pub struct Term(Rc<Node>);

struct Node {
    kind: Kind,
    /// non-empty list of annotations
    annos: Option<Term>,
    /// structural hash, ignoring annotations
    hash: u64,
    /// true if neither the term nor its annotations contain wildcards or variables
    ground: bool,
}

/// Shape of a term.
#[derive(Clone, Debug)]
pub enum Kind {
    Int(i64),
    Real(f64),
    Str(String),
    /// empty list
    Nil,
    /// non-empty list with head and tail
    Cons(Term, Term),
    /// application of a functor name to a list of arguments
    Appl(Term, Term),
    /// matches any term, pattern-only
    Wildcard,
    /// named capture constrained by a pattern, pattern-only
    Var(String, Term),
}

/// Release the subterms of nodes that are only referenced by themselves
/// with an explicit stack, such that long lists and deep terms
/// do not exhaust the call stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut todo = Vec::new();
        self.take_subterms(&mut todo);
        while let Some(tm) = todo.pop() {
            if let Ok(mut node) = Rc::try_unwrap(tm.0) {
                node.take_subterms(&mut todo)
            }
        }
    }
}

impl Node {
    fn take_subterms(&mut self, todo: &mut Vec<Term>) {
        todo.extend(self.annos.take());
        if !matches!(self.kind, Kind::Cons(..) | Kind::Appl(..) | Kind::Var(..)) {
            return;
        }
        match core::mem::replace(&mut self.kind, Kind::Nil) {
            Kind::Cons(l, r) | Kind::Appl(l, r) => todo.extend([l, r]),
            Kind::Var(_, p) => todo.push(p),
            _ => (),
        }
    }
}

impl Kind {
    fn hash(&self) -> u64 {
        use Kind::*;
        let mut h = FnvHasher::default();
        core::mem::discriminant(self).hash(&mut h);
        match self {
            Int(i) => i.hash(&mut h),
            Real(r) => r.to_bits().hash(&mut h),
            Str(s) => s.hash(&mut h),
            Nil | Wildcard => (),
            Cons(l, r) | Appl(l, r) => {
                h.write_u64(l.0.hash);
                h.write_u64(r.0.hash)
            }
            Var(x, p) => {
                x.hash(&mut h);
                h.write_u64(p.0.hash)
            }
        }
        h.finish()
    }

    fn is_ground(&self) -> bool {
        use Kind::*;
        match self {
            Int(_) | Real(_) | Str(_) | Nil => true,
            Cons(l, r) | Appl(l, r) => l.is_ground() && r.is_ground(),
            Wildcard | Var(..) => false,
        }
    }
}

impl Term {
    pub(crate) fn new(kind: Kind) -> Self {
        Self::annotated(kind, None)
    }

    pub(crate) fn annotated(kind: Kind, annos: Option<Term>) -> Self {
        let hash = kind.hash();
        let ground = kind.is_ground() && annos.as_ref().map_or(true, Term::is_ground);
        Self(Rc::new(Node {
            kind,
            annos,
            hash,
            ground,
        }))
    }

    pub(crate) fn nil() -> Self {
        Self::new(Kind::Nil)
    }

    /// Construct a list from its elements, ending with the given tail.
    pub(crate) fn list(elems: impl IntoIterator<Item = Self>, tail: Self) -> Self {
        let elems: Vec<_> = elems.into_iter().collect();
        let cons = |tl, hd| Self::new(Kind::Cons(hd, tl));
        elems.into_iter().rev().fold(tail, cons)
    }

    /// Replace the shape of the term, keeping its annotations.
    pub(crate) fn with_kind(&self, kind: Kind) -> Self {
        Self::annotated(kind, self.0.annos.clone())
    }

    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Hash of the term, ignoring its annotations.
    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    /// Hash of the term and its annotations.
    pub fn full_hash(&self) -> u64 {
        let annos = match &self.0.annos {
            Some(annos) => annos.0.hash,
            None => Kind::Nil.hash(),
        };
        let mut h = FnvHasher::default();
        h.write_u64(self.0.hash);
        h.write_u64(annos);
        h.finish()
    }

    /// Return true if the term contains neither wildcards nor variables.
    pub fn is_ground(&self) -> bool {
        self.0.ground
    }

    /// Structural equivalence, ignoring annotations.
    ///
    /// ~~~
    /// # use transf::Factory;
    /// let f = Factory::new();
    /// let a = f.parse("C(1, [2, 3])")?;
    /// let b = f.parse("C(1, [2, 3]){A}")?;
    /// assert!(a.equivalent(&b));
    /// assert!(a != b);
    /// # Ok::<_, aterm_parse::Error>(())
    /// ~~~
    pub fn equivalent(&self, other: &Self) -> bool {
        use Kind::*;
        let (mut l, mut r) = (self, other);
        loop {
            if l.ptr_eq(r) {
                return true;
            }
            if l.0.hash != r.0.hash {
                return false;
            }
            match (l.kind(), r.kind()) {
                (Int(i1), Int(i2)) => return i1 == i2,
                (Real(r1), Real(r2)) => return r1.to_bits() == r2.to_bits(),
                (Str(s1), Str(s2)) => return s1 == s2,
                (Nil, Nil) | (Wildcard, Wildcard) => return true,
                (Cons(h1, t1), Cons(h2, t2)) | (Appl(h1, t1), Appl(h2, t2)) => {
                    if !h1.equivalent(h2) {
                        return false;
                    }
                    (l, r) = (t1, t2)
                }
                (Var(x1, p1), Var(x2, p2)) => {
                    if x1 != x2 {
                        return false;
                    }
                    (l, r) = (p1, p2)
                }
                _ => return false,
            }
        }
    }

    /// Return the annotations of the term, if there are any.
    pub fn annotations(&self) -> Option<&Term> {
        self.0.annos.as_ref()
    }

    /// Replace the annotations of the term by the given list.
    pub fn set_annotations(&self, annos: Term) -> Result<Self, Fatal> {
        let annos = match annos.kind() {
            Kind::Nil => None,
            Kind::Cons(..) => Some(annos),
            _ => return Err(Fatal::NotAList(annos)),
        };
        Ok(Self::annotated(self.0.kind.clone(), annos))
    }

    pub fn strip_annotations(&self) -> Self {
        match self.0.annos {
            None => self.clone(),
            Some(_) => Self::new(self.0.kind.clone()),
        }
    }

    /// Return the first annotation that is an application of the given name.
    pub fn annotation(&self, name: &str) -> Option<&Term> {
        self.annotations()?.iter().find(|a| a.appl_name() == Some(name))
    }

    /// Add an annotation, replacing annotations with the same functor name.
    ///
    /// ~~~
    /// # use transf::Factory;
    /// let f = Factory::new();
    /// let tm = f.parse("C(1, 2){A(0), B}")?;
    /// let tm = tm.set_annotation(f.appl("A", [f.int(1)]));
    /// assert_eq!(tm.to_string(), "C(1,2){B,A(1)}");
    /// # Ok::<_, aterm_parse::Error>(())
    /// ~~~
    pub fn set_annotation(&self, anno: Term) -> Self {
        let annos = match anno.appl_name() {
            Some(name) => self.annotations_without(name),
            None => self.annotations().into_iter().flat_map(Term::iter).cloned().collect(),
        };
        let annos = Self::list(annos.into_iter().chain([anno]), Self::nil());
        Self::annotated(self.0.kind.clone(), Some(annos))
    }

    /// Remove all annotations that are applications of the given name.
    pub fn remove_annotation(&self, name: &str) -> Self {
        if self.annotation(name).is_none() {
            return self.clone();
        }
        let annos = self.annotations_without(name);
        let annos = (!annos.is_empty()).then(|| Self::list(annos, Self::nil()));
        Self::annotated(self.0.kind.clone(), annos)
    }

    fn annotations_without(&self, name: &str) -> Vec<Term> {
        let annos = self.annotations().into_iter().flat_map(Term::iter);
        annos.filter(|a| a.appl_name() != Some(name)).cloned().collect()
    }

    /// Return true if the term is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.kind(), Kind::Nil | Kind::Cons(..))
    }

    /// Return true if the term may appear as the tail of a list.
    pub fn is_tail(&self) -> bool {
        matches!(self.kind(), Kind::Nil | Kind::Cons(..) | Kind::Var(..) | Kind::Wildcard)
    }

    /// Iterate over the elements of a list.
    ///
    /// Iteration stops at the first tail that is not a `Cons`.
    pub fn iter(&self) -> Elems {
        Elems(self)
    }

    /// Return the elements of a list that ends with `Nil`.
    pub fn to_vec(&self) -> Result<Vec<Term>, Fatal> {
        let mut elems = Vec::new();
        let mut cur = self;
        loop {
            match cur.kind() {
                Kind::Cons(head, tail) => {
                    elems.push(head.clone());
                    cur = tail
                }
                Kind::Nil => return Ok(elems),
                _ => return Err(Fatal::NotAList(self.clone())),
            }
        }
    }

    /// Return the elements of a list of exactly two elements.
    pub fn as_pair(&self) -> Option<(&Term, &Term)> {
        match self.kind() {
            Kind::Cons(l, tail) => match tail.kind() {
                Kind::Cons(r, nil) if matches!(nil.kind(), Kind::Nil) => Some((l, r)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.kind() {
            Kind::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.kind() {
            Kind::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the functor name if the term is an application with a literal name.
    pub fn appl_name(&self) -> Option<&str> {
        match self.kind() {
            Kind::Appl(name, _) => name.as_str(),
            _ => None,
        }
    }

    /// Return the names of all variables in the term, in order of appearance.
    pub fn vars(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars(&self, vars: &mut Vec<String>) {
        if self.is_ground() {
            return;
        }
        match self.kind() {
            Kind::Cons(l, r) | Kind::Appl(l, r) => {
                l.collect_vars(vars);
                r.collect_vars(vars)
            }
            Kind::Var(x, p) => {
                if !vars.contains(x) {
                    vars.push(x.clone())
                }
                p.collect_vars(vars)
            }
            _ => (),
        }
        if let Some(annos) = self.annotations() {
            annos.collect_vars(vars)
        }
    }
}

/// Iterator over the elements of a list.
pub struct Elems<'a>(&'a Term);

impl<'a> Iterator for Elems<'a> {
    type Item = &'a Term;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.kind() {
            Kind::Cons(head, tail) => {
                self.0 = tail;
                Some(head)
            }
            _ => None,
        }
    }
}

impl Deref for Term {
    type Target = Kind;

    fn deref(&self) -> &Self::Target {
        self.kind()
    }
}

/// Equivalence of terms and of their annotations.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let annos = match (self.annotations(), other.annotations()) {
            (None, None) => true,
            (Some(a1), Some(a2)) => a1.equivalent(a2),
            _ => false,
        };
        self.equivalent(other) && annos
    }
}

impl Eq for Term {}

/// Equal terms are equivalent, so the structural hash suffices.
impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

#[cfg(test)]
mod tests {
    use crate::Factory;

    #[test]
    fn equality() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let a = f.parse("C(1,2)")?;
        let b = f.share(aterm_parse::Term::parse_str("C(1, 2)")?);
        assert!(!a.ptr_eq(&b));
        assert!(a.equivalent(&b));
        assert_eq!(a, b);
        assert_eq!(a, a);

        let c = a.set_annotation(f.appl("A", [f.int(1)]));
        assert!(c.equivalent(&a));
        assert_ne!(c, a);
        assert_eq!(c.structural_hash(), a.structural_hash());
        assert_ne!(c.full_hash(), a.full_hash());
        assert_eq!(c.full_hash(), f.parse("C(1,2){A(1)}")?.full_hash());

        assert!(!a.equivalent(&f.parse("C(1,3)")?));
        assert!(!a.equivalent(&f.parse("D(1,2)")?));
        assert!(!f.parse("1")?.equivalent(&f.parse("1.0")?));
        assert!(!f.parse("[1]")?.equivalent(&f.parse("[1,2]")?));
        Ok(())
    }

    #[test]
    fn hash() -> Result<(), aterm_parse::Error> {
        let f = Factory::with_capacity(0);
        for s in ["[1, \"x\", C(2.5)]", "f(x, *y)", "x=C(_)", "D{A}"] {
            let (a, b) = (f.parse(s)?, f.parse(s)?);
            assert!(!a.ptr_eq(&b));
            assert_eq!(a.structural_hash(), b.structural_hash());
            assert_eq!(a.full_hash(), b.full_hash());
        }
        Ok(())
    }

    #[test]
    fn annotations() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let tm = f.parse("C{A(1), B, A(2)}")?;
        assert_eq!(tm.annotation("A"), Some(&f.parse("A(1)")?));
        assert_eq!(tm.remove_annotation("A"), f.parse("C{B}")?);
        assert_eq!(tm.remove_annotation("B").remove_annotation("A"), f.parse("C")?);
        assert!(tm.remove_annotation("D").ptr_eq(&tm));
        assert_eq!(tm.strip_annotations(), f.parse("C")?);
        assert_eq!(tm.set_annotations(f.nil()), Ok(f.parse("C")?));
        assert!(tm.set_annotations(f.int(1)).is_err());
        Ok(())
    }

    #[test]
    fn drop_deep() {
        let f = Factory::new();
        let list = f.list((0..1_000_000).map(|i| f.int(i)));
        assert_eq!(list.iter().count(), 1_000_000);
        drop(list);

        let nat = (0..100_000).fold(f.appl("Z", []), |n, _| f.appl("S", [n]));
        let shared = nat.clone();
        drop(nat);
        assert_eq!(shared.appl_name(), Some("S"));
        drop(shared);
    }

    #[test]
    fn lists() -> Result<(), aterm_parse::Error> {
        let f = Factory::new();
        let l = f.parse("[1, 2, 3]")?;
        let elems: Vec<_> = l.iter().filter_map(|e| e.as_int()).collect();
        assert_eq!(elems, vec![1, 2, 3]);
        assert_eq!(l.to_vec().map(|v| v.len()), Ok(3));
        assert!(f.parse("[1, *x]")?.to_vec().is_err());
        assert_eq!(f.parse("[x, C(y, x), *z]")?.vars(), vec!["x", "y", "z"]);
        assert!(f.parse("C([1], \"a\")")?.is_ground());
        assert!(!f.parse("C{_}")?.is_ground());
        Ok(())
    }
}
