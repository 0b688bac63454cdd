//! Construction of terms, including parsing with a bounded cache.

use crate::error::Fatal;
use crate::term::{Kind, Term};
use aterm_parse::term::Functor;
use core::borrow::Borrow;
use core::cell::RefCell;
use core::num::NonZeroUsize;
use fnv::FnvBuildHasher;
use lru::LruCache;

/// Number of parsed terms kept by default.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Parsed terms, keyed by their source text.
///
/// When the cache is full, the least recently used entry is evicted.
type Cache = LruCache<String, Term, FnvBuildHasher>;

/// Constructor of terms.
///
/// ~~~
/// # use transf::Factory;
/// let f = Factory::new();
/// let tm = f.appl("C", [f.int(1), f.list([f.str("a"), f.real(2.5)])]);
/// assert_eq!(tm, f.parse(r#"C(1, ["a", 2.5])"#)?);
///
/// // parsing the same text twice yields the same term
/// assert!(f.parse("[1, 2]")?.ptr_eq(&f.parse("[1, 2]")?));
/// # Ok::<_, aterm_parse::Error>(())
/// ~~~
pub struct Factory {
    /// `None` if caching is disabled
    cache: RefCell<Option<Cache>>,
    nil: Term,
    wildcard: Term,
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a factory that caches at most `capacity` parsed terms.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RefCell::new(NonZeroUsize::new(capacity).map(|cap| {
                LruCache::with_hasher(cap, FnvBuildHasher::default())
            })),
            nil: Term::nil(),
            wildcard: Term::new(Kind::Wildcard),
        }
    }

    /// Number of parsed terms currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().as_ref().map_or(0, LruCache::len)
    }

    /// Parse a term from its textual form.
    pub fn parse(&self, src: &str) -> Result<Term, aterm_parse::Error> {
        let mut cache = self.cache.borrow_mut();
        let cache = match cache.as_mut() {
            Some(cache) => cache,
            None => return Ok(self.share(aterm_parse::Term::parse_str(src)?)),
        };
        if let Some(tm) = cache.get(src) {
            return Ok(tm.clone());
        }
        let tm = self.share(aterm_parse::Term::parse_str(src)?);
        if let Some((evicted, _)) = cache.push(src.to_string(), tm.clone()) {
            debug!("evict from parse cache: {}", evicted);
        }
        Ok(tm)
    }

    /// Convert a parsed term to a shared term.
    pub fn share<S: Borrow<str>>(&self, tm: aterm_parse::Term<S>) -> Term {
        use aterm_parse::Term as PTerm;
        match tm {
            PTerm::Int(i) => self.int(i),
            PTerm::Real(r) => self.real(r),
            PTerm::Str(s) => Term::new(Kind::Str(s)),
            PTerm::List(elems, spread) => self.share_list(elems, spread),
            PTerm::Appl(fun, args, spread) => {
                let name = match fun {
                    Functor::Name(s) => self.str(s.borrow()),
                    Functor::Var(x) => self.var(x.borrow()),
                    Functor::Wildcard => self.wildcard(),
                };
                Term::new(Kind::Appl(name, self.share_list(args, spread)))
            }
            PTerm::Wildcard => self.wildcard(),
            PTerm::Var(x, None) => self.var(x.borrow()),
            PTerm::Var(x, Some(p)) => self.var_with(x.borrow(), self.share(*p)),
            PTerm::Annotated(tm, annos) => {
                let annos: Vec<_> = annos.into_iter().map(|a| self.share(a)).collect();
                let annos = (!annos.is_empty()).then(|| Term::list(annos, self.nil()));
                Term::annotated(self.share(*tm).kind().clone(), annos)
            }
        }
    }

    fn share_list<S: Borrow<str>>(
        &self,
        elems: Vec<aterm_parse::Term<S>>,
        spread: Option<Box<aterm_parse::Term<S>>>,
    ) -> Term {
        // the parser only admits variables, wildcards and lists as spread
        let tail = spread.map_or_else(|| self.nil(), |s| self.share(*s));
        Term::list(elems.into_iter().map(|e| self.share(e)), tail)
    }

    pub fn int(&self, i: i64) -> Term {
        Term::new(Kind::Int(i))
    }

    /// Real number; only finite reals can be printed and read back.
    pub fn real(&self, r: f64) -> Term {
        Term::new(Kind::Real(r))
    }

    pub fn str(&self, s: &str) -> Term {
        Term::new(Kind::Str(s.to_string()))
    }

    pub fn nil(&self) -> Term {
        self.nil.clone()
    }

    pub fn wildcard(&self) -> Term {
        self.wildcard.clone()
    }

    /// Variable matching any term.
    pub fn var(&self, name: &str) -> Term {
        self.var_with(name, self.wildcard())
    }

    /// Variable matching only terms that match the given pattern.
    pub fn var_with(&self, name: &str, pat: Term) -> Term {
        Term::new(Kind::Var(name.to_string(), pat))
    }

    pub fn cons(&self, head: Term, tail: Term) -> Result<Term, Fatal> {
        if !tail.is_tail() {
            return Err(Fatal::NotAList(tail));
        }
        Ok(Term::new(Kind::Cons(head, tail)))
    }

    /// List consisting of the given elements.
    pub fn list(&self, elems: impl IntoIterator<Item = Term>) -> Term {
        Term::list(elems, self.nil())
    }

    /// List consisting of the given elements, followed by the elements of `tail`.
    ///
    /// A variable or wildcard tail needs at least one element before it,
    /// because the list would otherwise be the bare variable.
    pub fn list_with_tail(
        &self,
        elems: impl IntoIterator<Item = Term>,
        tail: Term,
    ) -> Result<Term, Fatal> {
        let elems: Vec<_> = elems.into_iter().collect();
        if !tail.is_tail() || (elems.is_empty() && !tail.is_list()) {
            return Err(Fatal::NotAList(tail));
        }
        Ok(Term::list(elems, tail))
    }

    /// Application of a literal functor name.
    ///
    /// The application can only be printed and read back if
    /// the name is an uppercase-initial identifier.
    pub fn appl(&self, name: &str, args: impl IntoIterator<Item = Term>) -> Term {
        Term::new(Kind::Appl(self.str(name), self.list(args)))
    }

    /// Application whose functor name and arguments are arbitrary terms.
    ///
    /// The name has to be a string, a variable, or a wildcard, and
    /// the arguments have to be list-shaped.
    pub fn appl_term(&self, name: Term, args: Term) -> Result<Term, Fatal> {
        if !matches!(name.kind(), Kind::Str(_) | Kind::Var(..) | Kind::Wildcard) {
            return Err(Fatal::NotAString(name));
        }
        if !args.is_tail() {
            return Err(Fatal::NotAList(args));
        }
        Ok(Term::new(Kind::Appl(name, args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        assert_eq!(f.cons(f.int(1), f.nil())?, parse("[1]"));
        assert_eq!(f.cons(f.int(1), f.var("x"))?, parse("[1, *x]"));
        assert_eq!(f.cons(f.int(1), f.int(2)), Err(Fatal::NotAList(f.int(2))));
        assert_eq!(f.list_with_tail([f.int(1)], parse("[2]"))?, parse("[1, 2]"));
        assert_eq!(f.list_with_tail([], parse("[2]"))?, parse("[2]"));
        assert_eq!(f.list_with_tail([], f.var("x")), Err(Fatal::NotAList(f.var("x"))));
        assert_eq!(f.parse("[*x]"), Err(aterm_parse::Error::SpreadAlone));
        assert_eq!(f.appl_term(f.var("f"), f.list([f.int(1)]))?, parse("f(1)"));
        assert!(f.appl_term(f.int(1), f.nil()).is_err());
        assert!(f.appl_term(f.str("C"), f.int(1)).is_err());
        assert_eq!(f.var_with("x", parse("C(_)")), parse("x=C(_)"));
        assert!(f.nil().ptr_eq(&f.nil()));
        Ok(())
    }

    #[test]
    fn cache() -> Result<(), aterm_parse::Error> {
        let f = Factory::with_capacity(2);
        let a = f.parse("A")?;
        let b = f.parse("B")?;
        // make `A` more recently used than `B`
        assert!(f.parse("A")?.ptr_eq(&a));
        f.parse("C")?;
        assert_eq!(f.cache_len(), 2);
        assert!(f.parse("A")?.ptr_eq(&a));
        assert!(!f.parse("B")?.ptr_eq(&b));

        let f = Factory::with_capacity(1000);
        for i in 0..10_000 {
            f.parse(&format!("C({})", i))?;
        }
        assert_eq!(f.cache_len(), 1000);
        let last = f.parse("C(9999)")?;
        assert!(f.parse("C(9999)")?.ptr_eq(&last));

        let f = Factory::with_capacity(0);
        assert!(!f.parse("A")?.ptr_eq(&f.parse("A")?));
        assert_eq!(f.cache_len(), 0);

        assert!(f.parse("[1,").is_err());
        Ok(())
    }
}
