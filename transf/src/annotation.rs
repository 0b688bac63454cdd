//! Strategies on annotations.

use crate::comb::Strategy;
use crate::error::Error;
use crate::{Context, Term};

/// Add an annotation, replacing annotations with the same functor name.
pub fn set(anno: Term) -> Strategy {
    Strategy::new(move |tm: &Term, _: &mut Context| -> Result<Term, Error> {
        Ok(tm.set_annotation(anno.clone()))
    })
}

/// Return the first annotation with the given functor name, failing if there is none.
pub fn get(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, _: &mut Context| -> Result<Term, Error> {
        tm.annotation(&name).cloned().ok_or(Error::Failure)
    })
}

/// Remove all annotations with the given functor name.
pub fn del(name: &str) -> Strategy {
    let name = name.to_string();
    Strategy::new(move |tm: &Term, _: &mut Context| -> Result<Term, Error> {
        Ok(tm.remove_annotation(&name))
    })
}

/// Remove all annotations.
pub fn strip() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        Ok(tm.strip_annotations())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fatal;
    use crate::traverse::bottomup;
    use crate::Factory;

    #[test]
    fn annotations() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let tm = parse("C(1{Pos(1)}){Pos(0), Type(\"int\")}");
        assert_eq!(get("Pos").run(&tm)?, Some(parse("Pos(0)")));
        assert_eq!(get("Size").run(&tm)?, None);
        let typed = set(parse("Type(\"real\")")).run(&tm)?;
        assert_eq!(typed, Some(parse("C(1{Pos(1)}){Pos(0), Type(\"real\")}")));
        assert_eq!(del("Pos").run(&tm)?, Some(parse("C(1{Pos(1)}){Type(\"int\")}")));
        assert_eq!(strip().run(&tm)?, Some(parse("C(1{Pos(1)})")));

        let stripped = bottomup(strip()).run(&tm)?.unwrap();
        assert_eq!(stripped.to_string(), "C(1)");
        Ok(())
    }
}
