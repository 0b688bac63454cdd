//! Strategies on lists.

use crate::comb::Strategy;
use crate::error::Error;
use crate::term::Kind;
use crate::{Context, Term};

/// Return the number of elements of a list.
pub fn length() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        let len = tm.to_vec()?.len();
        Ok(Term::new(Kind::Int(len as i64)))
    })
}

/// Reverse a list.
pub fn reverse() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        let elems = tm.to_vec()?;
        Ok(Term::list(elems.into_iter().rev(), Term::nil()))
    })
}

/// Concatenate a list of lists.
pub fn concat() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        let lists = tm.to_vec()?;
        let mut elems = Vec::new();
        for l in &lists {
            elems.extend(l.to_vec()?)
        }
        Ok(Term::list(elems, Term::nil()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fatal;
    use crate::Factory;

    #[test]
    fn lists() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        assert_eq!(length().run(&parse("[1, [2, 3], C]"))?, Some(f.int(3)));
        assert_eq!(length().run(&f.nil())?, Some(f.int(0)));
        assert_eq!(reverse().run(&parse("[1, 2, 3]"))?, Some(parse("[3, 2, 1]")));
        let lists = parse("[[1], [], [2, 3]]");
        assert_eq!(concat().run(&lists)?, Some(parse("[1, 2, 3]")));

        assert_eq!(length().run(&f.int(1)), Err(Fatal::NotAList(f.int(1))));
        assert_eq!(concat().run(&parse("[[1], 2]")), Err(Fatal::NotAList(f.int(2))));
        Ok(())
    }
}
