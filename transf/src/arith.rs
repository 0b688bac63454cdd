//! Strategies on integers.
//!
//! Operations take their operands as a list `[a, b]`.
//! Arithmetic wraps around on overflow.

use crate::comb::{Strategy, Transf};
use crate::error::{Error, Fatal};
use crate::term::Kind;
use crate::{Context, Term};

fn operands(tm: &Term) -> Result<(i64, i64), Fatal> {
    let (a, b) = tm.as_pair().ok_or_else(|| Fatal::NotAPair(tm.clone()))?;
    let int = |x: &Term| x.as_int().ok_or_else(|| Fatal::NotAnInt(x.clone()));
    Ok((int(a)?, int(b)?))
}

struct BinOp(fn(i64, i64) -> i64);

impl Transf for BinOp {
    fn apply(&self, tm: &Term, _: &mut Context) -> Result<Term, Error> {
        let (a, b) = operands(tm)?;
        Ok(Term::new(Kind::Int((self.0)(a, b))))
    }
}

struct Cmp(fn(&i64, &i64) -> bool);

impl Transf for Cmp {
    fn apply(&self, tm: &Term, _: &mut Context) -> Result<Term, Error> {
        let (a, b) = operands(tm)?;
        if (self.0)(&a, &b) {
            Ok(tm.clone())
        } else {
            Err(Error::Failure)
        }
    }
}

pub fn add() -> Strategy {
    Strategy::new(BinOp(i64::wrapping_add))
}

pub fn sub() -> Strategy {
    Strategy::new(BinOp(i64::wrapping_sub))
}

pub fn mul() -> Strategy {
    Strategy::new(BinOp(i64::wrapping_mul))
}

/// Succeed if `a < b`.
pub fn lt() -> Strategy {
    Strategy::new(Cmp(i64::lt))
}

/// Succeed if `a > b`.
pub fn gt() -> Strategy {
    Strategy::new(Cmp(i64::gt))
}

/// Succeed if the two elements of the input are equivalent.
pub fn eq() -> Strategy {
    Strategy::new(|tm: &Term, _: &mut Context| -> Result<Term, Error> {
        let (a, b) = tm.as_pair().ok_or_else(|| Fatal::NotAPair(tm.clone()))?;
        if a.equivalent(b) {
            Ok(tm.clone())
        } else {
            Err(Error::Failure)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comb::seq;
    use crate::rule::rule;
    use crate::traverse::innermost;
    use crate::Factory;

    #[test]
    fn arith() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        let pair = parse("[3, 4]");
        assert_eq!(add().run(&pair)?, Some(f.int(7)));
        assert_eq!(sub().run(&pair)?, Some(f.int(-1)));
        assert_eq!(mul().run(&pair)?, Some(f.int(12)));
        assert_eq!(add().run(&parse("[9223372036854775807, 1]"))?, Some(f.int(i64::MIN)));
        assert!(lt().run(&pair)?.unwrap().ptr_eq(&pair));
        assert_eq!(gt().run(&pair)?, None);
        assert!(eq().run(&parse("[C(1), C(1){A}]"))?.is_some());
        assert_eq!(eq().run(&pair)?, None);

        assert_eq!(add().run(&f.int(1)), Err(Fatal::NotAPair(f.int(1))));
        assert_eq!(add().run(&parse("[1, 2, 3]")), Err(Fatal::NotAPair(parse("[1, 2, 3]"))));
        assert_eq!(add().run(&parse("[1, \"2\"]")), Err(Fatal::NotAnInt(f.str("2"))));
        Ok(())
    }

    #[test]
    fn fold() -> Result<(), Fatal> {
        let f = Factory::new();
        let parse = |s| f.parse(s).unwrap();
        // evaluate additions of literals
        let plus = seq(rule(parse("Plus(x, y)"), parse("[x, y]")), add());
        let tm = parse("Plus(Plus(1, 2), Plus(3, 4))");
        assert_eq!(innermost(plus).run(&tm)?, Some(f.int(10)));
        Ok(())
    }
}
