//! Strategies for inspecting terms during a transformation.

use crate::comb::Strategy;
use crate::error::Error;
use crate::{Context, Term};

/// Log the input with a label and return it.
pub fn trace(label: &str) -> Strategy {
    let label = label.to_string();
    Strategy::new(move |tm: &Term, ctx: &mut Context| -> Result<Term, Error> {
        debug!("{} (depth {}): {}", label, ctx.depth(), tm);
        Ok(tm.clone())
    })
}
