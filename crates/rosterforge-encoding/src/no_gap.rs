//! Single contiguous block per day via transition channeling.

use rosterforge_core::model::{BoolVar, CpModel, LinearExpr};
use tracing::trace;

/// Transition indicators created by [`add_no_gap_constraint`].
///
/// `closing[i]` is true iff `works[i]` is true and `works[i + 1]` is false;
/// `opening[i]` iff `works[i]` is false and `works[i + 1]` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoGapChannels {
    pub closing: Vec<BoolVar>,
    pub opening: Vec<BoolVar>,
}

/// Forces the true positions of `works` to form at most one contiguous block.
///
/// At most one closing and one opening transition may occur, and once the
/// block closes at `i` no opening may happen at or after `i`.
pub fn add_no_gap_constraint(model: &mut CpModel, works: &[BoolVar], prefix: &str) -> NoGapChannels {
    if works.len() < 2 {
        return NoGapChannels::default();
    }
    let pairs = works.len() - 1;

    let mut closing = Vec::with_capacity(pairs);
    for i in 0..pairs {
        let (a, b) = (works[i], works[i + 1]);
        let t = model.new_bool_var(format!("{}: closing{}", prefix, i));
        // (a and not b) => t
        model.add_bool_or([!a, b.literal(), t.literal()]);
        // t => (a and not b)
        model.add_implication(t.literal(), a.literal());
        model.add_implication(t.literal(), !b);
        closing.push(t);
    }
    model.add_less_or_equal(LinearExpr::sum(closing.iter().copied()), 1);

    let mut opening = Vec::with_capacity(pairs);
    for i in 0..pairs {
        let (a, b) = (works[i], works[i + 1]);
        let t = model.new_bool_var(format!("{}: opening{}", prefix, i));
        model.add_bool_or([a.literal(), !b, t.literal()]);
        model.add_implication(t.literal(), !a);
        model.add_implication(t.literal(), b.literal());
        opening.push(t);
    }
    model.add_less_or_equal(LinearExpr::sum(opening.iter().copied()), 1);

    for i in 0..pairs {
        for j in i..pairs {
            model
                .add_bool_and([!opening[i], !opening[j]])
                .only_enforce_if([closing[i].literal()]);
        }
    }

    trace!(event = "no_gap_encoded", prefix, indicators = works.len());
    NoGapChannels { closing, opening }
}

#[cfg(test)]
#[path = "no_gap_tests.rs"]
mod tests;
