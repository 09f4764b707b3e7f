//! Bound tuples: hard limits plus a soft target band with linear penalties.

use std::fmt;

/// A concrete `(hard_min, soft_min, min_cost, soft_max, hard_max, max_cost)` policy.
///
/// The hard bounds are enforced; the soft band only contributes penalty terms.
/// Penalties below the band apply when `soft_min > hard_min` and `min_cost > 0`,
/// penalties above it when `soft_max < hard_max` and `max_cost > 0`. Soft bounds
/// lying outside the hard band are tolerated and simply never trigger.
///
/// # Examples
///
/// ```
/// use rosterforge_core::BoundTuple;
///
/// let weekly = BoundTuple::new(20, 30, 1, 40, 45, 1);
/// assert!(weekly.penalizes_shortfall());
/// assert!(weekly.penalizes_excess());
/// assert_eq!(weekly.to_string(), "(20, 30, 1, 40, 45, 1)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundTuple {
    pub hard_min: u32,
    pub soft_min: u32,
    pub min_cost: i64,
    pub soft_max: u32,
    pub hard_max: u32,
    pub max_cost: i64,
}

impl BoundTuple {
    /// Creates a bound tuple in the conventional field order.
    pub const fn new(
        hard_min: u32,
        soft_min: u32,
        min_cost: i64,
        soft_max: u32,
        hard_max: u32,
        max_cost: i64,
    ) -> Self {
        Self {
            hard_min,
            soft_min,
            min_cost,
            soft_max,
            hard_max,
            max_cost,
        }
    }

    /// A tuple with only hard bounds and no soft band.
    pub const fn hard(hard_min: u32, hard_max: u32) -> Self {
        Self::new(hard_min, hard_min, 0, hard_max, hard_max, 0)
    }

    /// Returns true if quantities below `soft_min` are penalized.
    pub fn penalizes_shortfall(&self) -> bool {
        self.soft_min > self.hard_min && self.min_cost > 0
    }

    /// Returns true if quantities above `soft_max` are penalized.
    pub fn penalizes_excess(&self) -> bool {
        self.soft_max < self.hard_max && self.max_cost > 0
    }

    /// Returns true if `value` lies within the hard bounds.
    pub fn admits(&self, value: u32) -> bool {
        self.hard_min <= value && value <= self.hard_max
    }
}

impl fmt::Display for BoundTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.hard_min, self.soft_min, self.min_cost, self.soft_max, self.hard_max, self.max_cost
        )
    }
}

/// A partial bound tuple: every field may be left to a less specific layer.
///
/// Overrides are layered field-wise with [`BoundOverride::or`], most specific
/// first, and turned into a concrete [`BoundTuple`] by the resolver.
///
/// ```
/// use rosterforge_core::BoundOverride;
///
/// let day = BoundOverride::new().with_hard_max(6);
/// let employee = BoundOverride::new().with_hard_max(8).with_hard_min(4);
///
/// let merged = day.or(&employee);
/// assert_eq!(merged.hard_max, Some(6));
/// assert_eq!(merged.hard_min, Some(4));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundOverride {
    pub hard_min: Option<u32>,
    pub soft_min: Option<u32>,
    pub min_cost: Option<i64>,
    pub soft_max: Option<u32>,
    pub hard_max: Option<u32>,
    pub max_cost: Option<i64>,
}

impl BoundOverride {
    /// An override that defers every field.
    pub const fn new() -> Self {
        Self {
            hard_min: None,
            soft_min: None,
            min_cost: None,
            soft_max: None,
            hard_max: None,
            max_cost: None,
        }
    }

    pub fn with_hard_min(mut self, value: u32) -> Self {
        self.hard_min = Some(value);
        self
    }

    pub fn with_soft_min(mut self, value: u32) -> Self {
        self.soft_min = Some(value);
        self
    }

    pub fn with_min_cost(mut self, value: i64) -> Self {
        self.min_cost = Some(value);
        self
    }

    pub fn with_soft_max(mut self, value: u32) -> Self {
        self.soft_max = Some(value);
        self
    }

    pub fn with_hard_max(mut self, value: u32) -> Self {
        self.hard_max = Some(value);
        self
    }

    pub fn with_max_cost(mut self, value: i64) -> Self {
        self.max_cost = Some(value);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Field-wise layering: keeps the fields set on `self`, takes the rest from `fallback`.
    pub fn or(&self, fallback: &BoundOverride) -> BoundOverride {
        BoundOverride {
            hard_min: self.hard_min.or(fallback.hard_min),
            soft_min: self.soft_min.or(fallback.soft_min),
            min_cost: self.min_cost.or(fallback.min_cost),
            soft_max: self.soft_max.or(fallback.soft_max),
            hard_max: self.hard_max.or(fallback.hard_max),
            max_cost: self.max_cost.or(fallback.max_cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_gates() {
        let tuple = BoundTuple::new(3, 6, 1, 0, 10, 8);
        assert!(tuple.penalizes_shortfall());
        assert!(tuple.penalizes_excess());

        let no_cost = BoundTuple::new(3, 6, 0, 8, 10, 0);
        assert!(!no_cost.penalizes_shortfall());
        assert!(!no_cost.penalizes_excess());

        let hard_only = BoundTuple::hard(2, 5);
        assert!(!hard_only.penalizes_shortfall());
        assert!(!hard_only.penalizes_excess());
        assert!(hard_only.admits(2));
        assert!(hard_only.admits(5));
        assert!(!hard_only.admits(6));
    }

    #[test]
    fn test_override_layering_prefers_specific() {
        let specific = BoundOverride::new().with_soft_min(5);
        let general = BoundOverride::new().with_soft_min(2).with_max_cost(3);

        let merged = specific.or(&general);
        assert_eq!(merged.soft_min, Some(5));
        assert_eq!(merged.max_cost, Some(3));
        assert_eq!(merged.hard_min, None);
    }

    #[test]
    fn test_empty_override() {
        assert!(BoundOverride::default().is_empty());
        assert!(!BoundOverride::new().with_hard_max(1).is_empty());
    }
}
