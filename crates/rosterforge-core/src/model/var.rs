//! Variable handles and literals.

use std::fmt;
use std::ops::Not;

/// Index of a variable inside its [`CpModel`](super::CpModel).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        VarId(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A bounded integer variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVar(pub(crate) VarId);

impl IntVar {
    #[inline]
    pub const fn id(self) -> VarId {
        self.0
    }
}

/// A 0/1 variable. Every boolean is also usable as an [`IntVar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(pub(crate) VarId);

impl BoolVar {
    #[inline]
    pub const fn id(self) -> VarId {
        self.0
    }

    /// The literal that holds when this variable is true.
    #[inline]
    pub const fn literal(self) -> Literal {
        Literal {
            var: self.0,
            negated: false,
        }
    }
}

impl From<BoolVar> for IntVar {
    fn from(var: BoolVar) -> Self {
        IntVar(var.0)
    }
}

impl From<BoolVar> for Literal {
    fn from(var: BoolVar) -> Self {
        var.literal()
    }
}

impl Not for BoolVar {
    type Output = Literal;

    fn not(self) -> Literal {
        !self.literal()
    }
}

/// A boolean variable or its negation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    var: VarId,
    negated: bool,
}

impl Literal {
    #[inline]
    pub const fn var(self) -> VarId {
        self.var
    }

    #[inline]
    pub const fn is_negated(self) -> bool {
        self.negated
    }

    /// The variable value that makes this literal true.
    #[inline]
    pub const fn satisfying_value(self) -> i64 {
        if self.negated {
            0
        } else {
            1
        }
    }

    /// Whether the literal holds when its variable takes `value`.
    #[inline]
    pub const fn holds(self, value: i64) -> bool {
        value == self.satisfying_value()
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!{:?}", self.var)
        } else {
            write!(f, "{:?}", self.var)
        }
    }
}
