use crate::{Rho, StateId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Which of the two compared systems made a move.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// A state of one input system annotated with the slot correspondence it is currently assumed
/// to satisfy and the register bound shared by both sides.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DerivedKey {
    pub state: StateId,
    pub rho: Rho,
    pub n: usize,
}

impl DerivedKey {
    pub fn new(state: StateId, rho: Rho, n: usize) -> Self {
        DerivedKey { state, rho, n }
    }
}

impl Display for DerivedKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<{}, rho={}, n={}>", self.state, self.rho, self.n)
    }
}

/// A pair of derived states hypothesised to be related.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct VertexKey {
    pub left: DerivedKey,
    pub right: DerivedKey,
}

impl VertexKey {
    pub fn new(left: DerivedKey, right: DerivedKey) -> Self {
        VertexKey { left, right }
    }

    /// Builds a key from the derived state of the side that moved and the one that answered.
    pub fn oriented(side: Side, mover: DerivedKey, other: DerivedKey) -> Self {
        match side {
            Side::Left => VertexKey::new(mover, other),
            Side::Right => VertexKey::new(other, mover),
        }
    }

    pub fn component(&self, side: Side) -> &DerivedKey {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl Display for VertexKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ~ {}", self.left, self.right)
    }
}
