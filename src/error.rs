//! Private module for selective re-export.

use crate::{Side, StateId};
use thiserror::Error;

/// Everything that can go wrong while preparing or running a bisimulation check.
///
/// Only [`Error::NonBijective`] is ever recovered from inside the search (the candidate that
/// produced it is treated as a failed match). The remaining kinds indicate that an input or a
/// configured bound was violated and abort the check.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("{mapping} is not bijective: value {value} appears more than once")]
    NonBijective { mapping: &'static str, value: String },

    #[error("derived state limit reached on the {side} side (limit={limit})")]
    StateLimit { side: Side, limit: usize },

    #[error("transition refers to unknown state {0}")]
    UnknownState(StateId),

    #[error("LTS has no initial state (id 0)")]
    MissingInitialState,

    #[error("no transition {index} for state {state} on the {side} side")]
    UnknownTransition {
        side: Side,
        state: StateId,
        index: usize,
    },
}

impl Error {
    pub(crate) fn non_bijective(mapping: &'static str, value: impl ToString) -> Self {
        Error::NonBijective {
            mapping,
            value: value.to_string(),
        }
    }
}
