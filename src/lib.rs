//! A library for deciding whether two name-passing systems are bisimilar.
//!
//! Each system is a finite labeled transition system ([`Lts`]) whose states are
//! [`Configuration`]s: a process term paired with a bank of registers holding names. Moves
//! either exchange names that are already known or bind fresh ones, so two systems may be
//! equivalent even though they store the same names in different register slots. The checker
//! explores pairs of states on demand, tracking a bijection between the slots of both sides
//! ([`Rho`]), and either finds a bisimulation containing the initial pair or proves that none
//! exists.
//!
//! A small example follows.
//!
//! ```rust
//! use fra_bisim::*;
//!
//! // Both systems receive a fresh name on channel `a` and then send `a` over it, but they keep
//! // the fresh name in different slots.
//! let left = Lts::new(
//!     [
//!         (0, Configuration::new("a(x).x<a>", [(1, "a")].into_iter().collect())),
//!         (1, Configuration::new("x<a>", [(1, "a"), (2, "b")].into_iter().collect())),
//!         (2, Configuration::new("0", [(1, "a"), (2, "b")].into_iter().collect())),
//!     ],
//!     [
//!         Transition::new(0, Label::fresh_input(1, 2), 1),
//!         Transition::new(1, Label::output(2, 1), 2),
//!     ],
//! )
//! .unwrap()
//! .with_free_names([("a", "a")]);
//! let right = Lts::new(
//!     [
//!         (0, Configuration::new("a(y).y<a>", [(2, "a")].into_iter().collect())),
//!         (1, Configuration::new("y<a>", [(1, "b"), (2, "a")].into_iter().collect())),
//!         (2, Configuration::new("0", [(1, "b"), (2, "a")].into_iter().collect())),
//!     ],
//!     [
//!         Transition::new(0, Label::fresh_input(2, 1), 1),
//!         Transition::new(1, Label::output(1, 2), 2),
//!     ],
//! )
//! .unwrap()
//! .with_free_names([("a", "a")]);
//!
//! let outcome = BisimBuilder::new(&left, &right).check().unwrap();
//! assert_eq!(outcome.verdict, Verdict::Related);
//! assert_eq!(outcome.initial_rho.get(1), Some(2));
//! assert_eq!(outcome.witness.unwrap().vertices.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

mod checker;
mod error;
mod lts;
mod report;
mod rho;
#[cfg(test)]
mod test_util;
mod weak;
mod witness;

pub use checker::*;
pub use error::*;
pub use lts::*;
pub use report::*;
pub use rho::*;
pub use weak::*;
pub use witness::*;

/// The answer to a bisimulation check.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Verdict {
    /// A bisimulation relates the initial states.
    Related,
    /// No bisimulation relates the initial states.
    NotRelated,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Verdict::Related => write!(f, "related"),
            Verdict::NotRelated => write!(f, "not related"),
        }
    }
}

/// Decides whether `left` and `right` are bisimilar. Moves of either system are answered by
/// transitions of the other side's `weak_*` system, so passing the systems themselves checks
/// strong bisimulation while passing their [`weak_transform`]s checks weak bisimulation.
/// `register_size` overrides the register bound when positive.
///
/// See [`BisimBuilder`] for the remaining options and a detailed [`Outcome`].
pub fn check_bisim<P: Clone>(
    left: &Lts<P>,
    right: &Lts<P>,
    weak_left: &Lts<P>,
    weak_right: &Lts<P>,
    register_size: Option<usize>,
) -> Result<Verdict, Error> {
    let outcome = BisimBuilder::new(left, right)
        .weak_systems(weak_left, weak_right)
        .register_size(register_size.unwrap_or(0))
        .check()?;
    Ok(outcome.verdict)
}
