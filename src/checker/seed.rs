use crate::{Error, Lts, Name, Rho};
use std::collections::{BTreeSet, HashSet};

/// The register bound shared by both sides: the override if positive, otherwise the highest slot
/// either system ever uses.
pub(crate) fn register_size<P>(left: &Lts<P>, right: &Lts<P>, requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        left.max_register_slot().max(right.max_register_slot())
    }
}

/// Relates the initial slots of both systems that hold the same free name.
///
/// Fails if either initial register bank or either free-name map repeats a name. A free name
/// without a register on one of the sides is left out.
pub(crate) fn initial_rho<P>(left: &Lts<P>, right: &Lts<P>) -> Result<Rho, Error> {
    let left_slots = left.initial().registers.inverse()?;
    let right_slots = right.initial().registers.inverse()?;
    for lts in [left, right] {
        let mut internal = HashSet::new();
        for name in lts.free_names().values() {
            if !internal.insert(name) {
                return Err(Error::non_bijective("free names", name));
            }
        }
    }

    let free_names: BTreeSet<&Name> = left.free_names().keys().chain(right.free_names().keys()).collect();
    let mut pairs = Vec::new();
    for name in free_names {
        let (Some(l), Some(r)) = (left.free_names().get(name), right.free_names().get(name)) else {
            log::debug!("Free name only on one side. name={}", name);
            continue;
        };
        match (left_slots.get(l.as_str()), right_slots.get(r.as_str())) {
            (Some(&i), Some(&j)) => pairs.push((i, j)),
            _ => log::debug!("No initial register for free name. name={}, left={}, right={}", name, l, r),
        }
    }
    Ok(pairs.into_iter().collect())
}
