//! Private module for selective re-export.

use crate::{Error, Registers};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// A candidate correspondence between the register slots of two configurations, read from the
/// side that owns it: "my slot `k` holds the same name as the other side's slot `rho[k]`".
///
/// The map is kept injective. [`Rho::extended`] never introduces a repeated value and
/// [`Rho::inverse`] reports one if a caller constructed it by other means.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Rho(BTreeMap<usize, usize>);

impl Rho {
    pub fn new() -> Self {
        Rho(BTreeMap::new())
    }

    pub fn get(&self, slot: usize) -> Option<usize> {
        self.0.get(&slot).copied()
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.0.contains_key(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Binds `slot` to `value`, first dropping whichever entry already mapped to `value`.
    pub fn extended(&self, slot: usize, value: usize) -> Rho {
        let mut map: BTreeMap<_, _> = self
            .0
            .iter()
            .filter(|(_, v)| **v != value)
            .map(|(k, v)| (*k, *v))
            .collect();
        map.insert(slot, value);
        Rho(map)
    }

    /// The same correspondence read from the other side.
    pub fn inverse(&self) -> Result<Rho, Error> {
        let mut inverse = BTreeMap::new();
        for (k, v) in &self.0 {
            if inverse.insert(*v, *k).is_some() {
                return Err(Error::non_bijective("rho", v));
            }
        }
        Ok(Rho(inverse))
    }

    /// The other side's slots that are already accounted for.
    pub fn image(&self) -> BTreeSet<usize> {
        self.0.values().copied().collect()
    }

    /// Drops every entry whose own slot is empty in `mine` or whose image is empty in `theirs`.
    pub fn collect_garbage(&self, mine: &Registers, theirs: &Registers) -> Rho {
        Rho(self
            .0
            .iter()
            .filter(|(k, v)| mine.contains_slot(**k) && theirs.contains_slot(**v))
            .map(|(k, v)| (*k, *v))
            .collect())
    }
}

impl FromIterator<(usize, usize)> for Rho {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Rho(iter.into_iter().collect())
    }
}

impl Display for Rho {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", k, v)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rho(pairs: &[(usize, usize)]) -> Rho {
        pairs.iter().copied().collect()
    }

    #[test]
    fn extension_stays_injective() {
        let r = rho(&[(1, 1), (2, 3)]);
        assert_eq!(r.extended(4, 3), rho(&[(1, 1), (4, 3)]));
        assert_eq!(r.extended(1, 2), rho(&[(1, 2), (2, 3)]));
        assert_eq!(r.extended(2, 1), rho(&[(2, 1)]));
        assert!(r.extended(4, 3).inverse().is_ok());
    }

    #[test]
    fn can_invert() {
        let r = rho(&[(1, 2), (3, 1)]);
        assert_eq!(r.inverse(), Ok(rho(&[(2, 1), (1, 3)])));
        assert_eq!(r.inverse().unwrap().inverse(), Ok(r.clone()));
        assert_eq!(r.image(), BTreeSet::from([1, 2]));

        assert_eq!(
            rho(&[(1, 2), (3, 2)]).inverse(),
            Err(Error::NonBijective {
                mapping: "rho",
                value: "2".to_string(),
            })
        );
    }

    #[test]
    fn garbage_collection_drops_empty_slots() {
        let r = rho(&[(1, 1), (2, 3), (3, 2)]);
        let mine: Registers = [(1, "a"), (2, "b")].into_iter().collect();
        let theirs: Registers = [(1, "x"), (2, "z")].into_iter().collect();
        assert_eq!(r.collect_garbage(&mine, &theirs), rho(&[(1, 1)]));
    }

    #[test]
    fn can_display() {
        assert_eq!(rho(&[(2, 1), (1, 3)]).to_string(), "[1:3 2:1]");
        assert_eq!(Rho::new().to_string(), "[]");
    }
}
