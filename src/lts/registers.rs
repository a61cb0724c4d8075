use crate::{Error, Name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display, Formatter};

/// A register bank: the names held by one configuration, indexed by slot. Slots are numbered
/// from `1` and may be sparse.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Registers(BTreeMap<usize, Name>);

impl Registers {
    pub fn new() -> Self {
        Registers(BTreeMap::new())
    }

    pub fn get(&self, slot: usize) -> Option<&Name> {
        self.0.get(&slot)
    }

    pub fn contains_slot(&self, slot: usize) -> bool {
        self.0.contains_key(&slot)
    }

    /// Occupied slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Name)> + '_ {
        self.0.iter().map(|(slot, name)| (*slot, name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest occupied slot, or `0` for an empty bank.
    pub fn max_slot(&self) -> usize {
        self.0.keys().next_back().copied().unwrap_or(0)
    }

    /// Name to slot. Fails if two slots hold the same name.
    pub fn inverse(&self) -> Result<HashMap<&str, usize>, Error> {
        let mut inverse = HashMap::with_capacity(self.0.len());
        for (slot, name) in &self.0 {
            if inverse.insert(name.as_str(), *slot).is_some() {
                return Err(Error::non_bijective("register bank", name));
            }
        }
        Ok(inverse)
    }

    /// Renders the bank padded to `n` slots, e.g. `{(1,a),(2,_)}`.
    pub fn padded(&self, n: usize) -> Padded<'_> {
        Padded { registers: self, n }
    }
}

impl<S: Into<Name>> FromIterator<(usize, S)> for Registers {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Registers(iter.into_iter().map(|(slot, name)| (slot, name.into())).collect())
    }
}

impl Display for Registers {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.padded(self.max_slot()).fmt(f)
    }
}

/// See [`Registers::padded`].
pub struct Padded<'a> {
    registers: &'a Registers,
    n: usize,
}

impl Display for Padded<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let n = self.n.max(self.registers.max_slot());
        for slot in 1..=n {
            if slot > 1 {
                write!(f, ",")?;
            }
            match self.registers.get(slot) {
                Some(name) => write!(f, "({},{})", slot, name)?,
                None => write!(f, "({},_)", slot)?,
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_pad_sparse_banks() {
        let registers: Registers = [(1, "a"), (3, "c")].into_iter().collect();
        assert_eq!(registers.max_slot(), 3);
        assert_eq!(registers.to_string(), "{(1,a),(2,_),(3,c)}");
        assert_eq!(registers.padded(4).to_string(), "{(1,a),(2,_),(3,c),(4,_)}");
        assert_eq!(Registers::new().padded(2).to_string(), "{(1,_),(2,_)}");
        assert_eq!(Registers::new().to_string(), "{}");
    }

    #[test]
    fn can_invert() {
        let registers: Registers = [(1, "a"), (2, "b")].into_iter().collect();
        let inverse = registers.inverse().unwrap();
        assert_eq!(inverse.get("a"), Some(&1));
        assert_eq!(inverse.get("b"), Some(&2));
    }

    #[test]
    fn rejects_repeated_names() {
        let registers: Registers = [(1, "a"), (2, "a")].into_iter().collect();
        assert_eq!(
            registers.inverse(),
            Err(Error::NonBijective {
                mapping: "register bank",
                value: "a".to_string(),
            })
        );
    }
}
