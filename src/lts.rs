//! Private module for selective re-export.

mod label;
mod registers;

pub use label::*;
pub use registers::*;

use crate::Error;
use nohash_hasher::NoHashHasher;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::BuildHasherDefault;

/// A name held in a register.
pub type Name = String;

/// Identifies a state of an [`Lts`]. The initial state is always `0`.
pub type StateId = usize;

/// One reachable state of a system: an opaque process term together with its register bank.
///
/// Configurations are compared structurally, so `P` needs a faithful [`Eq`]; how it prints is
/// irrelevant to the checker.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Configuration<P> {
    pub process: P,
    pub registers: Registers,
}

impl<P> Configuration<P> {
    pub fn new(process: P, registers: Registers) -> Self {
        Configuration { process, registers }
    }
}

impl<P: Display> Display for Configuration<P> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ⊢ {}", self.registers, self.process)
    }
}

/// A labelled move between two states of the same [`Lts`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Transition {
    pub source: StateId,
    pub destination: StateId,
    pub label: Label,
}

impl Transition {
    pub fn new(source: StateId, label: Label, destination: StateId) -> Self {
        Transition {
            source,
            destination,
            label,
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.source, self.label, self.destination)
    }
}

type Adjacency = HashMap<StateId, BTreeMap<LabelKind, Vec<Transition>>, BuildHasherDefault<NoHashHasher<StateId>>>;

/// A finite labelled transition system over register configurations, as produced by a
/// front-end that has already explored a process term.
///
/// Outgoing transitions are indexed per state and grouped by [`LabelKind`], preserving the
/// order in which they were supplied. That order is the order in which the checker scans
/// candidates.
#[derive(Clone)]
pub struct Lts<P> {
    states: BTreeMap<StateId, Configuration<P>>,
    transitions: Vec<Transition>,
    free_names: BTreeMap<Name, Name>,
    adjacency: Adjacency,
}

impl<P> Lts<P> {
    /// Validates and indexes a system. State `0` must exist and every transition must connect
    /// known states.
    pub fn new(
        states: impl IntoIterator<Item = (StateId, Configuration<P>)>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, Error> {
        let states: BTreeMap<_, _> = states.into_iter().collect();
        if !states.contains_key(&0) {
            return Err(Error::MissingInitialState);
        }
        let transitions: Vec<_> = transitions.into_iter().collect();
        for t in &transitions {
            for id in [t.source, t.destination] {
                if !states.contains_key(&id) {
                    return Err(Error::UnknownState(id));
                }
            }
        }
        Ok(Self::assemble(states, transitions, BTreeMap::new()))
    }

    /// Records which internal name each externally visible free name was renamed to.
    pub fn with_free_names<V, I>(mut self, free_names: impl IntoIterator<Item = (V, I)>) -> Self
    where
        V: Into<Name>,
        I: Into<Name>,
    {
        self.free_names = free_names
            .into_iter()
            .map(|(visible, internal)| (visible.into(), internal.into()))
            .collect();
        self
    }

    fn assemble(
        states: BTreeMap<StateId, Configuration<P>>,
        transitions: Vec<Transition>,
        free_names: BTreeMap<Name, Name>,
    ) -> Self {
        let mut adjacency = Adjacency::default();
        for t in &transitions {
            adjacency
                .entry(t.source)
                .or_default()
                .entry(t.label.kind())
                .or_default()
                .push(*t);
        }
        Lts {
            states,
            transitions,
            free_names,
            adjacency,
        }
    }

    /// The same system with a different transition set. Endpoints are trusted to be existing
    /// states.
    pub(crate) fn with_transitions(&self, transitions: Vec<Transition>) -> Self
    where
        P: Clone,
    {
        Self::assemble(self.states.clone(), transitions, self.free_names.clone())
    }

    pub fn initial(&self) -> &Configuration<P> {
        &self.states[&0]
    }

    pub fn state(&self, id: StateId) -> Option<&Configuration<P>> {
        self.states.get(&id)
    }

    /// States in ascending id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &Configuration<P>)> + '_ {
        self.states.iter().map(|(id, c)| (*id, c))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Visible name to internal name.
    pub fn free_names(&self) -> &BTreeMap<Name, Name> {
        &self.free_names
    }

    /// The highest register slot used by any state.
    pub fn max_register_slot(&self) -> usize {
        self.states
            .values()
            .map(|c| c.registers.max_slot())
            .max()
            .unwrap_or(0)
    }

    /// Outgoing transitions of `state`, grouped by label kind.
    pub fn outgoing(&self, state: StateId) -> impl Iterator<Item = (LabelKind, &[Transition])> + '_ {
        self.adjacency
            .get(&state)
            .into_iter()
            .flat_map(|by_kind| by_kind.iter().map(|(kind, ts)| (*kind, ts.as_slice())))
    }

    /// Outgoing transitions of `state` whose label has the given kind.
    pub fn candidates(&self, state: StateId, kind: LabelKind) -> &[Transition] {
        self.adjacency
            .get(&state)
            .and_then(|by_kind| by_kind.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn transition(&self, state: StateId, kind: LabelKind, index: usize) -> Option<&Transition> {
        self.candidates(state, kind).get(index)
    }
}

impl<P: Debug> Debug for Lts<P> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Lts")
            .field("states", &self.states)
            .field("transitions", &self.transitions)
            .field("free_names", &self.free_names)
            .finish()
    }
}

impl<P: Display> Display for Lts<P> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "States:")?;
        for (id, c) in &self.states {
            writeln!(f, "  {}: {}", id, c)?;
        }
        writeln!(f, "Transitions:")?;
        for t in &self.transitions {
            writeln!(f, "  {}", t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn requires_an_initial_state() {
        let states = vec![(1, config("P", &[]))];
        assert_eq!(
            Lts::new(states, Vec::<Transition>::new()).err(),
            Some(Error::MissingInitialState)
        );
    }

    #[test]
    fn rejects_dangling_transitions() {
        let states = vec![(0, config("P", &[]))];
        let transitions = vec![Transition::new(0, Label::tau(), 7)];
        assert_eq!(Lts::new(states, transitions).err(), Some(Error::UnknownState(7)));
    }

    #[test]
    fn indexes_by_label_kind_in_supplied_order() {
        let lts = lts(
            &[(0, &[(1, "a")]), (1, &[(1, "a")]), (2, &[(1, "a"), (2, "b")])],
            &[
                (0, Label::output(1, 1), 1),
                (0, Label::tau(), 1),
                (0, Label::fresh_input(1, 2), 2),
                (0, Label::output(1, 1), 2),
            ],
        );
        assert_eq!(
            lts.candidates(0, LabelKind::OUTPUT),
            &[
                Transition::new(0, Label::output(1, 1), 1),
                Transition::new(0, Label::output(1, 1), 2),
            ]
        );
        assert!(lts.candidates(0, LabelKind::INPUT).is_empty());
        assert!(lts.candidates(1, LabelKind::TAU).is_empty());
        assert_eq!(
            lts.transition(0, LabelKind::FRESH_INPUT, 0),
            Some(&Transition::new(0, Label::fresh_input(1, 2), 2))
        );
        assert_eq!(lts.transition(0, LabelKind::FRESH_INPUT, 1), None);
        assert_eq!(lts.outgoing(0).map(|(_, ts)| ts.len()).sum::<usize>(), 4);
        assert_eq!(lts.outgoing(2).count(), 0);
        assert_eq!(lts.max_register_slot(), 2);
    }

    #[test]
    fn can_display() {
        let lts = lts(&[(0, &[(1, "a")]), (1, &[])], &[(0, Label::output(1, 1), 1)]);
        assert_eq!(
            lts.to_string(),
            "States:\n  0: {(1,a)} ⊢ P0\n  1: {} ⊢ P1\nTransitions:\n  0 --1' 1--> 1\n"
        );
    }
}
