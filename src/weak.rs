//! Private module for selective re-export.

use crate::{Label, Lts, StateId, Transition};
use id_set::IdSet;
use nohash_hasher::NoHashHasher;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};
use std::hash::BuildHasherDefault;

/// How internal reachability is computed for the weak closure. Both produce the same matrix.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ClosureAlgorithm {
    /// A depth-first search from every state. `O(V² + V·E)`, better for sparse internal moves.
    #[default]
    DepthFirst,
    /// All-pairs closure. `O(V³)`.
    FloydWarshall,
}

/// Which states can reach which others using zero or more internal moves. Every state reaches
/// itself.
pub struct Reachability {
    states: Vec<StateId>,
    positions: HashMap<StateId, usize, BuildHasherDefault<NoHashHasher<StateId>>>,
    rows: Vec<IdSet>,
}

impl Reachability {
    pub fn compute<P>(lts: &Lts<P>, algorithm: ClosureAlgorithm) -> Self {
        let mut reachability = Self::identity(lts);
        match algorithm {
            ClosureAlgorithm::DepthFirst => reachability.depth_first(lts),
            ClosureAlgorithm::FloydWarshall => reachability.floyd_warshall(lts),
        }
        reachability
    }

    fn identity<P>(lts: &Lts<P>) -> Self {
        let states: Vec<StateId> = lts.states().map(|(id, _)| id).collect();
        let positions = states.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();
        let rows = (0..states.len())
            .map(|pos| {
                let mut row = IdSet::with_capacity(states.len());
                row.insert(pos);
                row
            })
            .collect();
        Reachability {
            states,
            positions,
            rows,
        }
    }

    fn floyd_warshall<P>(&mut self, lts: &Lts<P>) {
        for t in lts.transitions().iter().filter(|t| t.label.is_tau()) {
            let (i, j) = (self.positions[&t.source], self.positions[&t.destination]);
            self.rows[i].insert(j);
        }
        for k in 0..self.rows.len() {
            let via: Vec<usize> = self.rows[k].iter().collect();
            for i in 0..self.rows.len() {
                if self.rows[i].contains(k) {
                    for &j in &via {
                        self.rows[i].insert(j);
                    }
                }
            }
        }
    }

    fn depth_first<P>(&mut self, lts: &Lts<P>) {
        let mut pending = Vec::new();
        for source in 0..self.states.len() {
            pending.push(source);
            while let Some(pos) = pending.pop() {
                for t in lts.candidates(self.states[pos], Label::tau().kind()) {
                    let next = self.positions[&t.destination];
                    if self.rows[source].insert(next) {
                        pending.push(next);
                    }
                }
            }
        }
    }

    /// Whether `to` is reachable from `from`. Unknown states reach nothing.
    pub fn reaches(&self, from: StateId, to: StateId) -> bool {
        match (self.positions.get(&from), self.positions.get(&to)) {
            (Some(&i), Some(&j)) => self.rows[i].contains(j),
            _ => false,
        }
    }

    /// States reachable from `from`, in ascending id order.
    pub fn reachable_from(&self, from: StateId) -> Vec<StateId> {
        let mut reachable: Vec<StateId> = match self.positions.get(&from) {
            Some(&i) => self.rows[i].iter().map(|pos| self.states[pos]).collect(),
            None => Vec::new(),
        };
        reachable.sort_unstable();
        reachable
    }

    /// States that reach `to`, in ascending id order.
    pub fn reaching(&self, to: StateId) -> Vec<StateId> {
        let Some(&j) = self.positions.get(&to) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.contains(j))
            .map(|(i, _)| self.states[i])
            .collect()
    }
}

impl PartialEq for Reachability {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states
            && self
                .states
                .iter()
                .all(|s| self.reachable_from(*s) == other.reachable_from(*s))
    }
}

impl Debug for Reachability {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.states.iter().map(|s| (s, self.reachable_from(*s))))
            .finish()
    }
}

/// Rewrites `lts` so that matching its transitions strongly decides weak bisimilarity.
///
/// Every state that reaches itself gets an internal self-loop, and every transition
/// `src --a--> dst` is copied as `j --a--> k` for each `j` reaching `src` and each `k` reachable
/// from `dst`. Original transitions are kept, duplicates are dropped, and the states and free
/// names are unchanged.
pub fn weak_transform<P: Clone>(lts: &Lts<P>, algorithm: ClosureAlgorithm) -> Lts<P> {
    let reachability = Reachability::compute(lts, algorithm);
    let mut seen: HashSet<Transition, ahash::RandomState> = HashSet::default();
    let mut transitions = Vec::with_capacity(2 * lts.transitions().len());
    let mut emit = |t: Transition| {
        if seen.insert(t) {
            transitions.push(t);
        }
    };

    for (state, _) in lts.states() {
        if reachability.reaches(state, state) {
            emit(Transition::new(state, Label::tau(), state));
        }
        for (_, outgoing) in lts.outgoing(state) {
            for t in outgoing {
                emit(*t);
                let suffixes = reachability.reachable_from(t.destination);
                for j in reachability.reaching(t.source) {
                    for &k in &suffixes {
                        emit(Transition::new(j, t.label, k));
                    }
                }
            }
        }
    }
    log::debug!(
        "Weak closure. states={}, transitions={}->{}, algorithm={:?}",
        lts.state_count(),
        lts.transitions().len(),
        transitions.len(),
        algorithm
    );
    lts.with_transitions(transitions)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::*;
    use crate::LabelKind;
    use std::collections::BTreeSet;

    fn transition_set<P>(lts: &Lts<P>) -> BTreeSet<Transition> {
        lts.transitions().iter().copied().collect()
    }

    // 0 is an isolated initial state; 1..=4 carry the interesting moves.
    fn diamond() -> Lts<String> {
        lts(
            &[(0, &[]), (1, &[]), (2, &[]), (3, &[]), (4, &[])],
            &[
                (1, Label::fresh_input(1, 1), 2),
                (2, Label::fresh_input(1, 1), 3),
                (1, Label::tau(), 4),
                (4, Label::tau(), 3),
            ],
        )
    }

    #[test]
    fn can_compute_reachability() {
        for algorithm in [ClosureAlgorithm::DepthFirst, ClosureAlgorithm::FloydWarshall] {
            let reachability = Reachability::compute(&diamond(), algorithm);
            assert_eq!(reachability.reachable_from(0), vec![0]);
            assert_eq!(reachability.reachable_from(1), vec![1, 3, 4]);
            assert_eq!(reachability.reachable_from(2), vec![2]);
            assert_eq!(reachability.reachable_from(3), vec![3]);
            assert_eq!(reachability.reachable_from(4), vec![3, 4]);
            assert_eq!(reachability.reaching(3), vec![1, 3, 4]);
            assert!(reachability.reaches(1, 3));
            assert!(!reachability.reaches(3, 1));
            assert!(!reachability.reaches(1, 99));
        }
    }

    #[test]
    fn algorithms_agree() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let lts = random_lts(&mut rng, 8, 14);
            assert_eq!(
                Reachability::compute(&lts, ClosureAlgorithm::DepthFirst),
                Reachability::compute(&lts, ClosureAlgorithm::FloydWarshall)
            );
            assert_eq!(
                transition_set(&weak_transform(&lts, ClosureAlgorithm::DepthFirst)),
                transition_set(&weak_transform(&lts, ClosureAlgorithm::FloydWarshall))
            );
        }
    }

    #[test]
    fn sandwiches_visible_moves_between_internal_ones() {
        let original = lts(
            &[(0, &[]), (1, &[]), (2, &[]), (3, &[]), (4, &[]), (5, &[])],
            &[
                (1, Label::tau(), 2),
                (2, Label::tau(), 3),
                (3, Label::fresh_input(1, 1), 4),
                (4, Label::tau(), 5),
            ],
        );
        let weak = weak_transform(&original, ClosureAlgorithm::default());

        let mut expected = transition_set(&original);
        for s in 0..=5 {
            expected.insert(Transition::new(s, Label::tau(), s));
        }
        expected.insert(Transition::new(1, Label::tau(), 3));
        for (j, k) in [(1, 4), (1, 5), (2, 4), (2, 5), (3, 5)] {
            expected.insert(Transition::new(j, Label::fresh_input(1, 1), k));
        }
        assert_eq!(transition_set(&weak), expected);
        assert_eq!(weak.state_count(), original.state_count());
        assert_eq!(weak.transitions().len(), expected.len());
    }

    #[test]
    fn closes_internal_chains() {
        let chain = lts(
            &[(0, &[]), (1, &[]), (2, &[]), (3, &[]), (4, &[])],
            &[
                (1, Label::tau(), 2),
                (2, Label::tau(), 3),
                (3, Label::fresh_input(1, 1), 4),
            ],
        );
        let weak = weak_transform(&chain, ClosureAlgorithm::FloydWarshall);
        let closed = transition_set(&weak);
        assert!(closed.contains(&Transition::new(1, Label::tau(), 3)));
        for s in 0..=4 {
            assert!(closed.contains(&Transition::new(s, Label::tau(), s)));
        }
        for s in 1..=3 {
            assert!(closed.contains(&Transition::new(s, Label::fresh_input(1, 1), 4)));
        }
        assert_eq!(weak.candidates(1, LabelKind::FRESH_INPUT).len(), 1);
    }

    #[test]
    fn is_idempotent() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let once = weak_transform(&random_lts(&mut rng, 6, 10), ClosureAlgorithm::DepthFirst);
            let twice = weak_transform(&once, ClosureAlgorithm::DepthFirst);
            assert_eq!(transition_set(&once), transition_set(&twice));
        }
    }

    #[test]
    fn keeps_free_names() {
        let original = diamond().with_free_names([("x", "x1")]);
        let weak = weak_transform(&original, ClosureAlgorithm::default());
        assert_eq!(weak.free_names(), original.free_names());
    }
}
