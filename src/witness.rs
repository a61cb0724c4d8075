//! Private module for selective re-export.

use crate::checker::{Graph, Systems};
use crate::{Configuration, Lts, Side, Transition, VertexKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A bisimulation found by a successful check: the vertices that survived and the matched moves
/// between them.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Witness {
    /// Related pairs, sorted. Edges refer to them by position.
    pub vertices: Vec<VertexKey>,
    pub edges: Vec<WitnessEdge>,
}

/// `parent` moved by `transition` on `side` and `child` is where both sides ended up.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct WitnessEdge {
    pub parent: usize,
    pub child: usize,
    pub side: Side,
    pub transition: Transition,
    pub k_prime: Option<usize>,
}

impl Witness {
    pub(crate) fn snapshot<P>(graph: &Graph, systems: Systems<'_, P>) -> Self {
        let mut live: Vec<_> = graph.live_vertices().map(|id| (graph.key(id).clone(), id)).collect();
        live.sort();
        let positions: HashMap<_, _> = live.iter().enumerate().map(|(pos, (_, id))| (*id, pos)).collect();

        let mut edges: Vec<WitnessEdge> = graph
            .edges()
            .filter_map(|e| {
                let parent = *positions.get(&e.parent)?;
                let child = *positions.get(&e.child)?;
                let state = live[parent].0.component(e.side).state;
                let transition = *systems.moves(e.side).transition(state, e.kind, e.index)?;
                Some(WitnessEdge {
                    parent,
                    child,
                    side: e.side,
                    transition,
                    k_prime: e.k_prime,
                })
            })
            .collect();
        edges.sort();
        edges.dedup();

        Witness {
            vertices: live.into_iter().map(|(key, _)| key).collect(),
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The distinct pairs of configurations related by this witness, ignoring the slot
    /// correspondences, in vertex order.
    pub fn related_pairs<'l, P: Eq + Hash>(
        &self,
        left: &'l Lts<P>,
        right: &'l Lts<P>,
    ) -> Vec<(&'l Configuration<P>, &'l Configuration<P>)> {
        let mut seen: HashSet<(&Configuration<P>, &Configuration<P>), ahash::RandomState> = HashSet::default();
        self.vertices
            .iter()
            .filter_map(|v| Some((left.state(v.left.state)?, right.state(v.right.state)?)))
            .filter(|pair| seen.insert(*pair))
            .collect()
    }
}
