use super::{CursorKey, Side, VertexKey};
use crate::LabelKind;
use id_set::IdSet;
use nohash_hasher::NoHashHasher;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

pub(crate) type VertexId = usize;

type EdgeSet = HashSet<Edge, ahash::RandomState>;
type Incidence = HashMap<VertexId, EdgeSet, BuildHasherDefault<NoHashHasher<VertexId>>>;

/// Records that `parent`'s move `(side, kind, index)` was answered by the candidate at
/// `position`, which leads to `child`. For the fresh-input rule's known-slot branches `k_prime`
/// names the slot that was tried.
///
/// The parent's relatedness depends on the child's, so refuting the child re-queues the parent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Edge {
    pub child: VertexId,
    pub parent: VertexId,
    pub side: Side,
    pub kind: LabelKind,
    pub index: usize,
    pub k_prime: Option<usize>,
    pub position: usize,
}

impl Edge {
    /// The obligation of the parent that this edge discharges.
    pub fn obligation(&self) -> CursorKey {
        CursorKey {
            vertex: self.parent,
            kind: self.kind,
            index: self.index,
            k_prime: self.k_prime,
        }
    }
}

/// The tentative relation: every vertex key ever visited is interned to a [`VertexId`], and the
/// subset currently assumed related is tracked along with the edges among them.
pub(crate) struct Graph {
    ids: HashMap<VertexKey, VertexId, ahash::RandomState>,
    keys: Vec<VertexKey>,
    live: IdSet,
    by_child: Incidence,
    by_parent: Incidence,
    edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Graph {
            ids: HashMap::default(),
            keys: Vec::new(),
            live: IdSet::new(),
            by_child: Incidence::default(),
            by_parent: Incidence::default(),
            edge_count: 0,
        }
    }
}

impl Graph {
    pub fn intern(&mut self, key: VertexKey) -> VertexId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.keys.len();
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn key(&self, id: VertexId) -> &VertexKey {
        &self.keys[id]
    }

    pub fn is_live(&self, id: VertexId) -> bool {
        self.live.contains(id)
    }

    pub fn insert(&mut self, id: VertexId) {
        self.live.insert(id);
    }

    /// Drops a vertex and every edge incident to it.
    pub fn remove(&mut self, id: VertexId) {
        self.live.remove(id);
        let mut incident = Vec::new();
        for index in [&self.by_child, &self.by_parent] {
            if let Some(edges) = index.get(&id) {
                incident.extend(edges.iter().copied());
            }
        }
        for edge in incident {
            self.remove_edge(&edge);
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        if self.by_child.entry(edge.child).or_default().insert(edge) {
            self.by_parent.entry(edge.parent).or_default().insert(edge);
            self.edge_count += 1;
        }
    }

    /// Edges whose child is `id` and whose parent is still assumed related. Edges with an
    /// endpoint that is no longer live are dropped along the way.
    pub fn dependents(&mut self, id: VertexId) -> Vec<Edge> {
        let edges: Vec<Edge> = match self.by_child.get(&id) {
            Some(edges) => edges.iter().copied().collect(),
            None => return Vec::new(),
        };
        let mut dependents = Vec::with_capacity(edges.len());
        for edge in edges {
            if self.is_live(edge.child) && self.is_live(edge.parent) {
                dependents.push(edge);
            } else {
                log::trace!("Dropping stale edge. {:?}", edge);
                self.remove_edge(&edge);
            }
        }
        dependents
    }

    fn remove_edge(&mut self, edge: &Edge) {
        let removed = self
            .by_child
            .get_mut(&edge.child)
            .map_or(false, |edges| edges.remove(edge));
        if let Some(edges) = self.by_parent.get_mut(&edge.parent) {
            edges.remove(edge);
        }
        if removed {
            self.edge_count -= 1;
        }
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.live.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.by_child.values().flat_map(|es| es.iter())
    }

    pub fn vertex_count(&self) -> usize {
        self.live.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Every vertex key interned so far, related or not.
    pub fn interned_count(&self) -> usize {
        self.keys.len()
    }
}
