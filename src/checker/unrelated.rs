use super::{Systems, VertexKey};
use dashmap::DashMap;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

/// Identifies the systems and options a refutation was proven under. Vertex keys only name
/// state ids, so the same key means different things to a strong and a weak check.
pub(crate) type Scope = u64;

/// Vertices already shown not to be bisimilar.
///
/// Entries are written once and never retracted, so the memo can be cloned into several
/// sessions (for example with different register bounds) and they will benefit from each
/// other's refutations. Every refutation is recorded together with the [`Scope`] of the session
/// that proved it, and a session only sees refutations proven under its own scope.
#[derive(Clone, Debug, Default)]
pub struct ProvenUnrelated(Arc<Memo>);

#[derive(Debug, Default)]
struct Memo {
    refuted: DashMap<VertexKey, Vec<Scope>, ahash::RandomState>,
    hasher: ahash::RandomState,
}

impl ProvenUnrelated {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprints everything the search reads besides the vertex keys: the register banks and
    /// moves of the compared systems, the systems that answer them and whether garbage
    /// collection rewrites correspondences.
    pub(crate) fn scope<P>(&self, systems: Systems<'_, P>, garbage_collection: bool) -> Scope {
        let mut hasher = self.0.hasher.build_hasher();
        for lts in [systems.left, systems.right, systems.weak_left, systems.weak_right] {
            lts.state_count().hash(&mut hasher);
            for (id, configuration) in lts.states() {
                id.hash(&mut hasher);
                configuration.registers.hash(&mut hasher);
            }
            lts.transitions().hash(&mut hasher);
        }
        garbage_collection.hash(&mut hasher);
        hasher.finish()
    }

    pub(crate) fn contains(&self, scope: Scope, key: &VertexKey) -> bool {
        self.0
            .refuted
            .get(key)
            .map_or(false, |scopes| scopes.contains(&scope))
    }

    pub(crate) fn insert(&self, scope: Scope, key: VertexKey) {
        let mut scopes = self.0.refuted.entry(key).or_default();
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    /// Number of refutations across all scopes.
    pub fn len(&self) -> usize {
        self.0.refuted.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.refuted.is_empty()
    }

    pub fn clear(&self) {
        self.0.refuted.clear();
    }
}
