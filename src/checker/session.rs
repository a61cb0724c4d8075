use super::{DerivedKey, Edge, Graph, ProvenUnrelated, ResumeCursors, Scope, Side, VertexId, VertexKey};
use crate::{CheckStats, Error, Lts, Registers, StateId};
use std::collections::HashSet;

/// The four systems a check reads from. Moves are always taken from the original systems and
/// answered from the (possibly weakly closed) systems of the opposite side.
pub(crate) struct Systems<'a, P> {
    pub left: &'a Lts<P>,
    pub right: &'a Lts<P>,
    pub weak_left: &'a Lts<P>,
    pub weak_right: &'a Lts<P>,
}

impl<'a, P> Clone for Systems<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for Systems<'a, P> {}

impl<'a, P> Systems<'a, P> {
    pub fn moves(&self, side: Side) -> &'a Lts<P> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn answers(&self, side: Side) -> &'a Lts<P> {
        match side {
            Side::Left => self.weak_left,
            Side::Right => self.weak_right,
        }
    }
}

/// State owned by a single bisimulation check. Only the proven-unrelated memo may outlive it.
pub(crate) struct Session<'a, P> {
    // Immutable state.
    pub(super) systems: Systems<'a, P>,
    pub(super) n: usize,
    pub(super) garbage_collection: bool,
    max_derived_states: usize,
    scope: Scope,

    // Mutable state.
    pub(super) graph: Graph,
    pub(super) cursors: ResumeCursors,
    pub(super) unrelated: ProvenUnrelated,
    derived: [HashSet<DerivedKey, ahash::RandomState>; 2],
    depth: usize,
    pub(super) stats: CheckStats,
}

impl<'a, P> Session<'a, P> {
    pub fn new(
        systems: Systems<'a, P>,
        n: usize,
        garbage_collection: bool,
        max_derived_states: usize,
        unrelated: ProvenUnrelated,
    ) -> Self {
        let scope = unrelated.scope(systems, garbage_collection);
        Session {
            systems,
            n,
            garbage_collection,
            max_derived_states,
            scope,
            graph: Graph::default(),
            cursors: ResumeCursors::default(),
            unrelated,
            derived: Default::default(),
            depth: 0,
            stats: CheckStats::default(),
        }
    }

    /// Decides whether the initial vertex is related.
    pub fn run(&mut self, initial: VertexKey) -> Result<bool, Error> {
        let id = self.enter(initial)?;
        self.preorder(id)
    }

    /// Registers both derived states of a vertex and interns it.
    pub(super) fn enter(&mut self, key: VertexKey) -> Result<VertexId, Error> {
        self.register(Side::Left, &key.left)?;
        self.register(Side::Right, &key.right)?;
        Ok(self.graph.intern(key))
    }

    fn register(&mut self, side: Side, key: &DerivedKey) -> Result<(), Error> {
        let derived = &mut self.derived[side as usize];
        if derived.contains(key) {
            return Ok(());
        }
        if derived.len() >= self.max_derived_states {
            return Err(Error::StateLimit {
                side,
                limit: self.max_derived_states,
            });
        }
        derived.insert(key.clone());
        Ok(())
    }

    pub(super) fn registers(&self, side: Side, state: StateId) -> Result<&'a Registers, Error> {
        self.systems
            .moves(side)
            .state(state)
            .map(|c| &c.registers)
            .ok_or(Error::UnknownState(state))
    }

    /// Assumes the vertex related and tries to justify the assumption. Returns whether it
    /// survived.
    pub(super) fn preorder(&mut self, id: VertexId) -> Result<bool, Error> {
        self.stats.preorder_calls += 1;
        if self.unrelated.contains(self.scope, self.graph.key(id)) {
            log::trace!("Known unrelated. {}", self.graph.key(id));
            return Ok(false);
        }
        if self.graph.is_live(id) {
            return Ok(true);
        }
        self.graph.insert(id);

        self.depth += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
        let matched = self.match_all(id);
        self.depth -= 1;

        let related = matched? && self.graph.is_live(id);
        if !related && self.graph.is_live(id) {
            let dependents = self.refute(id);
            self.reevaluate(dependents)?;
        }
        log::debug!("{}: {} related={}", self.depth, self.graph.key(id), related);
        Ok(related)
    }

    /// Matches every move of both components of `id`, stopping at the first one without an
    /// answer.
    fn match_all(&mut self, id: VertexId) -> Result<bool, Error> {
        for side in [Side::Left, Side::Right] {
            let state = self.graph.key(id).component(side).state;
            let lts = self.systems.moves(side);
            for (kind, moves) in lts.outgoing(state) {
                for index in 0..moves.len() {
                    if !self.process_derivatives(id, side, kind, index)? {
                        log::debug!(
                            "{}: No answer for {} on the {} side of {}.",
                            self.depth,
                            moves[index],
                            side,
                            self.graph.key(id)
                        );
                        return Ok(false);
                    }
                    if !self.graph.is_live(id) {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }

    /// Removes a vertex from the relation, memoizes the refutation and returns the edges of the
    /// vertices that relied on it.
    pub(super) fn refute(&mut self, id: VertexId) -> Vec<Edge> {
        let dependents = self.graph.dependents(id);
        self.graph.remove(id);
        self.unrelated.insert(self.scope, self.graph.key(id).clone());
        log::debug!(
            "{}: Refuted {}. dependents={}",
            self.depth,
            self.graph.key(id),
            dependents.len()
        );
        dependents
    }

    /// Drains the re-evaluation work list. Each queued parent resumes the search for the
    /// obligation whose answer was invalidated; parents that find no other answer are refuted in
    /// turn and their own dependents are queued.
    pub(super) fn reevaluate(&mut self, mut queue: Vec<Edge>) -> Result<(), Error> {
        let mut next = 0;
        while next < queue.len() {
            let edge = queue[next];
            next += 1;
            self.stats.reevaluations += 1;
            if !self.graph.is_live(edge.parent) {
                continue;
            }
            let obligation = edge.obligation();
            if self.cursors.get(edge.side, &obligation) == edge.position {
                self.cursors.advance_past(edge.side, obligation, edge.position);
            }
            log::trace!(
                "Re-evaluating {} from {}. cursor={}",
                self.graph.key(edge.parent),
                self.cursors.get(edge.side, &obligation),
                edge.position
            );
            if !self.process_derivatives(edge.parent, edge.side, edge.kind, edge.index)?
                && self.graph.is_live(edge.parent)
            {
                let dependents = self.refute(edge.parent);
                queue.extend(dependents);
            }
        }
        Ok(())
    }

    /// Final counters for this session.
    pub fn stats(&self) -> CheckStats {
        CheckStats {
            derived_left: self.derived[Side::Left as usize].len(),
            derived_right: self.derived[Side::Right as usize].len(),
            visited: self.graph.interned_count(),
            vertices: self.graph.vertex_count(),
            edges: self.graph.edge_count(),
            unrelated: self.unrelated.len(),
            cursors: self.cursors.len(),
            ..self.stats.clone()
        }
    }
}
