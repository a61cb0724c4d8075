//! The matching rules. Each move of one side is answered by a transition of the other side's
//! (possibly weakly closed) system, translating register slots through the mover's Rho.

use super::session::Session;
use super::{CursorKey, DerivedKey, Edge, Side, VertexId, VertexKey};
use crate::{Error, Label, LabelKind, Rho, RuleCounts, StateId, SymbolKind, Transition};

/// How a move is answered, decided by its label kinds and by which of its slots Rho already
/// covers. Channel and name values are already translated to the answering side's slots.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Rule {
    Tau,
    /// Input of a name whose slot is already related.
    Inp1 { channel: usize, name: usize },
    /// Input of a known but not yet related name. It can only be answered by a fresh input.
    Inp2 { channel: usize, slot: usize },
    Out { channel: usize, name: usize },
    Finp { channel: usize, slot: usize },
    Fout { channel: usize, slot: usize },
    Unmatched,
}

impl Rule {
    pub fn classify(label: &Label, rho: &Rho) -> Rule {
        if label.is_tau() {
            return Rule::Tau;
        }
        let Some(channel) = rho.get(label.subject.value) else {
            return Rule::Unmatched;
        };
        let slot = label.object.value;
        match (label.subject.kind, label.object.kind) {
            (SymbolKind::Input, SymbolKind::Known) => match rho.get(slot) {
                Some(name) => Rule::Inp1 { channel, name },
                None => Rule::Inp2 { channel, slot },
            },
            (SymbolKind::Output, SymbolKind::Known) => match rho.get(slot) {
                Some(name) => Rule::Out { channel, name },
                None => Rule::Unmatched,
            },
            (SymbolKind::Input, SymbolKind::FreshInput) => Rule::Finp { channel, slot },
            (SymbolKind::Output, SymbolKind::FreshOutput) => Rule::Fout { channel, slot },
            _ => Rule::Unmatched,
        }
    }
}

impl RuleCounts {
    pub(crate) fn record(&mut self, rule: Rule) {
        let count = match rule {
            Rule::Tau => &mut self.tau,
            Rule::Inp1 { .. } => &mut self.inp1,
            Rule::Inp2 { .. } => &mut self.inp2,
            Rule::Out { .. } => &mut self.out,
            Rule::Finp { .. } => &mut self.finp,
            Rule::Fout { .. } => &mut self.fout,
            Rule::Unmatched => &mut self.unmatched,
        };
        *count += 1;
    }
}

enum Binding {
    /// The answer leaves the correspondence unchanged (up to garbage collection).
    Fixed(Rho),
    /// The mover's `slot` is bound to whatever slot the answer allocates.
    Fresh { base: Rho, slot: usize },
}

/// What an acceptable answer looks like.
struct Search {
    kind: LabelKind,
    channel: Option<usize>,
    name: Option<usize>,
    binding: Binding,
}

impl Search {
    fn accepts(&self, label: &Label) -> bool {
        label.kind() == self.kind
            && self.channel.map_or(true, |c| label.subject.value == c)
            && self.name.map_or(true, |n| label.object.value == n)
    }

    fn rho_for(&self, label: &Label) -> Rho {
        match &self.binding {
            Binding::Fixed(rho) => rho.clone(),
            Binding::Fresh { base, slot } => base.extended(*slot, label.object.value),
        }
    }
}

impl<'a, P> Session<'a, P> {
    /// Tries to answer one move of `parent` made by `side`. On success the answering edges are
    /// recorded; the search resumes from the obligation's cursor.
    pub(super) fn process_derivatives(
        &mut self,
        parent: VertexId,
        side: Side,
        kind: LabelKind,
        index: usize,
    ) -> Result<bool, Error> {
        self.stats.match_attempts += 1;
        let key = self.graph.key(parent).clone();
        let mover = key.component(side);
        let other = key.component(side.other());
        let moved = *self
            .systems
            .moves(side)
            .transition(mover.state, kind, index)
            .ok_or(Error::UnknownTransition {
                side,
                state: mover.state,
                index,
            })?;
        let obligation = CursorKey {
            vertex: parent,
            kind,
            index,
            k_prime: None,
        };

        let rule = Rule::classify(&moved.label, &mover.rho);
        self.stats.rules.record(rule);
        log::trace!("Matching {} on the {} side of {}. rule={:?}", moved, side, key, rule);
        let search = match rule {
            Rule::Tau => Search {
                kind: LabelKind::TAU,
                channel: None,
                name: None,
                binding: Binding::Fixed(mover.rho.clone()),
            },
            Rule::Inp1 { channel, name } => Search {
                kind: LabelKind::INPUT,
                channel: Some(channel),
                name: Some(name),
                binding: Binding::Fixed(mover.rho.clone()),
            },
            Rule::Inp2 { channel, slot } => Search {
                kind: LabelKind::FRESH_INPUT,
                channel: Some(channel),
                name: None,
                binding: Binding::Fresh {
                    base: mover.rho.clone(),
                    slot,
                },
            },
            Rule::Out { channel, name } => Search {
                kind: LabelKind::OUTPUT,
                channel: Some(channel),
                name: Some(name),
                binding: Binding::Fixed(mover.rho.clone()),
            },
            Rule::Fout { channel, slot } => Search {
                kind: LabelKind::FRESH_OUTPUT,
                channel: Some(channel),
                name: None,
                binding: Binding::Fresh {
                    base: mover.rho.clone(),
                    slot,
                },
            },
            Rule::Finp { channel, slot } => {
                return self.match_fresh_input(obligation, side, &moved, mover, other, channel, slot);
            }
            Rule::Unmatched => return Ok(false),
        };

        match self.search(obligation, side, &moved, other, search)? {
            Some((child, position)) => {
                self.graph.add_edge(Edge {
                    child,
                    parent,
                    side,
                    kind,
                    index,
                    k_prime: None,
                    position,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// A fresh input must be answered by a fresh input, and additionally by an input of every
    /// name the other side holds that the mover cannot yet relate to anything. All answers are
    /// needed, and they are only recorded once all of them are still assumed related.
    #[allow(clippy::too_many_arguments)]
    fn match_fresh_input(
        &mut self,
        obligation: CursorKey,
        side: Side,
        moved: &Transition,
        mover: &DerivedKey,
        other: &DerivedKey,
        channel: usize,
        slot: usize,
    ) -> Result<bool, Error> {
        let image = mover.rho.image();
        let k_primes: Vec<usize> = self
            .registers(side.other(), other.state)?
            .slots()
            .filter(|k| !image.contains(k))
            .collect();

        loop {
            let fresh = Search {
                kind: LabelKind::FRESH_INPUT,
                channel: Some(channel),
                name: None,
                binding: Binding::Fresh {
                    base: mover.rho.clone(),
                    slot,
                },
            };
            let Some((child, position)) = self.search(obligation, side, moved, other, fresh)? else {
                return Ok(false);
            };
            let mut answers = vec![(obligation, child, position)];

            for &k in &k_primes {
                let branch = CursorKey {
                    k_prime: Some(k),
                    ..obligation
                };
                let known = Search {
                    kind: LabelKind::INPUT,
                    channel: Some(channel),
                    name: Some(k),
                    binding: Binding::Fixed(mover.rho.extended(slot, k)),
                };
                match self.search(branch, side, moved, other, known)? {
                    Some((child, position)) => answers.push((branch, child, position)),
                    None => {
                        log::trace!("No answer for {} with k'={}.", moved, k);
                        return Ok(false);
                    }
                }
            }

            if !self.graph.is_live(obligation.vertex) {
                return Ok(false);
            }
            // An earlier answer may have been refuted while later branches were searched.
            if let Some(&(cursor, _, position)) = answers.iter().find(|(_, child, _)| !self.graph.is_live(*child)) {
                if self.cursors.get(side, &cursor) == position {
                    self.cursors.advance_past(side, cursor, position);
                }
                continue;
            }
            for (cursor, child, position) in answers {
                self.graph.add_edge(Edge {
                    child,
                    parent: cursor.vertex,
                    side,
                    kind: cursor.kind,
                    index: cursor.index,
                    k_prime: cursor.k_prime,
                    position,
                });
            }
            return Ok(true);
        }
    }

    /// Scans the answering side's candidates from the obligation's cursor and returns the first
    /// one whose derivative is related, together with its position. The cursor is left on it.
    fn search(
        &mut self,
        obligation: CursorKey,
        side: Side,
        moved: &Transition,
        other: &DerivedKey,
        search: Search,
    ) -> Result<Option<(VertexId, usize)>, Error> {
        let candidates = self.systems.answers(side.other()).candidates(other.state, search.kind);
        loop {
            if !self.graph.is_live(obligation.vertex) {
                return Ok(None);
            }
            let position = self.cursors.get(side, &obligation);
            let Some(candidate) = candidates.get(position) else {
                return Ok(None);
            };
            if !search.accepts(&candidate.label) {
                self.cursors.advance_past(side, obligation, position);
                continue;
            }
            log::trace!("Trying {} against {}.", candidate, moved);
            let rho = search.rho_for(&candidate.label);
            if let Some(child) = self.derive(side, moved.destination, candidate.destination, rho)? {
                let id = self.enter(child)?;
                if self.preorder(id)? && self.graph.is_live(id) {
                    return Ok(Some((id, position)));
                }
            }
            self.cursors.advance_past(side, obligation, position);
        }
    }

    /// Builds the vertex reached when `side` moves to `mover_to` and the other side answers by
    /// moving to `other_to`. Returns `None` if the correspondence would not be bijective.
    fn derive(&self, side: Side, mover_to: StateId, other_to: StateId, rho: Rho) -> Result<Option<VertexKey>, Error> {
        let rho = if self.garbage_collection {
            rho.collect_garbage(self.registers(side, mover_to)?, self.registers(side.other(), other_to)?)
        } else {
            rho
        };
        let inverse = match rho.inverse() {
            Ok(inverse) => inverse,
            Err(e) => {
                log::trace!("Skipping candidate. {}", e);
                return Ok(None);
            }
        };
        Ok(Some(VertexKey::oriented(
            side,
            DerivedKey::new(mover_to, rho, self.n),
            DerivedKey::new(other_to, inverse, self.n),
        )))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rho(pairs: &[(usize, usize)]) -> Rho {
        pairs.iter().copied().collect()
    }

    #[test]
    fn classifies_by_label_and_rho() {
        let r = rho(&[(1, 2), (2, 3)]);
        assert_eq!(Rule::classify(&Label::tau(), &r), Rule::Tau);
        assert_eq!(Rule::classify(&Label::input(1, 2), &r), Rule::Inp1 { channel: 2, name: 3 });
        assert_eq!(Rule::classify(&Label::input(1, 4), &r), Rule::Inp2 { channel: 2, slot: 4 });
        assert_eq!(Rule::classify(&Label::output(2, 1), &r), Rule::Out { channel: 3, name: 2 });
        assert_eq!(Rule::classify(&Label::output(2, 4), &r), Rule::Unmatched);
        assert_eq!(Rule::classify(&Label::fresh_input(1, 3), &r), Rule::Finp { channel: 2, slot: 3 });
        assert_eq!(Rule::classify(&Label::fresh_output(2, 5), &r), Rule::Fout { channel: 3, slot: 5 });
        // Unrelated channels cannot be answered.
        assert_eq!(Rule::classify(&Label::output(7, 1), &r), Rule::Unmatched);
        // Nor can malformed labels.
        assert_eq!(
            Rule::classify(&Label::of(SymbolKind::Output, 1, SymbolKind::FreshInput, 2), &r),
            Rule::Unmatched
        );
    }

    #[test]
    fn searches_accept_matching_labels_only() {
        let known = Search {
            kind: LabelKind::INPUT,
            channel: Some(1),
            name: Some(2),
            binding: Binding::Fixed(Rho::new()),
        };
        assert!(known.accepts(&Label::input(1, 2)));
        assert!(!known.accepts(&Label::input(1, 3)));
        assert!(!known.accepts(&Label::input(2, 2)));
        assert!(!known.accepts(&Label::output(1, 2)));

        let fresh = Search {
            kind: LabelKind::FRESH_OUTPUT,
            channel: Some(1),
            name: None,
            binding: Binding::Fresh {
                base: rho(&[(1, 1), (2, 4)]),
                slot: 3,
            },
        };
        assert!(fresh.accepts(&Label::fresh_output(1, 4)));
        assert_eq!(fresh.rho_for(&Label::fresh_output(1, 4)), rho(&[(1, 1), (3, 4)]));
    }
}
