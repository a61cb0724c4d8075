use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The kind of a [`Symbol`]. Subjects are [`Tau`], [`Input`] or [`Output`]; objects are
/// [`Tau`], [`Known`], [`FreshInput`] or [`FreshOutput`].
///
/// [`Tau`]: SymbolKind::Tau
/// [`Input`]: SymbolKind::Input
/// [`Output`]: SymbolKind::Output
/// [`Known`]: SymbolKind::Known
/// [`FreshInput`]: SymbolKind::FreshInput
/// [`FreshOutput`]: SymbolKind::FreshOutput
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum SymbolKind {
    Tau,
    Input,
    Output,
    Known,
    FreshInput,
    FreshOutput,
}

/// One half of a [`Label`]: a kind and the register slot it refers to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub value: usize,
}

impl Symbol {
    pub fn new(kind: SymbolKind, value: usize) -> Self {
        Symbol { kind, value }
    }
}

/// A move of a fresh-register automaton. The `subject` is the channel (or [`SymbolKind::Tau`])
/// and the `object` is the name being communicated.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Label {
    pub subject: Symbol,
    pub object: Symbol,
}

impl Label {
    /// An internal move.
    pub fn tau() -> Self {
        Label {
            subject: Symbol::new(SymbolKind::Tau, 0),
            object: Symbol::new(SymbolKind::Tau, 0),
        }
    }

    /// Input on the channel in slot `channel` of a name already held in slot `slot`.
    pub fn input(channel: usize, slot: usize) -> Self {
        Self::of(SymbolKind::Input, channel, SymbolKind::Known, slot)
    }

    /// Input on the channel in slot `channel` of a fresh name stored into slot `slot`.
    pub fn fresh_input(channel: usize, slot: usize) -> Self {
        Self::of(SymbolKind::Input, channel, SymbolKind::FreshInput, slot)
    }

    /// Output on the channel in slot `channel` of the name held in slot `slot`.
    pub fn output(channel: usize, slot: usize) -> Self {
        Self::of(SymbolKind::Output, channel, SymbolKind::Known, slot)
    }

    /// Output on the channel in slot `channel` of a private name extruded into slot `slot`.
    pub fn fresh_output(channel: usize, slot: usize) -> Self {
        Self::of(SymbolKind::Output, channel, SymbolKind::FreshOutput, slot)
    }

    pub fn of(subject: SymbolKind, channel: usize, object: SymbolKind, slot: usize) -> Self {
        Label {
            subject: Symbol::new(subject, channel),
            object: Symbol::new(object, slot),
        }
    }

    pub fn kind(&self) -> LabelKind {
        LabelKind {
            subject: self.subject.kind,
            object: self.object.kind,
        }
    }

    pub fn is_tau(&self) -> bool {
        self.subject.kind == SymbolKind::Tau
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (i, j) = (self.subject.value, self.object.value);
        match (self.subject.kind, self.object.kind) {
            (SymbolKind::Tau, _) => write!(f, "τ"),
            (SymbolKind::Input, SymbolKind::FreshInput) => write!(f, "{} {}●", i, j),
            (SymbolKind::Input, _) => write!(f, "{} {}", i, j),
            (SymbolKind::Output, SymbolKind::FreshOutput) => write!(f, "{}' {}⊛", i, j),
            (SymbolKind::Output, _) => write!(f, "{}' {}", i, j),
            (subject, object) => write!(f, "{:?}{} {:?}{}", subject, i, object, j),
        }
    }
}

/// The `(subject kind, object kind)` pair of a [`Label`]. Matching rules dispatch on it and
/// adjacency lists are grouped by it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct LabelKind {
    pub subject: SymbolKind,
    pub object: SymbolKind,
}

impl LabelKind {
    pub const TAU: LabelKind = LabelKind::new(SymbolKind::Tau, SymbolKind::Tau);
    pub const INPUT: LabelKind = LabelKind::new(SymbolKind::Input, SymbolKind::Known);
    pub const FRESH_INPUT: LabelKind = LabelKind::new(SymbolKind::Input, SymbolKind::FreshInput);
    pub const OUTPUT: LabelKind = LabelKind::new(SymbolKind::Output, SymbolKind::Known);
    pub const FRESH_OUTPUT: LabelKind = LabelKind::new(SymbolKind::Output, SymbolKind::FreshOutput);

    pub const fn new(subject: SymbolKind, object: SymbolKind) -> Self {
        LabelKind { subject, object }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_like_the_front_end() {
        assert_eq!(Label::tau().to_string(), "τ");
        assert_eq!(Label::input(1, 2).to_string(), "1 2");
        assert_eq!(Label::fresh_input(1, 3).to_string(), "1 3●");
        assert_eq!(Label::output(2, 1).to_string(), "2' 1");
        assert_eq!(Label::fresh_output(1, 4).to_string(), "1' 4⊛");
    }

    #[test]
    fn kinds_group_labels() {
        assert_eq!(Label::tau().kind(), LabelKind::TAU);
        assert_eq!(Label::input(1, 2).kind(), LabelKind::INPUT);
        assert_eq!(Label::fresh_input(1, 2).kind(), LabelKind::FRESH_INPUT);
        assert_eq!(Label::output(1, 2).kind(), LabelKind::OUTPUT);
        assert_eq!(Label::fresh_output(1, 2).kind(), LabelKind::FRESH_OUTPUT);
        assert!(Label::tau().is_tau());
        assert!(!Label::output(1, 1).is_tau());
        // Inputs of known names sort before fresh inputs, which keeps adjacency order stable.
        assert!(LabelKind::INPUT < LabelKind::FRESH_INPUT);
    }
}
