//! Utilities for tests.

use crate::{Configuration, Label, Lts, StateId, Transition};
use rand::Rng;

/// A configuration of the process named `process` with the given register bank.
pub fn config(process: &str, registers: &[(usize, &str)]) -> Configuration<String> {
    Configuration::new(process.to_string(), registers.iter().copied().collect())
}

/// A system whose state `id` is the process `P{id}` holding the given registers.
pub fn lts(states: &[(StateId, &[(usize, &str)])], transitions: &[(StateId, Label, StateId)]) -> Lts<String> {
    Lts::new(
        states.iter().map(|(id, registers)| (*id, config(&format!("P{}", id), registers))),
        transitions.iter().map(|(source, label, destination)| Transition::new(*source, *label, *destination)),
    )
    .unwrap()
}

/// A system over states `0..states` using slots `1` and `2`, with names `a` and `b` free.
pub fn random_lts(rng: &mut impl Rng, states: usize, transitions: usize) -> Lts<String> {
    const NAMES: [&str; 2] = ["a", "b"];

    let mut configurations = Vec::with_capacity(states);
    for id in 0..states {
        let mut registers: Vec<(usize, &str)> = Vec::new();
        for (slot, name) in (1..).zip(NAMES) {
            if rng.gen_bool(0.5) {
                registers.push((slot, name));
            }
        }
        configurations.push((id, config(&format!("P{}", id), &registers)));
    }

    let mut moves = Vec::with_capacity(transitions);
    for _ in 0..transitions {
        let source = rng.gen_range(0..states);
        let destination = rng.gen_range(0..states);
        let channel = rng.gen_range(1..=2);
        let slot = rng.gen_range(1..=2);
        let label = match rng.gen_range(0..5) {
            0 => Label::tau(),
            1 => Label::input(channel, slot),
            2 => Label::fresh_input(channel, slot),
            3 => Label::output(channel, slot),
            _ => Label::fresh_output(channel, slot),
        };
        moves.push(Transition::new(source, label, destination));
    }

    Lts::new(configurations, moves)
        .unwrap()
        .with_free_names(NAMES.map(|name| (name, name)))
}

/// The right system can output on `a` from its initial state while the left one is stuck.
pub fn extra_output() -> (Lts<String>, Lts<String>) {
    let left = lts(&[(0, &[(1, "a")])], &[]).with_free_names([("a", "a")]);
    let right = lts(
        &[(0, &[(1, "a")]), (1, &[(1, "a")])],
        &[(0, Label::output(1, 1), 1)],
    )
    .with_free_names([("a", "a")]);
    (left, right)
}

/// Both systems receive a fresh name on `a` and send `a` over it, but store the fresh name in
/// different slots.
pub fn renamed_slots() -> (Lts<String>, Lts<String>) {
    let left = lts(
        &[
            (0, &[(1, "a")]),
            (1, &[(1, "a"), (2, "b")]),
            (2, &[(1, "a"), (2, "b")]),
        ],
        &[
            (0, Label::fresh_input(1, 2), 1),
            (1, Label::output(2, 1), 2),
        ],
    )
    .with_free_names([("a", "a")]);
    let right = lts(
        &[
            (0, &[(2, "a")]),
            (1, &[(1, "b"), (2, "a")]),
            (2, &[(1, "b"), (2, "a")]),
        ],
        &[
            (0, Label::fresh_input(2, 1), 1),
            (1, Label::output(1, 2), 2),
        ],
    )
    .with_free_names([("a", "a")]);
    (left, right)
}

/// The left system receives any name on `a`. The right one additionally knows `c`, so a fresh
/// input on the left may also be `c`, which the right answers with a known input only when
/// `answer_known` is set.
pub fn fresh_versus_known(answer_known: bool) -> (Lts<String>, Lts<String>) {
    let left = lts(
        &[
            (0, &[(1, "a")]),
            (1, &[(1, "a"), (2, "b")]),
            (2, &[(1, "a")]),
        ],
        &[
            (0, Label::input(1, 1), 2),
            (0, Label::fresh_input(1, 2), 1),
        ],
    )
    .with_free_names([("a", "a")]);

    let mut moves: Vec<(StateId, Label, StateId)> = vec![(0, Label::input(1, 1), 2)];
    if answer_known {
        moves.push((0, Label::input(1, 2), 3));
    }
    moves.push((0, Label::fresh_input(1, 3), 1));
    let right = lts(
        &[
            (0, &[(1, "a"), (2, "c")]),
            (1, &[(1, "a"), (2, "c"), (3, "d")]),
            (2, &[(1, "a"), (2, "c")]),
            (3, &[(1, "a"), (2, "c")]),
        ],
        &moves,
    )
    .with_free_names([("a", "a"), ("c", "c")]);
    (left, right)
}

/// The left system takes an internal step before the output the right one offers at once.
pub fn delayed_output() -> (Lts<String>, Lts<String>) {
    let left = lts(
        &[(0, &[(1, "a")]), (1, &[(1, "a")]), (2, &[(1, "a")])],
        &[(0, Label::tau(), 1), (1, Label::output(1, 1), 2)],
    )
    .with_free_names([("a", "a")]);
    let right = lts(
        &[(0, &[(1, "a")]), (1, &[(1, "a")])],
        &[(0, Label::output(1, 1), 1)],
    )
    .with_free_names([("a", "a")]);
    (left, right)
}
