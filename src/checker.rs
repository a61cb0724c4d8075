//! Private module for selective re-export.

mod cursor;
mod graph;
mod rules;
mod seed;
mod session;
mod unrelated;
mod vertex;

pub(crate) use cursor::*;
pub(crate) use graph::*;
pub(crate) use session::Systems;
pub(crate) use unrelated::Scope;
pub use unrelated::ProvenUnrelated;
pub use vertex::*;

use crate::report::{ReportData, Reporter};
use crate::{weak_transform, CheckStats, ClosureAlgorithm, Error, Lts, Rho, Verdict, Witness};
use session::Session;
use std::borrow::Cow;
use std::fmt::Display;
use std::hash::Hash;
use std::time::Instant;

/// The largest number of derived states tolerated per side unless configured otherwise.
pub const DERIVED_STATE_LIMIT: usize = isize::MAX as usize;

/// A [`BisimBuilder`] configures a bisimulation check between two systems, which is then run
/// with [`BisimBuilder::check`].
///
/// ```
/// use fra_bisim::*;
///
/// let idle = Lts::new(
///     [(0, Configuration::new("0", Registers::new()))],
///     Vec::<Transition>::new(),
/// )
/// .unwrap();
/// let silent = Lts::new(
///     [(0, Configuration::new("τ.0", Registers::new())), (1, Configuration::new("0", Registers::new()))],
///     [Transition::new(0, Label::tau(), 1)],
/// )
/// .unwrap();
///
/// let strong = BisimBuilder::new(&idle, &silent).check().unwrap();
/// assert_eq!(strong.verdict, Verdict::NotRelated);
///
/// let weak = BisimBuilder::new(&idle, &silent).weak(ClosureAlgorithm::DepthFirst).check().unwrap();
/// assert_eq!(weak.verdict, Verdict::Related);
/// ```
pub struct BisimBuilder<'a, P: Clone> {
    left: &'a Lts<P>,
    right: &'a Lts<P>,
    weak_left: Cow<'a, Lts<P>>,
    weak_right: Cow<'a, Lts<P>>,
    register_size: usize,
    garbage_collection: bool,
    max_derived_states: usize,
    unrelated: Option<ProvenUnrelated>,
}

impl<'a, P: Clone> BisimBuilder<'a, P> {
    /// Compares `left` and `right` under strong bisimulation.
    pub fn new(left: &'a Lts<P>, right: &'a Lts<P>) -> Self {
        BisimBuilder {
            left,
            right,
            weak_left: Cow::Borrowed(left),
            weak_right: Cow::Borrowed(right),
            register_size: 0,
            garbage_collection: false,
            max_derived_states: DERIVED_STATE_LIMIT,
            unrelated: None,
        }
    }

    /// Compares under weak bisimulation, closing both systems with the given algorithm.
    pub fn weak(self, algorithm: ClosureAlgorithm) -> Self {
        let weak_left = Cow::Owned(weak_transform(self.left, algorithm));
        let weak_right = Cow::Owned(weak_transform(self.right, algorithm));
        BisimBuilder {
            weak_left,
            weak_right,
            ..self
        }
    }

    /// Compares under weak bisimulation using closures computed elsewhere. They must share
    /// state ids with the original systems.
    pub fn weak_systems(self, weak_left: &'a Lts<P>, weak_right: &'a Lts<P>) -> Self {
        BisimBuilder {
            weak_left: Cow::Borrowed(weak_left),
            weak_right: Cow::Borrowed(weak_right),
            ..self
        }
    }

    /// Fixes the register bound. `0` derives it from the systems.
    pub fn register_size(self, register_size: usize) -> Self {
        BisimBuilder { register_size, ..self }
    }

    /// Drops correspondences between slots that became empty after every matched move.
    pub fn garbage_collection(self, garbage_collection: bool) -> Self {
        BisimBuilder {
            garbage_collection,
            ..self
        }
    }

    /// Sets how many derived states each side may reach before [`Error::StateLimit`] is raised.
    pub fn max_derived_states(self, max_derived_states: usize) -> Self {
        BisimBuilder {
            max_derived_states,
            ..self
        }
    }

    /// Shares a proven-unrelated memo with other checks. Refutations are only reused by checks
    /// that compare the same systems, answer them the same way and agree on garbage collection.
    pub fn unrelated_cache(self, unrelated: ProvenUnrelated) -> Self {
        BisimBuilder {
            unrelated: Some(unrelated),
            ..self
        }
    }

    /// The register bound the check will use.
    pub fn effective_register_size(&self) -> usize {
        seed::register_size(self.left, self.right, self.register_size)
    }

    /// Runs the check. Fails only if an input or a configured bound is violated; a seeding
    /// problem is reported as a [`Verdict::NotRelated`] outcome with its cause attached.
    pub fn check(&self) -> Result<Outcome, Error> {
        let start = Instant::now();
        let n = self.effective_register_size();
        let seeded = seed::initial_rho(self.left, self.right)
            .and_then(|rho| rho.inverse().map(|inverse| (rho, inverse)));
        let (left_rho, right_rho) = match seeded {
            Ok(rhos) => rhos,
            Err(e) => {
                log::info!("Cannot seed the register correspondence. {}", e);
                return Ok(Outcome {
                    verdict: Verdict::NotRelated,
                    register_size: n,
                    initial_rho: Rho::new(),
                    witness: None,
                    stats: CheckStats {
                        duration: start.elapsed(),
                        ..CheckStats::default()
                    },
                    seed_failure: Some(e),
                });
            }
        };
        log::debug!("Seeded. n={}, rho={}", n, left_rho);

        let systems = Systems {
            left: self.left,
            right: self.right,
            weak_left: &self.weak_left,
            weak_right: &self.weak_right,
        };
        let unrelated = self.unrelated.clone().unwrap_or_default();
        let mut session = Session::new(systems, n, self.garbage_collection, self.max_derived_states, unrelated);
        let initial = VertexKey::new(DerivedKey::new(0, left_rho.clone(), n), DerivedKey::new(0, right_rho, n));
        let verdict = if session.run(initial)? {
            Verdict::Related
        } else {
            Verdict::NotRelated
        };
        let witness = match verdict {
            Verdict::Related => Some(Witness::snapshot(&session.graph, systems)),
            Verdict::NotRelated => None,
        };
        let stats = CheckStats {
            duration: start.elapsed(),
            ..session.stats()
        };
        log::info!("Systems are {} for rho={}, n={}.", verdict, left_rho, n);
        Ok(Outcome {
            verdict,
            register_size: n,
            initial_rho: left_rho,
            witness,
            stats,
            seed_failure: None,
        })
    }

    /// Runs the check, emitting progress and, on success, the related configuration pairs.
    pub fn check_and_report(&self, reporter: &mut impl Reporter) -> Result<Outcome, Error>
    where
        P: Display + Eq + Hash,
    {
        let register_size = self.effective_register_size();
        reporter.report_checking(ReportData {
            register_size,
            verdict: None,
            stats: &CheckStats::default(),
            done: false,
        });
        let outcome = self.check()?;
        reporter.report_checking(ReportData {
            register_size: outcome.register_size,
            verdict: Some(outcome.verdict),
            stats: &outcome.stats,
            done: true,
        });
        if let Some(witness) = &outcome.witness {
            let pairs: Vec<String> = witness
                .related_pairs(self.left, self.right)
                .into_iter()
                .map(|(l, r)| format!("{} <---> {}", l, r))
                .collect();
            reporter.report_related_pairs(&pairs);
        }
        Ok(outcome)
    }
}

/// The result of a finished check.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub verdict: Verdict,
    pub register_size: usize,
    /// The left-to-right slot correspondence the search started from.
    pub initial_rho: Rho,
    /// Present exactly when the verdict is [`Verdict::Related`].
    pub witness: Option<Witness>,
    pub stats: CheckStats,
    /// Why the initial correspondence could not be built, if it could not.
    pub seed_failure: Option<Error>,
}
