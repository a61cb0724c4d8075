use std::io::Write;
use std::time::Duration;

use serde::Serialize;

use crate::Verdict;

/// How often each matching rule was applied.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RuleCounts {
    pub tau: usize,
    pub inp1: usize,
    pub inp2: usize,
    pub out: usize,
    pub finp: usize,
    pub fout: usize,
    /// Moves that no rule can answer.
    pub unmatched: usize,
}

/// Diagnostic counters of a finished check. None of them influence the verdict.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CheckStats {
    /// Number of times a vertex was looked up or explored.
    pub preorder_calls: usize,
    /// Number of attempts to answer a single move.
    pub match_attempts: usize,
    /// Number of work-list entries drained after refutations.
    pub reevaluations: usize,
    /// Maximum nesting of vertices being explored.
    pub max_depth: usize,
    /// Distinct derived states of the left system.
    pub derived_left: usize,
    /// Distinct derived states of the right system.
    pub derived_right: usize,
    /// Distinct vertices visited, related or not.
    pub visited: usize,
    /// Vertices assumed related when the check finished.
    pub vertices: usize,
    /// Edges among those vertices.
    pub edges: usize,
    /// Size of the proven-unrelated memo.
    pub unrelated: usize,
    /// Obligations whose candidate scan was resumed or stepped at least once.
    pub cursors: usize,
    pub rules: RuleCounts,
    pub duration: Duration,
}

/// The data sent during a report event.
pub struct ReportData<'a> {
    /// The register bound used for both sides.
    pub register_size: usize,
    /// The verdict, once known.
    pub verdict: Option<Verdict>,
    pub stats: &'a CheckStats,
    /// Whether checking is done.
    pub done: bool,
}

/// A reporter for progress during a bisimulation check.
pub trait Reporter {
    /// Report a progress event.
    fn report_checking(&mut self, data: ReportData);

    /// Report the distinct configuration pairs found related, already rendered.
    fn report_related_pairs(&mut self, pairs: &[String]);
}

pub struct WriteReporter<'a, W> {
    writer: &'a mut W,
}

impl<'a, W> WriteReporter<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W> Reporter for WriteReporter<'a, W>
where
    W: Write,
{
    fn report_checking(&mut self, data: ReportData) {
        match (data.done, data.verdict) {
            (true, Some(verdict)) => {
                let _ = writeln!(
                    self.writer,
                    "Done. verdict={}, n={}, vertices={}, edges={}, unrelated={}, depth={}, sec={}",
                    verdict,
                    data.register_size,
                    data.stats.vertices,
                    data.stats.edges,
                    data.stats.unrelated,
                    data.stats.max_depth,
                    data.stats.duration.as_secs(),
                );
            }
            _ => {
                let _ = writeln!(self.writer, "Checking. n={}", data.register_size);
            }
        }
    }

    fn report_related_pairs(&mut self, pairs: &[String]) {
        for pair in pairs {
            let _ = writeln!(self.writer, "{}", pair);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_write_reports() {
        let mut written: Vec<u8> = Vec::new();
        let stats = CheckStats {
            vertices: 3,
            edges: 2,
            max_depth: 2,
            ..CheckStats::default()
        };
        {
            let mut reporter = WriteReporter::new(&mut written);
            reporter.report_checking(ReportData {
                register_size: 2,
                verdict: None,
                stats: &stats,
                done: false,
            });
            reporter.report_checking(ReportData {
                register_size: 2,
                verdict: Some(Verdict::Related),
                stats: &stats,
                done: true,
            });
            reporter.report_related_pairs(&["{(1,a)} ⊢ P <---> {(1,a)} ⊢ Q".to_string()]);
        }
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "Checking. n=2\n\
             Done. verdict=related, n=2, vertices=3, edges=2, unrelated=0, depth=2, sec=0\n\
             {(1,a)} ⊢ P <---> {(1,a)} ⊢ Q\n"
        );
    }
}
