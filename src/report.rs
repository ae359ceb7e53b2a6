//! Presentation over the map: bucket dumps and the teardown report.

use crate::counters::OpStats;
use core::fmt;

/// Copy of every non-empty bucket, entries in chain order.
///
/// Buckets are copied one at a time, so concurrent mutators may make the
/// dump reflect different instants for different buckets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dump<K, V> {
    buckets: Vec<(usize, Vec<(K, V)>)>,
}

// Written out so an empty dump does not require `K: Default` or `V: Default`.
impl<K, V> Default for Dump<K, V> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<K, V> Dump<K, V> {
    pub(crate) fn push(&mut self, index: usize, entries: Vec<(K, V)>) {
        self.buckets.push((index, entries));
    }

    /// `(bucket index, entries)` pairs in ascending bucket order.
    pub fn buckets(&self) -> &[(usize, Vec<(K, V)>)] {
        &self.buckets
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|(_, e)| e.len()).sum()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Dump<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entries) in &self.buckets {
            write!(f, "[{index}] -> ")?;
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(" -> ")?;
                }
                write!(f, "({k},{v})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Final statistics produced when a map is torn down.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Report {
    pub stats: OpStats,
    /// Live entries at teardown.
    pub size: usize,
}

const RULE: &str = "-----------------------------------------------";

fn outcome_line(f: &mut fmt::Formatter<'_>, s: &OpStats, label: &str, count: u64) -> fmt::Result {
    writeln!(f, "  {label:<9} = {count} ({:.0}%)", s.percent(count))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Profiling Run:")?;
        outcome_line(f, s, "gets", s.gets)?;
        outcome_line(f, s, "put adds", s.put_inserts)?;
        outcome_line(f, s, "put reps", s.put_replaces)?;
        if s.put_failures > 0 {
            outcome_line(f, s, "put fail", s.put_failures)?;
        }
        outcome_line(f, s, "del succ", s.delete_hits)?;
        outcome_line(f, s, "del fail", s.delete_misses)?;
        writeln!(f, "  total ops = {}", s.total)?;
        writeln!(f, "  map size  = {}", self.size)?;
        writeln!(f, "{RULE}")
    }
}
