//! Run-level aggregation of recorded pulls

use chrono::TimeDelta;

use super::{MAX_PHASE, PullRecord};

/// Totals for one run, used for the console report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub total_pulls: u32,
    /// `phase_counts[p - 1]` is the number of pulls that ended in phase `p`
    pub phase_counts: [u32; MAX_PHASE as usize],
    pub furthest_phase: Option<u8>,
    pub longest_pull: Option<TimeDelta>,
    pub total_time: TimeDelta,
}

impl PullSummary {
    pub fn from_pulls(pulls: &[PullRecord]) -> Self {
        let mut phase_counts = [0u32; MAX_PHASE as usize];
        let mut total_time = TimeDelta::zero();

        for pull in pulls {
            if let Some(count) = usize::from(pull.final_phase)
                .checked_sub(1)
                .and_then(|idx| phase_counts.get_mut(idx))
            {
                *count += 1;
            }
            total_time += pull.duration;
        }

        Self {
            total_pulls: pulls.len() as u32,
            phase_counts,
            furthest_phase: pulls.iter().map(|p| p.final_phase).max(),
            longest_pull: pulls.iter().map(|p| p.duration).max(),
            total_time,
        }
    }

    /// `(phase, count)` for every phase reached at least once
    pub fn reached_phases(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.phase_counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(idx, count)| (idx as u8 + 1, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pull(ordinal: u32, secs: i64, final_phase: u8) -> PullRecord {
        PullRecord {
            ordinal,
            duration: TimeDelta::seconds(secs),
            final_phase,
            file_index: 1,
            source_file: Arc::from("Network_26707_20220512.log"),
        }
    }

    #[test]
    fn empty_run() {
        let summary = PullSummary::from_pulls(&[]);
        assert_eq!(summary.total_pulls, 0);
        assert_eq!(summary.furthest_phase, None);
        assert_eq!(summary.longest_pull, None);
        assert_eq!(summary.total_time, TimeDelta::zero());
        assert_eq!(summary.reached_phases().count(), 0);
    }

    #[test]
    fn counts_by_final_phase() {
        let pulls = [pull(1, 95, 1), pull(2, 310, 2), pull(3, 120, 1), pull(4, 700, 5)];
        let summary = PullSummary::from_pulls(&pulls);

        assert_eq!(summary.total_pulls, 4);
        assert_eq!(summary.furthest_phase, Some(5));
        assert_eq!(summary.longest_pull, Some(TimeDelta::seconds(700)));
        assert_eq!(summary.total_time, TimeDelta::seconds(1225));
        assert_eq!(
            summary.reached_phases().collect::<Vec<_>>(),
            vec![(1, 2), (2, 1), (5, 1)]
        );
    }
}
