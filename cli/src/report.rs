//! Plain-text pull listing for `--list`
use pullgraph_core::{ChartConfig, PullRecord, PullSummary};

/// One row per pull: ordinal, duration, phase reached and source file
pub fn pull_table(pulls: &[PullRecord], chart: &ChartConfig) -> String {
    if pulls.is_empty() {
        return "No pulls recorded\n".to_string();
    }

    let mut out = format!(
        "{:>5}  {:>8}  {:<22} {:>4}  File\n",
        "Pull", "Duration", "Phase", "Log"
    );
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for pull in pulls {
        out.push_str(&format!(
            "{:>5}  {:>8}  {:<22} {:>4}  {}\n",
            pull.ordinal,
            pull.formatted_duration(),
            phase_label(chart, pull.final_phase),
            pull.file_index,
            pull.source_file
        ));
    }

    out
}

/// Per-phase counts and run totals
pub fn summary(summary: &PullSummary, chart: &ChartConfig) -> String {
    let mut out = format!("\nTotal: {} pulls\n", summary.total_pulls);
    if summary.total_pulls == 0 {
        return out;
    }

    for (phase, count) in summary.reached_phases() {
        out.push_str(&format!("  {:<22} {count}\n", phase_label(chart, phase)));
    }

    if let Some(longest) = summary.longest_pull {
        out.push_str(&format!("Longest pull: {}\n", clock(longest.num_seconds())));
    }
    out.push_str(&format!(
        "Time in combat: {}\n",
        clock(summary.total_time.num_seconds())
    ));
    out
}

fn phase_label(chart: &ChartConfig, phase: u8) -> String {
    match chart.phase(phase) {
        Some(style) => format!("{phase} {}", style.name),
        None => phase.to_string(),
    }
}

/// `h:mm:ss` past an hour, `m:ss` below
fn clock(secs: i64) -> String {
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::sync::Arc;

    fn pull(ordinal: u32, secs: i64, final_phase: u8) -> PullRecord {
        PullRecord {
            ordinal,
            duration: TimeDelta::seconds(secs),
            final_phase,
            file_index: 2,
            source_file: Arc::from("Network_26707_20220513.log"),
        }
    }

    #[test]
    fn table_lists_every_pull() {
        let table = pull_table(&[pull(1, 95, 1), pull(2, 312, 2)], &ChartConfig::default());
        let rows: Vec<_> = table.lines().skip(2).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("1:35"));
        assert!(rows[0].contains("1 King Thordan"));
        assert!(rows[1].contains("5:12"));
        assert!(rows[1].contains("2 Nidhogg"));
        assert!(rows[1].ends_with("Network_26707_20220513.log"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(pull_table(&[], &ChartConfig::default()), "No pulls recorded\n");
    }

    #[test]
    fn summary_counts_phases() {
        let pulls = [pull(1, 95, 1), pull(2, 312, 2), pull(3, 3700, 2)];
        let text = summary(&PullSummary::from_pulls(&pulls), &ChartConfig::default());

        assert!(text.contains("Total: 3 pulls"));
        assert!(text.contains("1 King Thordan"));
        assert!(text.lines().any(|l| l.contains("2 Nidhogg") && l.ends_with('2')));
        assert!(text.contains("Longest pull: 1:01:40"));
    }

    #[test]
    fn clock_formats() {
        assert_eq!(clock(0), "0:00");
        assert_eq!(clock(95), "1:35");
        assert_eq!(clock(3725), "1:02:05");
    }
}
