//! Human-readable console report

use std::io::{self, Write};

use delta_engine::{ComparisonResult, MatchedPair, Phase};

/// Format a phase or total delta; `None` is an incomparable phase.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{:+.2} ms", d),
        None => "n/a".to_string(),
    }
}

/// "200", "200→404", or "-" for a missing status
pub fn status_label(pair: &MatchedPair) -> String {
    let show = |s: Option<u16>| s.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
    match (pair.status_changed(), pair.baseline(), pair.candidate()) {
        (true, Some(baseline), Some(candidate)) => {
            format!("{}→{}", show(baseline.status()), show(candidate.status()))
        }
        _ => show(pair.sides.present().status()),
    }
}

/// Write the report for `result`. `issues` is the loader's degraded-field count.
pub fn print<W: Write>(out: &mut W, result: &ComparisonResult, issues: usize) -> io::Result<()> {
    if !result.has_ranked() {
        writeln!(out, "No common URLs found between the two captures.")?;
    } else {
        writeln!(
            out,
            "Top {} of {} matched requests by |Δ total| (baseline → candidate)",
            result.ranked.len(),
            result.summary.eligible
        )?;
        writeln!(out)?;

        for (i, pair) in result.ranked.iter().enumerate() {
            writeln!(out, "{:>3}. {}  [{}]", i + 1, pair.identity, status_label(pair))?;
            for phase in Phase::ALL {
                writeln!(out, "       Δ {:<8} {:>14}", phase, format_delta(pair.deltas[phase]))?;
            }
            writeln!(out, "       Δ {:<8} {:>14}", "total", format_delta(pair.total_delta))?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "Net Δ total over {} matched requests: {}",
            result.summary.eligible,
            format_delta(Some(result.summary.net_total_delta))
        )?;
    }

    let s = &result.summary;
    if s.baseline_only > 0 || s.candidate_only > 0 {
        writeln!(
            out,
            "Unmatched: {} baseline-only, {} candidate-only",
            s.baseline_only, s.candidate_only
        )?;
    }
    if issues > 0 {
        writeln!(out, "Loader: {} missing fields degraded to sentinel", issues)?;
    }
    Ok(())
}
