//! SVG bar chart of total latency deltas
//!
//! One horizontal bar per ranked pair, drawn from a centre zero axis: right and
//! red for regressions, left and green for improvements.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use delta_engine::ComparisonResult;

use super::Sink;

const WIDTH: f64 = 960.0;
const LABEL_WIDTH: f64 = 380.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 8.0;
const TOP: f64 = 48.0;
const MAX_LABEL_CHARS: usize = 56;

const REGRESSION: &str = "#d62728";
const IMPROVEMENT: &str = "#2ca02c";

#[derive(Debug)]
pub struct ChartSink {
    path: PathBuf,
}

impl ChartSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Escape XML special characters for text nodes and attributes
    fn escape_xml(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Keep the tail of long URLs; the path end is the distinguishing part.
    fn truncate_label(label: &str) -> String {
        let count = label.chars().count();
        if count <= MAX_LABEL_CHARS {
            return label.to_string();
        }
        let tail: String = label.chars().skip(count - (MAX_LABEL_CHARS - 1)).collect();
        format!("…{}", tail)
    }

    /// Render the ranked pairs as a standalone SVG document
    pub fn render(result: &ComparisonResult) -> Result<String, fmt::Error> {
        let bars: Vec<(String, f64)> = result
            .ranked
            .iter()
            .filter_map(|p| p.total_delta.map(|d| (p.identity.clone(), d)))
            .collect();

        let height = TOP + bars.len() as f64 * (BAR_HEIGHT + BAR_GAP) + 24.0;
        let plot_width = WIDTH - LABEL_WIDTH - 24.0;
        let axis_x = LABEL_WIDTH + plot_width / 2.0;
        let max = bars.iter().map(|(_, d)| d.abs()).fold(0.0_f64, f64::max);
        let scale = if max > 0.0 { (plot_width / 2.0 - 60.0) / max } else { 0.0 };

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = WIDTH,
            h = height
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{}" y="24" font-size="16" text-anchor="middle">Total latency delta (ms), candidate vs baseline</text>"#,
            WIDTH / 2.0
        )?;
        writeln!(
            svg,
            r##"<line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="#333"/>"##,
            x = axis_x,
            y1 = TOP - 8.0,
            y2 = height - 16.0
        )?;

        for (i, (identity, delta)) in bars.iter().enumerate() {
            let y = TOP + i as f64 * (BAR_HEIGHT + BAR_GAP);
            let len = delta.abs() * scale;
            let (x, color, value_x, anchor) = if *delta >= 0.0 {
                (axis_x, REGRESSION, axis_x + len + 4.0, "start")
            } else {
                (axis_x - len, IMPROVEMENT, axis_x - len - 4.0, "end")
            };
            let label = Self::escape_xml(&Self::truncate_label(identity));
            let text_y = y + BAR_HEIGHT / 2.0 + 4.0;

            writeln!(
                svg,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                LABEL_WIDTH - 8.0,
                text_y,
                label
            )?;
            writeln!(
                svg,
                r#"<rect x="{:.1}" y="{}" width="{:.1}" height="{}" fill="{}"><title>{}</title></rect>"#,
                x,
                y,
                len,
                BAR_HEIGHT,
                color,
                Self::escape_xml(identity)
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{}" text-anchor="{}">{:+.1}</text>"#,
                value_x, text_y, anchor, delta
            )?;
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl Sink for ChartSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, result: &ComparisonResult) -> Result<()> {
        let svg = Self::render(result).context("rendering chart")?;
        fs::write(&self.path, svg).with_context(|| format!("writing {}", self.path.display()))
    }
}
