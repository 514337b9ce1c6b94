//! Terminal chart surface: horizontal bars and a two-row pie legend.

use std::collections::BTreeSet;
use std::io::{self, Write};

use colored::Colorize;

use super::paint;
use crate::charts::{BarChart, ChartSurface, PieChart};

const BLOCK: &str = "█";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Handle to one drawn chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChartId(u64);

/// Draws charts as text.
///
/// In interactive mode the first draw after a destroy starts from a cleared
/// screen, so a redraw replaces the previous charts instead of scrolling.
pub struct TerminalSurface<W: Write> {
    out: W,
    bar_width: usize,
    interactive: bool,
    next_id: u64,
    live: BTreeSet<ChartId>,
    pending_clear: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(bar_width: usize, interactive: bool) -> Self {
        Self::new(io::stdout(), bar_width, interactive)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, bar_width: usize, interactive: bool) -> Self {
        Self {
            out,
            bar_width: bar_width.max(1),
            interactive,
            next_id: 0,
            live: BTreeSet::new(),
            pending_clear: false,
        }
    }

    /// Number of charts currently on screen.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn begin(&mut self) -> ChartId {
        if self.pending_clear {
            let _ = write!(self.out, "{CLEAR_SCREEN}");
            self.pending_clear = false;
        }
        let id = ChartId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }
}

/// Bar length for `count`, scaled so `max` fills `width`. Non-zero counts
/// always get at least one block.
pub fn scaled_len(count: u64, max: u64, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let len = (count as f64 / max as f64 * width as f64).round() as usize;
    len.clamp(1, width)
}

/// Share of `count` in `total` as a percentage.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

impl<W: Write> ChartSurface for TerminalSurface<W> {
    type Handle = ChartId;

    fn draw_bar(&mut self, chart: &BarChart) -> ChartId {
        let id = self.begin();

        let _ = writeln!(
            self.out,
            "{} by {}",
            chart.y_title.bold(),
            chart.x_title.bold()
        );
        if chart.counts.is_empty() {
            let _ = writeln!(self.out, "  {}", "No data for these filters.".dimmed());
            return id;
        }

        let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let max = chart.counts.iter().copied().max().unwrap_or(0);

        for (i, (label, count)) in chart.labels.iter().zip(&chart.counts).enumerate() {
            let bar = BLOCK.repeat(scaled_len(*count, max, self.bar_width));
            let color = chart.colors.get(i).map(String::as_str).unwrap_or("");
            let marker = if chart.highlight == Some(i) { " ◀" } else { "" };
            let _ = writeln!(
                self.out,
                "  {label:>label_width$} │ {} {count}{marker}",
                paint(&bar, color)
            );
        }
        id
    }

    fn draw_pie(&mut self, chart: &PieChart) -> ChartId {
        let id = self.begin();
        let total = chart.total();
        let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);

        for ((label, count), color) in chart.labels.iter().zip(chart.counts).zip(&chart.colors) {
            let _ = writeln!(
                self.out,
                "  {} {label:<label_width$} {count:>6} ({:.1}%)",
                paint("●", color),
                percent(count, total)
            );
        }
        id
    }

    fn destroy(&mut self, handle: ChartId) {
        if self.live.remove(&handle) && self.interactive {
            self.pending_clear = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartStyle, bar_chart, pie_chart};
    use crate::models::{BarBucket, GraphStats, PieEntry};

    fn stats() -> GraphStats {
        GraphStats {
            bar_graph: vec![
                BarBucket {
                    range_start: 0.0,
                    count: 2,
                },
                BarBucket {
                    range_start: 1000.0,
                    count: 8,
                },
            ],
            current: Some(1200.0),
            pie_graph: vec![PieEntry {
                is_well_compensated: false,
                count: 4,
            }],
        }
    }

    fn text(surface: &TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.output().clone()).unwrap()
    }

    #[test]
    fn scaled_len_keeps_small_counts_visible() {
        assert_eq!(scaled_len(8, 8, 40), 40);
        assert_eq!(scaled_len(1, 1000, 40), 1);
        assert_eq!(scaled_len(0, 8, 40), 0);
        assert_eq!(scaled_len(3, 0, 40), 0);
    }

    #[test]
    fn percent_handles_empty_total() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn bar_chart_marks_highlight() {
        let mut surface = TerminalSurface::new(Vec::new(), 10, false);
        surface.draw_bar(&bar_chart(&stats(), &ChartStyle::default()));
        let out = text(&surface);
        assert!(out.contains("No. of People"));
        assert!(out.contains("1000"));
        assert_eq!(out.matches('◀').count(), 1);
    }

    #[test]
    fn pie_shows_both_slices() {
        let mut surface = TerminalSurface::new(Vec::new(), 10, false);
        surface.draw_pie(&pie_chart(&stats().pie_graph, &ChartStyle::default()));
        let out = text(&surface);
        assert!(out.contains("Well Compensated"));
        assert!(out.contains("Poorly Compensated"));
        assert!(out.contains("(100.0%)"));
    }

    #[test]
    fn interactive_redraw_clears_screen_once() {
        let mut surface = TerminalSurface::new(Vec::new(), 10, true);
        let chart = bar_chart(&stats(), &ChartStyle::default());
        let first = surface.draw_bar(&chart);
        surface.destroy(first);
        surface.draw_bar(&chart);
        assert_eq!(surface.live_count(), 1);
        assert_eq!(text(&surface).matches(CLEAR_SCREEN).count(), 1);
    }
}
