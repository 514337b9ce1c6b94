//! Terminal presentation of form outcomes and charts.
//!
//! [`TerminalUi`] applies form [`UiEffect`](crate::forms::UiEffect)s to a
//! terminal: the message box becomes a colored line and navigation prints
//! (and optionally opens) the follow-up page. [`charts::TerminalSurface`]
//! is the matching [`ChartSurface`](crate::charts::ChartSurface).

pub mod charts;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use crate::forms::{Message, Navigation, NavigationMode, UiSink};

pub use charts::TerminalSurface;

/// Parse `#rrggbb` into its channels.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Paint `text` in a hex color, leaving it plain when the color is invalid.
pub fn paint(text: &str, color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Paint `text` with hex foreground and background colors.
pub fn paint_box(text: &str, foreground: &str, background: &str) -> ColoredString {
    let painted = paint(text, foreground);
    match parse_hex(background) {
        Some((r, g, b)) => painted.on_truecolor(r, g, b),
        None => painted,
    }
}

// ---------------------------------------------------------------------------
// Terminal UI sink
// ---------------------------------------------------------------------------

/// [`UiSink`] that writes to a terminal.
pub struct TerminalUi<W: Write> {
    out: W,
    base_url: String,
    open_browser: bool,
}

impl TerminalUi<io::Stdout> {
    pub fn stdout(base_url: &str, open_browser: bool) -> Self {
        Self::new(io::stdout(), base_url, open_browser)
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(out: W, base_url: &str, open_browser: bool) -> Self {
        Self {
            out,
            base_url: base_url.trim_end_matches('/').to_string(),
            open_browser,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Absolute URL of an application page.
    pub fn page_url(&self, target: &str) -> String {
        format!("{}{}", self.base_url, target)
    }
}

impl<W: Write> UiSink for TerminalUi<W> {
    fn show_message(&mut self, message: &Message) {
        let line = format!(" {} ", message.text);
        let painted = paint_box(
            &line,
            message.palette.foreground(),
            message.palette.background(),
        );
        let _ = writeln!(self.out, "{painted}");
    }

    // Field values come from command-line arguments; there is nothing to clear.
    fn reset_form(&mut self) {}

    fn navigate(&mut self, navigation: &Navigation) {
        std::thread::sleep(navigation.delay);

        let url = self.page_url(&navigation.target);
        let verb = match navigation.mode {
            NavigationMode::NewTab => "Next (new tab):",
            NavigationMode::SameTab => "Next:",
        };
        let _ = writeln!(self.out, "  {} {}", verb.bold(), url.as_str().underline());

        if self.open_browser
            && let Err(e) = open_browser(&url)
        {
            eprintln!("{} {e:#}", "warning:".yellow());
        }
    }

    // Terminal output scrolls away on its own.
    fn hide_message_after(&mut self, _after: Duration) {}
}

/// Attempt to open a URL in the system default browser.
pub fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Palette;

    fn output(ui: TerminalUi<Vec<u8>>) -> String {
        String::from_utf8(ui.into_inner()).unwrap()
    }

    #[test]
    fn parse_hex_reads_css_colors() {
        assert_eq!(parse_hex("#7b63b8"), Some((0x7b, 0x63, 0xb8)));
        assert_eq!(parse_hex("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex("7b63b8"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn message_text_is_written() {
        let mut ui = TerminalUi::new(Vec::new(), "http://127.0.0.1:5000", false);
        ui.show_message(&Message {
            text: "Company added successfully!".to_string(),
            palette: Palette::Success,
        });
        assert!(output(ui).contains("Company added successfully!"));
    }

    #[test]
    fn navigate_prints_absolute_url() {
        let mut ui = TerminalUi::new(Vec::new(), "http://127.0.0.1:5000/", false);
        ui.navigate(&Navigation {
            target: "/employee/graph".to_string(),
            delay: Duration::ZERO,
            mode: NavigationMode::SameTab,
        });
        assert!(output(ui).contains("http://127.0.0.1:5000/employee/graph"));
    }
}
