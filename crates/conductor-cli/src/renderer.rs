//! Terminal rendering of the markdown produced by the core display types.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown with termimad, or prints it verbatim when plain output is
/// requested.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Writes `markdown` to stdout.
    ///
    /// Headers keep their leading hashes in rich mode so nesting stays visible
    /// in plan and run listings.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                println!("\x1b[1;34m{line}\x1b[0m");
            } else {
                println!("{}", self.skin.inline(line));
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
