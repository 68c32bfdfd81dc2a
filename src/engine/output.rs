use std::io::{self, Write};

/// Text produced by one command. Blank lines are dropped on the way in.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Output {
    lines: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds text, one entry per non-blank line.
    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        for line in s.lines().filter(|l| !l.trim().is_empty()) {
            self.lines.push(line.to_string());
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// All lines joined with newlines, without a trailing newline.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(w, "{line}")?;
        }
        Ok(())
    }
}
