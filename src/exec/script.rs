// src/exec/script.rs

use std::fmt;

/// A remote stage described as data: a name plus an ordered list of shell
/// command lines.
///
/// Stages build these instead of embedding shell text in the orchestrator;
/// the executor receives the rendered body as one opaque string. The name
/// labels log lines and failure reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteScript {
    name: String,
    lines: Vec<String>,
}

impl RemoteScript {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// Append one command line (builder style).
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Append many command lines at once.
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the full script body.
    ///
    /// `set -eu` makes any failing line abort the script with its exit
    /// status, which is what turns one bad command into a failed stage.
    pub fn render(&self) -> String {
        let mut body = String::from("set -eu\n");
        for line in &self.lines {
            body.push_str(line);
            body.push('\n');
        }
        body
    }
}

impl fmt::Display for RemoteScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
