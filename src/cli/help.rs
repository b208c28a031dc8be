//! Help text rendering.
//!
//! The usage synopsis and the description table are both generated from the
//! registry, so the help can never list a switch the parser does not know.

use super::registry::Registry;
use crate::config::Config;

/// Characters a usage line may grow past the preamble before wrapping.
pub const USAGE_WRAP: usize = 55;

/// Spaces between the switch column and the description column.
const COLUMN_MARGIN: usize = 3;

/// Fixed text around the generated help.
#[derive(Debug, Clone, Default)]
pub struct HelpText {
    /// Preamble of the usage line, e.g. `Usage: cam-mapper <files>`.
    pub usage: String,
    /// Printed last, after a blank line.
    pub footer: Option<String>,
}

impl HelpText {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            footer: None,
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Render the complete help text.
///
/// Descriptions are produced from `config`, so they show values resolved by
/// earlier parameters.
pub fn render(registry: &Registry, config: &Config, text: &HelpText) -> String {
    let mut out = String::new();

    for line in usage_lines(registry, &text.usage) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    let width = registry
        .all()
        .iter()
        .map(|p| p.synopsis().chars().count())
        .max()
        .unwrap_or(0)
        + COLUMN_MARGIN;

    for parameter in registry.all() {
        let line = format!(
            " {:<width$}{}",
            parameter.synopsis(),
            parameter.describe(config),
            width = width
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if let Some(footer) = &text.footer {
        out.push('\n');
        out.push_str(footer);
        out.push('\n');
    }

    out
}

/// Print the help text to standard output.
pub fn print_help(registry: &Registry, config: &Config, text: &HelpText) {
    print!("{}", render(registry, config, text));
}

/// Greedy word wrap of the usage synopsis.
///
/// Continuation lines are indented to the preamble's width. A token is never
/// split; a single token wider than the limit gets a line of its own.
fn usage_lines(registry: &Registry, preamble: &str) -> Vec<String> {
    let indent = preamble.chars().count();
    let limit = indent + USAGE_WRAP;

    let mut lines = Vec::new();
    let mut line = preamble.to_string();
    let mut line_len = indent;
    let mut has_tokens = false;

    for parameter in registry.all() {
        let token = parameter.usage_token();
        let token_len = token.chars().count();

        if has_tokens && line_len + 1 + token_len > limit {
            lines.push(std::mem::replace(&mut line, " ".repeat(indent)));
            line_len = indent;
        }

        line.push(' ');
        line.push_str(&token);
        line_len += 1 + token_len;
        has_tokens = true;
    }

    lines.push(line);
    lines
}
