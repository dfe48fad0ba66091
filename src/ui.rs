//! Terminal output: styled changelog rendering and status messages.
//!
//! Status, warning and error lines go to stderr so that stdout carries only
//! the changelog itself.

use console::{style, Style, Term};

use crate::config::StyleMode;
use crate::warning::ChangelogWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().for_stderr(), message);
}

/// Format and print a warning with a yellow marker.
pub fn display_warning(warning: &ChangelogWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().for_stderr(), warning);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow().for_stderr(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green().for_stderr(), message);
}

/// Decide whether stdout output should carry ANSI styling.
pub fn should_style(mode: StyleMode) -> bool {
    match mode {
        StyleMode::Always => true,
        StyleMode::Never => false,
        StyleMode::Auto => Term::stdout().features().is_attended() && console::colors_enabled(),
    }
}

/// Render changelog markdown for the terminal.
///
/// With `styled` false the text is returned unchanged. Otherwise headings
/// are coloured, bullets get a dimmed glyph and `**bold**` spans lose their
/// asterisks in favour of real bold text.
///
/// # Arguments
/// * `text` - Markdown produced by the changelog assembler
/// * `styled` - Whether to emit ANSI styling
pub fn render_markdown(text: &str, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }

    let title = Style::new().bold().underlined().force_styling(true);
    let release = Style::new().bold().cyan().force_styling(true);
    let group = Style::new().bold().yellow().force_styling(true);
    let bullet = Style::new().dim().force_styling(true);

    text.split_inclusive('\n')
        .map(|raw| {
            let (line, newline) = match raw.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (raw, ""),
            };
            let rendered = if let Some(rest) = line.strip_prefix("### ") {
                group.apply_to(rest).to_string()
            } else if let Some(rest) = line.strip_prefix("## ") {
                release.apply_to(rest).to_string()
            } else if let Some(rest) = line.strip_prefix("# ") {
                title.apply_to(rest).to_string()
            } else if let Some(rest) = line.strip_prefix("- ") {
                format!("{} {}", bullet.apply_to("•"), render_inline(rest))
            } else {
                render_inline(line)
            };
            format!("{}{}", rendered, newline)
        })
        .collect()
}

/// Replace `**x**` spans with bold text; unbalanced markers are left alone.
fn render_inline(line: &str) -> String {
    let parts: Vec<&str> = line.split("**").collect();
    if parts.len() % 2 == 0 {
        return line.to_string();
    }

    let bold = Style::new().bold().force_styling(true);
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                bold.apply_to(part).to_string()
            } else {
                part.to_string()
            }
        })
        .collect()
}
