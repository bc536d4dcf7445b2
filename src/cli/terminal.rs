//! Styling of tracker output for the terminal it is printed to.

use owo_colors::OwoColorize;
use plates::Status;
use supports_color::Stream;

/// What a piece of output reports, which decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A change was saved.
    Success,
    /// An action was refused.
    Warning,
    /// A menu or table title.
    Heading,
    /// Filler such as prompts and empty-list notices.
    Muted,
}

/// Styles text for standard output.
///
/// The text is returned unchanged when standard output does not support
/// colour (a pipe, a file, or `NO_COLOR`).
pub fn paint(text: &str, tone: Tone) -> String {
    paint_for(Stream::Stdout, text, tone)
}

/// Styles text for standard error.
pub fn paint_err(text: &str, tone: Tone) -> String {
    paint_for(Stream::Stderr, text, tone)
}

/// A plate's status code, green when the plate can be bought.
pub fn status(status: Status) -> String {
    let tone = if status.is_available() {
        Tone::Success
    } else {
        Tone::Muted
    };
    paint(&status.to_string(), tone)
}

/// Whether the terminal is known to be narrower than `columns`.
///
/// Output that is not going to a terminal is never narrow.
pub fn narrower_than(columns: usize) -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| usize::from(width.0) < columns)
}

fn paint_for(stream: Stream, text: &str, tone: Tone) -> String {
    if supports_color::on(stream).is_some() {
        styled(text, tone)
    } else {
        text.to_string()
    }
}

fn styled(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Success => text.green().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Heading => text.bright_blue().bold().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}
