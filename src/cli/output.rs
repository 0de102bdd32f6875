//! Handles all user-facing output for the CLI.
//!
//! Values go to stdout, failures to stderr. Colour is applied only when the stream is a terminal
//! (`ColorChoice::Auto`), so piped output stays plain.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints the value of a successful parse.
pub fn print_value(value: f64) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "{value}");
    let _ = stdout.reset();
}

/// Reports that the input did not match the grammar.
pub fn print_no_parse(input: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "no parse");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": '{input}' is not a complete expression");
}

/// Prints grammar rules as `name := body`, one per line.
pub fn print_rules(rules: &[(String, String)]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let width = rules.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, body) in rules {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(stdout, "{name:<width$}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, " := {body}");
    }
}
