//! Handlers for the listing switches.

use super::enums::{Culture, TextEncoding};

/// Comma-separated names of the encodings `--encoding` accepts.
pub fn encodings_line() -> String {
    TextEncoding::names().collect::<Vec<_>>().join(", ")
}

/// Comma-separated names of the cultures `--culture` accepts.
pub fn cultures_line() -> String {
    Culture::names().collect::<Vec<_>>().join(", ")
}

/// Print the available encodings to stdout.
pub fn show_encodings() {
    println!("{}", encodings_line());
}

/// Print the available cultures to stdout.
pub fn show_cultures() {
    println!("{}", cultures_line());
}
