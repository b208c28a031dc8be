//! Self-describing command-line parameters.
//!
//! Each [`Parameter`] owns its prefixes, its value handling, and its help
//! text. The [`Registry`] orders them by priority; [`parse`] drains them from
//! the argument list and [`help::render`] formats the same metadata as help.

mod commands;
mod enums;
mod error;
pub mod help;
mod parameter;
mod parser;
pub mod registry;

pub use commands::{cultures_line, encodings_line, show_cultures, show_encodings};
pub use enums::{Culture, Delimiter, TextEncoding, CULTURES};
pub use error::ParseError;
pub use help::{print_help, HelpText};
pub use parameter::{
    ArgValue, Consumed, Describe, Field, Parameter, TerminalAction, DEFAULT_PRIORITY,
};
pub use parser::{parse, ParseOutcome};
pub use registry::Registry;
