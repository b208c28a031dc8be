//! Parameter descriptors.
//!
//! A [`Parameter`] describes one switch: the prefixes it answers to, how it
//! consumes tokens, and how it describes itself in the help text. Typed
//! parameters are built with [`Parameter::value`] and bound to a field of
//! [`Config`] through an accessor.

use std::path::PathBuf;

use super::error::ParseError;
use crate::config::Config;

/// Priority given to parameters that do not ask for one.
pub const DEFAULT_PRIORITY: i32 = 20;

/// Accessor for the configuration field a typed parameter writes.
pub type Field<T> = fn(&mut Config) -> &mut T;

/// Builds a parameter's description from the resolved configuration.
pub type Describe = fn(&Config) -> String;

type Consume = Box<dyn Fn(&mut Config, &[String], usize) -> Result<Consumed, ParseError>>;

/// A value that can be read from a single command-line token.
pub trait ArgValue: Sized {
    /// Convert the raw token. The error is a short reason shown to the user.
    fn parse_arg(raw: &str) -> Result<Self, String>;
}

impl ArgValue for String {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl ArgValue for u16 {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

impl<T: ArgValue> ArgValue for Option<T> {
    fn parse_arg(raw: &str) -> Result<Self, String> {
        T::parse_arg(raw).map(Some)
    }
}

/// An action that ends the run instead of returning to normal processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    Help,
    ListEncodings,
    ListCultures,
    /// Write the server's channels to the file and stop.
    Export(PathBuf),
}

impl TerminalAction {
    /// Whether the action wins over anything else on the command line.
    ///
    /// Help and the listings are still performed when other switches are
    /// malformed or unknown. Export needs a valid command line.
    pub fn overrides_errors(&self) -> bool {
        !matches!(self, TerminalAction::Export(_))
    }
}

/// Result of a parameter consuming its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed {
    /// The tokens left after removing the switch and its value.
    Remaining(Vec<String>),
    /// The run ends with `action` once parsing completes.
    Terminal {
        action: TerminalAction,
        remaining: Vec<String>,
    },
}

/// Descriptor of one recognized switch.
pub struct Parameter {
    prefixes: &'static [&'static str],
    format: &'static str,
    is_required: bool,
    priority: i32,
    consume: Consume,
    describe: Describe,
}

impl Parameter {
    /// A parameter with a custom consumption function.
    pub fn new<F>(
        prefixes: &'static [&'static str],
        format: &'static str,
        describe: Describe,
        consume: F,
    ) -> Self
    where
        F: Fn(&mut Config, &[String], usize) -> Result<Consumed, ParseError> + 'static,
    {
        debug_assert!(!prefixes.is_empty(), "a parameter needs a prefix");
        Self {
            prefixes,
            format,
            is_required: false,
            priority: DEFAULT_PRIORITY,
            consume: Box::new(consume),
            describe,
        }
    }

    /// A boolean switch that sets its field to `true`.
    pub fn flag(prefixes: &'static [&'static str], field: Field<bool>, describe: Describe) -> Self {
        Self::new(prefixes, "", describe, move |config, tokens, index| {
            *field(config) = true;
            Ok(Consumed::Remaining(without(tokens, index, 1)))
        })
    }

    /// A switch followed by one value token, parsed into `T`.
    pub fn value<T>(
        prefixes: &'static [&'static str],
        format: &'static str,
        field: Field<T>,
        describe: Describe,
    ) -> Self
    where
        T: ArgValue + 'static,
    {
        Self::new(prefixes, format, describe, move |config, tokens, index| {
            *field(config) = parse_value(tokens, index)?;
            Ok(Consumed::Remaining(without(tokens, index, 2)))
        })
    }

    /// A switch without a value that ends the run with `action`.
    pub fn terminal(
        prefixes: &'static [&'static str],
        action: TerminalAction,
        describe: Describe,
    ) -> Self {
        Self::new(prefixes, "", describe, move |_, tokens, index| {
            Ok(Consumed::Terminal {
                action: action.clone(),
                remaining: without(tokens, index, 1),
            })
        })
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn prefixes(&self) -> &'static [&'static str] {
        self.prefixes
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Lower runs first during parsing and is listed first in the help text.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the token is exactly one of this parameter's prefixes.
    pub fn matches(&self, token: &str) -> bool {
        self.prefixes.iter().any(|p| *p == token)
    }

    /// Consume the switch found at `index`.
    pub fn consume(
        &self,
        config: &mut Config,
        tokens: &[String],
        index: usize,
    ) -> Result<Consumed, ParseError> {
        (self.consume)(config, tokens, index)
    }

    pub fn describe(&self, config: &Config) -> String {
        (self.describe)(config)
    }

    /// Prefixes and value format, e.g. `--server, -s <url>`.
    pub fn synopsis(&self) -> String {
        let prefixes = self.prefixes.join(", ");
        if self.format.is_empty() {
            prefixes
        } else {
            format!("{} <{}>", prefixes, self.format)
        }
    }

    /// Synopsis as it appears on the usage line; optional parameters are bracketed.
    pub fn usage_token(&self) -> String {
        if self.is_required {
            self.synopsis()
        } else {
            format!("[{}]", self.synopsis())
        }
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("prefixes", &self.prefixes)
            .field("format", &self.format)
            .field("is_required", &self.is_required)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// The token following the switch at `index`.
pub fn value_at(tokens: &[String], index: usize) -> Result<&str, ParseError> {
    match tokens.get(index + 1) {
        Some(value) => Ok(value),
        None => Err(ParseError::MissingValue(
            tokens.get(index).cloned().unwrap_or_default(),
        )),
    }
}

/// The token following the switch at `index`, converted to `T`.
pub fn parse_value<T: ArgValue>(tokens: &[String], index: usize) -> Result<T, ParseError> {
    let raw = value_at(tokens, index)?;
    T::parse_arg(raw).map_err(|reason| ParseError::InvalidValue {
        switch: tokens[index].clone(),
        raw: raw.to_string(),
        reason,
    })
}

/// Copy of `tokens` with `count` tokens removed starting at `index`.
pub fn without(tokens: &[String], index: usize, count: usize) -> Vec<String> {
    let end = (index + count).min(tokens.len());
    let mut rest = Vec::with_capacity(tokens.len() - (end - index));
    rest.extend_from_slice(&tokens[..index]);
    rest.extend_from_slice(&tokens[end..]);
    rest
}
