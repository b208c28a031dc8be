//! The argument consumption engine.

use super::error::ParseError;
use super::parameter::{without, Consumed, TerminalAction};
use super::registry::Registry;
use crate::config::Config;

/// What the caller should do after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Continue with the positional arguments left over.
    Continue(Vec<String>),
    /// Perform the action and exit successfully.
    Terminate(TerminalAction),
}

/// Drain every recognized switch from `args` into `config`.
///
/// Parameters are visited in registry order. Each one consumes every
/// occurrence of its prefixes, so a value given twice keeps the last one.
/// Whatever is left is returned as positional arguments, unless it looks
/// like a switch nobody recognized. An empty command line asks for help.
///
/// Help and the listings are reported after every other switch has been
/// applied, so the help text shows the resolved values. Once one of them is
/// seen, malformed values and unknown switches are skipped instead of
/// failing the parse.
pub fn parse(
    registry: &Registry,
    config: &mut Config,
    args: &[String],
) -> Result<ParseOutcome, ParseError> {
    if args.is_empty() {
        return Ok(ParseOutcome::Terminate(TerminalAction::Help));
    }

    let mut tokens = args.to_vec();
    let mut overriding: Option<TerminalAction> = None;
    let mut export = None;

    for parameter in registry.all() {
        while let Some(index) = tokens.iter().position(|t| parameter.matches(t)) {
            log::debug!("Consuming {} at position {}", tokens[index], index);

            let consumed = match parameter.consume(config, &tokens, index) {
                Ok(consumed) => consumed,
                Err(e) if overriding.is_some() => {
                    log::debug!("Skipping {}: {}", tokens[index], e);
                    let width = if parameter.format().is_empty() { 1 } else { 2 };
                    tokens = without(&tokens, index, width);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match consumed {
                Consumed::Remaining(rest) => {
                    debug_assert!(rest.len() < tokens.len(), "consumption must remove tokens");
                    tokens = rest;
                }
                Consumed::Terminal { action, remaining } => {
                    tokens = remaining;
                    if action.overrides_errors() {
                        // The first by priority wins.
                        overriding.get_or_insert(action);
                    } else {
                        export = Some(action);
                    }
                }
            }
        }
    }

    if let Some(action) = overriding {
        return Ok(ParseOutcome::Terminate(action));
    }

    // Every registered switch has been drained by now.
    if let Some(unknown) = tokens.iter().find(|t| looks_like_switch(t)) {
        return Err(ParseError::UnknownSwitch(unknown.clone()));
    }

    Ok(match export {
        Some(action) => ParseOutcome::Terminate(action),
        None => ParseOutcome::Continue(tokens),
    })
}

/// `--name`, or a single dash followed by a letter or `?`.
///
/// A lone `-` and negative numbers are left to the positional arguments.
fn looks_like_switch(token: &str) -> bool {
    if let Some(rest) = token.strip_prefix("--") {
        return !rest.is_empty();
    }
    match token.strip_prefix('-').and_then(|rest| rest.chars().next()) {
        Some(first) => first.is_alphabetic() || first == '?',
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Culture, Delimiter};
    use std::path::PathBuf;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn run(raw: &[&str]) -> (Result<ParseOutcome, ParseError>, Config) {
        let registry = Registry::new();
        let mut config = Config::default();
        let outcome = parse(&registry, &mut config, &args(raw));
        (outcome, config)
    }

    #[test]
    fn test_empty_args_show_help() {
        let (outcome, _) = run(&[]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));
    }

    #[test]
    fn test_port_and_residue() {
        let (outcome, config) = run(&["--port", "9090", "file.csv"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Continue(args(&["file.csv"])));
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_port_without_value() {
        let (outcome, _) = run(&["--port"]);
        assert_eq!(
            outcome.unwrap_err(),
            ParseError::MissingValue("--port".to_string())
        );
    }

    #[test]
    fn test_unknown_switch() {
        let (outcome, _) = run(&["--unknown", "file.csv"]);
        assert_eq!(
            outcome.unwrap_err(),
            ParseError::UnknownSwitch("--unknown".to_string())
        );
    }

    #[test]
    fn test_connection_flags_mixed_with_paths() {
        let (outcome, config) = run(&["--ssl", "--server", "10.0.0.5", "-v", "cams.csv"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Continue(args(&["cams.csv"])));
        assert!(config.use_ssl);
        assert_eq!(config.address, "10.0.0.5");
        assert!(config.verbose);
    }

    #[test]
    fn test_help_wins_regardless_of_position() {
        let (outcome, _) = run(&["--port", "not-a-number", "a.csv", "-h"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));

        let (outcome, _) = run(&["--bogus", "-?"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));
    }

    #[test]
    fn test_help_sees_values_given_before_it() {
        let (outcome, config) = run(&["--culture", "ru-RU", "--help"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));
        assert_eq!(config.culture, Culture::parse("ru-RU").unwrap());
    }

    #[test]
    fn test_help_skips_malformed_values() {
        let (outcome, config) = run(&["--port", "http", "--culture", "de-DE", "-h", "--login"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));
        assert_eq!(config.port, 8080);
        assert_eq!(config.culture, Culture::parse("de-DE").unwrap());
    }

    #[test]
    fn test_help_wins_over_export_and_listings() {
        let (outcome, _) = run(&["--export", "out.csv", "--help"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));

        let (outcome, _) = run(&["--show-cultures", "-?"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Terminate(TerminalAction::Help));
    }

    #[test]
    fn test_listings_terminate() {
        let (outcome, _) = run(&["--show-cultures", "x.csv"]);
        assert_eq!(
            outcome.unwrap(),
            ParseOutcome::Terminate(TerminalAction::ListCultures)
        );
        let (outcome, _) = run(&["--show-encodings"]);
        assert_eq!(
            outcome.unwrap(),
            ParseOutcome::Terminate(TerminalAction::ListEncodings)
        );
    }

    #[test]
    fn test_export_resolves_other_parameters_first() {
        let (outcome, config) = run(&["--export", "out.csv", "--server", "cams.local", "-p", "80"]);
        assert_eq!(
            outcome.unwrap(),
            ParseOutcome::Terminate(TerminalAction::Export(PathBuf::from("out.csv")))
        );
        assert_eq!(config.address, "cams.local");
        assert_eq!(config.port, 80);
    }

    #[test]
    fn test_export_still_rejects_unknown_switch() {
        let (outcome, _) = run(&["--export", "out.csv", "--bogus"]);
        assert_eq!(
            outcome.unwrap_err(),
            ParseError::UnknownSwitch("--bogus".to_string())
        );
    }

    #[test]
    fn test_export_path_may_look_like_switch() {
        let (outcome, _) = run(&["--export", "-cams.csv"]);
        assert_eq!(
            outcome.unwrap(),
            ParseOutcome::Terminate(TerminalAction::Export(PathBuf::from("-cams.csv")))
        );
    }

    #[test]
    fn test_export_without_path() {
        let (outcome, _) = run(&["--export"]);
        assert_eq!(
            outcome.unwrap_err(),
            ParseError::MissingValue("--export".to_string())
        );
    }

    #[test]
    fn test_last_value_wins() {
        let (outcome, config) = run(&["-s", "first", "a.csv", "--server", "second"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Continue(args(&["a.csv"])));
        assert_eq!(config.address, "second");
    }

    #[test]
    fn test_repeated_flag_is_idempotent() {
        let (outcome, config) = run(&["--ssl", "a.csv", "--ssl"]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Continue(args(&["a.csv"])));
        assert!(config.use_ssl);
    }

    #[test]
    fn test_invalid_port_is_typed_error() {
        let (outcome, _) = run(&["--port", "http"]);
        match outcome.unwrap_err() {
            ParseError::InvalidValue { switch, raw, .. } => {
                assert_eq!(switch, "--port");
                assert_eq!(raw, "http");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_culture_is_typed_error() {
        let (outcome, _) = run(&["--culture", "xx-YY", "a.csv"]);
        assert!(matches!(
            outcome.unwrap_err(),
            ParseError::InvalidValue { ref switch, .. } if switch == "--culture"
        ));
    }

    #[test]
    fn test_password_hashed_unless_active_directory() {
        let (_, local) = run(&["--password", "password", "a.csv"]);
        assert_eq!(local.password.as_str(), "5F4DCC3B5AA765D61D8327DEB882CF99");

        // The flag comes after the password on the command line but is resolved first.
        let (_, directory) = run(&["--password", "password", "-ad", "a.csv"]);
        assert!(directory.active_directory);
        assert_eq!(directory.password.as_str(), "password");
    }

    #[test]
    fn test_file_format_parameters() {
        let (outcome, config) = run(&[
            "--encoding",
            "windows-1251",
            "--culture",
            "ru-RU",
            "--delimeter",
            "\\t",
            "--names",
            "Camera",
            "dir",
        ]);
        assert_eq!(outcome.unwrap(), ParseOutcome::Continue(args(&["dir"])));
        assert_eq!(config.encoding.name(), "windows-1251");
        assert_eq!(config.culture, Culture::parse("ru-RU").unwrap());
        assert_eq!(config.delimiter, Some(Delimiter::from(b'\t')));
        assert_eq!(config.columns.name, "Camera");
    }

    #[test]
    fn test_residue_keeps_order() {
        let (outcome, _) = run(&["c.csv", "--ssl", "a.csv", "-", "-12", "b.csv"]);
        assert_eq!(
            outcome.unwrap(),
            ParseOutcome::Continue(args(&["c.csv", "a.csv", "-", "-12", "b.csv"]))
        );
    }

    #[test]
    fn test_prefixes_are_case_sensitive() {
        let (outcome, _) = run(&["--SSL"]);
        assert_eq!(
            outcome.unwrap_err(),
            ParseError::UnknownSwitch("--SSL".to_string())
        );
    }

    #[test]
    fn test_looks_like_switch() {
        assert!(looks_like_switch("--x"));
        assert!(looks_like_switch("-x"));
        assert!(looks_like_switch("-?"));
        assert!(!looks_like_switch("--"));
        assert!(!looks_like_switch("-"));
        assert!(!looks_like_switch("-5"));
        assert!(!looks_like_switch("file.csv"));
    }
}
