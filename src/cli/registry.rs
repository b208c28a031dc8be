//! The registry of every parameter cam-mapper understands.

use super::enums::{Culture, TextEncoding};
use super::error::ParseError;
use super::parameter::{value_at, without, Consumed, Parameter, TerminalAction};
use crate::config::{Columns, Config, Credential, DEFAULT_ADDRESS, DEFAULT_LOGIN, DEFAULT_PORT};

pub const HELP: &[&str] = &["--help", "-h", "-?"];
pub const SHOW_ENCODINGS: &[&str] = &["--show-encodings"];
pub const SHOW_CULTURES: &[&str] = &["--show-cultures"];
pub const EXPORT: &[&str] = &["--export"];
pub const VERBOSE: &[&str] = &["--verbose", "-v"];
pub const SERVER: &[&str] = &["--server", "-s"];
pub const PORT: &[&str] = &["--port", "-p"];
pub const SSL: &[&str] = &["--ssl"];
pub const ACTIVE_DIRECTORY: &[&str] = &["--active-directory", "-ad"];
pub const LOGIN: &[&str] = &["--login", "-l"];
pub const PASSWORD: &[&str] = &["--password"];
pub const NAMES: &[&str] = &["--names"];
pub const CHANNEL_ID: &[&str] = &["--channel-id"];
pub const LATITUDE: &[&str] = &["--latitude"];
pub const LONGITUDE: &[&str] = &["--longitude"];
pub const ON_MAP: &[&str] = &["--on-map"];
pub const ENCODING: &[&str] = &["--encoding"];
pub const CULTURE: &[&str] = &["--culture"];
pub const DELIMITER: &[&str] = &["--delimeter"];

// Help and the listings are listed first; they are performed after the
// other switches have been applied.
const PRIORITY_HELP: i32 = 0;
const PRIORITY_LISTING: i32 = 1;
const PRIORITY_VERBOSE: i32 = 10;
// The credential form depends on the account type.
const PRIORITY_ACCOUNT_TYPE: i32 = 21;
const PRIORITY_LOGIN: i32 = 22;
const PRIORITY_PASSWORD: i32 = 23;
const PRIORITY_FILE_FORMAT: i32 = 30;
const PRIORITY_COLUMNS: i32 = 40;
// The delimiter description names the selected culture.
const PRIORITY_DELIMITER: i32 = 41;
// Export reads every connection and file format value.
const PRIORITY_EXPORT: i32 = 90;

/// Fixed, priority-ordered collection of parameters.
#[derive(Debug)]
pub struct Registry {
    parameters: Vec<Parameter>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Build the registry of all cam-mapper parameters.
    pub fn new() -> Self {
        Self::from_parameters(vec![
            Parameter::terminal(HELP, TerminalAction::Help, |_| {
                "Show this message and exit.".to_string()
            })
            .with_priority(PRIORITY_HELP),
            Parameter::terminal(SHOW_ENCODINGS, TerminalAction::ListEncodings, |_| {
                "Show all possible encodings and exit.".to_string()
            })
            .with_priority(PRIORITY_LISTING),
            Parameter::terminal(SHOW_CULTURES, TerminalAction::ListCultures, |_| {
                "Show all possible cultures and exit.".to_string()
            })
            .with_priority(PRIORITY_LISTING),
            Parameter::new(EXPORT, "path", describe_export, |_, tokens, index| {
                let path = value_at(tokens, index)?;
                Ok(Consumed::Terminal {
                    action: TerminalAction::Export(path.into()),
                    remaining: without(tokens, index, 2),
                })
            })
            .with_priority(PRIORITY_EXPORT),
            Parameter::flag(VERBOSE, |c| &mut c.verbose, |_| {
                "Show verbose output.".to_string()
            })
            .with_priority(PRIORITY_VERBOSE),
            Parameter::value(SERVER, "url", |c| &mut c.address, |_| {
                format!("Server address. Default value is {}.", DEFAULT_ADDRESS)
            }),
            Parameter::value(PORT, "number", |c| &mut c.port, |_| {
                format!("Server port. Default value is {}.", DEFAULT_PORT)
            }),
            Parameter::flag(SSL, |c| &mut c.use_ssl, |_| {
                "Connect over HTTPS.".to_string()
            }),
            Parameter::flag(ACTIVE_DIRECTORY, |c| &mut c.active_directory, |_| {
                "The login belongs to an Active Directory user.".to_string()
            })
            .with_priority(PRIORITY_ACCOUNT_TYPE),
            Parameter::value(LOGIN, "string", |c| &mut c.login, describe_login)
                .with_priority(PRIORITY_LOGIN),
            Parameter::new(PASSWORD, "string", describe_password, consume_password)
                .with_priority(PRIORITY_PASSWORD),
            Parameter::value(NAMES, "string", |c| &mut c.columns.name, |_| {
                format!(
                    "Column header contains names of cameras. Default value is \"{}\".",
                    Columns::default().name
                )
            })
            .with_priority(PRIORITY_COLUMNS),
            Parameter::value(CHANNEL_ID, "string", |c| &mut c.columns.channel_id, |_| {
                format!(
                    "Column header contains ids of channels. Default value is \"{}\".",
                    Columns::default().channel_id
                )
            })
            .with_priority(PRIORITY_COLUMNS),
            Parameter::value(LATITUDE, "string", |c| &mut c.columns.latitude, |_| {
                format!(
                    "Column header contains latitude. Default value is \"{}\".",
                    Columns::default().latitude
                )
            })
            .with_priority(PRIORITY_COLUMNS),
            Parameter::value(LONGITUDE, "string", |c| &mut c.columns.longitude, |_| {
                format!(
                    "Column header contains longitude. Default value is \"{}\".",
                    Columns::default().longitude
                )
            })
            .with_priority(PRIORITY_COLUMNS),
            Parameter::value(ON_MAP, "string", |c| &mut c.columns.on_map, describe_on_map)
                .with_priority(PRIORITY_COLUMNS),
            Parameter::value(ENCODING, "string", |c| &mut c.encoding, describe_encoding)
                .with_priority(PRIORITY_FILE_FORMAT),
            Parameter::value(CULTURE, "string", |c| &mut c.culture, describe_culture)
                .with_priority(PRIORITY_FILE_FORMAT),
            Parameter::value(DELIMITER, "string", |c| &mut c.delimiter, describe_delimiter)
                .with_priority(PRIORITY_DELIMITER),
        ])
    }

    /// Build a registry from an explicit list, ordered by priority then declaration.
    pub fn from_parameters(mut parameters: Vec<Parameter>) -> Self {
        // `sort_by_key` is stable, so equal priorities keep declaration order.
        parameters.sort_by_key(Parameter::priority);

        debug_assert!(
            {
                let mut seen = std::collections::HashSet::new();
                parameters
                    .iter()
                    .flat_map(|p| p.prefixes().iter())
                    .all(|prefix| seen.insert(*prefix))
            },
            "parameter prefixes must be unique"
        );

        Self { parameters }
    }

    /// Every parameter, ascending by priority.
    pub fn all(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The parameter owning `token`, if any.
    pub fn find(&self, token: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.matches(token))
    }
}

fn consume_password(
    config: &mut Config,
    tokens: &[String],
    index: usize,
) -> Result<Consumed, ParseError> {
    let password = value_at(tokens, index)?;
    config.password = if config.active_directory {
        Credential::directory(password)
    } else {
        Credential::local(password)
    };
    Ok(Consumed::Remaining(without(tokens, index, 2)))
}

fn describe_export(_: &Config) -> String {
    "Export to file and exit. Overwrite file if it exists.".to_string()
}

fn describe_login(_: &Config) -> String {
    format!(
        "Login. Default value is \"{}\". Must specify {} if using an Active Directory user.",
        DEFAULT_LOGIN,
        ACTIVE_DIRECTORY.join(" or ")
    )
}

fn describe_password(_: &Config) -> String {
    "Password. Default value is empty string.".to_string()
}

fn describe_on_map(_: &Config) -> String {
    format!(
        "Column header sets IsOnMap flag. Default value is \"{}\". \
         Valid values: [true, yes, да]; in any letter case. \
         Any other value or its absence sets IsOnMap flag to false.",
        Columns::default().on_map
    )
}

fn describe_encoding(_: &Config) -> String {
    format!(
        "File encoding. Default value is {}. To see all possible encodings specify {}.",
        TextEncoding::default().name(),
        SHOW_ENCODINGS.join(", ")
    )
}

fn describe_culture(_: &Config) -> String {
    format!(
        "File culture. Default value is InvariantCulture. To see all possible cultures specify {}.",
        SHOW_CULTURES.join(", ")
    )
}

fn describe_delimiter(config: &Config) -> String {
    let culture: &Culture = &config.culture;
    format!(
        "Columns delimeter. Default value is \"{}\". \
         It depends on culture, current selected culture is {}.",
        char::from(culture.list_separator),
        culture.display_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sorted_by_priority() {
        let registry = Registry::new();
        let priorities: Vec<i32> = registry.all().iter().map(Parameter::priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_registry_ties_keep_declaration_order() {
        let registry = Registry::new();
        let columns: Vec<&str> = registry
            .all()
            .iter()
            .filter(|p| p.priority() == PRIORITY_COLUMNS)
            .map(|p| p.prefixes()[0])
            .collect();
        assert_eq!(
            columns,
            vec!["--names", "--channel-id", "--latitude", "--longitude", "--on-map"]
        );
    }

    #[test]
    fn test_help_first_export_last() {
        let registry = Registry::new();
        assert_eq!(registry.all()[0].prefixes(), HELP);
        assert_eq!(registry.all().last().unwrap().prefixes(), EXPORT);
    }

    #[test]
    fn test_dependencies_ordered() {
        let registry = Registry::new();
        let position = |prefix: &str| {
            registry
                .all()
                .iter()
                .position(|p| p.matches(prefix))
                .unwrap()
        };
        assert!(position("--active-directory") < position("--password"));
        assert!(position("--culture") < position("--delimeter"));
    }

    #[test]
    fn test_prefixes_unique() {
        let registry = Registry::new();
        let mut all: Vec<&str> = registry
            .all()
            .iter()
            .flat_map(|p| p.prefixes().iter().copied())
            .collect();
        let count = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), count);
    }

    #[test]
    fn test_find_by_alias() {
        let registry = Registry::new();
        assert_eq!(registry.find("-s").unwrap().prefixes(), SERVER);
        assert_eq!(registry.find("-?").unwrap().prefixes(), HELP);
        assert!(registry.find("--unknown").is_none());
    }

    #[test]
    fn test_delimiter_description_follows_culture() {
        let registry = Registry::new();
        let delimiter = registry.find("--delimeter").unwrap();

        let mut config = Config::default();
        assert!(delimiter.describe(&config).contains("\",\""));
        assert!(delimiter
            .describe(&config)
            .contains("Invariant Language (Invariant Country)"));

        config.culture = Culture::parse("ru-RU").unwrap();
        let text = delimiter.describe(&config);
        assert!(text.contains("\";\""));
        assert!(text.contains("Russian (Russia)"));
    }

    #[test]
    fn test_login_description_names_directory_switches() {
        let registry = Registry::new();
        let text = registry.find("--login").unwrap().describe(&Config::default());
        assert!(text.contains("--active-directory or -ad"));
    }
}
