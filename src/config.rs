//! Run configuration for cam-mapper.
//!
//! Every value here is resolved from the command line by the parameter
//! registry. There is no configuration file: `Config::default()` holds the
//! built-in defaults and `cli::parse` overwrites them in place.

use md5::{Digest, Md5};

use crate::cli::{Culture, Delimiter, TextEncoding};

/// Default server address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default login.
pub const DEFAULT_LOGIN: &str = "root";

/// Configuration resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Print modified channels after each upload.
    pub verbose: bool,
    /// Server host name or address, without scheme.
    pub address: String,
    pub port: u16,
    /// Connect over HTTPS instead of HTTP.
    pub use_ssl: bool,
    /// The login belongs to an Active Directory user.
    pub active_directory: bool,
    pub login: String,
    /// Credential sent in the Authorization header.
    ///
    /// See [`Credential`] for how it is derived from the password.
    pub password: Credential,
    pub columns: Columns,
    pub encoding: TextEncoding,
    pub culture: Culture,
    /// Explicit delimiter. `None` falls back to the culture's list separator.
    pub delimiter: Option<Delimiter>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            use_ssl: false,
            active_directory: false,
            login: DEFAULT_LOGIN.to_string(),
            password: Credential::local(""),
            columns: Columns::default(),
            encoding: TextEncoding::default(),
            culture: Culture::default(),
            delimiter: None,
        }
    }
}

impl Config {
    /// The delimiter in effect: the explicit one, else the culture's list separator.
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
            .unwrap_or_else(|| Delimiter::from(self.culture.list_separator))
    }

    /// Base URL of the server, e.g. `https://10.0.0.5:8080`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.address, self.port)
    }
}

/// CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub name: String,
    pub channel_id: String,
    pub latitude: String,
    pub longitude: String,
    pub on_map: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            name: "Имя камеры".to_string(),
            channel_id: "Channel Id".to_string(),
            latitude: "Широта".to_string(),
            longitude: "Долгота".to_string(),
            on_map: "Размещена на карте".to_string(),
        }
    }
}

/// Password in the form the server expects.
///
/// Local users authenticate with the upper-case hex MD5 of their password.
/// Active Directory users send the password as is, since the server has to
/// pass it on to the directory.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Credential for a local server account.
    pub fn local(password: &str) -> Self {
        let digest = Md5::digest(password.as_bytes());
        Self(hex::encode_upper(digest))
    }

    /// Credential for an Active Directory account.
    pub fn directory(password: &str) -> Self {
        Self(password.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the secret.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}
