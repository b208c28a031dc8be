//! Channel configuration as exchanged with the server.

use serde::{Deserialize, Deserializer, Serialize};

/// One channel from `configure/channels`.
///
/// Only the fields cam-mapper reads or writes are modelled; a PUT carries
/// exactly these, and the server leaves everything else untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Channel {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub connection_settings: ConnectionSettings,
    #[serde(default)]
    pub map_settings: MapSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionSettings {
    /// Required by the server on update. Missing from some list responses.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapSettings {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: f64,
    #[serde(default)]
    pub is_on_map: bool,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connection_settings: ConnectionSettings::default(),
            map_settings: MapSettings::default(),
        }
    }

    pub fn model_id(&self) -> Option<&str> {
        self.connection_settings.model_id.as_deref()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// Coordinates come back as numbers, numeric strings, or null; anything
/// unreadable counts as zero.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
