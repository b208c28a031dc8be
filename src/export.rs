//! Export the server's channels as a camera sheet.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::server::{Channel, ServerClient, ServerError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fetch every channel and write it to `path`, replacing any existing file.
///
/// The sheet uses the configured headers, delimiter, number format and
/// encoding, so it can be edited and fed back in with the same switches.
/// Returns the number of channels written.
pub async fn export(client: &ServerClient, config: &Config, path: &Path) -> Result<usize, ExportError> {
    let channels = client.get_channels().await?;
    let text = render_channels(&channels, config)?;

    std::fs::write(path, config.encoding.encode(&text)).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Exported {} channels to {}", channels.len(), path.display());
    Ok(channels.len())
}

/// Render channels as sheet text, header row first.
pub fn render_channels(channels: &[Channel], config: &Config) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter().as_byte())
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    let columns = &config.columns;
    writer.write_record([
        &columns.name,
        &columns.channel_id,
        &columns.latitude,
        &columns.longitude,
        &columns.on_map,
    ])?;

    let culture = config.culture;
    for channel in channels {
        let map = &channel.map_settings;
        let latitude = culture.format_number(map.latitude);
        let longitude = culture.format_number(map.longitude);
        writer.write_record([
            channel.name.as_str(),
            channel.id.as_str(),
            latitude.as_str(),
            longitude.as_str(),
            if map.is_on_map { "True" } else { "False" },
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
