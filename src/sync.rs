//! Apply camera sheets to the server's channels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::server::{Channel, ServerClient, ServerError};
use crate::sheet::{read_cameras, Camera, SheetError};

/// Why a camera row was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IgnoreReason {
    #[serde(rename = "Not found")]
    NotFound,
    Duplicate,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::NotFound => f.write_str("Not found"),
            IgnoreReason::Duplicate => f.write_str("Duplicate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IgnoredCamera {
    pub camera: Camera,
    pub reason: IgnoreReason,
}

/// Channel updates computed from one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Updated channels, in the order their first row appeared.
    pub modified: Vec<Channel>,
    pub ignored: Vec<IgnoredCamera>,
}

/// What happened to the upload of a plan.
#[derive(Debug)]
pub enum Upload {
    /// Nothing to change, no request sent.
    Skipped,
    Applied,
    Failed(ServerError),
}

#[derive(Debug)]
pub struct SyncReport {
    pub path: PathBuf,
    pub modified: Vec<Channel>,
    pub ignored: Vec<IgnoredCamera>,
    pub upload: Upload,
}

impl SyncReport {
    pub fn applied(&self) -> bool {
        matches!(self.upload, Upload::Applied)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Find the channel a camera row refers to.
///
/// The channel id decides when it matches anything; otherwise the camera
/// name must match exactly one channel name.
pub fn find_channel(channels: &[Channel], camera: &Camera) -> Result<usize, IgnoreReason> {
    let mut hits = matching(channels, &camera.channel_id, |c| c.id.as_str());
    if hits.is_empty() {
        hits = matching(channels, &camera.name, |c| c.name.as_str());
    }

    match hits.as_slice() {
        [] => Err(IgnoreReason::NotFound),
        [index] => Ok(*index),
        _ => Err(IgnoreReason::Duplicate),
    }
}

fn matching(channels: &[Channel], wanted: &str, key: fn(&Channel) -> &str) -> Vec<usize> {
    if wanted.is_empty() {
        return Vec::new();
    }
    channels
        .iter()
        .enumerate()
        .filter(|(_, c)| key(c) == wanted)
        .map(|(i, _)| i)
        .collect()
}

/// Match every camera against the channel list.
///
/// When several rows land on the same channel the last one wins.
pub fn plan(channels: &[Channel], cameras: &[Camera]) -> SyncPlan {
    let mut result = SyncPlan::default();
    let mut slots: HashMap<usize, usize> = HashMap::new();

    for camera in cameras {
        let index = match find_channel(channels, camera) {
            Ok(index) => index,
            Err(reason) => {
                log::debug!("Ignoring '{}' on line {}: {}", camera.name, camera.line, reason);
                result.ignored.push(IgnoredCamera {
                    camera: camera.clone(),
                    reason,
                });
                continue;
            }
        };

        let slot = *slots.entry(index).or_insert_with(|| {
            result.modified.push(channels[index].clone());
            result.modified.len() - 1
        });

        let map = &mut result.modified[slot].map_settings;
        map.latitude = camera.latitude;
        map.longitude = camera.longitude;
        map.is_on_map = camera.on_map_flag();
    }

    result
}

/// Read one sheet, match it against the server and upload the changes.
///
/// # Errors
///
/// Returns `SyncError::Sheet` if the sheet cannot be read or validated and
/// `SyncError::Server` if the channel list cannot be fetched. A failed
/// upload is reported in the returned `SyncReport`.
pub async fn sync_file(
    client: &ServerClient,
    config: &Config,
    path: &Path,
) -> Result<SyncReport, SyncError> {
    let cameras = read_cameras(path, config)?;
    let channels = client.get_channels().await?;
    let SyncPlan {
        mut modified,
        ignored,
    } = plan(&channels, &cameras);

    for channel in &mut modified {
        if let Err(e) = client.ensure_model_id(channel).await {
            log::warn!("Could not fetch model id for channel {}: {}", channel.id, e);
        }
    }

    let upload = if modified.is_empty() {
        log::info!("No channels to change for {}", path.display());
        Upload::Skipped
    } else {
        match client.put_channels(&modified).await {
            Ok(()) => Upload::Applied,
            Err(e) => Upload::Failed(e),
        }
    };

    Ok(SyncReport {
        path: path.to_path_buf(),
        modified,
        ignored,
        upload,
    })
}

/// Sync every file in turn, printing results as it goes.
///
/// A file that fails is reported and skipped. Returns how many files failed.
pub async fn run(client: &ServerClient, config: &Config, files: &[PathBuf]) -> usize {
    let mut failed = 0;

    for path in files {
        match sync_file(client, config, path).await {
            Ok(report) => {
                print!("{}", render_report(&report, config.verbose));
                if matches!(report.upload, Upload::Failed(_)) {
                    failed += 1;
                }
            }
            Err(e) => {
                println!("{}", render_error(&e, path));
                failed += 1;
            }
        }
    }

    failed
}

/// Text printed after a file has been processed.
pub fn render_report(report: &SyncReport, verbose: bool) -> String {
    let mut out = String::new();

    match &report.upload {
        Upload::Applied if verbose => {
            out.push_str(&listing(
                "These channels have been changed",
                &report.modified,
            ));
        }
        Upload::Skipped if verbose => {
            out.push_str(&format!(
                "No channels to change in {}.\n",
                report.path.display()
            ));
        }
        Upload::Failed(e) => {
            out.push_str(&format!("{}\n", e));
            if verbose {
                out.push_str(&listing(
                    "These channels have not been changed",
                    &report.modified,
                ));
            }
        }
        _ => {}
    }

    if !report.ignored.is_empty() {
        out.push_str(&listing("These cameras have been ignored", &report.ignored));
    }

    out
}

/// Text printed when a file could not be processed.
pub fn render_error(error: &SyncError, path: &Path) -> String {
    match error {
        SyncError::Sheet(e) => match e {
            SheetError::InvalidField { record, line, .. } => format!(
                "Error on parse file. {}\n  at \"{}\"\n  at {}:line {}",
                e,
                record,
                path.display(),
                line
            ),
            _ => format!("Error on parse file. {}\n  at {}", e, path.display()),
        },
        SyncError::Server(e) => e.to_string(),
    }
}

fn listing<T: Serialize>(title: &str, items: &[T]) -> String {
    let json = serde_json::to_string_pretty(items).unwrap_or_default();
    format!("{} ({}):\n{}\n", title, items.len(), json)
}
