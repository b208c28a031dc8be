//! Camera sheets: CSV files mapping cameras to coordinates.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Columns, Config};

/// Values of the on-map column that put a camera on the map.
const ON_MAP_TRUE: &[&str] = &["true", "yes", "да"];

/// One row of a camera sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Camera {
    pub name: String,
    pub channel_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Raw on-map cell; `None` when the column is absent.
    pub is_on_map: Option<String>,
    /// 1-based line of the row in the file.
    #[serde(skip)]
    pub line: u64,
}

impl Camera {
    /// Whether the camera should be shown on the map.
    pub fn on_map_flag(&self) -> bool {
        self.is_on_map
            .as_deref()
            .map(|v| v.trim().to_lowercase())
            .is_some_and(|v| ON_MAP_TRUE.contains(&v.as_str()))
    }
}

/// Errors reading a camera sheet.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Header with name '{0}' was not found.")]
    MissingHeader(String),

    #[error("Field '{value}' in column '{column}' is not valid.")]
    InvalidField {
        column: String,
        value: String,
        /// The row as it appears in the file, delimiter-joined.
        record: String,
        line: u64,
    },
}

/// Column positions resolved from the header row.
struct HeaderIndex {
    name: usize,
    channel_id: usize,
    latitude: usize,
    longitude: usize,
    on_map: Option<usize>,
}

impl HeaderIndex {
    fn locate(headers: &csv::StringRecord, columns: &Columns) -> Result<Self, SheetError> {
        let position = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);
        let required = |wanted: &str| {
            position(wanted).ok_or_else(|| SheetError::MissingHeader(wanted.to_string()))
        };

        Ok(Self {
            name: required(&columns.name)?,
            channel_id: required(&columns.channel_id)?,
            latitude: required(&columns.latitude)?,
            longitude: required(&columns.longitude)?,
            on_map: position(&columns.on_map),
        })
    }
}

/// Read and validate every camera in a sheet file.
pub fn read_cameras(path: &Path, config: &Config) -> Result<Vec<Camera>, SheetError> {
    let bytes = std::fs::read(path).map_err(|source| SheetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = config.encoding.decode(&bytes);
    let cameras = parse_cameras(&text, config)?;
    log::info!("Read {} cameras from {}", cameras.len(), path.display());
    Ok(cameras)
}

/// Parse cameras from already-decoded sheet text.
pub fn parse_cameras(text: &str, config: &Config) -> Result<Vec<Camera>, SheetError> {
    let delimiter = config.delimiter();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index = HeaderIndex::locate(&headers, &config.columns)?;

    let mut cameras = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let coordinate = |column: &str, i: usize, range: f64| {
            let raw = field(i);
            config
                .culture
                .parse_number(raw)
                .filter(|v| (-range..=range).contains(v))
                .ok_or_else(|| invalid_field(column, raw, &record, delimiter.as_char(), line))
        };

        let latitude = coordinate(&config.columns.latitude, index.latitude, 90.0)?;
        let longitude = coordinate(&config.columns.longitude, index.longitude, 180.0)?;

        cameras.push(Camera {
            name: field(index.name).to_string(),
            channel_id: field(index.channel_id).to_string(),
            latitude,
            longitude,
            is_on_map: index.on_map.map(|i| field(i).to_string()),
            line,
        });
    }

    Ok(cameras)
}

fn invalid_field(
    column: &str,
    value: &str,
    record: &csv::StringRecord,
    delimiter: char,
    line: u64,
) -> SheetError {
    SheetError::InvalidField {
        column: column.to_string(),
        value: value.to_string(),
        record: record.iter().collect::<Vec<_>>().join(&delimiter.to_string()),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Culture, Delimiter};

    fn english_headers() -> Config {
        let mut config = Config::default();
        config.columns = Columns {
            name: "Name".to_string(),
            channel_id: "Id".to_string(),
            latitude: "Lat".to_string(),
            longitude: "Lon".to_string(),
            on_map: "OnMap".to_string(),
        };
        config
    }

    #[test]
    fn test_parse_default_headers() {
        let text = "Имя камеры,Channel Id,Широта,Долгота,Размещена на карте\n\
                    Gate,1a2b,55.75,37.61,Да\n";
        let cameras = parse_cameras(text, &Config::default()).unwrap();

        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].name, "Gate");
        assert_eq!(cameras[0].channel_id, "1a2b");
        assert_eq!(cameras[0].latitude, 55.75);
        assert_eq!(cameras[0].longitude, 37.61);
        assert!(cameras[0].on_map_flag());
        assert_eq!(cameras[0].line, 2);
    }

    #[test]
    fn test_parse_with_culture_and_delimiter() {
        let mut config = english_headers();
        config.culture = Culture::parse("ru-RU").unwrap();
        let text = "Name;Id;Lat;Lon;OnMap\nYard;;59,93;30,31;no\n";

        let cameras = parse_cameras(text, &config).unwrap();

        assert_eq!(cameras[0].latitude, 59.93);
        assert_eq!(cameras[0].longitude, 30.31);
        assert_eq!(cameras[0].channel_id, "");
        assert!(!cameras[0].on_map_flag());
    }

    #[test]
    fn test_explicit_delimiter_overrides_culture() {
        let mut config = english_headers();
        config.culture = Culture::parse("ru-RU").unwrap();
        config.delimiter = Some(Delimiter::from(b'\t'));
        let text = "Name\tId\tLat\tLon\nA\t1\t1,5\t2,5\n";

        let cameras = parse_cameras(text, &config).unwrap();
        assert_eq!(cameras[0].latitude, 1.5);
    }

    #[test]
    fn test_on_map_column_optional() {
        let text = "Name,Id,Lat,Lon\nA,1,10,20\n";
        let cameras = parse_cameras(text, &english_headers()).unwrap();
        assert_eq!(cameras[0].is_on_map, None);
        assert!(!cameras[0].on_map_flag());
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let text = "Name,Id,Lat,Lon,OnMap\nA,1,10,20\n";
        let cameras = parse_cameras(text, &english_headers()).unwrap();
        assert_eq!(cameras[0].is_on_map.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_header() {
        let text = "Name,Lat,Lon\nA,10,20\n";
        let err = parse_cameras(text, &english_headers()).unwrap_err();
        assert!(matches!(err, SheetError::MissingHeader(ref h) if h == "Id"));
    }

    #[test]
    fn test_latitude_out_of_range() {
        let text = "Name,Id,Lat,Lon\nA,1,10,20\nB,2,91,20\n";
        let err = parse_cameras(text, &english_headers()).unwrap_err();
        match err {
            SheetError::InvalidField {
                column,
                value,
                record,
                line,
            } => {
                assert_eq!(column, "Lat");
                assert_eq!(value, "91");
                assert_eq!(record, "B,2,91,20");
                assert_eq!(line, 3);
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_longitude_not_a_number() {
        let text = "Name,Id,Lat,Lon\nA,1,10,east\n";
        let err = parse_cameras(text, &english_headers()).unwrap_err();
        assert!(matches!(err, SheetError::InvalidField { ref column, .. } if column == "Lon"));
    }

    #[test]
    fn test_on_map_values() {
        let camera = |value: &str| Camera {
            name: String::new(),
            channel_id: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            is_on_map: Some(value.to_string()),
            line: 0,
        };
        assert!(camera("TRUE").on_map_flag());
        assert!(camera("Yes").on_map_flag());
        assert!(camera("ДА").on_map_flag());
        assert!(!camera("1").on_map_flag());
        assert!(!camera("").on_map_flag());
    }

    #[test]
    fn test_read_cameras_missing_file() {
        let err = read_cameras(Path::new("/nonexistent/cams.csv"), &Config::default()).unwrap_err();
        assert!(matches!(err, SheetError::Io { .. }));
    }
}
