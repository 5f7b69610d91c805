use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DataLoadError;

/// Where the constituency document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Read the whole document. Fetched once; no retry.
    pub fn fetch(&self) -> Result<Vec<u8>, DataLoadError> {
        match self {
            DataSource::Path(path) => std::fs::read(path)
                .map_err(|source| DataLoadError::Io { path: path.display().to_string(), source }),
            DataSource::Url(url) => fetch_url(url),
        }
    }
}

#[cfg(feature = "download")]
fn fetch_url(url: &str) -> Result<Vec<u8>, DataLoadError> {
    use reqwest::{blocking::Client, redirect::Policy};

    let fetch_err = |reason: String| DataLoadError::Fetch { url: url.to_string(), reason };

    let client = Client::builder()
        .user_agent(concat!("kenmap/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(10))
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;

    let resp = client.get(url).send()
        .map_err(|e| fetch_err(format!("GET failed: {e}")))?
        .error_for_status()
        .map_err(|e| fetch_err(format!("GET returned error status: {e}")))?;

    let bytes = resp.bytes().map_err(|e| fetch_err(format!("reading body: {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "download"))]
fn fetch_url(url: &str) -> Result<Vec<u8>, DataLoadError> {
    Err(DataLoadError::Unsupported(format!("cannot fetch {url}: URL sources are disabled")))
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() { return Err("data source must not be empty".into()) }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Url(s.to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(s)))
        }
    }
}

impl TryFrom<String> for DataSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<DataSource> for String {
    fn from(value: DataSource) -> Self { value.to_string() }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_urls_and_paths() {
        assert_eq!(
            "https://example.org/Constituency_with_geometry.geojson".parse::<DataSource>().unwrap(),
            DataSource::Url("https://example.org/Constituency_with_geometry.geojson".into()),
        );
        assert_eq!(
            "HTTP://example.org/a.geojson".parse::<DataSource>().unwrap(),
            DataSource::Url("HTTP://example.org/a.geojson".into()),
        );
        assert_eq!(
            "public/Constituency_with_geometry.geojson".parse::<DataSource>().unwrap(),
            DataSource::Path("public/Constituency_with_geometry.geojson".into()),
        );
        assert!("   ".parse::<DataSource>().is_err());
    }

    #[test]
    fn fetch_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"type":"FeatureCollection","features":[]}"#).unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let bytes = source.fetch().unwrap();
        assert!(bytes.starts_with(b"{\"type\""));
    }

    #[test]
    fn fetch_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(dir.path().join("absent.geojson"));
        assert!(matches!(source.fetch(), Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn serde_uses_plain_string() {
        let source: DataSource = serde_json::from_str("\"data/kenya.geojson\"").unwrap();
        assert_eq!(source, DataSource::Path("data/kenya.geojson".into()));
        assert_eq!(serde_json::to_string(&source).unwrap(), "\"data/kenya.geojson\"");
    }
}
