//! Configuration and data directory management.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET: &str = "ejs-cool-bucket";
pub const DEFAULT_OBJECT_KEY: &str = "books.csv";
pub const DEFAULT_TYPE_PREFIX: &str = "Example";
pub const DEFAULT_HOST_API_URL: &str = "https://api.netlify.com";

/// Paths to shelfsync data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Created nodes (`data/nodes.json`).
    pub nodes_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            nodes_file: root.join("nodes.json"),
            root,
        })
    }
}

/// The three credential options the host collects for this connector.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorOptions {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

impl fmt::Debug for ConnectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorOptions")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

/// Top-level shelfsync configuration, built once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfsyncConfig {
    /// HTTP server port.
    pub port: u16,
    /// AWS region for the S3 client.
    pub region: String,
    /// Bucket the CSV is fetched from.
    pub bucket: String,
    /// Object key of the CSV.
    pub object_key: String,
    /// Override for S3-compatible endpoints (local development).
    pub endpoint_url: Option<String>,
    /// Prefix the host puts in front of every model name.
    pub type_prefix: String,
    /// Base URL of the host platform API.
    pub host_api_url: String,
    pub host_token: Option<String>,
    /// Options used when the host sends none with an event.
    pub local_dev_options: ConnectorOptions,
    pub data_paths: DataPaths,
}

impl ShelfsyncConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// A `PORT` that is set but not a valid port number is an error.
    pub fn from_lookup(
        data_dir: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {:?}", p)))?,
            None => DEFAULT_PORT,
        };

        let local_dev_options = ConnectorOptions {
            access_key_id: lookup("DEMO_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: lookup("DEMO_SECRET_ACCESS_KEY").unwrap_or_default(),
            bucket_name: lookup("DEMO_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET.into()),
        };

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            region: lookup("SHELFSYNC_REGION").unwrap_or_else(|| DEFAULT_REGION.into()),
            bucket: lookup("SHELFSYNC_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into()),
            object_key: lookup("SHELFSYNC_OBJECT_KEY")
                .unwrap_or_else(|| DEFAULT_OBJECT_KEY.into()),
            endpoint_url: lookup("SHELFSYNC_S3_ENDPOINT").filter(|s| !s.is_empty()),
            type_prefix: lookup("SHELFSYNC_TYPE_PREFIX")
                .unwrap_or_else(|| DEFAULT_TYPE_PREFIX.into()),
            host_api_url: lookup("SHELFSYNC_HOST_API_URL")
                .unwrap_or_else(|| DEFAULT_HOST_API_URL.into()),
            host_token: lookup("SHELFSYNC_HOST_TOKEN").filter(|s| !s.is_empty()),
            local_dev_options,
            data_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShelfsyncConfig::from_lookup(dir.path(), |_| None).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bucket, "ejs-cool-bucket");
        assert_eq!(config.object_key, "books.csv");
        assert_eq!(config.type_prefix, "Example");
        assert!(config.endpoint_url.is_none());
        assert_eq!(config.local_dev_options.access_key_id, "");
        assert_eq!(config.local_dev_options.bucket_name, "ejs-cool-bucket");
        assert_eq!(config.data_paths.nodes_file, dir.path().join("nodes.json"));
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("SHELFSYNC_REGION", "eu-west-1"),
            ("SHELFSYNC_OBJECT_KEY", "catalog.csv"),
            ("SHELFSYNC_S3_ENDPOINT", "http://localhost:9000"),
            ("DEMO_ACCESS_KEY_ID", "AKIA123"),
        ]
        .into_iter()
        .collect();

        let config = ShelfsyncConfig::from_lookup(dir.path(), |k| {
            vars.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.object_key, "catalog.csv");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.local_dev_options.access_key_id, "AKIA123");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShelfsyncConfig::from_lookup(dir.path(), |k| {
            (k == "PORT").then(|| "not-a-port".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("not-a-port"));
    }

    #[test]
    fn test_unusable_data_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let err = DataPaths::new(file.join("data")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_options_debug_redacts_secret() {
        let options = ConnectorOptions {
            access_key_id: "AKIA".into(),
            secret_access_key: "hunter2".into(),
            bucket_name: "b".into(),
        };
        let rendered = format!("{:?}", options);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_options_camel_case() {
        let options: ConnectorOptions = serde_json::from_value(serde_json::json!({
            "accessKeyId": "a",
            "secretAccessKey": "s",
            "bucketName": "b",
        }))
        .unwrap();
        assert_eq!(options.access_key_id, "a");
        assert_eq!(options.secret_access_key, "s");
        assert_eq!(options.bucket_name, "b");
    }
}
