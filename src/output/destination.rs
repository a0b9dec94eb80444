//! Report destinations: local file or object storage (S3, R2, GCS, Azure)

use super::writer::{render_rows, write_rows_to_path, CsvWriterConfig};
use crate::error::{Error, Result};
use crate::types::MergedRow;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the report is written
#[derive(Clone)]
pub enum Destination {
    /// File on the local filesystem
    Local(PathBuf),
    /// Single object in a bucket or container
    Object {
        store: Arc<dyn ObjectStore>,
        key: ObjectPath,
        scheme: String,
        bucket: String,
    },
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Destination({self})")
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Object {
                key,
                scheme,
                bucket,
                ..
            } => write!(f, "{scheme}://{bucket}/{key}"),
        }
    }
}

impl Destination {
    /// Parse an output path
    ///
    /// Supported formats:
    /// - `s3://bucket/key.csv` - AWS S3
    /// - `r2://bucket/key.csv` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/key.csv` - Google Cloud Storage
    /// - `az://container/key.csv` - Azure Blob Storage
    /// - anything else, optionally `file://` prefixed - local file
    ///
    /// Object store clients are built from the environment; no request is
    /// made until export.
    pub fn parse(url: &str) -> Result<Self> {
        let Some((scheme, rest)) = url.split_once("://") else {
            return Ok(Self::Local(PathBuf::from(url)));
        };

        match scheme {
            "file" => Ok(Self::Local(PathBuf::from(rest))),
            "s3" | "r2" | "gs" | "az" => {
                let (bucket, key) = split_bucket_key(url, rest)?;
                let store = build_store(scheme, bucket)?;
                Ok(Self::Object {
                    store,
                    key: ObjectPath::from(key),
                    scheme: scheme.to_string(),
                    bucket: bucket.to_string(),
                })
            }
            other => Err(Error::invalid_value(
                "output.path",
                format!("Unsupported scheme '{other}' in {url}"),
            )),
        }
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        match self {
            Self::Local(_) => "file",
            Self::Object { scheme, .. } => scheme,
        }
    }

    /// Write every row, returning the number of data rows written
    pub async fn export(&self, rows: &[MergedRow], config: &CsvWriterConfig) -> Result<usize> {
        match self {
            Self::Local(path) => {
                let path = path.clone();
                let rows = rows.to_vec();
                let config = config.clone();
                tokio::task::spawn_blocking(move || write_rows_to_path(&path, &rows, &config))
                    .await
                    .map_err(|e| Error::write(format!("Export task failed: {e}")))?
            }
            Self::Object { store, key, .. } => {
                let data = Bytes::from(render_rows(rows, config)?);
                store
                    .put(key, data.into())
                    .await
                    .map_err(|e| Error::write(format!("Failed to write {self}: {e}")))?;
                Ok(rows.len())
            }
        }
    }
}

fn split_bucket_key<'a>(url: &str, rest: &'a str) -> Result<(&'a str, &'a str)> {
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() && !key.ends_with('/') => {
            Ok((bucket, key))
        }
        _ => Err(Error::invalid_value(
            "output.path",
            format!("Expected <scheme>://<bucket>/<object key> but got {url}"),
        )),
    }
}

fn build_store(scheme: &str, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match scheme {
        "s3" | "r2" => {
            let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
            // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
            if scheme == "r2" {
                if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                    builder = builder.with_endpoint(endpoint);
                }
            }
            Arc::new(builder.build().map_err(|e| {
                Error::config(format!("Failed to create {scheme} client: {e}"))
            })?)
        }
        "gs" => Arc::new(
            GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?,
        ),
        _ => Arc::new(
            MicrosoftAzureBuilder::from_env()
                .with_container_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?,
        ),
    };
    Ok(store)
}
