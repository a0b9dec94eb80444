//! Voucher instance sources
//!
//! `MongoVoucherSource` opens its client per call so every network step of
//! a run happens inside the run's deadline.

use super::decode::{decode_voucher_instance, parse_voucher_id};
use crate::config::DocumentStoreConfig;
use crate::error::{Error, Result};
use crate::types::VoucherInstance;
use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{AuthMechanism, ClientOptions, Credential};
use mongodb::{Client, Collection};
use std::str::FromStr;
use std::time::Duration;

/// Source of voucher instances for one parent voucher
#[async_trait]
pub trait VoucherSource: Send + Sync {
    /// Human-readable source name for logs and errors
    fn name(&self) -> &str;

    /// Verify the store is reachable
    async fn check(&self) -> Result<()>;

    /// Fetch every instance of `voucher_id`, in store scan order
    ///
    /// Fails as a whole if any single document cannot be decoded.
    async fn fetch_instances(&self, voucher_id: &str) -> Result<Vec<VoucherInstance>>;
}

// ============================================================================
// MongoDB
// ============================================================================

const MONGO_SOURCE: &str = "MongoDB";

/// MongoDB-backed voucher source
pub struct MongoVoucherSource {
    config: DocumentStoreConfig,
    timeout: Duration,
}

impl MongoVoucherSource {
    /// Create a source; no connection is made until first use
    pub fn new(config: DocumentStoreConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    /// Build client options from config
    async fn client_options(&self) -> Result<ClientOptions> {
        let mut options = ClientOptions::parse(&self.config.uri)
            .await
            .map_err(|e| Error::unavailable(MONGO_SOURCE, format!("Invalid MongoDB URI: {e}")))?;

        if let Some(username) = &self.config.username {
            let mechanism = AuthMechanism::from_str(&self.config.auth_mechanism).map_err(|e| {
                Error::invalid_value("document_store.auth_mechanism", e.to_string())
            })?;

            options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(self.config.password.clone())
                    .source(self.config.auth_source.clone())
                    .mechanism(mechanism)
                    .build(),
            );
        }

        options.app_name = Some(crate::NAME.to_string());
        options.connect_timeout = Some(self.timeout);
        options.server_selection_timeout = Some(self.timeout);

        Ok(options)
    }

    /// Connect and ping the primary
    async fn connect(&self) -> Result<Client> {
        let options = self.client_options().await?;
        let client = Client::with_options(options)
            .map_err(|e| Error::unavailable(MONGO_SOURCE, format!("Failed to create client: {e}")))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| Error::unavailable(MONGO_SOURCE, format!("Ping failed: {e}")))?;

        tracing::info!(
            "Connected to MongoDB ({}.{})",
            self.config.database,
            self.config.collection
        );

        Ok(client)
    }

    fn collection(&self, client: &Client) -> Collection<Document> {
        client
            .database(&self.config.database)
            .collection::<Document>(&self.config.collection)
    }
}

#[async_trait]
impl VoucherSource for MongoVoucherSource {
    fn name(&self) -> &str {
        MONGO_SOURCE
    }

    async fn check(&self) -> Result<()> {
        self.connect().await.map(|_| ())
    }

    async fn fetch_instances(&self, voucher_id: &str) -> Result<Vec<VoucherInstance>> {
        let oid = parse_voucher_id(voucher_id)?;
        let client = self.connect().await?;
        let collection = self.collection(&client);

        let filter = doc! { "voucherId": oid };
        tracing::debug!("Querying {} with filter {}", self.config.collection, filter);

        let cursor = collection
            .find(filter, None)
            .await
            .map_err(|e| Error::unavailable(MONGO_SOURCE, format!("Query failed: {e}")))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| Error::unavailable(MONGO_SOURCE, format!("Cursor failed: {e}")))?;
        let instances = decode_instances(documents, &oid.to_hex())?;

        tracing::debug!(
            "Decoded {} documents for voucher {voucher_id}",
            instances.len()
        );

        Ok(instances)
    }
}

/// Decode documents in order, failing on the first bad one
pub(super) fn decode_instances(
    documents: impl IntoIterator<Item = Document>,
    voucher_id: &str,
) -> Result<Vec<VoucherInstance>> {
    documents
        .into_iter()
        .map(|document| {
            let instance = decode_voucher_instance(document)?;
            ensure_parent(&instance, voucher_id)?;
            Ok(instance)
        })
        .collect()
}

/// Every returned instance must belong to the requested voucher
pub(super) fn ensure_parent(instance: &VoucherInstance, voucher_id: &str) -> Result<()> {
    if instance.voucher_id.eq_ignore_ascii_case(voucher_id) {
        Ok(())
    } else {
        Err(Error::malformed(
            &instance.id,
            format!(
                "voucherId {} does not match requested voucher {voucher_id}",
                instance.voucher_id
            ),
        ))
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Voucher source backed by a fixed list of instances
#[derive(Debug, Clone, Default)]
pub struct MemoryVoucherSource {
    instances: Vec<VoucherInstance>,
}

impl MemoryVoucherSource {
    /// Create a source over the given instances
    pub fn new(instances: Vec<VoucherInstance>) -> Self {
        Self { instances }
    }
}

#[async_trait]
impl VoucherSource for MemoryVoucherSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn check(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch_instances(&self, voucher_id: &str) -> Result<Vec<VoucherInstance>> {
        Ok(self
            .instances
            .iter()
            .filter(|i| i.voucher_id.eq_ignore_ascii_case(voucher_id))
            .cloned()
            .collect())
    }
}
