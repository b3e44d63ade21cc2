//! Active registry holder with administrative reload.
//!
//! Readers take an `Arc` snapshot of the current frozen registry and keep using
//! it for as long as they like. A reload builds a complete candidate registry on
//! the blocking pool and only swaps it in when every schema loaded cleanly; a
//! rejected candidate is dropped and the active registry is left as it was.

use crate::bootstrap::SchemaBootstrap;
use crate::config::RegistryConfig;
use crate::error::ReloadError;
use crate::producer::SchemaSource;
use crate::registry::SchemaRegistry;

use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to the active schema registry.
#[derive(Debug, Clone)]
pub struct SchemaService {
    config: RegistryConfig,
    active: Arc<RwLock<Arc<SchemaRegistry>>>,
    reload_lock: Arc<Mutex<()>>,
}

/// Summary of an accepted reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadOutcome {
    pub generation: u64,
    pub fingerprint: String,
    pub previous_fingerprint: String,
    /// Whether the schema content differs from the replaced registry
    pub changed: bool,
    /// Schemas in the new registry, in load order
    pub schemas: Vec<String>,
}

impl SchemaService {
    /// Serve an already frozen registry.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            config: registry.config().clone(),
            active: Arc::new(RwLock::new(Arc::new(registry))),
            reload_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build the initial registry from `sources`, failing on any violation.
    pub fn bootstrap(
        config: RegistryConfig,
        sources: Vec<SchemaSource>,
    ) -> Result<Self, ReloadError> {
        let registry = SchemaBootstrap::new(config)
            .with_sources(sources)
            .run()
            .into_result()
            .map_err(|violations| ReloadError::Rejected { violations })?;
        Ok(Self::new(registry))
    }

    /// Snapshot of the active registry.
    pub async fn current(&self) -> Arc<SchemaRegistry> {
        Arc::clone(&*self.active.read().await)
    }

    pub async fn generation(&self) -> u64 {
        self.active.read().await.generation()
    }

    /// Rebuild the registry from `sources` and swap it in if it validates.
    ///
    /// Reloads are serialized. Readers are only blocked for the swap itself.
    pub async fn reload(&self, sources: Vec<SchemaSource>) -> Result<ReloadOutcome, ReloadError> {
        let _guard = self.reload_lock.lock().await;
        let previous = self.current().await;
        let generation = previous.generation() + 1;

        let bootstrap = SchemaBootstrap::new(self.config.clone())
            .with_sources(sources)
            .with_generation(generation);
        let outcome = tokio::task::spawn_blocking(move || bootstrap.run())
            .await
            .map_err(|e| ReloadError::TaskFailed {
                message: e.to_string(),
            })?;

        let candidate = match outcome.into_result() {
            Ok(candidate) => candidate,
            Err(violations) => {
                warn!(
                    "Reload to generation {} rejected with {} violations, keeping generation {}",
                    generation,
                    violations.len(),
                    previous.generation()
                );
                return Err(ReloadError::Rejected { violations });
            }
        };

        let outcome = ReloadOutcome {
            generation,
            fingerprint: candidate.fingerprint().to_string(),
            previous_fingerprint: previous.fingerprint().to_string(),
            changed: candidate.fingerprint() != previous.fingerprint(),
            schemas: candidate
                .schema_names()
                .into_iter()
                .map(String::from)
                .collect(),
        };

        *self.active.write().await = Arc::new(candidate);
        info!(
            "Reloaded schema registry to generation {} (fingerprint {}, changed: {})",
            outcome.generation, outcome.fingerprint, outcome.changed
        );
        Ok(outcome)
    }
}
