//! Application state shared by every handler.
//!
//! Backends are chosen at compile time: session storage (`inmemory` or
//! `dynamodb`) and cloud provider (`demo` or `aws`). Each combination gets its
//! own `AppState::new` below.

use std::sync::Arc;

use tokio::sync::broadcast;

use concierge_core::cache::Cache;
use concierge_core::session::SessionRepository;

use crate::cache::MemoryCache;
use crate::cloud::CloudProviders;
use crate::config::Config;

/// Shared application state, cloned into each handler.
#[derive(Clone)]
pub struct AppState {
    pub cloud: CloudProviders,
    pub sessions: Arc<dyn SessionRepository>,
    /// Result cache for Cost Explorer backed tools.
    pub cache: Arc<dyn Cache>,
    pub config: Arc<Config>,
    /// Session backend name reported by the health endpoint.
    pub storage_backend: &'static str,
    /// Shutdown signal sender for SSE connections.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    fn build(
        cloud: CloudProviders,
        sessions: Arc<dyn SessionRepository>,
        storage_backend: &'static str,
        config: &Config,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            cloud,
            sessions,
            cache: Arc::new(MemoryCache::new(config.cache_max_entries)),
            config: Arc::new(config.clone()),
            storage_backend,
            shutdown_tx,
        }
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all SSE connections to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "demo"))]
mod inmemory_demo {
    use super::*;
    use crate::storage::InMemorySessionRepository;

    impl AppState {
        /// In-memory sessions and the demo account. Needs no AWS access.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                CloudProviders::demo(),
                Arc::new(InMemorySessionRepository::new()),
                "inmemory",
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "aws"))]
mod inmemory_aws {
    use super::*;
    use crate::storage::InMemorySessionRepository;

    impl AppState {
        /// In-memory sessions against a real AWS account.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                CloudProviders::aws(config).await,
                Arc::new(InMemorySessionRepository::new()),
                "inmemory",
                config,
            ))
        }
    }
}

#[cfg(feature = "dynamodb")]
async fn dynamodb_sessions(config: &Config) -> Arc<dyn SessionRepository> {
    use crate::storage::DynamoDbSessionRepository;

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let repository = DynamoDbSessionRepository::new(client, config.sessions_table.clone());

    tracing::info!(table = repository.table_name(), "Using DynamoDB session storage");
    Arc::new(repository)
}

#[cfg(all(feature = "dynamodb", feature = "demo"))]
mod dynamodb_demo {
    use super::*;

    impl AppState {
        /// DynamoDB sessions and the demo account.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                CloudProviders::demo(),
                dynamodb_sessions(config).await,
                "dynamodb",
                config,
            ))
        }
    }
}

#[cfg(all(feature = "dynamodb", feature = "aws"))]
mod dynamodb_aws {
    use super::*;

    impl AppState {
        /// DynamoDB sessions against a real AWS account.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            Ok(Self::build(
                CloudProviders::aws(config).await,
                dynamodb_sessions(config).await,
                "dynamodb",
                config,
            ))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================
