//! Cloud provider implementations.
//!
//! Implements the provider traits from `concierge_core::cloud`. Selected at
//! compile time:
//!
//! - `demo` (default): a deterministic sample account, no credentials needed
//! - `aws`: the AWS SDK for Rust, configured from the default credential chain

use std::sync::Arc;

use concierge_core::cloud::{
    AgentRuntime, ComputeSource, CostSource, DatabaseSource, FunctionSource, IdentitySource,
    StorageSource,
};

#[cfg(all(feature = "demo", feature = "aws"))]
compile_error!(
    "Features 'demo' and 'aws' are mutually exclusive. \
    Enable only one cloud provider at a time."
);

#[cfg(not(any(feature = "demo", feature = "aws")))]
compile_error!(
    "No cloud provider selected. Enable 'demo' or 'aws' feature. \
    Example: cargo build -p concierge --features demo"
);

#[cfg(any(feature = "demo", test))]
pub mod demo;

#[cfg(feature = "aws")]
pub mod aws;

/// Every provider the tools and the chat need.
#[derive(Clone)]
pub struct CloudProviders {
    pub cost: Arc<dyn CostSource>,
    pub compute: Arc<dyn ComputeSource>,
    pub storage: Arc<dyn StorageSource>,
    pub database: Arc<dyn DatabaseSource>,
    pub functions: Arc<dyn FunctionSource>,
    pub identity: Arc<dyn IdentitySource>,
    pub agent: Arc<dyn AgentRuntime>,
    /// Backend name reported by the health endpoint.
    pub name: &'static str,
}

impl CloudProviders {
    /// Uses one value for every provider.
    pub fn from_single<T>(
        provider: Arc<T>,
        agent: Arc<dyn AgentRuntime>,
        name: &'static str,
    ) -> Self
    where
        T: CostSource
            + ComputeSource
            + StorageSource
            + DatabaseSource
            + FunctionSource
            + IdentitySource
            + 'static,
    {
        Self {
            cost: provider.clone(),
            compute: provider.clone(),
            storage: provider.clone(),
            database: provider.clone(),
            functions: provider.clone(),
            identity: provider,
            agent,
            name,
        }
    }
}
