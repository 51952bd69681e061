//! Norgesnett grid tariff integration
//!
//! Split across smaller files: wire types, the authenticate-then-query
//! client, and the pure derivation layer over a fetched snapshot.

pub mod client;
pub mod types;
pub mod view;

pub use client::TariffClient;
pub use types::TariffSnapshot;

use crate::error::Result;

/// Source of tariff snapshots, implemented by [`TariffClient`].
///
/// Seam for driving the coordinator in tests without a network.
#[async_trait::async_trait]
pub trait TariffSource: Send + Sync {
    async fn fetch_data(&self) -> Result<TariffSnapshot>;
}

#[async_trait::async_trait]
impl TariffSource for TariffClient {
    async fn fetch_data(&self) -> Result<TariffSnapshot> {
        TariffClient::fetch_data(self).await
    }
}
