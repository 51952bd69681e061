//! # Nettleie - Grid tariff polling service
//!
//! A Rust service that periodically fetches grid-tariff pricing data from the
//! Norgesnett HTTP API, authenticating once per fetch cycle, and exposes
//! derived values (current price level, monthly cost breakdown, current-hour
//! energy price) to a host application as observable named values.
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `http`: JSON HTTP executor with timeout, retry and backoff
//! - `tariff`: Auth+query client, wire types and the pure derivation layer
//! - `coordinator`: Refresh scheduling, validation and snapshot commit
//! - `values`: Named derived values published to the host

pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod logging;
pub mod tariff;
pub mod values;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{CoordinatorCommand, RefreshCoordinator, RefreshState};
pub use error::{NettleieError, Result};
pub use tariff::{TariffClient, TariffSnapshot, TariffSource};
