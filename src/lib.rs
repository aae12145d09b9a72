//! Obra ML - движок предикции хода строительства

pub mod models;
pub mod preprocessing;
pub mod provider;
pub mod types;

pub use models::*;
pub use preprocessing::*;
pub use provider::{HistoricalDataProvider, InMemoryReportStore, ProviderError};
