//! Perpetuals Position Scanner
//!
//! Scans a perpetuals program for `Position` accounts, decodes their fixed
//! 216-byte layout and orders the open ones by notional size.

pub mod byte_reader;
pub mod config;
pub mod discriminator;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod position;
pub mod report;
pub mod source;

// Re-export commonly used types
pub use config::ScannerConfig;
pub use discriminator::{account_discriminator, Discriminator};
pub use error::{BoundsError, CollectError, ConfigError, DecodeError, TransportError};
pub use filter::{build_filter, FilterExpression, ProgramAccountsQuery};
pub use pipeline::{DecodePolicy, PositionAccount, PositionCollection, PositionCollector, RejectedAccount};
pub use position::{Position, Side};
pub use report::{CollectionReport, PositionSummary};
pub use source::{AccountSource, RawAccount, RpcAccountSource};
