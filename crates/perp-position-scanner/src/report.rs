//! Read-only reporting views over collected positions

use chrono::{TimeZone, Utc};
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use crate::pipeline::{PositionAccount, PositionCollection};
use crate::position::{usd_to_f64, Position, Side, USD_SCALE};

/// Serialize a Pubkey as a base58 string
pub fn serialize_pubkey<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&pubkey.to_string())
}

fn format_timestamp(ts: i64) -> Option<String> {
    Utc.timestamp_opt(ts, 0).single().map(|t| t.to_rfc3339())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub owner: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub custody: Pubkey,
    pub side: Side,
    pub price: f64,
    pub size_usd: f64,
    pub collateral_usd: f64,
    pub realised_pnl_usd: f64,
    pub leverage: Option<f64>,
    pub opened_at: Option<String>,
    pub updated_at: Option<String>,
}

impl PositionSummary {
    pub fn new(address: Pubkey, position: &Position) -> Self {
        Self {
            address,
            owner: position.owner,
            custody: position.custody,
            side: position.side,
            price: usd_to_f64(position.price),
            size_usd: usd_to_f64(position.size_usd),
            collateral_usd: usd_to_f64(position.collateral_usd),
            realised_pnl_usd: position.realised_pnl_usd as f64 / USD_SCALE,
            leverage: position.leverage(),
            opened_at: format_timestamp(position.open_time),
            updated_at: format_timestamp(position.update_time),
        }
    }
}

impl From<&PositionAccount> for PositionSummary {
    fn from(account: &PositionAccount) -> Self {
        Self::new(account.address, &account.position)
    }
}

impl fmt::Display for PositionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner: {}, Side: {}, Size USD: {:.2}, ", self.owner, self.side, self.size_usd)?;
        match self.leverage {
            Some(leverage) => write!(f, "Leverage: {:.2}x", leverage),
            None => write!(f, "Leverage: n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSummary {
    #[serde(serialize_with = "serialize_pubkey")]
    pub address: Pubkey,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub positions: Vec<PositionSummary>,
    pub rejected: Vec<RejectedSummary>,
    pub closed: usize,
    pub total_size_usd: f64,
}

impl From<&PositionCollection> for CollectionReport {
    fn from(collection: &PositionCollection) -> Self {
        let total: u128 = collection
            .positions
            .iter()
            .map(|p| p.position.size_usd as u128)
            .sum();
        Self {
            positions: collection.positions.iter().map(PositionSummary::from).collect(),
            rejected: collection
                .rejected
                .iter()
                .map(|r| RejectedSummary {
                    address: r.address,
                    error: r.error.to_string(),
                })
                .collect(),
            closed: collection.closed,
            total_size_usd: total as f64 / USD_SCALE,
        }
    }
}
