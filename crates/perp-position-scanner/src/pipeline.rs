//! Filter, fetch, decode and order position accounts

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{CollectError, ConfigError, DecodeError, TransportError};
use crate::filter::{build_filter, pubkey_filter, FilterExpression, ProgramAccountsQuery};
use crate::position::{layout, Position};
use crate::source::{AccountSource, RawAccount};

/// What to do with an account that fails local validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Record the rejection and keep going.
    #[default]
    SkipInvalid,
    /// Abort the collection on the first rejected account.
    FailFast,
}

impl FromStr for DecodePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip_invalid" => Ok(DecodePolicy::SkipInvalid),
            "fail_fast" | "fail-fast" | "abort" => Ok(DecodePolicy::FailFast),
            other => Err(ConfigError::InvalidValue {
                field: "DECODE_POLICY".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// A decoded position with the address it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAccount {
    pub address: Pubkey,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedAccount {
    pub address: Pubkey,
    pub error: DecodeError,
}

/// Result of one collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionCollection {
    /// Open positions, ascending by `size_usd`.
    pub positions: Vec<PositionAccount>,
    /// Accounts that failed local validation.
    pub rejected: Vec<RejectedAccount>,
    /// Valid accounts dropped for having zero size.
    pub closed: usize,
}

impl PositionCollection {
    pub fn scanned(&self) -> usize {
        self.positions.len() + self.rejected.len() + self.closed
    }
}

pub struct PositionCollector<S> {
    source: S,
    policy: DecodePolicy,
}

impl<S: AccountSource> PositionCollector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: DecodePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the bulk query for every position of a program.
    pub fn query(program_id: &Pubkey) -> ProgramAccountsQuery {
        let filters = vec![build_filter(&Position::discriminator())];
        ProgramAccountsQuery::new(*program_id, filters, Position::LEN as u64)
    }

    /// Collect every open position of the program.
    pub fn collect(&self, program_id: &Pubkey) -> Result<PositionCollection, CollectError> {
        self.run(Self::query(program_id), None)
    }

    /// Collect the open positions held by one owner.
    pub fn collect_for_owner(
        &self,
        program_id: &Pubkey,
        owner: &Pubkey,
    ) -> Result<PositionCollection, CollectError> {
        let mut query = Self::query(program_id);
        query.filters.push(pubkey_filter(layout::OWNER, owner));
        self.run(query, Some(owner))
    }

    /// Fetch and decode a single position account.
    pub fn fetch_position(&self, address: &Pubkey) -> Result<Option<Position>, CollectError> {
        let Some(data) = self.source.account(address)? else {
            return Ok(None);
        };
        Position::decode(&data)
            .map(Some)
            .map_err(|source| CollectError::Decode {
                address: *address,
                source,
            })
    }

    fn run(
        &self,
        query: ProgramAccountsQuery,
        owner: Option<&Pubkey>,
    ) -> Result<PositionCollection, CollectError> {
        debug!(
            program_id = %query.program_id,
            filters = ?describe_filters(&query.filters),
            policy = ?self.policy,
            "Scanning position accounts"
        );
        let accounts = self.source.program_accounts(&query).map_err(|err: TransportError| {
            warn!(program_id = %query.program_id, error = %err, "Program account scan failed");
            err
        })?;

        let mut collection = PositionCollection::default();
        for RawAccount { address, data } in accounts {
            match decode_checked(&data, owner) {
                Ok(position) if position.is_open() => {
                    collection.positions.push(PositionAccount { address, position });
                }
                Ok(_) => collection.closed += 1,
                Err(error) => {
                    warn!(address = %address, error = %error, "Rejected position account");
                    if self.policy == DecodePolicy::FailFast {
                        return Err(CollectError::Decode {
                            address,
                            source: error,
                        });
                    }
                    collection.rejected.push(RejectedAccount { address, error });
                }
            }
        }

        sort_by_size(&mut collection.positions);

        info!(
            program_id = %query.program_id,
            scanned = collection.scanned(),
            open = collection.positions.len(),
            closed = collection.closed,
            rejected = collection.rejected.len(),
            "Collected positions"
        );

        Ok(collection)
    }
}

fn decode_checked(data: &[u8], owner: Option<&Pubkey>) -> Result<Position, DecodeError> {
    let position = Position::decode(data)?;
    match owner {
        Some(expected) if position.owner != *expected => Err(DecodeError::OwnerMismatch {
            expected: *expected,
            actual: position.owner,
        }),
        _ => Ok(position),
    }
}

/// Ascending by size, ties broken by address.
pub fn sort_by_size(positions: &mut [PositionAccount]) {
    positions.sort_by(|a, b| {
        a.position
            .size_usd
            .cmp(&b.position.size_usd)
            .then_with(|| a.address.cmp(&b.address))
    });
}

/// Filters a query would send, for logging.
pub fn describe_filters(filters: &[FilterExpression]) -> Vec<String> {
    filters
        .iter()
        .map(|f| format!("memcmp@{}={}", f.offset, f.encoded_bytes()))
        .collect()
}
