//! Remote account source backed by Solana JSON-RPC

use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{sync::Arc, time::Duration};
use tracing::debug;

use crate::error::TransportError;
use crate::filter::ProgramAccountsQuery;

/// Raw account returned by a bulk scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub address: Pubkey,
    pub data: Vec<u8>,
}

/// Where account bytes come from.
///
/// Implementations return whole batches only and do not retry.
pub trait AccountSource {
    fn program_accounts(&self, query: &ProgramAccountsQuery) -> Result<Vec<RawAccount>, TransportError>;

    /// `Ok(None)` when the account does not exist.
    fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportError>;
}

impl<T: AccountSource + ?Sized> AccountSource for Arc<T> {
    fn program_accounts(&self, query: &ProgramAccountsQuery) -> Result<Vec<RawAccount>, TransportError> {
        (**self).program_accounts(query)
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportError> {
        (**self).account(address)
    }
}

pub struct RpcAccountSource {
    rpc_client: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcAccountSource {
    pub fn new(rpc_url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            rpc_url, timeout, commitment,
        ));
        Self::with_client(rpc_client)
    }

    pub fn with_client(rpc_client: Arc<RpcClient>) -> Self {
        let commitment = rpc_client.commitment();
        Self {
            rpc_client,
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

impl AccountSource for RpcAccountSource {
    fn program_accounts(&self, query: &ProgramAccountsQuery) -> Result<Vec<RawAccount>, TransportError> {
        debug!(
            program_id = %query.program_id,
            data_size = query.data_size,
            filters = query.filters.len(),
            "Fetching program accounts"
        );

        let config = RpcProgramAccountsConfig {
            filters: Some(query.rpc_filters()),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .rpc_client
            .get_program_accounts_with_config(&query.program_id, config)?;

        debug!(
            program_id = %query.program_id,
            count = accounts.len(),
            "Fetched program accounts"
        );

        Ok(accounts
            .into_iter()
            .map(|(address, account)| RawAccount {
                address,
                data: account.data,
            })
            .collect())
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportError> {
        debug!(address = %address, "Fetching account");
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.commitment)?;
        Ok(response.value.map(|account| account.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_source_keeps_commitment() {
        let source = RpcAccountSource::new(
            "http://localhost:8899".to_string(),
            Duration::from_secs(5),
            CommitmentConfig::finalized(),
        );
        assert_eq!(source.commitment, CommitmentConfig::finalized());
        assert_eq!(source.url(), "http://localhost:8899");
    }
}
