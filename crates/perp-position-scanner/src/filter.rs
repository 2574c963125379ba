//! Server-side filters for bulk program account scans

use solana_client::rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType};
use solana_sdk::pubkey::Pubkey;

use crate::discriminator::Discriminator;

/// Expect `bytes` at `offset` in the account data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl FilterExpression {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Base-58 encoding of the expected bytes.
    pub fn encoded_bytes(&self) -> String {
        bs58::encode(&self.bytes).into_string()
    }

    /// Whether `data` satisfies this expression.
    pub fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.bytes.len())
            .and_then(|end| data.get(self.offset..end))
            .map_or(false, |window| window == self.bytes.as_slice())
    }

    pub fn to_rpc_filter(&self) -> RpcFilterType {
        RpcFilterType::Memcmp(Memcmp::new(
            self.offset,
            MemcmpEncodedBytes::Base58(self.encoded_bytes()),
        ))
    }
}

/// Match the discriminator at offset 0.
pub fn build_filter(discriminator: &Discriminator) -> FilterExpression {
    FilterExpression::new(0, discriminator.as_bytes().to_vec())
}

/// Match a public key stored at `offset`.
pub fn pubkey_filter(offset: usize, key: &Pubkey) -> FilterExpression {
    FilterExpression::new(offset, key.to_bytes().to_vec())
}

/// One bulk scan: program, memcmp filters and the exact account size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAccountsQuery {
    pub program_id: Pubkey,
    pub filters: Vec<FilterExpression>,
    pub data_size: u64,
}

impl ProgramAccountsQuery {
    pub fn new(program_id: Pubkey, filters: Vec<FilterExpression>, data_size: u64) -> Self {
        Self {
            program_id,
            filters,
            data_size,
        }
    }

    /// RPC filter list: the size hint followed by every memcmp.
    pub fn rpc_filters(&self) -> Vec<RpcFilterType> {
        std::iter::once(RpcFilterType::DataSize(self.data_size))
            .chain(self.filters.iter().map(FilterExpression::to_rpc_filter))
            .collect()
    }

    /// Whether `data` passes every filter of this query.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() as u64 == self.data_size && self.filters.iter().all(|f| f.matches(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::account_discriminator;

    #[test]
    fn test_build_filter_uses_offset_zero() {
        let disc = account_discriminator("Position");
        let filter = build_filter(&disc);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.bytes, disc.as_bytes().to_vec());
        assert_eq!(filter.encoded_bytes(), "VZMoMoKgZQb");
    }

    #[test]
    fn test_rpc_filter_shape() {
        let disc = account_discriminator("Position");
        let query = ProgramAccountsQuery::new(Pubkey::new_unique(), vec![build_filter(&disc)], 216);
        let filters = query.rpc_filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], RpcFilterType::DataSize(216));
        assert_eq!(
            filters[1],
            RpcFilterType::Memcmp(Memcmp::new(0, MemcmpEncodedBytes::Base58("VZMoMoKgZQb".to_string())))
        );
    }

    #[test]
    fn test_matches() {
        let owner = Pubkey::new_unique();
        let filter = pubkey_filter(8, &owner);
        let mut data = vec![0u8; 40];
        assert!(!filter.matches(&data));
        data[8..40].copy_from_slice(owner.as_ref());
        assert!(filter.matches(&data));
        assert!(!filter.matches(&data[..39]));

        let query = ProgramAccountsQuery::new(Pubkey::new_unique(), vec![filter], 40);
        assert!(query.matches(&data));
        data.push(0);
        assert!(!query.matches(&data));
    }
}
