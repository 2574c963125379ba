//! Shared fixtures for integration tests

use perp_position_scanner::position::layout;
use perp_position_scanner::{AccountSource, Position, ProgramAccountsQuery, RawAccount, TransportError};
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::pubkey::Pubkey;
use std::cell::RefCell;

/// Builder for raw 216-byte position accounts.
pub struct PositionFixture {
    data: Vec<u8>,
}

impl PositionFixture {
    pub fn new(owner: &Pubkey) -> Self {
        let mut data = vec![0u8; Position::LEN];
        data[..8].copy_from_slice(Position::discriminator().as_bytes());
        let mut fixture = Self { data };
        fixture.put(layout::OWNER, owner.as_ref());
        fixture.data[layout::SIDE] = 1;
        fixture
    }

    fn put(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn size_usd(mut self, value: u64) -> Self {
        self.put(layout::SIZE_USD, &value.to_le_bytes());
        self
    }

    pub fn collateral_usd(mut self, value: u64) -> Self {
        self.put(layout::COLLATERAL_USD, &value.to_le_bytes());
        self
    }

    pub fn side(mut self, tag: u8) -> Self {
        self.data[layout::SIDE] = tag;
        self
    }

    pub fn discriminator(mut self, bytes: &[u8; 8]) -> Self {
        self.put(0, bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// In-memory program accounts.
///
/// With `honor_filters` off it behaves like a stale node returning
/// everything it stores.
pub struct MemorySource {
    pub accounts: Vec<RawAccount>,
    pub honor_filters: bool,
    pub fail_with: Option<String>,
    pub queries: RefCell<Vec<ProgramAccountsQuery>>,
}

impl MemorySource {
    pub fn new(accounts: Vec<(Pubkey, Vec<u8>)>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|(address, data)| RawAccount { address, data })
                .collect(),
            honor_filters: true,
            fail_with: None,
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn unfiltered(mut self) -> Self {
        self.honor_filters = false;
        self
    }

    pub fn failing(message: &str) -> Self {
        let mut source = Self::new(Vec::new());
        source.fail_with = Some(message.to_string());
        source
    }
}

impl AccountSource for MemorySource {
    fn program_accounts(&self, query: &ProgramAccountsQuery) -> Result<Vec<RawAccount>, TransportError> {
        self.queries.borrow_mut().push(query.clone());
        if let Some(message) = &self.fail_with {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message.clone());
            return Err(ClientError::from(ClientErrorKind::Io(io)).into());
        }
        Ok(self
            .accounts
            .iter()
            .filter(|a| !self.honor_filters || query.matches(&a.data))
            .cloned()
            .collect())
    }

    fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.address == *address)
            .map(|a| a.data.clone()))
    }
}
