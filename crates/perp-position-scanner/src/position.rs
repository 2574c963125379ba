//! Position account layout and decoder

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use crate::byte_reader::{
    read_fixed_bytes, read_i64_le, read_pubkey, read_u128_le, read_u64_le, read_u8,
};
use crate::discriminator::{account_discriminator, Discriminator, DISCRIMINATOR_LEN};
use crate::error::DecodeError;

/// Byte offsets of every decoded field.
pub mod layout {
    pub const DISCRIMINATOR: usize = 0;
    pub const OWNER: usize = 8;
    pub const POOL: usize = 40;
    pub const CUSTODY: usize = 72;
    pub const COLLATERAL_CUSTODY: usize = 104;
    pub const OPEN_TIME: usize = 136;
    pub const UPDATE_TIME: usize = 144;
    pub const SIDE: usize = 152;
    pub const PRICE: usize = 153;
    pub const SIZE_USD: usize = 161;
    pub const COLLATERAL_USD: usize = 169;
    pub const REALISED_PNL_USD: usize = 177;
    pub const CUMULATIVE_INTEREST_SNAPSHOT: usize = 185;
    pub const LOCKED_AMOUNT: usize = 201;
    pub const BUMP: usize = 209;
    /// Bytes 210..216 are reserved and not decoded.
    pub const RESERVED: usize = 210;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    None,
    Long,
    Short,
}

impl TryFrom<u8> for Side {
    type Error = DecodeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Side::None),
            1 => Ok(Side::Long),
            2 => Ok(Side::Short),
            other => Err(DecodeError::InvalidSide(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::None => write!(f, "none"),
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Decoded perpetuals position account.
///
/// Prices and USD amounts are fixed point with [`USD_DECIMALS`] decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub owner: Pubkey,
    pub pool: Pubkey,
    pub custody: Pubkey,
    pub collateral_custody: Pubkey,
    pub open_time: i64,
    pub update_time: i64,
    pub side: Side,
    pub price: u64,
    pub size_usd: u64,
    pub collateral_usd: u64,
    pub realised_pnl_usd: i64,
    pub cumulative_interest_snapshot: u128,
    pub locked_amount: u64,
    pub bump: u8,
}

pub const USD_DECIMALS: u32 = 6;

/// `10^USD_DECIMALS`
pub const USD_SCALE: f64 = 1_000_000.0;

impl Position {
    pub const ACCOUNT_NAME: &'static str = "Position";

    pub const LEN: usize = 216;

    pub fn discriminator() -> Discriminator {
        account_discriminator(Self::ACCOUNT_NAME)
    }

    /// Decode a raw account buffer.
    ///
    /// The buffer must be exactly [`Position::LEN`] bytes and start with the
    /// position discriminator. Data is never coerced: any mismatch is an error.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != Self::LEN {
            return Err(DecodeError::Length {
                expected: Self::LEN,
                actual: data.len(),
            });
        }

        let mut actual = [0u8; DISCRIMINATOR_LEN];
        actual.copy_from_slice(read_fixed_bytes(data, layout::DISCRIMINATOR, DISCRIMINATOR_LEN)?);
        let actual = Discriminator::from_bytes(actual);
        let expected = Self::discriminator();
        if actual != expected {
            return Err(DecodeError::Discriminator { expected, actual });
        }

        Ok(Self {
            owner: read_pubkey(data, layout::OWNER)?,
            pool: read_pubkey(data, layout::POOL)?,
            custody: read_pubkey(data, layout::CUSTODY)?,
            collateral_custody: read_pubkey(data, layout::COLLATERAL_CUSTODY)?,
            open_time: read_i64_le(data, layout::OPEN_TIME)?,
            update_time: read_i64_le(data, layout::UPDATE_TIME)?,
            side: Side::try_from(read_u8(data, layout::SIDE)?)?,
            price: read_u64_le(data, layout::PRICE)?,
            size_usd: read_u64_le(data, layout::SIZE_USD)?,
            collateral_usd: read_u64_le(data, layout::COLLATERAL_USD)?,
            realised_pnl_usd: read_i64_le(data, layout::REALISED_PNL_USD)?,
            cumulative_interest_snapshot: read_u128_le(data, layout::CUMULATIVE_INTEREST_SNAPSHOT)?,
            locked_amount: read_u64_le(data, layout::LOCKED_AMOUNT)?,
            bump: read_u8(data, layout::BUMP)?,
        })
    }

    /// Closed positions keep their account but carry no size.
    pub fn is_open(&self) -> bool {
        self.size_usd > 0
    }

    /// `size_usd / collateral_usd`, or `None` without collateral.
    pub fn leverage(&self) -> Option<f64> {
        if self.collateral_usd == 0 {
            return None;
        }
        Some(self.size_usd as f64 / self.collateral_usd as f64)
    }
}

/// Convert a fixed-point USD amount to a float for display.
pub fn usd_to_f64(amount: u64) -> f64 {
    amount as f64 / USD_SCALE
}
