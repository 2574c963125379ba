//! Little-endian fixed-width reads at explicit offsets
//!
//! Every integer read here is little-endian. There is no byte-order
//! parameter: account data is always little-endian on chain.

use solana_sdk::pubkey::Pubkey;

use crate::error::BoundsError;

/// Width of an on-chain public key.
pub const PUBKEY_LEN: usize = 32;

/// Borrow `len` bytes starting at `offset`.
pub fn read_fixed_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], BoundsError> {
    let out_of_bounds = BoundsError { offset, width: len, len: buf.len() };
    let end = offset.checked_add(len).ok_or(out_of_bounds)?;
    buf.get(offset..end).ok_or(out_of_bounds)
}

fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], BoundsError> {
    let mut out = [0u8; N];
    out.copy_from_slice(read_fixed_bytes(buf, offset, N)?);
    Ok(out)
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, BoundsError> {
    Ok(read_array::<1>(buf, offset)?[0])
}

pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32, BoundsError> {
    read_array(buf, offset).map(u32::from_le_bytes)
}

pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64, BoundsError> {
    read_array(buf, offset).map(u64::from_le_bytes)
}

pub fn read_i64_le(buf: &[u8], offset: usize) -> Result<i64, BoundsError> {
    read_array(buf, offset).map(i64::from_le_bytes)
}

pub fn read_u128_le(buf: &[u8], offset: usize) -> Result<u128, BoundsError> {
    read_array(buf, offset).map(u128::from_le_bytes)
}

/// Read a 32-byte public key.
pub fn read_pubkey(buf: &[u8], offset: usize) -> Result<Pubkey, BoundsError> {
    read_array::<PUBKEY_LEN>(buf, offset).map(Pubkey::new_from_array)
}
