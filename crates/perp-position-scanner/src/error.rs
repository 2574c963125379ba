//! Error taxonomy for reading, decoding and collecting position accounts

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::discriminator::Discriminator;

/// A fixed-offset read ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
pub struct BoundsError {
    pub offset: usize,
    pub width: usize,
    pub len: usize,
}

/// An account claiming to be a position could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid account length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("discriminator mismatch: expected {expected}, got {actual}")]
    Discriminator { expected: Discriminator, actual: Discriminator },

    #[error("invalid side tag {0}")]
    InvalidSide(u8),

    #[error("owner mismatch: expected {expected}, got {actual}")]
    OwnerMismatch { expected: Pubkey, actual: Pubkey },

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}

/// JSON-RPC codes for a request the node will never accept as sent.
const MALFORMED_REQUEST_CODES: [i64; 4] = [-32700, -32600, -32601, -32602];

/// Failure reported by the remote account source.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("rpc request timed out: {0}")]
    Timeout(#[source] ClientError),

    #[error("rpc request failed: {0}")]
    Rpc(#[source] ClientError),
}

impl TransportError {
    /// Whether the caller may reissue the same request.
    ///
    /// Node-side errors count unless the code marks the request itself as
    /// malformed (parse error, invalid request, unknown method, invalid params).
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Timeout(_) => true,
            TransportError::Rpc(err) => match err.kind() {
                ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => true,
                ClientErrorKind::RpcError(RpcError::RpcRequestError(_)) => true,
                ClientErrorKind::RpcError(RpcError::RpcResponseError { code, .. }) => {
                    !MALFORMED_REQUEST_CODES.contains(code)
                }
                _ => false,
            },
        }
    }
}

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        let timed_out = matches!(err.kind(), ClientErrorKind::Reqwest(e) if e.is_timeout());
        if timed_out {
            TransportError::Timeout(err)
        } else {
            TransportError::Rpc(err)
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid address for {field}: {value}")]
    InvalidAddress { field: String, value: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure of a whole collection run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("account {address} rejected: {source}")]
    Decode {
        address: Pubkey,
        #[source]
        source: DecodeError,
    },
}

impl CollectError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CollectError::Transport(err) => err.is_retryable(),
            CollectError::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::rpc_request::RpcResponseErrorData;

    fn response_error(code: i64) -> TransportError {
        TransportError::from(ClientError::from(ClientErrorKind::RpcError(
            RpcError::RpcResponseError {
                code,
                message: "node error".to_string(),
                data: RpcResponseErrorData::Empty,
            },
        )))
    }

    #[test]
    fn test_bounds_error_display() {
        let err = BoundsError { offset: 210, width: 8, len: 215 };
        let message = err.to_string();
        assert!(message.contains("210"));
        assert!(message.contains("215"));
    }

    #[test]
    fn test_decode_error_wraps_bounds() {
        let err: DecodeError = BoundsError { offset: 0, width: 4, len: 2 }.into();
        assert!(matches!(err, DecodeError::Bounds(_)));
    }

    #[test]
    fn test_custom_client_error_is_not_retryable() {
        let err = TransportError::from(ClientError::from(ClientErrorKind::Custom(
            "bad request".to_string(),
        )));
        assert!(matches!(err, TransportError::Rpc(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_client_error_is_retryable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = TransportError::from(ClientError::from(io));
        assert!(err.is_retryable());
        assert!(CollectError::from(err).is_retryable());
    }

    #[test]
    fn test_invalid_params_is_not_retryable() {
        assert!(!response_error(-32602).is_retryable());
        assert!(!response_error(-32601).is_retryable());
    }

    #[test]
    fn test_node_side_response_error_is_retryable() {
        assert!(response_error(-32005).is_retryable());
        assert!(response_error(-32603).is_retryable());
    }

    #[test]
    fn test_discriminator_mismatch_shows_hex() {
        let err = DecodeError::Discriminator {
            expected: crate::discriminator::account_discriminator("Position"),
            actual: crate::discriminator::account_discriminator("Pool"),
        };
        assert_eq!(
            err.to_string(),
            "discriminator mismatch: expected aabc8fe47a40f7d0, got f19a6d0411b16dbc"
        );
    }

    #[test]
    fn test_decode_collect_error_is_not_retryable() {
        let err = CollectError::Decode {
            address: Pubkey::new_unique(),
            source: DecodeError::InvalidSide(7),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("invalid side tag 7"));
    }
}
