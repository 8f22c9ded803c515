use std::fmt;

use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state_machine::SessionStatus;

/// Numeric chain identifier, parsed once at the edge so that differently
/// formatted hex ids (`0x1`, `0x01`, `0X1`) compare equal everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

#[derive(Debug, Error)]
#[error("invalid chain id: {0}")]
pub struct InvalidChainId(pub String);

impl ChainId {
    pub fn from_hex(raw: &str) -> Result<Self, InvalidChainId> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| InvalidChainId(raw.to_owned()))?;
        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| InvalidChainId(raw.to_owned()))
    }

    pub fn as_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Network metadata derived from a registry lookup on the active chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub label: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NetworkInfo {
    /// Fallback for chains the registry does not know about.
    pub fn unknown() -> Self {
        Self {
            label: "Unknown".to_owned(),
            symbol: "Unknown".to_owned(),
            decimals: 18,
        }
    }
}

/// Single source of truth for the wallet connection state.
///
/// `account` and `chain_id` are both present or both absent; `balance` and
/// `network` carry meaning only while `status` is `Connected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    /// Native-asset balance in display units, exact decimal string.
    pub balance: Option<String>,
    pub network: Option<NetworkInfo>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self {
            status: SessionStatus::Disconnected,
            account: None,
            chain_id: None,
            balance: None,
            network: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == SessionStatus::Connected
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::disconnected()
    }
}

/// Immutable record of a confirmed native-asset transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: B256,
    pub from: Address,
    pub to: Address,
    /// Transferred amount in display units.
    pub value: String,
    pub timestamp_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferState {
    Validating,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Failed,
}

/// Transient value tracking one transfer submission; discarded once a
/// terminal state has been reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransfer {
    pub recipient: Address,
    pub amount: String,
    pub state: TransferState,
}

/// Truncated account form used by display layers (`0x1234…cdef`).
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
