use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ChainId;

/// Typed outcomes at the provider boundary. Every adapter failure resolves
/// into one of these; none of them is fatal to the session machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no injected provider is available: {0}")]
    Unavailable(String),
    #[error("user rejected the request")]
    UserRejected,
    #[error("target chain is not configured in the provider")]
    NotRecognized,
    #[error("transaction reverted on chain")]
    Reverted,
    #[error("timed out waiting for confirmation")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Handle for one provider event subscription. Acquired by the session
/// controller on start and released on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEventKind {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

/// A provider-pushed notification. `sequence` is monotonic per adapter so
/// delivery order matches emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub kind: ProviderEventKind,
}

/// Normalized capability surface of the injected EIP-1193 provider.
///
/// All methods except the event-buffer operations may perform network or
/// user-interaction I/O.
pub trait ProviderPort {
    /// Accounts already granted to this origin; never prompts the user.
    fn connected_accounts(&self) -> Result<Vec<Address>, ProviderError>;
    /// Triggers the provider's consent prompt.
    fn request_connection(&self) -> Result<Address, ProviderError>;
    fn chain_id(&self) -> Result<ChainId, ProviderError>;
    /// Balance in the smallest on-chain unit.
    fn native_balance(&self, account: Address) -> Result<U256, ProviderError>;
    /// Fails with `NotRecognized` when the provider reports error 4902.
    fn request_chain_switch(&self, chain: ChainId) -> Result<(), ProviderError>;
    fn send_native_transfer(&self, to: Address, value: U256) -> Result<B256, ProviderError>;
    /// Blocks until the transaction is finalized, reverted, or timed out.
    fn await_confirmation(&self, hash: B256) -> Result<(), ProviderError>;

    fn subscribe(&self) -> Result<SubscriptionId, ProviderError>;
    /// Buffered events for `subscription`, in emission order; clears the buffer.
    fn drain_events(&self, subscription: SubscriptionId) -> Result<Vec<ProviderEvent>, ProviderError>;
    fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), ProviderError>;
}

pub trait ClockPort {
    fn now_secs(&self) -> Result<u64, ProviderError>;
}
