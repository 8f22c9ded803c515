//! Transaction submitter: validates a native-asset transfer, drives it
//! through the provider to confirmation, and reports a typed outcome
//! without touching session state.

use alloy::primitives::Address;
use thiserror::Error;

use crate::domain::{PendingTransfer, Session, TransactionRecord, TransferState};
use crate::ports::{ClockPort, ProviderError, ProviderPort};
use crate::units::{parse_units, UnitsError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no wallet is connected")]
    NotConnected,
    #[error("invalid recipient address: {0}")]
    BadRecipient(String),
    #[error("invalid transfer amount: {0}")]
    BadAmount(String),
    #[error("amount {requested} exceeds available balance {available}")]
    InsufficientBalance {
        requested: String,
        available: String,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transfer submission failed: {0}")]
    Submission(ProviderError),
    #[error("transfer reverted on chain")]
    Reverted,
    #[error("transfer confirmation timed out")]
    Timeout,
}

/// Submits one native-asset transfer and blocks until a terminal outcome.
///
/// Validation fails fast, before any provider call. A failed transfer is
/// not evidence of a disconnection: the session is read, never written.
pub fn submit<P: ProviderPort, C: ClockPort>(
    session: &Session,
    provider: &P,
    clock: &C,
    recipient: &str,
    amount: &str,
) -> Result<TransactionRecord, TransferError> {
    let (from, to, value, pending) = validate(session, recipient, amount)?;

    let mut pending = PendingTransfer {
        state: TransferState::Submitting,
        ..pending
    };
    tracing::debug!(%to, amount = %pending.amount, "submitting native transfer");
    let hash = provider
        .send_native_transfer(to, value)
        .map_err(|e| fail(&mut pending, TransferError::Submission(e)))?;

    pending.state = TransferState::AwaitingConfirmation;
    tracing::debug!(%hash, "awaiting confirmation");
    provider.await_confirmation(hash).map_err(|e| {
        fail(
            &mut pending,
            match e {
                ProviderError::Reverted => TransferError::Reverted,
                ProviderError::Timeout => TransferError::Timeout,
                other => TransferError::Submission(other),
            },
        )
    })?;

    pending.state = TransferState::Confirmed;
    let timestamp_secs = clock
        .now_secs()
        .map_err(|e| fail(&mut pending, TransferError::Submission(e)))?;
    tracing::info!(%hash, %to, amount = %pending.amount, "transfer confirmed");
    Ok(TransactionRecord {
        hash,
        from,
        to,
        value: pending.amount,
        timestamp_secs,
    })
}

fn fail(pending: &mut PendingTransfer, error: TransferError) -> TransferError {
    pending.state = TransferState::Failed;
    tracing::warn!(recipient = %pending.recipient, %error, "transfer failed");
    error
}

type Validated = (Address, Address, alloy::primitives::U256, PendingTransfer);

fn validate(
    session: &Session,
    recipient: &str,
    amount: &str,
) -> Result<Validated, ValidationError> {
    if !session.is_connected() {
        return Err(ValidationError::NotConnected);
    }
    let from = session.account.ok_or(ValidationError::NotConnected)?;

    let recipient = recipient.trim();
    if recipient.len() != 42
        || !recipient.starts_with("0x")
        || !recipient[2..].bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(ValidationError::BadRecipient(recipient.to_owned()));
    }
    let to: Address = recipient
        .parse()
        .map_err(|_| ValidationError::BadRecipient(recipient.to_owned()))?;

    let decimals = session.network.as_ref().map(|n| n.decimals).unwrap_or(18);
    let value = parse_units(amount, decimals).map_err(|e| match e {
        UnitsError::PrecisionLoss { .. } => ValidationError::BadAmount(e.to_string()),
        _ => ValidationError::BadAmount(amount.trim().to_owned()),
    })?;
    if value.is_zero() {
        return Err(ValidationError::BadAmount(amount.trim().to_owned()));
    }

    // Advisory ceiling only; the chain remains the arbiter of sufficiency
    // since gas is not modeled here.
    if let Some(balance) = session.balance.as_deref() {
        let available = parse_units(balance, decimals)
            .map_err(|_| ValidationError::BadAmount(balance.to_owned()))?;
        if value > available {
            return Err(ValidationError::InsufficientBalance {
                requested: amount.trim().to_owned(),
                available: balance.to_owned(),
            });
        }
    }

    let pending = PendingTransfer {
        recipient: to,
        amount: amount.trim().to_owned(),
        state: TransferState::Validating,
    };
    Ok((from, to, value, pending))
}
