use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Inputs that move the session between states. Provider-pushed account
/// events are legal from every state; the explicit connect flow is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    ConnectRequested,
    ConnectSucceeded,
    ConnectFailed,
    ErrorReported,
    AccountsAssigned,
    AccountsCleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SessionStatus,
    pub to: SessionStatus,
    pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("illegal session transition: {from:?} --{action:?}")]
    IllegalTransition {
        from: SessionStatus,
        action: SessionAction,
    },
    #[error("session is not connected")]
    NotConnected,
    #[error("session event subscription was not started")]
    NotStarted,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub fn session_transition(
    from: SessionStatus,
    action: SessionAction,
) -> Result<(SessionStatus, StateTransition), SessionError> {
    use SessionAction as A;
    use SessionStatus as S;

    let (to, reason) = match (from, action) {
        (S::Disconnected, A::ConnectRequested) => (S::Connecting, "user_connect"),
        (S::Connecting, A::ConnectSucceeded) => (S::Connected, "provider_granted"),
        (S::Connecting, A::ConnectFailed) => (S::Error, "provider_denied"),
        (S::Error, A::ErrorReported) => (S::Disconnected, "error_decay"),
        // Provider events are authoritative regardless of in-flight work.
        (_, A::AccountsAssigned) => (S::Connected, "accounts_changed"),
        (_, A::AccountsCleared) => (S::Disconnected, "accounts_cleared"),
        _ => return Err(SessionError::IllegalTransition { from, action }),
    };
    Ok((to, StateTransition { from, to, reason }))
}
