//! Session controller: owns the session state machine and is its sole
//! mutator. Reacts to provider-pushed events and to explicit user actions;
//! readers get copy-on-read snapshots.

use alloy::primitives::Address;

use crate::domain::{ChainId, Session, TransactionRecord};
use crate::ports::{ClockPort, ProviderEventKind, ProviderPort, SubscriptionId};
use crate::registry::NetworkRegistry;
use crate::state_machine::{
    session_transition, SessionAction, SessionError, SessionStatus, StateTransition,
};
use crate::submit::{self, TransferError};
use crate::sync::refresh_session;

pub struct SessionController<P, C>
where
    P: ProviderPort,
    C: ClockPort,
{
    pub provider: P,
    pub clock: C,
    registry: NetworkRegistry,
    session: Session,
    subscription: Option<SubscriptionId>,
    /// Bumped once per applied accounts-changed event; lets an in-flight
    /// connect detect that the provider has superseded it. Chain changes do
    /// not count: they carry no account identity and a pending connect
    /// result still applies after one.
    account_events_applied: u64,
    /// Confirmed transfers, newest first.
    history: Vec<TransactionRecord>,
}

impl<P, C> SessionController<P, C>
where
    P: ProviderPort,
    C: ClockPort,
{
    pub fn new(provider: P, clock: C, registry: NetworkRegistry) -> Self {
        Self {
            provider,
            clock,
            registry,
            session: Session::disconnected(),
            subscription: None,
            account_events_applied: 0,
            history: Vec::new(),
        }
    }

    /// Copy-on-read session snapshot.
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Acquires the provider event subscription and reconnects silently if
    /// the provider already lists granted accounts. No user prompt.
    pub fn start(&mut self) -> Result<Session, SessionError> {
        if self.subscription.is_none() {
            self.subscription = Some(self.provider.subscribe()?);
        }
        let accounts = self.provider.connected_accounts()?;
        if let Some(account) = accounts.first().copied() {
            tracing::info!(%account, "silently reconnecting to already-granted account");
            self.assign_account(account)?;
        }
        Ok(self.session())
    }

    /// Releases the event subscription; no callback outlives the controller.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            if let Err(err) = self.provider.unsubscribe(subscription) {
                tracing::warn!(%err, "failed to release provider subscription");
            }
        }
    }

    /// Explicit user-initiated connection attempt.
    ///
    /// Account events that arrive while the consent prompt is pending are
    /// authoritative; a superseded call result is discarded. Chain events
    /// never supersede a connect. On rejection or
    /// provider absence the session passes through `Error` and decays back
    /// to `Disconnected`; the user may retry indefinitely.
    pub fn connect(&mut self) -> Result<Session, SessionError> {
        if self.subscription.is_some() {
            self.pump_events()?;
        }
        if self.session.is_connected() {
            return Ok(self.session());
        }

        let (next, transition) =
            session_transition(self.session.status, SessionAction::ConnectRequested)?;
        trace_transition(&transition);
        self.session.status = next;

        let marker = self.account_events_applied;
        let result = self.provider.request_connection();

        if self.subscription.is_some() {
            self.apply_pending_events()?;
        }
        if self.account_events_applied != marker {
            tracing::info!("provider events superseded the in-flight connect attempt");
            return Ok(self.session());
        }

        match result {
            Ok(account) => {
                let (next, transition) =
                    session_transition(self.session.status, SessionAction::ConnectSucceeded)?;
                trace_transition(&transition);
                self.session.status = next;
                self.session.account = Some(account);
                if let Err(err) = refresh_session(&mut self.session, &self.provider, &self.registry)
                {
                    tracing::warn!(%err, "session refresh failed after connect; disconnecting");
                    self.session = Session::disconnected();
                    return Err(err.into());
                }
                tracing::info!(%account, "wallet connected");
                Ok(self.session())
            }
            Err(err) => {
                let (next, transition) =
                    session_transition(self.session.status, SessionAction::ConnectFailed)?;
                trace_transition(&transition);
                self.session.status = next;
                tracing::warn!(error = %err, "wallet connection failed");
                let (_, transition) =
                    session_transition(self.session.status, SessionAction::ErrorReported)?;
                trace_transition(&transition);
                self.session = Session::disconnected();
                Err(err.into())
            }
        }
    }

    /// Drains buffered provider events and applies them in emission order.
    pub fn pump_events(&mut self) -> Result<Session, SessionError> {
        if self.subscription.is_none() {
            return Err(SessionError::NotStarted);
        }
        self.apply_pending_events()?;
        Ok(self.session())
    }

    /// Asks the provider to switch networks. Session state is not mutated
    /// here; the provider's subsequent `ChainChanged` event is the sole
    /// trigger, so the switch is eventually consistent.
    pub fn switch_network(&mut self, chain: ChainId) -> Result<(), SessionError> {
        if !self.session.is_connected() {
            return Err(SessionError::NotConnected);
        }
        self.provider.request_chain_switch(chain).map_err(|err| {
            tracing::warn!(%chain, %err, "chain switch request failed");
            SessionError::Provider(err)
        })
    }

    /// Manual balance/network refresh.
    pub fn refresh(&mut self) -> Result<Session, SessionError> {
        refresh_session(&mut self.session, &self.provider, &self.registry)?;
        Ok(self.session())
    }

    /// Validates and submits a native-asset transfer, recording it in the
    /// history and refreshing the balance once confirmed. Failures leave
    /// session state untouched.
    pub fn send_transfer(
        &mut self,
        recipient: &str,
        amount: &str,
    ) -> Result<TransactionRecord, TransferError> {
        let record = submit::submit(&self.session, &self.provider, &self.clock, recipient, amount)?;
        self.history.insert(0, record.clone());
        if let Err(err) = refresh_session(&mut self.session, &self.provider, &self.registry) {
            tracing::warn!(%err, "post-transfer refresh failed");
        }
        Ok(record)
    }

    fn apply_pending_events(&mut self) -> Result<(), SessionError> {
        let Some(subscription) = self.subscription else {
            return Ok(());
        };
        let events = self.provider.drain_events(subscription)?;
        for event in events {
            tracing::debug!(sequence = event.sequence, "applying provider event");
            match event.kind {
                ProviderEventKind::AccountsChanged(accounts) => {
                    match accounts.first().copied() {
                        Some(account) => {
                            // Degraded assignment already logged and resolved
                            // into the Disconnected fallback state.
                            let _ = self.assign_account(account);
                        }
                        None => self.clear_session(),
                    }
                    self.account_events_applied += 1;
                }
                ProviderEventKind::ChainChanged(chain) => self.apply_chain_change(chain),
            }
        }
        Ok(())
    }

    /// Moves the session to `Connected` with `account` and populates chain,
    /// network, and balance. Falls back to `Disconnected` if the provider
    /// cannot supply the rest of the session.
    fn assign_account(&mut self, account: Address) -> Result<(), SessionError> {
        let (next, transition) =
            session_transition(self.session.status, SessionAction::AccountsAssigned)?;
        trace_transition(&transition);
        self.session.status = next;
        self.session.account = Some(account);
        self.session.balance = None;
        if let Err(err) = refresh_session(&mut self.session, &self.provider, &self.registry) {
            tracing::warn!(%account, %err, "could not populate session for account; disconnecting");
            self.session = Session::disconnected();
            return Err(err.into());
        }
        Ok(())
    }

    fn apply_chain_change(&mut self, chain: ChainId) {
        if !self.session.is_connected() {
            tracing::debug!(%chain, "ignoring chain change while not connected");
            return;
        }
        // Clear the balance before exposing the new chain's metadata so the
        // old amount is never shown under the new symbol.
        self.session.balance = None;
        self.session.chain_id = Some(chain);
        self.session.network = Some(self.registry.info(chain));
        if let Err(err) = refresh_session(&mut self.session, &self.provider, &self.registry) {
            tracing::warn!(%chain, %err, "balance refresh failed after chain change");
        }
    }

    fn clear_session(&mut self) {
        if self.session.status != SessionStatus::Disconnected {
            tracing::info!("provider cleared accounts; disconnecting session");
        }
        self.session = Session::disconnected();
    }
}

fn trace_transition(transition: &StateTransition) {
    tracing::debug!(
        from = ?transition.from,
        to = ?transition.to,
        reason = transition.reason,
        "session transition"
    );
}
