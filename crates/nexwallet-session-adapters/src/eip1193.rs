//! EIP-1193 provider adapter.
//!
//! Two runtimes behind one `ProviderPort`: a deterministic in-memory
//! provider (default for development and tests, with injection hooks for
//! provider-pushed events) and a JSON-RPC proxy over `reqwest` that forwards
//! to a real injected provider. The production profile refuses to run
//! without the proxy runtime configured.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use alloy::primitives::{keccak256, Address, B256, U256};
use serde_json::Value;

use nexwallet_session_core::{
    ChainId, ProviderError, ProviderEvent, ProviderEventKind, ProviderPort, SubscriptionId,
};

use crate::AdapterConfig;

/// Provider error codes defined by EIP-1193 / EIP-3085.
const CODE_USER_REJECTED: i64 = 4001;
const CODE_CHAIN_NOT_ADDED: i64 = 4902;

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
    confirmation_timeout: Duration,
    confirmation_poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Reverted,
    Timeout,
}

#[derive(Debug)]
struct ProviderState {
    /// Accounts currently granted to this origin.
    accounts: Vec<Address>,
    /// Accounts the deterministic user would approve in the consent prompt.
    authorized: Vec<Address>,
    deny_connection: bool,
    deny_switch: bool,
    chain_id: ChainId,
    recognized_chains: Vec<ChainId>,
    balances: HashMap<(ChainId, Address), U256>,
    confirmation_outcome: ConfirmationOutcome,
    pending_transfers: HashMap<B256, (Address, Address, U256)>,
    transfer_nonce: u64,
    event_seq: u64,
    next_subscription: u64,
    subscriptions: HashMap<u64, Vec<ProviderEvent>>,
    /// Accounts-changed payload the provider pushes while the next consent
    /// prompt is still open; exercises latest-event-wins handling.
    emit_on_request: Option<Vec<Address>>,
    /// Chain switch the provider applies while the next consent prompt is
    /// still open.
    emit_chain_on_request: Option<ChainId>,
    connection_prompts: u64,
    transfer_attempts: u64,
}

impl Default for ProviderState {
    fn default() -> Self {
        let authorized: Address = "0x1000000000000000000000000000000000000001"
            .parse()
            .expect("valid built-in deterministic account");
        let mainnet = ChainId(0x1);
        let mut balances = HashMap::new();
        balances.insert(
            (mainnet, authorized),
            U256::from(10u8) * U256::from(10u64).pow(U256::from(18)),
        );
        Self {
            accounts: Vec::new(),
            authorized: vec![authorized],
            deny_connection: false,
            deny_switch: false,
            chain_id: mainnet,
            recognized_chains: vec![
                ChainId(0x1),
                ChainId(0x5),
                ChainId(0xaa36a7),
                ChainId(0x89),
                ChainId(0x13881),
            ],
            balances,
            confirmation_outcome: ConfirmationOutcome::Confirmed,
            pending_transfers: HashMap::new(),
            transfer_nonce: 0,
            event_seq: 0,
            next_subscription: 0,
            subscriptions: HashMap::new(),
            emit_on_request: None,
            emit_chain_on_request: None,
            connection_prompts: 0,
            transfer_attempts: 0,
        }
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(AdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = Duration::from_millis(config.provider_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                    confirmation_timeout: Duration::from_millis(config.confirmation_timeout_ms),
                    confirmation_poll_interval: Duration::from_millis(
                        config.confirmation_poll_interval_ms,
                    ),
                }),
                Err(e) => ProviderMode::Disabled(format!(
                    "failed to initialize EIP-1193 proxy client: {e}"
                )),
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    /// Deterministic in-memory provider regardless of the environment.
    pub fn deterministic() -> Self {
        Self {
            mode: ProviderMode::Deterministic,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    fn check_mode(&self) -> Result<(), ProviderError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(ProviderError::Unavailable(reason.clone()));
        }
        Ok(())
    }

    fn locked(&self) -> Result<MutexGuard<'_, ProviderState>, ProviderError> {
        self.state
            .lock()
            .map_err(|e| ProviderError::Transport(format!("provider lock poisoned: {e}")))
    }

    // -- deterministic test hooks -------------------------------------------

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), ProviderError> {
        let mut g = self.locked()?;
        g.accounts = accounts.clone();
        record_event(&mut g, ProviderEventKind::AccountsChanged(accounts));
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain: ChainId) -> Result<(), ProviderError> {
        let mut g = self.locked()?;
        g.chain_id = chain;
        record_event(&mut g, ProviderEventKind::ChainChanged(chain));
        Ok(())
    }

    /// Preconditions an already-granted account without emitting an event,
    /// mirroring a returning origin at startup.
    pub fn debug_set_connected_accounts(&self, accounts: Vec<Address>) -> Result<(), ProviderError> {
        self.locked()?.accounts = accounts;
        Ok(())
    }

    pub fn debug_set_authorized_accounts(&self, accounts: Vec<Address>) -> Result<(), ProviderError> {
        self.locked()?.authorized = accounts;
        Ok(())
    }

    pub fn debug_deny_connection(&self, deny: bool) -> Result<(), ProviderError> {
        self.locked()?.deny_connection = deny;
        Ok(())
    }

    pub fn debug_deny_switch(&self, deny: bool) -> Result<(), ProviderError> {
        self.locked()?.deny_switch = deny;
        Ok(())
    }

    pub fn debug_set_balance(
        &self,
        chain: ChainId,
        account: Address,
        value: U256,
    ) -> Result<(), ProviderError> {
        self.locked()?.balances.insert((chain, account), value);
        Ok(())
    }

    pub fn debug_set_confirmation_outcome(
        &self,
        outcome: ConfirmationOutcome,
    ) -> Result<(), ProviderError> {
        self.locked()?.confirmation_outcome = outcome;
        Ok(())
    }

    /// Queues an accounts-changed push that fires while the next consent
    /// prompt is pending.
    pub fn debug_emit_accounts_changed_on_request(
        &self,
        accounts: Vec<Address>,
    ) -> Result<(), ProviderError> {
        self.locked()?.emit_on_request = Some(accounts);
        Ok(())
    }

    /// Queues a chain switch that the wallet applies while the next consent
    /// prompt is pending.
    pub fn debug_emit_chain_changed_on_request(
        &self,
        chain: ChainId,
    ) -> Result<(), ProviderError> {
        self.locked()?.emit_chain_on_request = Some(chain);
        Ok(())
    }

    pub fn debug_connection_prompts(&self) -> Result<u64, ProviderError> {
        Ok(self.locked()?.connection_prompts)
    }

    pub fn debug_transfer_attempts(&self) -> Result<u64, ProviderError> {
        Ok(self.locked()?.transfer_attempts)
    }

    // -- proxy runtime ------------------------------------------------------

    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => {
                return Err(ProviderError::Unavailable(reason.clone()))
            }
            ProviderMode::Deterministic => {
                return Err(ProviderError::Transport(
                    "eip1193 proxy runtime not enabled".to_owned(),
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| ProviderError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response.json().map_err(|e| {
            ProviderError::Transport(format!("eip1193 proxy json decode failed: {e}"))
        })?;
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "eip1193 proxy status {status}: {body}"
            )));
        }
        if let Some(err) = body.get("error") {
            return Err(map_provider_error(err));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| ProviderError::Transport("eip1193 proxy missing result".to_owned()))
    }

    fn proxy_accounts(&self, method: &str) -> Result<Vec<Address>, ProviderError> {
        let result = self.proxy_call(method, serde_json::json!([]))?;
        let arr = result
            .as_array()
            .ok_or_else(|| ProviderError::Transport(format!("{method}: array expected")))?;
        let mut accounts = Vec::with_capacity(arr.len());
        for item in arr {
            let raw = item
                .as_str()
                .ok_or_else(|| ProviderError::Transport(format!("{method}: string expected")))?;
            let parsed: Address = raw
                .parse()
                .map_err(|e| ProviderError::Validation(format!("invalid account address: {e}")))?;
            accounts.push(parsed);
        }
        // Snapshot deltas surface as synthesized events so subscribers see
        // account changes even when the proxy cannot push.
        let mut g = self.locked()?;
        if g.accounts != accounts {
            g.accounts = accounts.clone();
            record_event(&mut g, ProviderEventKind::AccountsChanged(accounts.clone()));
        }
        Ok(accounts)
    }
}

impl ProviderPort for Eip1193Adapter {
    fn connected_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            return self.proxy_accounts("eth_accounts");
        }
        Ok(self.locked()?.accounts.clone())
    }

    fn request_connection(&self) -> Result<Address, ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let accounts = self.proxy_accounts("eth_requestAccounts")?;
            return accounts
                .first()
                .copied()
                .ok_or(ProviderError::UserRejected);
        }

        let mut g = self.locked()?;
        g.connection_prompts += 1;
        if let Some(accounts) = g.emit_on_request.take() {
            g.accounts = accounts.clone();
            record_event(&mut g, ProviderEventKind::AccountsChanged(accounts));
        }
        if let Some(chain) = g.emit_chain_on_request.take() {
            g.chain_id = chain;
            record_event(&mut g, ProviderEventKind::ChainChanged(chain));
        }
        if g.deny_connection {
            return Err(ProviderError::UserRejected);
        }
        let granted = g.authorized.first().copied().ok_or(ProviderError::UserRejected)?;
        g.accounts = vec![granted];
        Ok(granted)
    }

    fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_chainId", serde_json::json!([]))?;
            let raw = result.as_str().ok_or_else(|| {
                ProviderError::Transport("eth_chainId must return a hex string".to_owned())
            })?;
            let chain = ChainId::from_hex(raw)
                .map_err(|e| ProviderError::Validation(e.to_string()))?;
            let mut g = self.locked()?;
            if g.chain_id != chain {
                g.chain_id = chain;
                record_event(&mut g, ProviderEventKind::ChainChanged(chain));
            }
            return Ok(chain);
        }
        Ok(self.locked()?.chain_id)
    }

    fn native_balance(&self, account: Address) -> Result<U256, ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call(
                "eth_getBalance",
                serde_json::json!([account.to_string(), "latest"]),
            )?;
            let raw = result.as_str().ok_or_else(|| {
                ProviderError::Transport("eth_getBalance must return a hex string".to_owned())
            })?;
            return U256::from_str_radix(raw.trim_start_matches("0x"), 16)
                .map_err(|e| ProviderError::Validation(format!("invalid balance hex: {e}")));
        }
        let g = self.locked()?;
        let chain = g.chain_id;
        Ok(g.balances.get(&(chain, account)).copied().unwrap_or_default())
    }

    fn request_chain_switch(&self, chain: ChainId) -> Result<(), ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_call(
                "wallet_switchEthereumChain",
                serde_json::json!([{ "chainId": chain.as_hex() }]),
            )?;
            return Ok(());
        }

        let mut g = self.locked()?;
        if !g.recognized_chains.contains(&chain) {
            return Err(ProviderError::NotRecognized);
        }
        if g.deny_switch {
            return Err(ProviderError::UserRejected);
        }
        g.chain_id = chain;
        record_event(&mut g, ProviderEventKind::ChainChanged(chain));
        Ok(())
    }

    fn send_native_transfer(&self, to: Address, value: U256) -> Result<B256, ProviderError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let from = self
                .locked()?
                .accounts
                .first()
                .copied()
                .ok_or_else(|| ProviderError::Validation("no connected account".to_owned()))?;
            let result = self.proxy_call(
                "eth_sendTransaction",
                serde_json::json!([{
                    "from": from.to_string(),
                    "to": to.to_string(),
                    "value": format!("0x{value:x}"),
                }]),
            )?;
            let hash = result.as_str().ok_or_else(|| {
                ProviderError::Transport("eth_sendTransaction must return a tx hash".to_owned())
            })?;
            return hash
                .parse()
                .map_err(|e| ProviderError::Validation(format!("invalid tx hash: {e}")));
        }

        let mut g = self.locked()?;
        g.transfer_attempts += 1;
        let from = g
            .accounts
            .first()
            .copied()
            .ok_or_else(|| ProviderError::Validation("no connected account".to_owned()))?;
        g.transfer_nonce += 1;
        let mut seed = Vec::with_capacity(20 + 20 + 32 + 8);
        seed.extend_from_slice(from.as_slice());
        seed.extend_from_slice(to.as_slice());
        seed.extend_from_slice(&value.to_be_bytes::<32>());
        seed.extend_from_slice(&g.transfer_nonce.to_be_bytes());
        let hash = keccak256(seed);
        g.pending_transfers.insert(hash, (from, to, value));
        Ok(hash)
    }

    fn await_confirmation(&self, hash: B256) -> Result<(), ProviderError> {
        self.check_mode()?;
        if let ProviderMode::Proxy(proxy) = &self.mode {
            let deadline = Instant::now() + proxy.confirmation_timeout;
            loop {
                let receipt = self.proxy_call(
                    "eth_getTransactionReceipt",
                    serde_json::json!([hash.to_string()]),
                )?;
                if !receipt.is_null() {
                    let status = receipt.get("status").and_then(|v| v.as_str());
                    if status == Some("0x0") {
                        return Err(ProviderError::Reverted);
                    }
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(ProviderError::Timeout);
                }
                std::thread::sleep(proxy.confirmation_poll_interval);
            }
        }

        let mut g = self.locked()?;
        let (from, to, value) = g
            .pending_transfers
            .remove(&hash)
            .ok_or_else(|| ProviderError::Validation(format!("unknown transaction: {hash}")))?;
        match g.confirmation_outcome {
            ConfirmationOutcome::Confirmed => {
                let chain = g.chain_id;
                let debit = g.balances.entry((chain, from)).or_default();
                *debit = debit.saturating_sub(value);
                let credit = g.balances.entry((chain, to)).or_default();
                *credit = credit.saturating_add(value);
                Ok(())
            }
            ConfirmationOutcome::Reverted => Err(ProviderError::Reverted),
            ConfirmationOutcome::Timeout => Err(ProviderError::Timeout),
        }
    }

    fn subscribe(&self) -> Result<SubscriptionId, ProviderError> {
        self.check_mode()?;
        let mut g = self.locked()?;
        let id = g.next_subscription;
        g.next_subscription += 1;
        g.subscriptions.insert(id, Vec::new());
        Ok(SubscriptionId(id))
    }

    fn drain_events(&self, subscription: SubscriptionId) -> Result<Vec<ProviderEvent>, ProviderError> {
        self.check_mode()?;
        let mut g = self.locked()?;
        let buffer = g
            .subscriptions
            .get_mut(&subscription.0)
            .ok_or_else(|| ProviderError::Validation("unknown subscription".to_owned()))?;
        Ok(std::mem::take(buffer))
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), ProviderError> {
        self.check_mode()?;
        self.locked()?.subscriptions.remove(&subscription.0);
        Ok(())
    }
}

fn record_event(state: &mut ProviderState, kind: ProviderEventKind) {
    state.event_seq += 1;
    let event = ProviderEvent {
        sequence: state.event_seq,
        kind,
    };
    for buffer in state.subscriptions.values_mut() {
        buffer.push(event.clone());
    }
}

fn map_provider_error(err: &Value) -> ProviderError {
    let code = err.get("code").and_then(|v| v.as_i64());
    match code {
        Some(CODE_USER_REJECTED) => ProviderError::UserRejected,
        Some(CODE_CHAIN_NOT_ADDED) => ProviderError::NotRecognized,
        _ => ProviderError::Transport(format!("eip1193 proxy returned error: {err}")),
    }
}
