#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, U256};

use nexwallet_session_adapters::Eip1193Adapter;
use nexwallet_session_core::{
    ChainId, ClockPort, NetworkRegistry, ProviderError, SessionController,
};

#[derive(Debug, Default)]
pub struct TestClock {
    now: AtomicU64,
}

impl ClockPort for TestClock {
    fn now_secs(&self) -> Result<u64, ProviderError> {
        Ok(self.now.fetch_add(1, Ordering::SeqCst) + 1_739_750_400)
    }
}

pub type TestController = SessionController<Eip1193Adapter, TestClock>;

pub fn new_controller() -> TestController {
    SessionController::new(
        Eip1193Adapter::deterministic(),
        TestClock::default(),
        NetworkRegistry::builtin(),
    )
}

/// Controller already started against a provider with a granted account.
pub fn connected_controller() -> TestController {
    let mut controller = new_controller();
    controller
        .provider
        .debug_set_connected_accounts(vec![owner_address()])
        .expect("precondition accounts");
    controller.start().expect("start");
    assert!(controller.session().is_connected());
    controller
}

pub fn owner_address() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid owner address")
}

pub fn other_address() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid other address")
}

pub fn recipient_address() -> Address {
    "0x000000000000000000000000000000000000CAFE"
        .parse()
        .expect("valid recipient address")
}

pub fn eth(units: u64) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(18))
}

pub const MAINNET: ChainId = ChainId(0x1);
pub const POLYGON: ChainId = ChainId(0x89);
