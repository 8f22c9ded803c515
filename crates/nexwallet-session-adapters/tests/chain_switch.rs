mod common;

use nexwallet_session_core::{ChainId, ProviderError, SessionError, SessionStatus};

use common::{connected_controller, eth, new_controller, owner_address, MAINNET, POLYGON};

#[test]
fn chain_switch_is_applied_only_through_the_provider_event() {
    let mut controller = connected_controller();
    controller
        .provider
        .debug_set_balance(POLYGON, owner_address(), eth(5))
        .expect("seed polygon balance");

    controller.switch_network(POLYGON).expect("switch");

    // The switch call itself mutates nothing; the session still reflects
    // the prior chain until the ChainChanged event is pumped.
    let before = controller.session();
    assert_eq!(before.chain_id, Some(MAINNET));
    assert_eq!(before.network.as_ref().map(|n| n.symbol.as_str()), Some("ETH"));

    let after = controller.pump_events().expect("pump");
    assert_eq!(after.chain_id, Some(POLYGON));
    assert_eq!(after.network.as_ref().map(|n| n.symbol.as_str()), Some("MATIC"));
    assert_eq!(
        after.network.as_ref().map(|n| n.label.as_str()),
        Some("Polygon Mainnet")
    );
    // The balance shown under the new symbol is the new chain's balance.
    assert_eq!(after.balance.as_deref(), Some("5"));
}

#[test]
fn unrecognized_chain_is_surfaced_distinctly_and_leaves_session_unchanged() {
    let mut controller = connected_controller();
    let before = controller.session();

    let err = controller
        .switch_network(ChainId(0x999))
        .expect_err("chain not configured");
    assert!(matches!(
        err,
        SessionError::Provider(ProviderError::NotRecognized)
    ));

    let after = controller.pump_events().expect("pump");
    assert_eq!(after, before);
}

#[test]
fn rejected_switch_leaves_session_unchanged() {
    let mut controller = connected_controller();
    controller.provider.debug_deny_switch(true).expect("deny");
    let before = controller.session();

    let err = controller.switch_network(POLYGON).expect_err("rejected");
    assert!(matches!(
        err,
        SessionError::Provider(ProviderError::UserRejected)
    ));
    assert_eq!(controller.pump_events().expect("pump"), before);
}

#[test]
fn switching_requires_a_connected_session() {
    let mut controller = new_controller();
    controller.start().expect("start");

    let err = controller.switch_network(POLYGON).expect_err("not connected");
    assert!(matches!(err, SessionError::NotConnected));
}

#[test]
fn chain_change_while_disconnected_is_ignored() {
    let mut controller = new_controller();
    controller.start().expect("start");

    controller
        .provider
        .debug_inject_chain_changed(POLYGON)
        .expect("inject");
    let session = controller.pump_events().expect("pump");

    assert_eq!(session.status, SessionStatus::Disconnected);
    assert!(session.chain_id.is_none());
    assert!(session.network.is_none());
}

#[test]
fn unknown_chain_event_shows_unknown_metadata() {
    let mut controller = connected_controller();

    controller
        .provider
        .debug_inject_chain_changed(ChainId(0x4242))
        .expect("inject");
    let session = controller.pump_events().expect("pump");

    assert_eq!(session.chain_id, Some(ChainId(0x4242)));
    assert_eq!(
        session.network.as_ref().map(|n| n.label.as_str()),
        Some("Unknown")
    );
    // No balance was seeded for this chain.
    assert_eq!(session.balance.as_deref(), Some("0"));
}
