mod common;

use nexwallet_session_adapters::ConfirmationOutcome;
use nexwallet_session_core::{TransferError, ValidationError};

use common::{connected_controller, new_controller, owner_address, recipient_address};

#[test]
fn confirmed_transfer_yields_record_and_refreshes_balance() {
    let mut controller = connected_controller();

    let record = controller
        .send_transfer(&recipient_address().to_string(), "2.5")
        .expect("transfer");

    assert_eq!(record.from, owner_address());
    assert_eq!(record.to, recipient_address());
    assert_eq!(record.value, "2.5");

    let session = controller.session();
    assert_eq!(session.balance.as_deref(), Some("7.5"));
    assert_eq!(controller.history().to_vec(), vec![record]);
}

#[test]
fn history_is_ordered_newest_first() {
    let mut controller = connected_controller();

    let first = controller
        .send_transfer(&recipient_address().to_string(), "1")
        .expect("first transfer");
    let second = controller
        .send_transfer(&recipient_address().to_string(), "2")
        .expect("second transfer");

    let history = controller.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], second);
    assert_eq!(history[1], first);
    assert!(history[0].timestamp_secs > history[1].timestamp_secs);
}

#[test]
fn malformed_recipient_never_reaches_the_provider() {
    let mut controller = connected_controller();

    for bad in [
        "",
        "0x123",
        "1000000000000000000000000000000000000001",
        "0x10000000000000000000000000000000000000zz",
        "0x10000000000000000000000000000000000000011",
    ] {
        let err = controller.send_transfer(bad, "1").expect_err("bad recipient");
        assert!(
            matches!(
                err,
                TransferError::Validation(ValidationError::BadRecipient(_))
            ),
            "expected {bad:?} to fail recipient validation"
        );
    }
    assert_eq!(controller.provider.debug_transfer_attempts().expect("attempts"), 0);
}

#[test]
fn amount_exceeding_balance_fails_before_any_provider_call() {
    let mut controller = connected_controller();

    let err = controller
        .send_transfer(&recipient_address().to_string(), "10.000000000000000001")
        .expect_err("over balance");
    assert!(matches!(
        err,
        TransferError::Validation(ValidationError::InsufficientBalance { .. })
    ));
    assert_eq!(controller.provider.debug_transfer_attempts().expect("attempts"), 0);
}

#[test]
fn non_positive_or_malformed_amounts_are_rejected() {
    let mut controller = connected_controller();

    for bad in ["0", "0.0", "", "abc", "-1", "1.2.3"] {
        let err = controller
            .send_transfer(&recipient_address().to_string(), bad)
            .expect_err("bad amount");
        assert!(
            matches!(err, TransferError::Validation(ValidationError::BadAmount(_))),
            "expected {bad:?} to fail amount validation"
        );
    }
    assert_eq!(controller.provider.debug_transfer_attempts().expect("attempts"), 0);
}

#[test]
fn transfer_requires_a_connected_session() {
    let mut controller = new_controller();
    controller.start().expect("start");

    let err = controller
        .send_transfer(&recipient_address().to_string(), "1")
        .expect_err("not connected");
    assert!(matches!(
        err,
        TransferError::Validation(ValidationError::NotConnected)
    ));
}

#[test]
fn reverted_transfer_leaves_session_untouched() {
    let mut controller = connected_controller();
    controller
        .provider
        .debug_set_confirmation_outcome(ConfirmationOutcome::Reverted)
        .expect("outcome");
    let before = controller.session();

    let err = controller
        .send_transfer(&recipient_address().to_string(), "1")
        .expect_err("reverted");
    assert!(matches!(err, TransferError::Reverted));

    // A failed transfer is not evidence of a disconnection.
    assert_eq!(controller.session(), before);
    assert!(controller.history().is_empty());
}

#[test]
fn timed_out_transfer_leaves_session_untouched() {
    let mut controller = connected_controller();
    controller
        .provider
        .debug_set_confirmation_outcome(ConfirmationOutcome::Timeout)
        .expect("outcome");
    let before = controller.session();

    let err = controller
        .send_transfer(&recipient_address().to_string(), "1")
        .expect_err("timeout");
    assert!(matches!(err, TransferError::Timeout));
    assert_eq!(controller.session(), before);
    assert!(controller.history().is_empty());
}
