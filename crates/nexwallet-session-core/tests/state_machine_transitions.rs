use nexwallet_session_core::{session_transition, SessionAction, SessionStatus};

#[test]
fn connect_happy_path_transitions() {
    let (s1, t1) = session_transition(SessionStatus::Disconnected, SessionAction::ConnectRequested)
        .expect("disconnected -> connecting");
    assert_eq!(s1, SessionStatus::Connecting);
    assert_eq!(t1.reason, "user_connect");

    let (s2, _) =
        session_transition(s1, SessionAction::ConnectSucceeded).expect("connecting -> connected");
    assert_eq!(s2, SessionStatus::Connected);
}

#[test]
fn connect_failure_decays_to_disconnected() {
    let (s1, _) = session_transition(SessionStatus::Disconnected, SessionAction::ConnectRequested)
        .expect("disconnected -> connecting");
    let (s2, t2) =
        session_transition(s1, SessionAction::ConnectFailed).expect("connecting -> error");
    assert_eq!(s2, SessionStatus::Error);
    assert_eq!(t2.reason, "provider_denied");

    let (s3, t3) =
        session_transition(s2, SessionAction::ErrorReported).expect("error -> disconnected");
    assert_eq!(s3, SessionStatus::Disconnected);
    assert_eq!(t3.reason, "error_decay");
}

#[test]
fn illegal_transition_is_rejected() {
    let err = session_transition(SessionStatus::Connected, SessionAction::ConnectRequested)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal session transition"));

    let err = session_transition(SessionStatus::Disconnected, SessionAction::ConnectSucceeded)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal session transition"));
}

#[test]
fn account_events_are_legal_from_every_state() {
    for from in [
        SessionStatus::Disconnected,
        SessionStatus::Connecting,
        SessionStatus::Connected,
        SessionStatus::Error,
    ] {
        let (assigned, _) =
            session_transition(from, SessionAction::AccountsAssigned).expect("assign");
        assert_eq!(assigned, SessionStatus::Connected);

        let (cleared, _) = session_transition(from, SessionAction::AccountsCleared).expect("clear");
        assert_eq!(cleared, SessionStatus::Disconnected);
    }
}
