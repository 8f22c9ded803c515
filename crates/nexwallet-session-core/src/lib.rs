pub mod controller;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod state_machine;
pub mod submit;
pub mod sync;
pub mod units;

pub use controller::SessionController;
pub use domain::{
    short_address, ChainId, InvalidChainId, NetworkInfo, PendingTransfer, Session,
    TransactionRecord, TransferState,
};
pub use ports::{
    ClockPort, ProviderError, ProviderEvent, ProviderEventKind, ProviderPort, SubscriptionId,
};
pub use registry::{NetworkDescriptor, NetworkRegistry};
pub use state_machine::{
    session_transition, SessionAction, SessionError, SessionStatus, StateTransition,
};
pub use submit::{TransferError, ValidationError};
pub use sync::refresh_session;
pub use units::{format_units, parse_units, UnitsError};
