pub mod clock;
pub mod config;
pub mod eip1193;

pub use clock::SystemClockAdapter;
pub use config::{AdapterConfig, RuntimeProfile};
pub use eip1193::{ConfirmationOutcome, Eip1193Adapter};
