use nexwallet_session_core::{ClockPort, ProviderError};

#[derive(Debug, Clone, Default)]
pub struct SystemClockAdapter;

impl ClockPort for SystemClockAdapter {
    fn now_secs(&self) -> Result<u64, ProviderError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| ProviderError::Transport(format!("time error: {e}")))?;
        Ok(now.as_secs())
    }
}
