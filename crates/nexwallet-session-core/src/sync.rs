//! Balance synchronizer: reconciles the session's balance and network
//! metadata with the adapter's current truth.

use crate::domain::Session;
use crate::ports::{ProviderError, ProviderPort};
use crate::registry::NetworkRegistry;
use crate::units::format_units;

/// Refreshes `session` from the provider. No-op unless the session is
/// connected; idempotent and safe to invoke after connect, chain change,
/// transfer confirmation, or on explicit user request.
pub fn refresh_session<P: ProviderPort>(
    session: &mut Session,
    provider: &P,
    registry: &NetworkRegistry,
) -> Result<(), ProviderError> {
    if !session.is_connected() {
        return Ok(());
    }
    let Some(account) = session.account else {
        return Ok(());
    };

    // The session borrow is exclusive for the whole fetch, so the fetched
    // values always belong to `account`. Staleness across suspending calls
    // is the controller's concern (its applied-event marker).
    let chain = provider.chain_id()?;
    let raw = provider.native_balance(account)?;

    let info = registry.info(chain);
    let balance = format_units(raw, info.decimals);
    tracing::debug!(%account, chain = %chain, %balance, symbol = %info.symbol, "session refreshed");
    session.chain_id = Some(chain);
    session.balance = Some(balance);
    session.network = Some(info);
    Ok(())
}
