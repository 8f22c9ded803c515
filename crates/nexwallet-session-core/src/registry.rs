//! Static table of known chain descriptors. Pure lookup, no I/O; adding a
//! network is a data change, not a code change.

use serde::{Deserialize, Serialize};

use crate::domain::{ChainId, InvalidChainId, NetworkInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub display_name: String,
    pub chain_id: ChainId,
    pub native_symbol: String,
    pub native_decimals: u8,
}

impl NetworkDescriptor {
    pub fn new(display_name: &str, chain_id: u64, native_symbol: &str) -> Self {
        Self {
            display_name: display_name.to_owned(),
            chain_id: ChainId(chain_id),
            native_symbol: native_symbol.to_owned(),
            native_decimals: 18,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    entries: Vec<NetworkDescriptor>,
}

impl NetworkRegistry {
    pub fn new(entries: Vec<NetworkDescriptor>) -> Self {
        Self { entries }
    }

    /// The networks the original deployment ships with.
    pub fn builtin() -> Self {
        Self::new(vec![
            NetworkDescriptor::new("Ethereum Mainnet", 0x1, "ETH"),
            NetworkDescriptor::new("Goerli Testnet", 0x5, "GoerliETH"),
            NetworkDescriptor::new("Sepolia Testnet", 0xaa36a7, "SepoliaETH"),
            NetworkDescriptor::new("Polygon Mainnet", 0x89, "MATIC"),
            NetworkDescriptor::new("Mumbai Testnet", 0x13881, "MATIC"),
        ])
    }

    pub fn resolve(&self, chain: ChainId) -> Option<&NetworkDescriptor> {
        self.entries.iter().find(|d| d.chain_id == chain)
    }

    /// Hex-string lookup; case and leading zeros are normalized by the
    /// `ChainId` parse, so `0x01` resolves the same descriptor as `0x1`.
    pub fn resolve_hex(&self, raw: &str) -> Result<Option<&NetworkDescriptor>, InvalidChainId> {
        Ok(self.resolve(ChainId::from_hex(raw)?))
    }

    /// Display metadata for a chain, falling back to `Unknown`.
    pub fn info(&self, chain: ChainId) -> NetworkInfo {
        match self.resolve(chain) {
            Some(d) => NetworkInfo {
                label: d.display_name.clone(),
                symbol: d.native_symbol.clone(),
                decimals: d.native_decimals,
            },
            None => NetworkInfo::unknown(),
        }
    }
}
