use std::{fmt, str::FromStr};

use ethers::types::H256;
use serde::{Deserialize, Serialize};

use crate::errors::CustomError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_id: NetworkId,
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub symbol: String,
    pub block_explorer: String,
}

impl NetworkConfig {
    pub fn transaction_link(&self, hash: H256) -> String {
        format!("{}/tx/{:?}", self.block_explorer.trim_end_matches('/'), hash)
    }
}

/// Networks a custodial wallet can live on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    #[default]
    BaseSepolia,
    BaseMainnet,
    EthereumMainnet,
    EthereumSepolia,
    ArbitrumMainnet,
    PolygonMainnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 6] = [
        NetworkId::BaseSepolia,
        NetworkId::BaseMainnet,
        NetworkId::EthereumMainnet,
        NetworkId::EthereumSepolia,
        NetworkId::ArbitrumMainnet,
        NetworkId::PolygonMainnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::BaseSepolia => "base-sepolia",
            NetworkId::BaseMainnet => "base-mainnet",
            NetworkId::EthereumMainnet => "ethereum-mainnet",
            NetworkId::EthereumSepolia => "ethereum-sepolia",
            NetworkId::ArbitrumMainnet => "arbitrum-mainnet",
            NetworkId::PolygonMainnet => "polygon-mainnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkId::ALL
            .into_iter()
            .find(|network| network.as_str() == s.trim())
            .ok_or_else(|| CustomError::UnsupportedNetworkError(s.to_string()))
    }
}
