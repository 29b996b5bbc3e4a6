use crate::models::network_config::{NetworkConfig, NetworkId};

/// Network whose wallets may request faucet funds.
pub const TEST_NETWORK: NetworkId = NetworkId::BaseSepolia;

/// Chain where lending actions target the full pool interface; every other
/// chain uses the L2 pool interface.
pub const PRIMARY_LENDING_CHAIN_ID: u64 = 1;

/// Get network configuration for a network id
pub fn get_network_config(network: NetworkId) -> NetworkConfig {
    match network {
        NetworkId::BaseSepolia => NetworkConfig {
            network_id: network,
            chain_id: 84532,
            name: "Base Sepolia".to_string(),
            rpc_url: "https://sepolia.base.org".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: "https://sepolia.basescan.org".to_string(),
        },
        NetworkId::BaseMainnet => NetworkConfig {
            network_id: network,
            chain_id: 8453,
            name: "Base Mainnet".to_string(),
            rpc_url: "https://mainnet.base.org".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: "https://basescan.org".to_string(),
        },
        NetworkId::EthereumMainnet => NetworkConfig {
            network_id: network,
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            rpc_url: "https://eth.llamarpc.com".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: "https://etherscan.io".to_string(),
        },
        NetworkId::EthereumSepolia => NetworkConfig {
            network_id: network,
            chain_id: 11155111,
            name: "Ethereum Sepolia".to_string(),
            rpc_url: "https://rpc.sepolia.org".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: "https://sepolia.etherscan.io".to_string(),
        },
        NetworkId::ArbitrumMainnet => NetworkConfig {
            network_id: network,
            chain_id: 42161,
            name: "Arbitrum One".to_string(),
            rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
            symbol: "ETH".to_string(),
            block_explorer: "https://arbiscan.io".to_string(),
        },
        NetworkId::PolygonMainnet => NetworkConfig {
            network_id: network,
            chain_id: 137,
            name: "Polygon Mainnet".to_string(),
            rpc_url: "https://polygon-rpc.com".to_string(),
            symbol: "MATIC".to_string(),
            block_explorer: "https://polygonscan.com".to_string(),
        },
    }
}
