use std::sync::Arc;

use ethers::providers::{Http, Middleware, Provider};

use crate::{
    errors::CustomError,
    models::network_config::{NetworkConfig, NetworkId},
};

use super::network_config::get_network_config;

#[derive(Clone, Debug)]
pub struct BlockchainClient {
    pub provider: Arc<Provider<Http>>,
    pub config: NetworkConfig,
}

impl BlockchainClient {
    /// Connect to `network`, optionally through an alternate RPC endpoint.
    pub async fn new(network: NetworkId, rpc_override: Option<&str>) -> Result<Self, CustomError> {
        let mut config = get_network_config(network);
        if let Some(url) = rpc_override {
            config.rpc_url = url.to_string();
        }
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| CustomError::NetworkError(e.to_string()))?;

        // Verify connection and chain ID
        let connected_chain_id = provider.get_chainid().await?;
        if connected_chain_id.as_u64() != config.chain_id {
            return Err(CustomError::NetworkError(format!(
                "RPC at {} serves chain {} but {} is chain {}",
                config.rpc_url, connected_chain_id, config.name, config.chain_id
            )));
        }

        Ok(Self {
            provider: Arc::new(provider),
            config,
        })
    }
}
