use std::{collections::HashMap, str::FromStr, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    core::rand::thread_rng,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, TransactionRequest, H256, U256, U64},
    utils::hex,
};
use log::{debug, info};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    config::{ApiKeyPair, Config, CustodyOptions},
    errors::CustomError,
    models::{
        intent::Receipt,
        wallet::{ConfirmationPolicy, CreateWalletRequest, FaucetTransaction, WalletData, WalletHandle},
    },
};

use super::{blockchain_service::BlockchainClient, network_config::get_network_config};

/// A contract call ready to be signed and broadcast.
#[derive(Clone, Debug)]
pub struct ContractInvocation {
    pub contract: Address,
    pub method: String,
    pub abi: Arc<Abi>,
    pub args: Vec<Token>,
    pub value: Option<U256>,
}

impl ContractInvocation {
    /// Encode against the overload of `method` the arguments fit.
    pub fn encode(&self) -> Result<Bytes, CustomError> {
        let overloads = self
            .abi
            .functions_by_name(&self.method)
            .map_err(|e| CustomError::ContractError(format!("{}: {e}", self.method)))?;
        overloads
            .iter()
            .find_map(|function| function.encode_input(&self.args).ok())
            .map(Bytes::from)
            .ok_or_else(|| {
                CustomError::ContractError(format!(
                    "arguments do not match any overload of {}",
                    self.method
                ))
            })
    }
}

/// Wallet custody: key management, signing, broadcast and confirmation.
#[async_trait]
pub trait CustodyService: Send + Sync {
    async fn create_wallet(&self, request: CreateWalletRequest) -> Result<WalletHandle, CustomError>;

    async fn import_wallet(&self, data: WalletData) -> Result<WalletHandle, CustomError>;

    fn export_wallet(&self, wallet: &WalletHandle) -> Result<WalletData, CustomError>;

    async fn default_address(&self, wallet: &WalletHandle) -> Result<Address, CustomError>;

    async fn request_faucet(&self, wallet: &WalletHandle) -> Result<FaucetTransaction, CustomError>;

    async fn transfer_native(
        &self,
        wallet: &WalletHandle,
        to: Address,
        value: U256,
    ) -> Result<Receipt, CustomError>;

    async fn invoke_contract(
        &self,
        wallet: &WalletHandle,
        invocation: ContractInvocation,
    ) -> Result<Receipt, CustomError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaucetResponse {
    transaction_hash: H256,
}

/// Custody backed by locally held keys signing over JSON-RPC.
///
/// With `use_server_signer` set, keys stay inside this adapter and wallets
/// cannot be exported.
pub struct LocalCustody {
    credentials: ApiKeyPair,
    options: CustodyOptions,
    faucet_url: Option<String>,
    http: reqwest::Client,
    server_keys: Mutex<HashMap<String, LocalWallet>>,
}

impl LocalCustody {
    pub fn new(config: &Config) -> Result<Self, CustomError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CustomError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            credentials: config.custody_credentials.resolve()?,
            options: config.custody_options.clone(),
            faucet_url: config.faucet_url.clone(),
            http,
            server_keys: Mutex::new(HashMap::new()),
        })
    }

    fn hold(&self, id: &str, signer: LocalWallet) -> Result<(), CustomError> {
        self.server_keys
            .lock()
            .map_err(|_| CustomError::WalletError("server key store poisoned".to_string()))?
            .insert(id.to_string(), signer);
        Ok(())
    }

    fn handle_for(
        &self,
        id: String,
        request: CreateWalletRequest,
        signer: LocalWallet,
    ) -> Result<WalletHandle, CustomError> {
        let address = signer.address();
        let seed = if self.options.use_server_signer {
            self.hold(&id, signer)?;
            None
        } else {
            Some(hex::encode(signer.signer().to_bytes()))
        };
        Ok(WalletHandle {
            id,
            network: request.network,
            default_address: Some(address),
            seed,
            confirmation: request.confirmation,
        })
    }

    fn signer(&self, wallet: &WalletHandle) -> Result<LocalWallet, CustomError> {
        if let Some(seed) = &wallet.seed {
            return parse_seed(seed);
        }
        self.server_keys
            .lock()
            .map_err(|_| CustomError::WalletError("server key store poisoned".to_string()))?
            .get(&wallet.id)
            .cloned()
            .ok_or_else(|| CustomError::WalletError(format!("no key held for wallet {}", wallet.id)))
    }

    async fn send(
        &self,
        wallet: &WalletHandle,
        tx: TransactionRequest,
    ) -> Result<Receipt, CustomError> {
        let chain = BlockchainClient::new(wallet.network, self.options.base_path.as_deref()).await?;
        let signer = self.signer(wallet)?.with_chain_id(chain.config.chain_id);
        let client = SignerMiddleware::new(Provider::<Http>::clone(&chain.provider), signer);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| CustomError::ContractError(e.to_string()))?;
        let hash = pending.tx_hash();
        info!("broadcast {:?} on {}", hash, wallet.network);

        let ConfirmationPolicy {
            timeout,
            poll_interval,
        } = wallet.confirmation;
        let receipt = tokio::time::timeout(timeout, pending.interval(poll_interval))
            .await
            .map_err(|_| CustomError::ConfirmationTimeoutError(timeout))??
            .ok_or(CustomError::TransactionReceiptFailedError)?;

        if receipt.status == Some(U64::zero()) {
            return Err(CustomError::TransactionFailedError(format!("{:?}", hash)));
        }
        Ok(receipt)
    }
}

fn parse_seed(seed: &str) -> Result<LocalWallet, CustomError> {
    LocalWallet::from_str(seed.trim_start_matches("0x"))
        .map_err(|e| CustomError::WalletError(format!("invalid wallet seed: {e}")))
}

#[async_trait]
impl CustodyService for LocalCustody {
    async fn create_wallet(&self, request: CreateWalletRequest) -> Result<WalletHandle, CustomError> {
        let signer = LocalWallet::new(&mut thread_rng());
        let handle = self.handle_for(Uuid::new_v4().to_string(), request, signer)?;
        info!("created wallet {} on {}", handle.id, handle.network);
        Ok(handle)
    }

    async fn import_wallet(&self, data: WalletData) -> Result<WalletHandle, CustomError> {
        let signer = parse_seed(&data.seed)?;
        let request = CreateWalletRequest {
            network: data.network_id,
            confirmation: ConfirmationPolicy::default(),
        };
        let handle = self.handle_for(data.wallet_id, request, signer)?;
        info!("imported wallet {} on {}", handle.id, handle.network);
        Ok(handle)
    }

    fn export_wallet(&self, wallet: &WalletHandle) -> Result<WalletData, CustomError> {
        let seed = wallet.seed.clone().ok_or_else(|| {
            CustomError::WalletError("wallet keys are held by the server signer".to_string())
        })?;
        Ok(WalletData {
            wallet_id: wallet.id.clone(),
            seed,
            network_id: wallet.network,
        })
    }

    async fn default_address(&self, wallet: &WalletHandle) -> Result<Address, CustomError> {
        match wallet.default_address {
            Some(address) => Ok(address),
            None => Ok(self.signer(wallet)?.address()),
        }
    }

    async fn request_faucet(&self, wallet: &WalletHandle) -> Result<FaucetTransaction, CustomError> {
        let url = self
            .faucet_url
            .as_deref()
            .ok_or_else(|| CustomError::ConfigError("no faucet URL configured".to_string()))?;
        let address = self.default_address(wallet).await?;

        let response = self
            .http
            .post(url)
            .header("x-api-key-name", &self.credentials.name)
            .header("x-api-key", &self.credentials.private_key)
            .json(&serde_json::json!({
                "address": address,
                "networkId": wallet.network,
            }))
            .send()
            .await
            .map_err(|e| CustomError::NetworkError(format!("faucet request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CustomError::NetworkError(format!(
                "faucet responded with {status}: {body}"
            )));
        }
        let body: FaucetResponse = response
            .json()
            .await
            .map_err(|e| CustomError::NetworkError(format!("malformed faucet response: {e}")))?;

        Ok(FaucetTransaction {
            transaction_hash: body.transaction_hash,
            transaction_link: Some(
                get_network_config(wallet.network).transaction_link(body.transaction_hash),
            ),
        })
    }

    async fn transfer_native(
        &self,
        wallet: &WalletHandle,
        to: Address,
        value: U256,
    ) -> Result<Receipt, CustomError> {
        info!("native transfer of {} wei to {:?}", value, to);
        self.send(wallet, TransactionRequest::new().to(to).value(value))
            .await
    }

    async fn invoke_contract(
        &self,
        wallet: &WalletHandle,
        invocation: ContractInvocation,
    ) -> Result<Receipt, CustomError> {
        let data = invocation.encode()?;
        info!("invoking {} on {:?}", invocation.method, invocation.contract);
        if self.options.debugging {
            debug!(
                "{} args={:?} value={:?}",
                invocation.method, invocation.args, invocation.value
            );
        }

        let mut tx = TransactionRequest::new().to(invocation.contract).data(data);
        if let Some(value) = invocation.value {
            tx = tx.value(value);
        }
        self.send(wallet, tx).await
    }
}
