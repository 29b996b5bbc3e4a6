use std::{sync::Arc, time::Duration};

use ethers::types::Address;
use log::{info, warn};

use crate::{
    config::Config,
    errors::CustomError,
    models::{
        intent::Receipt,
        network_config::NetworkId,
        wallet::{ConfirmationPolicy, CreateWalletRequest, FaucetTransaction, WalletData, WalletHandle},
    },
};

use super::{
    abi_registry::AbiRegistry,
    custody_service::{CustodyService, LocalCustody},
    planning_service::{BrianClient, PlanningService},
    transaction_service::TransactionService,
    wallet_service::WalletSession,
};

/// Entry point: turns prompts into confirmed on-chain calls for the
/// session's current wallet.
pub struct IntentService {
    planner: Arc<dyn PlanningService>,
    session: WalletSession,
    transactions: TransactionService,
}

impl IntentService {
    pub fn new(
        config: &Config,
        planner: Arc<dyn PlanningService>,
        custody: Arc<dyn CustodyService>,
    ) -> Result<Self, CustomError> {
        Ok(Self {
            planner,
            session: WalletSession::new(custody),
            transactions: TransactionService::new(AbiRegistry::load()?, config.ens_commit_delay),
        })
    }

    /// Wire the hosted planner and the local custody adapter from `config`.
    pub fn from_config(config: &Config) -> Result<Self, CustomError> {
        let planner = Arc::new(BrianClient::new(config)?);
        let custody = Arc::new(LocalCustody::new(config)?);
        Self::new(config, planner, custody)
    }

    pub async fn create_wallet(
        &self,
        network: NetworkId,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<WalletHandle, CustomError> {
        self.session
            .create(CreateWalletRequest {
                network,
                confirmation: ConfirmationPolicy {
                    timeout,
                    poll_interval,
                },
            })
            .await
    }

    pub async fn import_wallet(&self, data: WalletData) -> Result<WalletHandle, CustomError> {
        self.session.import(data).await
    }

    pub async fn export_wallet(&self) -> Result<WalletData, CustomError> {
        self.session.export().await
    }

    pub async fn get_default_address(&self) -> Result<Address, CustomError> {
        self.session.default_address().await
    }

    pub async fn fund_wallet(&self) -> Result<FaucetTransaction, CustomError> {
        self.session.fund().await
    }

    /// Plan `prompt` for the current wallet and execute every planned call.
    pub async fn transact(&self, prompt: &str) -> Result<Vec<Receipt>, CustomError> {
        let slot = self.session.lock().await;
        let wallet = slot.as_ref().ok_or(CustomError::NoWalletError)?;
        let custody = self.session.custody().as_ref();

        let address = custody.default_address(wallet).await.map_err(|e| {
            warn!("could not resolve address of wallet {}: {}", wallet.id, e);
            CustomError::NoDefaultAddressError
        })?;

        let results = self.planner.plan(prompt, address).await?;
        let receipts = self
            .transactions
            .dispatch(custody, wallet, &results)
            .await?;
        info!(
            "prompt produced {} action(s) and {} confirmed call(s)",
            results.len(),
            receipts.len()
        );
        Ok(receipts)
    }
}
