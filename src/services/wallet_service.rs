use std::sync::Arc;

use ethers::types::Address;
use log::info;
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    errors::CustomError,
    models::wallet::{CreateWalletRequest, FaucetTransaction, WalletData, WalletHandle},
};

use super::{custody_service::CustodyService, network_config::TEST_NETWORK};

/// Holds the session's single current wallet.
///
/// The slot lock is async so a running dispatch can keep it across awaits,
/// which serialises create/import against an in-flight transact.
pub struct WalletSession {
    custody: Arc<dyn CustodyService>,
    current: Mutex<Option<WalletHandle>>,
}

impl WalletSession {
    pub fn new(custody: Arc<dyn CustodyService>) -> Self {
        Self {
            custody,
            current: Mutex::new(None),
        }
    }

    pub fn custody(&self) -> &Arc<dyn CustodyService> {
        &self.custody
    }

    pub async fn create(&self, request: CreateWalletRequest) -> Result<WalletHandle, CustomError> {
        let mut slot = self.current.lock().await;
        let wallet = self.custody.create_wallet(request).await?;
        *slot = Some(wallet.clone());
        Ok(wallet)
    }

    pub async fn import(&self, data: WalletData) -> Result<WalletHandle, CustomError> {
        let mut slot = self.current.lock().await;
        let wallet = self.custody.import_wallet(data).await?;
        *slot = Some(wallet.clone());
        Ok(wallet)
    }

    pub async fn export(&self) -> Result<WalletData, CustomError> {
        let slot = self.current.lock().await;
        let wallet = slot.as_ref().ok_or(CustomError::NoWalletError)?;
        self.custody.export_wallet(wallet)
    }

    pub async fn default_address(&self) -> Result<Address, CustomError> {
        let slot = self.current.lock().await;
        let wallet = slot.as_ref().ok_or(CustomError::NoWalletError)?;
        self.custody.default_address(wallet).await
    }

    /// Request test funds; only wallets on the test network qualify.
    pub async fn fund(&self) -> Result<FaucetTransaction, CustomError> {
        let slot = self.current.lock().await;
        let wallet = slot.as_ref().ok_or(CustomError::NoWalletError)?;
        if wallet.network != TEST_NETWORK {
            return Err(CustomError::FaucetUnavailableError {
                expected: TEST_NETWORK.to_string(),
                actual: wallet.network.to_string(),
            });
        }
        let faucet = self.custody.request_faucet(wallet).await?;
        info!("faucet funded wallet {}: {:?}", wallet.id, faucet.transaction_hash);
        Ok(faucet)
    }

    /// Lock the slot for the duration of a dispatch.
    pub async fn lock(&self) -> MutexGuard<'_, Option<WalletHandle>> {
        self.current.lock().await
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        models::{network_config::NetworkId, wallet::ConfirmationPolicy},
        test_support::RecordingCustody,
    };

    use super::*;

    fn request(network: NetworkId) -> CreateWalletRequest {
        CreateWalletRequest {
            network,
            confirmation: ConfirmationPolicy::default(),
        }
    }

    #[tokio::test]
    async fn wallet_operations_need_a_wallet() {
        let session = WalletSession::new(Arc::new(RecordingCustody::default()));
        assert!(matches!(session.export().await, Err(CustomError::NoWalletError)));
        assert!(matches!(
            session.default_address().await,
            Err(CustomError::NoWalletError)
        ));
        assert!(matches!(session.fund().await, Err(CustomError::NoWalletError)));
    }

    #[tokio::test]
    async fn fund_only_on_test_network() {
        for network in NetworkId::ALL {
            let custody = Arc::new(RecordingCustody::default());
            let session = WalletSession::new(custody.clone());
            session.create(request(network)).await.unwrap();

            let result = session.fund().await;
            if network == TEST_NETWORK {
                assert!(result.is_ok());
                assert_eq!(custody.faucet_requests(), 1);
            } else {
                assert!(matches!(
                    result,
                    Err(CustomError::FaucetUnavailableError { .. })
                ));
                assert_eq!(custody.faucet_requests(), 0);
            }
        }
    }

    #[tokio::test]
    async fn import_replaces_current_wallet() {
        let session = WalletSession::new(Arc::new(RecordingCustody::default()));
        let created = session.create(request(NetworkId::BaseMainnet)).await.unwrap();
        let imported = session
            .import(WalletData {
                wallet_id: "imported".into(),
                seed: "11".repeat(32),
                network_id: NetworkId::BaseSepolia,
            })
            .await
            .unwrap();

        assert_ne!(created.id, imported.id);
        let exported = session.export().await.unwrap();
        assert_eq!(exported.wallet_id, "imported");
        assert_eq!(exported.network_id, NetworkId::BaseSepolia);
    }
}
