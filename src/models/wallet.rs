use std::{fmt, time::Duration};

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use super::network_config::NetworkId;

/// The session's current custodial wallet.
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletHandle {
    pub id: String,
    pub network: NetworkId,
    pub default_address: Option<Address>,
    /// Hex private key. `None` when keys live with a server-side signer.
    #[serde(skip_serializing)]
    pub seed: Option<String>,
    #[serde(skip)]
    pub confirmation: ConfirmationPolicy,
}

// Keep the seed out of logs.
impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletHandle")
            .field("id", &self.id)
            .field("network", &self.network)
            .field("default_address", &self.default_address)
            .field("seed", &self.seed.as_ref().map(|_| "<redacted>"))
            .field("confirmation", &self.confirmation)
            .finish()
    }
}

/// How long to wait for a broadcast call to confirm, and how often to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CreateWalletRequest {
    pub network: NetworkId,
    pub confirmation: ConfirmationPolicy,
}

/// Portable export form of a wallet, accepted back by import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    pub wallet_id: String,
    pub seed: String,
    pub network_id: NetworkId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetTransaction {
    pub transaction_hash: H256,
    pub transaction_link: Option<String>,
}
