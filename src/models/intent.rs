use chrono::{DateTime, Utc};
use ethers::types::{Address, TransactionReceipt, H256};
use serde::{Deserialize, Serialize};

use super::{network_config::NetworkId, wallet::WalletData};

/// Receipt of one confirmed call.
pub type Receipt = TransactionReceipt;

#[derive(Serialize, Deserialize, Debug)]
pub struct TransactRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactResponse {
    pub receipts: Vec<ReceiptSummary>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
    pub success: bool,
}

impl From<&Receipt> for ReceiptSummary {
    fn from(receipt: &Receipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|n| n.as_u64()),
            success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(true),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateWalletBody {
    pub network_id: Option<NetworkId>,
    pub timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportWalletBody {
    pub wallet_data: WalletData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: Address,
}
