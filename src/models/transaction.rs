use std::fmt;

use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of on-chain operation the planner produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Transfer,
    Swap,
    Bridge,
    Deposit,
    Withdraw,
    Borrow,
    Repay,
    EnsRegistration,
    EnsRenewal,
    Unknown(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Transfer => "transfer",
            Action::Swap => "swap",
            Action::Bridge => "bridge",
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
            Action::Borrow => "borrow",
            Action::Repay => "repay",
            Action::EnsRegistration => "ENS Registration",
            Action::EnsRenewal => "ENS Renewal",
            Action::Unknown(name) => name,
        }
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "transfer" => Action::Transfer,
            "swap" => Action::Swap,
            "bridge" => Action::Bridge,
            "deposit" => Action::Deposit,
            "withdraw" => Action::Withdraw,
            "borrow" => Action::Borrow,
            "repay" => Action::Repay,
            "ens registration" => Action::EnsRegistration,
            "ens renewal" => Action::EnsRenewal,
            _ => Action::Unknown(value),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing provider whose contract interface the call data targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Solver {
    #[default]
    None,
    Enso,
    Bungee,
    Lifi,
    Lido,
    Other(String),
}

impl From<Option<String>> for Solver {
    fn from(value: Option<String>) -> Self {
        let Some(raw) = value else {
            return Solver::None;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Solver::None,
            "enso" => Solver::Enso,
            "bungee" => Solver::Bungee,
            "lifi" | "li.fi" => Solver::Lifi,
            "lido" => Solver::Lido,
            _ => Solver::Other(raw),
        }
    }
}

impl From<Solver> for Option<String> {
    fn from(solver: Solver) -> Self {
        match solver {
            Solver::None => None,
            Solver::Enso => Some("Enso".to_string()),
            Solver::Bungee => Some("Bungee".to_string()),
            Solver::Lifi => Some("LI.FI".to_string()),
            Solver::Lido => Some("Lido".to_string()),
            Solver::Other(name) => Some(name),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Option::<String>::from(self.clone()) {
            Some(name) => f.write_str(&name),
            None => f.write_str("none"),
        }
    }
}

/// One planned action as returned by the planning service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionResult {
    pub action: Action,
    #[serde(default)]
    pub solver: Solver,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub data: TransactionData,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<TransactionStep>,
    pub from_token: Option<TokenInfo>,
    pub to_token: Option<TokenInfo>,
    pub from_amount: Option<String>,
    pub to_amount: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub from_chain_id: Option<u64>,
    pub to_chain_id: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub chain_id: Option<u64>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// One raw call inside a planned action.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStep {
    pub chain_id: u64,
    pub from: Option<Address>,
    pub to: Address,
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    pub gas_limit: Option<String>,
}

// The planner sends amounts as decimal strings, but hex strings and bare
// numbers show up too.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(u64),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => Ok(U256::from(n)),
        RawAmount::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(U256::zero());
            }
            let parsed = match text.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| e.to_string()),
                None => U256::from_dec_str(text).map_err(|e| e.to_string()),
            };
            parsed.map_err(|e| serde::de::Error::custom(format!("invalid amount {text}: {e}")))
        }
    }
}
