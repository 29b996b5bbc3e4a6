#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ethers::{
    abi::Token,
    types::{Address, Bytes, H256, U256, U64},
};
use intent_relay::{
    models::{
        network_config::NetworkId,
        transaction::{Action, Solver, TokenInfo, TransactionData, TransactionResult, TransactionStep},
        wallet::{ConfirmationPolicy, CreateWalletRequest, FaucetTransaction, WalletData, WalletHandle},
    },
    services::{
        abi_registry::{AbiRegistry, ContractInterface},
        custody_service::{ContractInvocation, CustodyService},
        planning_service::PlanningService,
    },
    Config, ConfigParams, CustomError, IntentService, Receipt,
};

pub const WALLET: Address = Address::repeat_byte(0xaa);

#[derive(Clone, Debug, PartialEq)]
pub enum Issued {
    Native { to: Address, value: U256 },
    Contract { to: Address, method: String, args: Vec<Token>, value: Option<U256> },
}

#[derive(Default)]
pub struct FakeCustody {
    pub issued: Mutex<Vec<Issued>>,
    pub reject_at: Option<usize>,
}

impl FakeCustody {
    pub fn issued(&self) -> Vec<Issued> {
        self.issued.lock().unwrap().clone()
    }

    fn confirm(&self, call: Issued) -> Result<Receipt, CustomError> {
        let mut issued = self.issued.lock().unwrap();
        if self.reject_at == Some(issued.len()) {
            return Err(CustomError::ContractError("execution reverted".into()));
        }
        issued.push(call);
        Ok(Receipt {
            transaction_hash: H256::from_low_u64_be(issued.len() as u64),
            status: Some(U64::one()),
            ..Receipt::default()
        })
    }
}

#[async_trait]
impl CustodyService for FakeCustody {
    async fn create_wallet(&self, request: CreateWalletRequest) -> Result<WalletHandle, CustomError> {
        Ok(WalletHandle {
            id: "fake".into(),
            network: request.network,
            default_address: Some(WALLET),
            seed: Some("22".repeat(32)),
            confirmation: request.confirmation,
        })
    }

    async fn import_wallet(&self, data: WalletData) -> Result<WalletHandle, CustomError> {
        Ok(WalletHandle {
            id: data.wallet_id,
            network: data.network_id,
            default_address: Some(WALLET),
            seed: Some(data.seed),
            confirmation: ConfirmationPolicy::default(),
        })
    }

    fn export_wallet(&self, wallet: &WalletHandle) -> Result<WalletData, CustomError> {
        Ok(WalletData {
            wallet_id: wallet.id.clone(),
            seed: wallet.seed.clone().unwrap_or_default(),
            network_id: wallet.network,
        })
    }

    async fn default_address(&self, wallet: &WalletHandle) -> Result<Address, CustomError> {
        wallet.default_address.ok_or(CustomError::NoDefaultAddressError)
    }

    async fn request_faucet(&self, _wallet: &WalletHandle) -> Result<FaucetTransaction, CustomError> {
        Ok(FaucetTransaction {
            transaction_hash: H256::zero(),
            transaction_link: None,
        })
    }

    async fn transfer_native(
        &self,
        _wallet: &WalletHandle,
        to: Address,
        value: U256,
    ) -> Result<Receipt, CustomError> {
        self.confirm(Issued::Native { to, value })
    }

    async fn invoke_contract(
        &self,
        _wallet: &WalletHandle,
        invocation: ContractInvocation,
    ) -> Result<Receipt, CustomError> {
        invocation.encode()?;
        self.confirm(Issued::Contract {
            to: invocation.contract,
            method: invocation.method,
            args: invocation.args,
            value: invocation.value,
        })
    }
}

pub struct FixedPlanner(pub Vec<TransactionResult>);

#[async_trait]
impl PlanningService for FixedPlanner {
    async fn plan(
        &self,
        _prompt: &str,
        _address: Address,
    ) -> Result<Vec<TransactionResult>, CustomError> {
        Ok(self.0.clone())
    }
}

pub fn config() -> Config {
    Config::new(ConfigParams {
        planner_api_key: Some("planner-key".into()),
        custody_api_key_name: Some("key-name".into()),
        custody_api_key_private_key: Some("key-secret".into()),
        ens_commit_delay: Some(Duration::ZERO),
        ..ConfigParams::default()
    })
    .unwrap()
}

/// Service with a base-sepolia wallet already loaded.
pub async fn service(plan: Vec<TransactionResult>, custody: Arc<FakeCustody>) -> IntentService {
    let service = IntentService::new(&config(), Arc::new(FixedPlanner(plan)), custody).unwrap();
    service
        .create_wallet(
            NetworkId::BaseSepolia,
            Duration::from_secs(30),
            Duration::from_millis(100),
        )
        .await
        .unwrap();
    service
}

pub fn abis() -> AbiRegistry {
    AbiRegistry::load().unwrap()
}

pub fn calldata(interface: ContractInterface, method: &str, args: Vec<Token>) -> Bytes {
    let abis = abis();
    let data = abis
        .abi(interface)
        .functions_by_name(method)
        .unwrap()
        .iter()
        .find_map(|function| function.encode_input(&args).ok())
        .unwrap();
    Bytes::from(data)
}

pub fn approve(spender: Address, amount: u64) -> Bytes {
    calldata(
        ContractInterface::Erc20,
        "approve",
        vec![Token::Address(spender), Token::Uint(U256::from(amount))],
    )
}

pub fn step(chain_id: u64, to: Address, data: Bytes, value: u64) -> TransactionStep {
    TransactionStep {
        chain_id,
        from: Some(WALLET),
        to,
        value: U256::from(value),
        data,
        gas_limit: None,
    }
}

pub fn action(action: Action, solver: Solver, steps: Vec<TransactionStep>) -> TransactionResult {
    TransactionResult {
        action,
        solver,
        kind: "write".into(),
        data: TransactionData {
            steps,
            ..TransactionData::default()
        },
    }
}

pub fn from_token(mut result: TransactionResult, token: Address) -> TransactionResult {
    result.data.from_token = Some(TokenInfo {
        address: token,
        chain_id: None,
        symbol: None,
        decimals: None,
    });
    result
}
