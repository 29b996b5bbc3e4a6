use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use ethers::{
    abi::Token,
    types::{Address, Bytes, H256, U256, U64},
};

use crate::{
    errors::CustomError,
    models::{
        intent::Receipt,
        network_config::NetworkId,
        transaction::{Action, Solver, TransactionData, TransactionResult, TransactionStep},
        wallet::{ConfirmationPolicy, CreateWalletRequest, FaucetTransaction, WalletData, WalletHandle},
    },
    services::{
        abi_registry::{AbiRegistry, ContractInterface},
        custody_service::{ContractInvocation, CustodyService},
        planning_service::PlanningService,
    },
};

pub(crate) const WALLET_ADDRESS: Address = Address::repeat_byte(0xaa);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Native {
        to: Address,
        value: U256,
    },
    Contract {
        contract: Address,
        method: String,
        args: Vec<Token>,
        value: Option<U256>,
    },
}

impl Call {
    pub(crate) fn method(&self) -> &str {
        match self {
            Call::Native { .. } => "<native>",
            Call::Contract { method, .. } => method,
        }
    }
}

/// Custody double that records every call and confirms it immediately.
#[derive(Default)]
pub(crate) struct RecordingCustody {
    calls: Mutex<Vec<Call>>,
    faucet: AtomicUsize,
}

impl RecordingCustody {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn faucet_requests(&self) -> usize {
        self.faucet.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> Result<Receipt, CustomError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        Ok(Receipt {
            transaction_hash: H256::from_low_u64_be(calls.len() as u64),
            status: Some(U64::one()),
            ..Receipt::default()
        })
    }
}

#[async_trait]
impl CustodyService for RecordingCustody {
    async fn create_wallet(&self, request: CreateWalletRequest) -> Result<WalletHandle, CustomError> {
        Ok(WalletHandle {
            id: uuid::Uuid::new_v4().to_string(),
            network: request.network,
            default_address: Some(WALLET_ADDRESS),
            seed: Some("11".repeat(32)),
            confirmation: request.confirmation,
        })
    }

    async fn import_wallet(&self, data: WalletData) -> Result<WalletHandle, CustomError> {
        Ok(WalletHandle {
            id: data.wallet_id,
            network: data.network_id,
            default_address: Some(WALLET_ADDRESS),
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
        self.faucet.fetch_add(1, Ordering::SeqCst);
        Ok(FaucetTransaction {
            transaction_hash: H256::repeat_byte(0xfa),
            transaction_link: None,
        })
    }

    async fn transfer_native(
        &self,
        _wallet: &WalletHandle,
        to: Address,
        value: U256,
    ) -> Result<Receipt, CustomError> {
        self.record(Call::Native { to, value })
    }

    async fn invoke_contract(
        &self,
        _wallet: &WalletHandle,
        invocation: ContractInvocation,
    ) -> Result<Receipt, CustomError> {
        // Reject anything the real adapter could not encode.
        invocation.encode()?;
        self.record(Call::Contract {
            contract: invocation.contract,
            method: invocation.method,
            args: invocation.args,
            value: invocation.value,
        })
    }
}

/// Planner double returning a fixed plan.
pub(crate) struct StaticPlanner {
    pub(crate) results: Vec<TransactionResult>,
    pub(crate) requests: Mutex<Vec<(String, Address)>>,
}

impl StaticPlanner {
    pub(crate) fn new(results: Vec<TransactionResult>) -> Self {
        Self {
            results,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PlanningService for StaticPlanner {
    async fn plan(
        &self,
        prompt: &str,
        address: Address,
    ) -> Result<Vec<TransactionResult>, CustomError> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), address));
        Ok(self.results.clone())
    }
}

pub(crate) fn wallet() -> WalletHandle {
    WalletHandle {
        id: "wallet-1".into(),
        network: NetworkId::BaseSepolia,
        default_address: Some(WALLET_ADDRESS),
        seed: None,
        confirmation: ConfirmationPolicy::default(),
    }
}

pub(crate) fn encode(
    abis: &AbiRegistry,
    interface: ContractInterface,
    method: &str,
    args: Vec<Token>,
) -> Vec<u8> {
    abis.abi(interface)
        .functions_by_name(method)
        .unwrap()
        .iter()
        .find_map(|function| function.encode_input(&args).ok())
        .unwrap_or_else(|| panic!("{interface}.{method} rejected the arguments"))
}

pub(crate) fn step(chain_id: u64, to: Address, data: Vec<u8>, value: u64) -> TransactionStep {
    TransactionStep {
        chain_id,
        from: Some(WALLET_ADDRESS),
        to,
        value: U256::from(value),
        data: Bytes::from(data),
        gas_limit: None,
    }
}

pub(crate) fn plan(action: Action, solver: Solver, steps: Vec<TransactionStep>) -> TransactionResult {
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
