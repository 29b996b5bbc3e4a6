use std::time::Duration;

use ethers::types::Address;
use log::{info, warn};

use crate::{
    errors::CustomError,
    models::{
        intent::Receipt,
        transaction::{Action, TransactionResult, TransactionStep},
        wallet::WalletHandle,
    },
};

use super::{
    abi_registry::{AbiRegistry, ContractInterface},
    custody_service::{ContractInvocation, CustodyService},
    network_config::get_network_config,
};

/// Replays planned actions through the custody service, one confirmed call
/// at a time.
pub struct TransactionService {
    abis: AbiRegistry,
    ens_commit_delay: Duration,
}

impl TransactionService {
    pub fn new(abis: AbiRegistry, ens_commit_delay: Duration) -> Self {
        Self {
            abis,
            ens_commit_delay,
        }
    }

    pub fn abis(&self) -> &AbiRegistry {
        &self.abis
    }

    /// Execute `results` in order and return one receipt per confirmed call.
    ///
    /// The plan is checked before anything is sent. The first failing call
    /// aborts the run; calls confirmed before it stay confirmed.
    pub async fn dispatch(
        &self,
        custody: &dyn CustodyService,
        wallet: &WalletHandle,
        results: &[TransactionResult],
    ) -> Result<Vec<Receipt>, CustomError> {
        validate_plan(results)?;

        let mut receipts = Vec::new();
        for result in results {
            if result.data.steps.is_empty() {
                info!("skipping {} with no steps", result.action);
                continue;
            }
            info!(
                "dispatching {} via {} ({} step(s))",
                result.action,
                result.solver,
                result.data.steps.len()
            );
            self.dispatch_action(custody, wallet, result, &mut receipts)
                .await?;
        }
        Ok(receipts)
    }

    async fn dispatch_action(
        &self,
        custody: &dyn CustodyService,
        wallet: &WalletHandle,
        result: &TransactionResult,
        receipts: &mut Vec<Receipt>,
    ) -> Result<(), CustomError> {
        let steps = &result.data.steps;
        match &result.action {
            Action::Transfer => self.transfer(custody, wallet, result, receipts).await,
            Action::Swap | Action::Bridge => {
                let interface = ContractInterface::for_solver(&result.solver);
                self.approve_then_call(custody, wallet, steps, interface, receipts)
                    .await
            }
            Action::Deposit => {
                let interface = ContractInterface::for_deposit(&result.solver);
                self.approve_then_call(custody, wallet, steps, interface, receipts)
                    .await
            }
            Action::Withdraw => {
                self.approve_then_call(custody, wallet, steps, ContractInterface::Router, receipts)
                    .await
            }
            Action::Borrow | Action::Repay => {
                let origin = operative_step(result)?.chain_id;
                let interface = ContractInterface::for_lending(origin);
                self.approve_then_call(custody, wallet, steps, interface, receipts)
                    .await
            }
            Action::EnsRegistration => {
                let commit = step_at(result, 0)?;
                let register = step_at(result, 1)?;
                self.call(custody, wallet, commit, ContractInterface::EnsController, receipts)
                    .await?;
                if !self.ens_commit_delay.is_zero() {
                    info!(
                        "waiting {:?} for the ENS commitment to mature",
                        self.ens_commit_delay
                    );
                    tokio::time::sleep(self.ens_commit_delay).await;
                }
                self.call(custody, wallet, register, ContractInterface::EnsController, receipts)
                    .await
            }
            Action::EnsRenewal => {
                let renew = step_at(result, 0)?;
                self.call(custody, wallet, renew, ContractInterface::EnsController, receipts)
                    .await
            }
            Action::Unknown(name) => Err(CustomError::UnsupportedActionError(name.clone())),
        }
    }

    async fn transfer(
        &self,
        custody: &dyn CustodyService,
        wallet: &WalletHandle,
        result: &TransactionResult,
        receipts: &mut Vec<Receipt>,
    ) -> Result<(), CustomError> {
        let step = operative_step(result)?;
        let native = match &result.data.from_token {
            Some(token) => token.address == Address::zero(),
            None => step.data.is_empty(),
        };

        if native {
            warn_on_chain_mismatch(wallet, step);
            let receipt = custody.transfer_native(wallet, step.to, step.value).await?;
            receipts.push(receipt);
            Ok(())
        } else {
            self.call(custody, wallet, step, ContractInterface::Erc20, receipts)
                .await
        }
    }

    // A multi-step action carries its token approval first and the operative
    // call last.
    async fn approve_then_call(
        &self,
        custody: &dyn CustodyService,
        wallet: &WalletHandle,
        steps: &[TransactionStep],
        interface: ContractInterface,
        receipts: &mut Vec<Receipt>,
    ) -> Result<(), CustomError> {
        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return Ok(());
        };
        if steps.len() > 1 {
            self.call(custody, wallet, first, ContractInterface::Erc20, receipts)
                .await?;
        }
        self.call(custody, wallet, last, interface, receipts).await
    }

    async fn call(
        &self,
        custody: &dyn CustodyService,
        wallet: &WalletHandle,
        step: &TransactionStep,
        interface: ContractInterface,
        receipts: &mut Vec<Receipt>,
    ) -> Result<(), CustomError> {
        warn_on_chain_mismatch(wallet, step);
        let decoded = self.abis.decode(interface, &step.data)?;
        info!("calling {}.{} at {:?}", interface, decoded.method, step.to);

        let receipt = custody
            .invoke_contract(
                wallet,
                ContractInvocation {
                    contract: step.to,
                    method: decoded.method,
                    abi: decoded.abi,
                    args: decoded.args,
                    value: (!step.value.is_zero()).then_some(step.value),
                },
            )
            .await?;
        receipts.push(receipt);
        Ok(())
    }
}

/// Reject plans containing actions this dispatcher cannot execute.
pub fn validate_plan(results: &[TransactionResult]) -> Result<(), CustomError> {
    for result in results {
        match &result.action {
            Action::Unknown(name) => {
                return Err(CustomError::UnsupportedActionError(name.clone()));
            }
            Action::EnsRegistration if !result.data.steps.is_empty() => {
                step_at(result, 1)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn step_at(result: &TransactionResult, index: usize) -> Result<&TransactionStep, CustomError> {
    result
        .data
        .steps
        .get(index)
        .ok_or_else(|| CustomError::MissingStepError {
            action: result.action.to_string(),
            index,
        })
}

fn operative_step(result: &TransactionResult) -> Result<&TransactionStep, CustomError> {
    let last = result.data.steps.len().saturating_sub(1);
    step_at(result, last)
}

fn warn_on_chain_mismatch(wallet: &WalletHandle, step: &TransactionStep) {
    let wallet_chain = get_network_config(wallet.network).chain_id;
    if step.chain_id != wallet_chain {
        warn!(
            "step targets chain {} but wallet {} is on {} (chain {})",
            step.chain_id, wallet.id, wallet.network, wallet_chain
        );
    }
}
