use std::{fmt, sync::Arc};

use ethers::{
    abi::{Abi, Token},
    types::Bytes,
};

use crate::{errors::CustomError, models::transaction::Solver};

use super::network_config::PRIMARY_LENDING_CHAIN_ID;

// Standard fungible token: transfer and approval
const ERC20_ABI: &str = r#"[
    {
        "type": "function",
        "name": "transfer",
        "inputs": [
            {"name": "to", "type": "address"},
            {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "approve",
        "inputs": [
            {"name": "spender", "type": "address"},
            {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "transferFrom",
        "inputs": [
            {"name": "from", "type": "address"},
            {"name": "to", "type": "address"},
            {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}],
        "stateMutability": "nonpayable"
    }
]"#;

// Generic shortcut router, the default target for swaps and withdrawals
const ROUTER_ABI: &str = r#"[
    {
        "type": "function",
        "name": "routeSingle",
        "inputs": [
            {"name": "tokenIn", "type": "address"},
            {"name": "amountIn", "type": "uint256"},
            {"name": "commands", "type": "bytes32[]"},
            {"name": "state", "type": "bytes[]"}
        ],
        "outputs": [{"name": "returnData", "type": "bytes[]"}],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "routeMulti",
        "inputs": [
            {"name": "tokensIn", "type": "address[]"},
            {"name": "amountsIn", "type": "uint256[]"},
            {"name": "commands", "type": "bytes32[]"},
            {"name": "state", "type": "bytes[]"}
        ],
        "outputs": [{"name": "returnData", "type": "bytes[]"}],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "safeRouteSingle",
        "inputs": [
            {"name": "tokenIn", "type": "address"},
            {"name": "tokenOut", "type": "address"},
            {"name": "amountIn", "type": "uint256"},
            {"name": "minAmountOut", "type": "uint256"},
            {"name": "receiver", "type": "address"},
            {"name": "commands", "type": "bytes32[]"},
            {"name": "state", "type": "bytes[]"}
        ],
        "outputs": [{"name": "returnData", "type": "bytes[]"}],
        "stateMutability": "payable"
    }
]"#;

const BUNGEE_GATEWAY_ABI: &str = r#"[
    {
        "type": "function",
        "name": "executeRoute",
        "inputs": [
            {"name": "routeId", "type": "uint32"},
            {"name": "routeData", "type": "bytes"}
        ],
        "outputs": [{"name": "", "type": "bytes"}],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "executeRoutes",
        "inputs": [
            {"name": "routeIds", "type": "uint32[]"},
            {"name": "dataItems", "type": "bytes[]"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    }
]"#;

const LIFI_DIAMOND_ABI: &str = r#"[
    {
        "type": "function",
        "name": "swapTokensGeneric",
        "inputs": [
            {"name": "_transactionId", "type": "bytes32"},
            {"name": "_integrator", "type": "string"},
            {"name": "_referrer", "type": "string"},
            {"name": "_receiver", "type": "address"},
            {"name": "_minAmount", "type": "uint256"},
            {
                "name": "_swapData",
                "type": "tuple[]",
                "components": [
                    {"name": "callTo", "type": "address"},
                    {"name": "approveTo", "type": "address"},
                    {"name": "sendingAssetId", "type": "address"},
                    {"name": "receivingAssetId", "type": "address"},
                    {"name": "fromAmount", "type": "uint256"},
                    {"name": "callData", "type": "bytes"},
                    {"name": "requiresDeposit", "type": "bool"}
                ]
            }
        ],
        "outputs": [],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "startBridgeTokensViaAcrossV3",
        "inputs": [
            {
                "name": "_bridgeData",
                "type": "tuple",
                "components": [
                    {"name": "transactionId", "type": "bytes32"},
                    {"name": "bridge", "type": "string"},
                    {"name": "integrator", "type": "string"},
                    {"name": "referrer", "type": "address"},
                    {"name": "sendingAssetId", "type": "address"},
                    {"name": "receiver", "type": "address"},
                    {"name": "minAmount", "type": "uint256"},
                    {"name": "destinationChainId", "type": "uint256"},
                    {"name": "hasSourceSwaps", "type": "bool"},
                    {"name": "hasDestinationCall", "type": "bool"}
                ]
            },
            {
                "name": "_acrossData",
                "type": "tuple",
                "components": [
                    {"name": "receiverAddress", "type": "address"},
                    {"name": "refundAddress", "type": "address"},
                    {"name": "receivingAssetId", "type": "address"},
                    {"name": "outputAmount", "type": "uint256"},
                    {"name": "exclusiveRelayer", "type": "address"},
                    {"name": "quoteTimestamp", "type": "uint32"},
                    {"name": "fillDeadline", "type": "uint32"},
                    {"name": "exclusivityDeadline", "type": "uint32"},
                    {"name": "message", "type": "bytes"}
                ]
            }
        ],
        "outputs": [],
        "stateMutability": "payable"
    }
]"#;

const LIDO_STAKING_ABI: &str = r#"[
    {
        "type": "function",
        "name": "submit",
        "inputs": [{"name": "_referral", "type": "address"}],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "payable"
    }
]"#;

const LENDING_POOL_ABI: &str = r#"[
    {
        "type": "function",
        "name": "supply",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "onBehalfOf", "type": "address"},
            {"name": "referralCode", "type": "uint16"}
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "withdraw",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "to", "type": "address"}
        ],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "borrow",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "interestRateMode", "type": "uint256"},
            {"name": "referralCode", "type": "uint16"},
            {"name": "onBehalfOf", "type": "address"}
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "repay",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "interestRateMode", "type": "uint256"},
            {"name": "onBehalfOf", "type": "address"}
        ],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "nonpayable"
    }
]"#;

// L2 pools accept both the full argument list and a packed bytes32 form.
const L2_LENDING_POOL_ABI: &str = r#"[
    {
        "type": "function",
        "name": "borrow",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "interestRateMode", "type": "uint256"},
            {"name": "referralCode", "type": "uint16"},
            {"name": "onBehalfOf", "type": "address"}
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "borrow",
        "inputs": [{"name": "args", "type": "bytes32"}],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "repay",
        "inputs": [
            {"name": "asset", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "interestRateMode", "type": "uint256"},
            {"name": "onBehalfOf", "type": "address"}
        ],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "repay",
        "inputs": [{"name": "args", "type": "bytes32"}],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "supply",
        "inputs": [{"name": "args", "type": "bytes32"}],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "withdraw",
        "inputs": [{"name": "args", "type": "bytes32"}],
        "outputs": [{"name": "", "type": "uint256"}],
        "stateMutability": "nonpayable"
    }
]"#;

const ENS_CONTROLLER_ABI: &str = r#"[
    {
        "type": "function",
        "name": "commit",
        "inputs": [{"name": "commitment", "type": "bytes32"}],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "function",
        "name": "register",
        "inputs": [
            {"name": "name", "type": "string"},
            {"name": "owner", "type": "address"},
            {"name": "duration", "type": "uint256"},
            {"name": "secret", "type": "bytes32"},
            {"name": "resolver", "type": "address"},
            {"name": "data", "type": "bytes[]"},
            {"name": "reverseRecord", "type": "bool"},
            {"name": "ownerControlledFuses", "type": "uint16"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "renew",
        "inputs": [
            {"name": "name", "type": "string"},
            {"name": "duration", "type": "uint256"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    }
]"#;

/// Contract interfaces a planned step can be decoded against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractInterface {
    Erc20,
    Router,
    BungeeGateway,
    LifiDiamond,
    LidoStaking,
    LendingPool,
    L2LendingPool,
    EnsController,
}

impl ContractInterface {
    pub const ALL: [ContractInterface; 8] = [
        ContractInterface::Erc20,
        ContractInterface::Router,
        ContractInterface::BungeeGateway,
        ContractInterface::LifiDiamond,
        ContractInterface::LidoStaking,
        ContractInterface::LendingPool,
        ContractInterface::L2LendingPool,
        ContractInterface::EnsController,
    ];

    fn json(&self) -> &'static str {
        match self {
            ContractInterface::Erc20 => ERC20_ABI,
            ContractInterface::Router => ROUTER_ABI,
            ContractInterface::BungeeGateway => BUNGEE_GATEWAY_ABI,
            ContractInterface::LifiDiamond => LIFI_DIAMOND_ABI,
            ContractInterface::LidoStaking => LIDO_STAKING_ABI,
            ContractInterface::LendingPool => LENDING_POOL_ABI,
            ContractInterface::L2LendingPool => L2_LENDING_POOL_ABI,
            ContractInterface::EnsController => ENS_CONTROLLER_ABI,
        }
    }

    /// Interface the operative step of a swap or bridge targets.
    pub fn for_solver(solver: &Solver) -> Self {
        match solver {
            Solver::Bungee => ContractInterface::BungeeGateway,
            Solver::Lifi => ContractInterface::LifiDiamond,
            Solver::None | Solver::Enso | Solver::Lido | Solver::Other(_) => {
                ContractInterface::Router
            }
        }
    }

    pub fn for_deposit(solver: &Solver) -> Self {
        match solver {
            Solver::Lido => ContractInterface::LidoStaking,
            _ => ContractInterface::Router,
        }
    }

    /// Borrow and repay: full pool interface on the primary chain only.
    pub fn for_lending(chain_id: u64) -> Self {
        if chain_id == PRIMARY_LENDING_CHAIN_ID {
            ContractInterface::LendingPool
        } else {
            ContractInterface::L2LendingPool
        }
    }
}

impl fmt::Display for ContractInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractInterface::Erc20 => "erc20",
            ContractInterface::Router => "router",
            ContractInterface::BungeeGateway => "bungee-gateway",
            ContractInterface::LifiDiamond => "lifi-diamond",
            ContractInterface::LidoStaking => "lido-staking",
            ContractInterface::LendingPool => "lending-pool",
            ContractInterface::L2LendingPool => "l2-lending-pool",
            ContractInterface::EnsController => "ens-controller",
        };
        f.write_str(name)
    }
}

/// A step's call data matched against one interface.
#[derive(Clone, Debug)]
pub struct DecodedCall {
    pub interface: ContractInterface,
    pub method: String,
    pub abi: Arc<Abi>,
    pub args: Vec<Token>,
}

/// Parsed ABIs, shared across dispatches.
#[derive(Clone, Debug)]
pub struct AbiRegistry {
    erc20: Arc<Abi>,
    router: Arc<Abi>,
    bungee_gateway: Arc<Abi>,
    lifi_diamond: Arc<Abi>,
    lido_staking: Arc<Abi>,
    lending_pool: Arc<Abi>,
    l2_lending_pool: Arc<Abi>,
    ens_controller: Arc<Abi>,
}

fn parse_abi(interface: ContractInterface) -> Result<Arc<Abi>, CustomError> {
    serde_json::from_str::<Abi>(interface.json())
        .map(Arc::new)
        .map_err(|e| CustomError::ConfigError(format!("invalid {interface} ABI: {e}")))
}

impl AbiRegistry {
    pub fn load() -> Result<Self, CustomError> {
        Ok(Self {
            erc20: parse_abi(ContractInterface::Erc20)?,
            router: parse_abi(ContractInterface::Router)?,
            bungee_gateway: parse_abi(ContractInterface::BungeeGateway)?,
            lifi_diamond: parse_abi(ContractInterface::LifiDiamond)?,
            lido_staking: parse_abi(ContractInterface::LidoStaking)?,
            lending_pool: parse_abi(ContractInterface::LendingPool)?,
            l2_lending_pool: parse_abi(ContractInterface::L2LendingPool)?,
            ens_controller: parse_abi(ContractInterface::EnsController)?,
        })
    }

    pub fn abi(&self, interface: ContractInterface) -> &Arc<Abi> {
        match interface {
            ContractInterface::Erc20 => &self.erc20,
            ContractInterface::Router => &self.router,
            ContractInterface::BungeeGateway => &self.bungee_gateway,
            ContractInterface::LifiDiamond => &self.lifi_diamond,
            ContractInterface::LidoStaking => &self.lido_staking,
            ContractInterface::LendingPool => &self.lending_pool,
            ContractInterface::L2LendingPool => &self.l2_lending_pool,
            ContractInterface::EnsController => &self.ens_controller,
        }
    }

    /// Decode `data` by matching its 4-byte selector against `interface`.
    pub fn decode(
        &self,
        interface: ContractInterface,
        data: &Bytes,
    ) -> Result<DecodedCall, CustomError> {
        if data.len() < 4 {
            return Err(CustomError::DecodeError(format!(
                "call data for {interface} is {} bytes, shorter than a selector",
                data.len()
            )));
        }
        let (selector, payload) = data.split_at(4);
        let abi = self.abi(interface);
        let function = abi
            .functions()
            .find(|function| function.short_signature().as_slice() == selector)
            .ok_or_else(|| {
                CustomError::DecodeError(format!(
                    "selector 0x{} is not part of the {interface} interface",
                    ethers::utils::hex::encode(selector)
                ))
            })?;
        let args = function
            .decode_input(payload)
            .map_err(|e| CustomError::DecodeError(format!("{interface}.{}: {e}", function.name)))?;

        Ok(DecodedCall {
            interface,
            method: function.name.clone(),
            abi: abi.clone(),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, U256};

    use super::*;

    fn registry() -> AbiRegistry {
        AbiRegistry::load().expect("bundled ABIs parse")
    }

    #[test]
    fn every_bundled_abi_parses() {
        let registry = registry();
        for interface in ContractInterface::ALL {
            assert!(registry.abi(interface).functions().count() > 0, "{interface}");
        }
    }

    #[test]
    fn solver_selection_is_a_pure_function_of_the_name() {
        let names = [None, Some("Enso"), Some("Bungee"), Some("LI.FI"), Some("lido"), Some("Odos")];
        for name in names {
            let first = ContractInterface::for_solver(&Solver::from(name.map(str::to_string)));
            let second = ContractInterface::for_solver(&Solver::from(name.map(str::to_string)));
            assert_eq!(first, second);
        }
        assert_eq!(ContractInterface::for_solver(&Solver::Enso), ContractInterface::Router);
        assert_eq!(ContractInterface::for_solver(&Solver::None), ContractInterface::Router);
        assert_eq!(
            ContractInterface::for_solver(&Solver::Bungee),
            ContractInterface::BungeeGateway
        );
        assert_eq!(ContractInterface::for_solver(&Solver::Lifi), ContractInterface::LifiDiamond);
    }

    #[test]
    fn lending_interface_follows_chain() {
        assert_eq!(ContractInterface::for_lending(1), ContractInterface::LendingPool);
        assert_eq!(ContractInterface::for_lending(8453), ContractInterface::L2LendingPool);
        assert_eq!(ContractInterface::for_deposit(&Solver::Lido), ContractInterface::LidoStaking);
        assert_eq!(ContractInterface::for_deposit(&Solver::Enso), ContractInterface::Router);
    }

    #[test]
    fn decodes_token_transfer() {
        let registry = registry();
        let to = Address::repeat_byte(0x11);
        let data = registry
            .abi(ContractInterface::Erc20)
            .function("transfer")
            .unwrap()
            .encode_input(&[Token::Address(to), Token::Uint(U256::from(500u64))])
            .unwrap();

        let decoded = registry
            .decode(ContractInterface::Erc20, &Bytes::from(data))
            .unwrap();
        assert_eq!(decoded.method, "transfer");
        assert_eq!(
            decoded.args,
            vec![Token::Address(to), Token::Uint(U256::from(500u64))]
        );
    }

    #[test]
    fn decodes_packed_l2_overload() {
        let registry = registry();
        let packed = [7u8; 32];
        let data = registry
            .abi(ContractInterface::L2LendingPool)
            .functions_by_name("borrow")
            .unwrap()
            .iter()
            .find(|f| f.inputs.len() == 1)
            .unwrap()
            .encode_input(&[Token::FixedBytes(packed.to_vec())])
            .unwrap();

        let decoded = registry
            .decode(ContractInterface::L2LendingPool, &Bytes::from(data))
            .unwrap();
        assert_eq!(decoded.method, "borrow");
        assert_eq!(decoded.args, vec![Token::FixedBytes(packed.to_vec())]);
    }

    #[test]
    fn rejects_foreign_or_short_call_data() {
        let registry = registry();
        let short = registry.decode(ContractInterface::Router, &Bytes::from(vec![0x01, 0x02]));
        assert!(matches!(short, Err(CustomError::DecodeError(_))));

        let approve = registry
            .abi(ContractInterface::Erc20)
            .function("approve")
            .unwrap()
            .encode_input(&[Token::Address(Address::zero()), Token::Uint(U256::one())])
            .unwrap();
        let foreign = registry.decode(ContractInterface::EnsController, &Bytes::from(approve));
        assert!(matches!(foreign, Err(CustomError::DecodeError(_))));
    }
}
