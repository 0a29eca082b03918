//! Router contract binding and swap call arguments

use crate::error::{SwapError, SwapResult};
use crate::quote::Quote;

use ethers::abi::parse_abi;
use ethers::contract::BaseContract;
use ethers::types::{Address, Bytes, H160, U256};

/// Sentinel address the aggregator uses for the chain's native asset
pub const NATIVE_TOKEN: Address = H160([0xee; 20]);

/// Router method taking the six swap arguments
pub const PROXIED_SWAP: &str = "proxiedSwap";

const ROUTER_ABI: &[&str] = &[
    "function proxiedSwap(bytes swapCallData, address feeToken, address inputToken, uint256 sellAmount, address outputToken, uint256 feeAmount) external payable",
];

/// Positional form of [`SwapArguments`], in ABI order
pub type SwapTuple = (Bytes, Address, Address, U256, Address, U256);

/// Arguments of a router swap call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapArguments {
    /// Aggregator calldata forwarded by the router
    pub calldata: Bytes,
    pub fee_token: Address,
    pub input_token: Address,
    pub sell_amount: U256,
    pub output_token: Address,
    pub fee_amount: U256,
}

impl SwapArguments {
    /// Arguments for executing `quote`, charging `fee_amount` of `fee_token`
    pub fn from_quote(quote: &Quote, fee_token: Address, fee_amount: U256) -> Self {
        Self {
            calldata: quote.data.clone(),
            fee_token,
            input_token: quote.sell_token_address,
            sell_amount: quote.sell_amount,
            output_token: quote.buy_token_address,
            fee_amount,
        }
    }

    /// Native asset the call must carry: the sell amount when selling the
    /// native asset plus the fee when the fee is paid in it
    pub fn native_value(&self) -> U256 {
        let mut value = U256::zero();
        if self.input_token == NATIVE_TOKEN {
            value += self.sell_amount;
        }
        if self.fee_token == NATIVE_TOKEN {
            value += self.fee_amount;
        }
        value
    }

    pub fn to_abi_tuple(&self) -> SwapTuple {
        (
            self.calldata.clone(),
            self.fee_token,
            self.input_token,
            self.sell_amount,
            self.output_token,
            self.fee_amount,
        )
    }

    pub fn from_abi_tuple(tuple: SwapTuple) -> Self {
        let (calldata, fee_token, input_token, sell_amount, output_token, fee_amount) = tuple;
        Self {
            calldata,
            fee_token,
            input_token,
            sell_amount,
            output_token,
            fee_amount,
        }
    }
}

/// Who signs calls made through a contract binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerKind {
    /// Account managed by a live wallet connection
    JsonRpc(Address),
    /// Key held in process
    Local(Address),
    /// No signer attached
    ReadOnly,
}

impl SignerKind {
    pub fn address(&self) -> Option<Address> {
        match self {
            SignerKind::JsonRpc(address) | SignerKind::Local(address) => Some(*address),
            SignerKind::ReadOnly => None,
        }
    }
}

/// Swap router deployed at `address`
#[derive(Debug, Clone)]
pub struct RouterContract {
    address: Address,
    abi: BaseContract,
    signer: SignerKind,
}

impl RouterContract {
    pub fn new(address: Address, signer: SignerKind) -> SwapResult<Self> {
        let abi = parse_abi(ROUTER_ABI)
            .map_err(|e| SwapError::Contract(format!("Invalid router ABI: {}", e)))?;

        Ok(Self {
            address,
            abi: BaseContract::from(abi),
            signer,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &SignerKind {
        &self.signer
    }

    /// ABI-encode `method` with the swap arguments in positional order
    pub fn encode_call(&self, method: &str, args: &SwapArguments) -> SwapResult<Bytes> {
        self.abi
            .encode(method, args.to_abi_tuple())
            .map_err(|e| SwapError::Contract(format!("Cannot encode {}: {}", method, e)))
    }

    /// Decode calldata produced by [`RouterContract::encode_call`]
    pub fn decode_call(&self, method: &str, data: &Bytes) -> SwapResult<SwapArguments> {
        self.abi
            .decode::<SwapTuple, _>(method, data)
            .map(SwapArguments::from_abi_tuple)
            .map_err(|e| SwapError::Contract(format!("Cannot decode {}: {}", method, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::id;

    fn usdc() -> Address {
        "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse().unwrap()
    }

    fn router() -> RouterContract {
        RouterContract::new(Address::repeat_byte(0x11), SignerKind::JsonRpc(Address::repeat_byte(0x22)))
            .unwrap()
    }

    #[test]
    fn test_native_sentinel_matches_aggregator_address() {
        let parsed: Address = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".parse().unwrap();
        assert_eq!(parsed, NATIVE_TOKEN);
    }

    #[test]
    fn test_encode_uses_proxied_swap_selector() {
        let args = SwapArguments {
            calldata: Bytes::from(vec![0xd9, 0x62, 0x7a, 0xa4]),
            fee_token: NATIVE_TOKEN,
            input_token: NATIVE_TOKEN,
            sell_amount: U256::from(10_000_000_000_000_000u64),
            output_token: usdc(),
            fee_amount: U256::zero(),
        };

        let data = router().encode_call(PROXIED_SWAP, &args).unwrap();
        assert_eq!(
            data[..4],
            id("proxiedSwap(bytes,address,address,uint256,address,uint256)")
        );
    }

    #[test]
    fn test_positional_order_survives_empty_calldata() {
        let args = SwapArguments {
            calldata: Bytes::new(),
            fee_token: Address::repeat_byte(0x01),
            input_token: Address::repeat_byte(0x02),
            sell_amount: U256::from(3),
            output_token: Address::repeat_byte(0x04),
            fee_amount: U256::from(5),
        };
        let contract = router();

        let data = contract.encode_call(PROXIED_SWAP, &args).unwrap();
        let decoded = contract.decode_call(PROXIED_SWAP, &data).unwrap();
        assert_eq!(decoded, args);

        // Static head words follow the bytes offset in declaration order
        assert_eq!(data[4 + 32 + 12..4 + 64], [0x01; 20]);
        assert_eq!(data[4 + 64 + 12..4 + 96], [0x02; 20]);
        assert_eq!(data[4 + 96 + 31], 3);
        assert_eq!(data[4 + 128 + 12..4 + 160], [0x04; 20]);
        assert_eq!(data[4 + 160 + 31], 5);
    }

    #[test]
    fn test_unknown_method_is_contract_error() {
        let args = SwapArguments::from_abi_tuple((
            Bytes::new(),
            Address::zero(),
            Address::zero(),
            U256::zero(),
            Address::zero(),
            U256::zero(),
        ));
        let err = router().encode_call("swap", &args).unwrap_err();
        assert!(matches!(err, SwapError::Contract(_)));
    }

    #[test]
    fn test_native_value_for_eth_sell_with_zero_fee() {
        let quote: Quote = serde_json::from_value(serde_json::json!({
            "price": "1831.52",
            "guaranteedPrice": "1813.20",
            "buyTokenAddress": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "sellTokenAddress": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
            "buyAmount": "18315200",
            "sellAmount": "10000000000000000",
            "data": "0xd9627aa4"
        }))
        .unwrap();

        let args = SwapArguments::from_quote(&quote, NATIVE_TOKEN, U256::zero());
        assert_eq!(args.native_value(), U256::from(10_000_000_000_000_000u64));
        assert_eq!(format!("{:#x}", args.fee_amount), "0x0");
        assert_eq!(args.output_token, usdc());
    }

    #[test]
    fn test_native_value_for_token_sell_with_native_fee() {
        let args = SwapArguments {
            calldata: Bytes::new(),
            fee_token: NATIVE_TOKEN,
            input_token: usdc(),
            sell_amount: U256::from(1_000_000u64),
            output_token: NATIVE_TOKEN,
            fee_amount: U256::from(500u64),
        };
        assert_eq!(args.native_value(), U256::from(500u64));
        assert_eq!(SignerKind::ReadOnly.address(), None);
    }
}
