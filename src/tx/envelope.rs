//! Transaction envelopes: fee snapshot, populated (unsigned) transaction and
//! the normalized signed result

use crate::wallet::SignTransactionResponse;

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, NameOrAddress, U256};
use serde::Serialize;

/// Fee caps taken from the latest block, used as a snapshot at signing time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub max_base_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl FeeSchedule {
    pub fn new(max_base_fee_per_gas: U256, max_priority_fee_per_gas: U256) -> Self {
        Self {
            max_base_fee_per_gas,
            max_priority_fee_per_gas,
        }
    }
}

/// JSON-RPC quantity encoding (`0x0` for zero)
pub fn to_quantity(value: U256) -> String {
    format!("{:#x}", value)
}

/// Unsigned type-2 transaction with every field resolved except the signature
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedTransaction {
    request: Eip1559TransactionRequest,
}

impl PopulatedTransaction {
    /// Populate a router call. A missing or zero value becomes an explicit zero.
    pub fn new(
        from: Address,
        to: Address,
        data: Bytes,
        nonce: U256,
        gas_limit: U256,
        fees: &FeeSchedule,
        value: Option<U256>,
    ) -> Self {
        let request = Eip1559TransactionRequest::new()
            .from(from)
            .to(to)
            .data(data)
            .nonce(nonce)
            .gas(gas_limit)
            .max_fee_per_gas(fees.max_base_fee_per_gas)
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
            .value(value.unwrap_or_default());

        Self { request }
    }

    /// Attach the chain ID; serialization needs it for every wallet type
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.request = self.request.chain_id(chain_id);
        self
    }

    pub fn request(&self) -> &Eip1559TransactionRequest {
        &self.request
    }

    pub fn value(&self) -> U256 {
        self.request.value.unwrap_or_default()
    }

    /// Envelope with `from` stripped, as serialized for hash signing
    pub fn unsigned_without_sender(&self) -> TypedTransaction {
        let mut request = self.request.clone();
        request.from = None;
        TypedTransaction::Eip1559(request)
    }

    /// Payload for `eth_signTransaction`: numeric fields as hex quantities,
    /// no `chainId`
    pub fn sign_payload(&self) -> SignTransactionPayload {
        let quantity = |field: Option<U256>| to_quantity(field.unwrap_or_default());
        let gas = quantity(self.request.gas);

        SignTransactionPayload {
            from: self.request.from,
            to: match self.request.to {
                Some(NameOrAddress::Address(to)) => Some(to),
                _ => None,
            },
            data: self.request.data.clone().unwrap_or_default(),
            gas: gas.clone(),
            gas_limit: gas,
            max_fee_per_gas: quantity(self.request.max_fee_per_gas),
            max_priority_fee_per_gas: quantity(self.request.max_priority_fee_per_gas),
            nonce: quantity(self.request.nonce),
            tx_type: "0x2".to_string(),
            value: to_quantity(self.value()),
        }
    }
}

/// Body of the `eth_signTransaction` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTransactionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub data: Bytes,
    pub gas: String,
    pub gas_limit: String,
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
    pub nonce: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub value: String,
}

/// What a wallet hands back after signing
#[derive(Debug, Clone)]
pub enum SignedTransaction {
    /// Raw serialized transaction
    Raw(Bytes),
    /// `eth_signTransaction` response carrying `raw`
    Response(SignTransactionResponse),
}

impl SignedTransaction {
    /// `0x`-prefixed hex ready for `eth_sendRawTransaction`
    pub fn into_hex(self) -> String {
        let raw = match self {
            SignedTransaction::Raw(raw) => raw,
            SignedTransaction::Response(response) => response.raw,
        };
        format!("0x{}", hex::encode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fees() -> FeeSchedule {
        FeeSchedule::new(U256::from(200_000_000_000u64), U256::from(20_000_000_000u64))
    }

    fn populated(value: Option<U256>) -> PopulatedTransaction {
        PopulatedTransaction::new(
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0xbb),
            Bytes::from(vec![0x01, 0x02]),
            U256::from(7),
            U256::from(360_000),
            &fees(),
            value,
        )
        .with_chain_id(1)
    }

    #[test]
    fn test_quantities_are_minimal_hex() {
        assert_eq!(to_quantity(U256::zero()), "0x0");
        assert_eq!(to_quantity(U256::from(360_000)), "0x57e40");
    }

    #[test]
    fn test_zero_and_missing_value_become_explicit_zero() {
        assert_eq!(populated(None).request().value, Some(U256::zero()));
        assert_eq!(populated(Some(U256::zero())).sign_payload().value, "0x0");
    }

    #[test]
    fn test_large_value_keeps_full_precision() {
        let value = U256::from_dec_str("123456789012345678901234567890").unwrap();
        let payload = populated(Some(value)).sign_payload();
        assert_eq!(payload.value, "0x18ee90ff6c373e0ee4e3f0ad2");
        assert_eq!(U256::from_str_radix(&payload.value[2..], 16).unwrap(), value);
    }

    #[test]
    fn test_sign_payload_shape() {
        let payload = serde_json::to_value(populated(None).sign_payload()).unwrap();

        assert_eq!(payload["gas"], "0x57e40");
        assert_eq!(payload["gasLimit"], "0x57e40");
        assert_eq!(payload["maxFeePerGas"], "0x2e90edd000");
        assert_eq!(payload["maxPriorityFeePerGas"], "0x4a817c800");
        assert_eq!(payload["nonce"], "0x7");
        assert_eq!(payload["type"], "0x2");
        assert_eq!(payload["data"], "0x0102");
        assert!(payload.get("chainId").is_none());
    }

    #[test]
    fn test_stripping_sender_keeps_chain_id() {
        let tx = populated(None).unsigned_without_sender();
        assert!(tx.from().is_none());
        assert_eq!(tx.chain_id().map(|id| id.as_u64()), Some(1));
    }

    #[test]
    fn test_signed_response_normalizes_to_hex() {
        let response = SignTransactionResponse {
            raw: Bytes::from(vec![0x02, 0xf8]),
            tx: serde_json::Value::Null,
        };
        assert_eq!(SignedTransaction::Response(response).into_hex(), "0x02f8");
        assert_eq!(
            SignedTransaction::Raw(Bytes::from(vec![0xab])).into_hex(),
            "0xab"
        );
    }
}
