//! The JSON types served by the data transport service.

use crate::ProviderError;

use alloy_primitives::{normalize_v, Address, Bytes, Signature, TxKind, B256, U256};
use rollup_sync_primitives::{
    EthContext, L2Transaction, QueueOrigin, SignatureHashType, TransactionMeta, TxLegacy,
};

/// An L1 to L2 queue element. All fields are null when the element does not exist.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueResponse {
    /// The queue index.
    pub index: Option<u64>,
    /// The recipient on L2.
    pub target: Option<Address>,
    /// The calldata.
    pub data: Option<Bytes>,
    /// The L2 gas limit.
    pub gas_limit: Option<u64>,
    /// The L1 sender.
    pub origin: Option<Address>,
    /// The L1 block number of the enqueue.
    pub block_number: Option<u64>,
    /// The L1 timestamp of the enqueue.
    pub timestamp: Option<u64>,
    /// The index of the element in the canonical transaction chain, once included.
    pub ctc_index: Option<u64>,
}

impl EnqueueResponse {
    /// Converts the queue element into an L1 to L2 transaction, returning [`None`] if the element
    /// does not exist.
    pub fn into_transaction(self) -> Result<Option<L2Transaction>, ProviderError> {
        let Some(queue_index) = self.index else { return Ok(None) };

        let missing = |field| ProviderError::MalformedRecord { kind: "enqueue", field };
        let target = self.target.ok_or_else(|| missing("target"))?;
        let gas_limit = self.gas_limit.ok_or_else(|| missing("gasLimit"))?;
        let origin = self.origin.ok_or_else(|| missing("origin"))?;
        let block_number = self.block_number.ok_or_else(|| missing("blockNumber"))?;
        let timestamp = self.timestamp.ok_or_else(|| missing("timestamp"))?;

        let mut meta = TransactionMeta::new(
            block_number,
            timestamp,
            Some(origin),
            SignatureHashType::Eip155,
            QueueOrigin::L1ToL2,
        );
        meta.index = self.ctc_index;
        meta.queue_index = Some(queue_index);

        let tx = TxLegacy {
            nonce: queue_index,
            gas_limit,
            to: TxKind::Call(target),
            input: self.data.unwrap_or_default(),
            ..Default::default()
        };
        Ok(Some(L2Transaction::new(tx, None, meta)))
    }
}

/// The queue origin as served by the data transport service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QueueOriginResponse {
    /// Sequencer transaction.
    #[serde(rename = "sequencer")]
    Sequencer,
    /// L1 to L2 transaction.
    #[serde(rename = "l1")]
    L1,
}

impl From<QueueOriginResponse> for QueueOrigin {
    fn from(value: QueueOriginResponse) -> Self {
        match value {
            QueueOriginResponse::Sequencer => Self::Sequencer,
            QueueOriginResponse::L1 => Self::L1ToL2,
        }
    }
}

/// The signature type as served by the data transport service.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignatureTypeResponse {
    /// EIP-155 signature.
    #[serde(rename = "EIP155")]
    Eip155,
    /// `eth_sign` signature.
    #[serde(rename = "ETH_SIGN")]
    EthSign,
}

impl From<SignatureTypeResponse> for SignatureHashType {
    fn from(value: SignatureTypeResponse) -> Self {
        match value {
            SignatureTypeResponse::Eip155 => Self::Eip155,
            SignatureTypeResponse::EthSign => Self::EthSign,
        }
    }
}

/// A decoded signature.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignatureResponse {
    /// The r value.
    pub r: B256,
    /// The s value.
    pub s: B256,
    /// The recovery id, possibly EIP-155 encoded.
    pub v: u64,
}

impl SignatureResponse {
    /// Returns the [`Signature`], or [`None`] if `v` is not a valid recovery id.
    pub fn signature(&self) -> Option<Signature> {
        let y_parity = normalize_v(self.v)?;
        Some(Signature::new(U256::from_be_bytes(self.r.0), U256::from_be_bytes(self.s.0), y_parity))
    }
}

/// The decoded body of a sequencer transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransactionResponse {
    /// The signature.
    pub sig: SignatureResponse,
    /// The gas limit.
    pub gas_limit: u64,
    /// The gas price.
    pub gas_price: u64,
    /// The sender nonce.
    pub nonce: u64,
    /// The recipient, null for contract creations.
    pub target: Option<Address>,
    /// The calldata.
    pub data: Bytes,
}

/// A canonical transaction chain element.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The index in the canonical transaction chain.
    pub index: u64,
    /// The index of the batch holding the element.
    pub batch_index: u64,
    /// The L1 block number of the element.
    pub block_number: u64,
    /// The L1 timestamp of the element.
    pub timestamp: u64,
    /// The gas limit.
    pub gas_limit: u64,
    /// The recipient.
    pub target: Option<Address>,
    /// The L1 sender of a queue element.
    pub origin: Option<Address>,
    /// The raw element data.
    pub data: Bytes,
    /// The origin of the element.
    pub queue_origin: QueueOriginResponse,
    /// The signature type of a sequencer element.
    #[serde(rename = "type")]
    pub signature_type: SignatureTypeResponse,
    /// The queue index of a queue element.
    pub queue_index: Option<u64>,
    /// The decoded body of a sequencer element.
    pub decoded: Option<DecodedTransactionResponse>,
}

/// The batch holding a canonical transaction chain element.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchResponse {
    /// The batch index.
    pub index: u64,
    /// The L1 block number of the batch submission.
    pub block_number: u64,
    /// The L1 timestamp of the batch submission.
    pub timestamp: u64,
    /// The number of elements in the batch.
    pub size: u64,
    /// The number of elements before the batch.
    pub prev_total_elements: u64,
}

/// The response of the transaction endpoints.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionResponse {
    /// The element, null if it does not exist.
    pub transaction: Option<TransactionRecord>,
    /// The batch holding the element.
    pub batch: Option<BatchResponse>,
}

impl TransactionResponse {
    /// Converts the response into an L2 transaction, returning [`None`] if the element does not
    /// exist.
    pub fn into_transaction(self) -> Result<Option<L2Transaction>, ProviderError> {
        let Some(record) = self.transaction else { return Ok(None) };

        let mut meta = TransactionMeta::new(
            record.block_number,
            record.timestamp,
            None,
            record.signature_type.into(),
            record.queue_origin.into(),
        );
        meta.index = Some(record.index);

        let tx = match record.queue_origin {
            QueueOriginResponse::Sequencer => {
                let decoded = record.decoded.ok_or(ProviderError::MalformedRecord {
                    kind: "transaction",
                    field: "decoded",
                })?;
                let signature = decoded.sig.signature().ok_or(ProviderError::MalformedRecord {
                    kind: "transaction",
                    field: "sig.v",
                })?;
                let tx = TxLegacy {
                    nonce: decoded.nonce,
                    gas_price: decoded.gas_price.into(),
                    gas_limit: decoded.gas_limit,
                    to: decoded.target.into(),
                    value: U256::ZERO,
                    input: decoded.data,
                    ..Default::default()
                };
                L2Transaction::new(tx, Some(signature), meta)
            }
            QueueOriginResponse::L1 => {
                let queue_index = record.queue_index.ok_or(ProviderError::MalformedRecord {
                    kind: "transaction",
                    field: "queueIndex",
                })?;
                meta.l1_message_sender = record.origin;
                meta.queue_index = Some(queue_index);
                let tx = TxLegacy {
                    nonce: queue_index,
                    gas_limit: record.gas_limit,
                    to: record.target.into(),
                    input: record.data,
                    ..Default::default()
                };
                L2Transaction::new(tx, None, meta)
            }
        };

        Ok(Some(tx))
    }
}

/// An L1 context.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthContextResponse {
    /// The L1 block number.
    pub block_number: u64,
    /// The L1 block hash.
    pub block_hash: B256,
    /// The L1 timestamp.
    pub timestamp: u64,
}

impl From<EthContextResponse> for EthContext {
    fn from(value: EthContextResponse) -> Self {
        Self::new(value.block_number, value.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};

    #[test]
    fn test_should_convert_enqueue() -> eyre::Result<()> {
        let raw = r#"{
            "index": 3,
            "target": "0x4200000000000000000000000000000000000007",
            "data": "0xdeadbeef",
            "gasLimit": 1000000,
            "origin": "0x00000000000000000000000000000000000000aa",
            "blockNumber": 11000000,
            "timestamp": 1600000000,
            "ctcIndex": null
        }"#;
        let enqueue: EnqueueResponse = serde_json::from_str(raw)?;
        let tx = enqueue.into_transaction()?.ok_or_else(|| eyre::eyre!("missing transaction"))?;

        assert_eq!(tx.tx.nonce, 3);
        assert_eq!(tx.tx.gas_price, 0);
        assert_eq!(tx.tx.value, U256::ZERO);
        assert_eq!(tx.tx.gas_limit, 1_000_000);
        assert_eq!(tx.to(), Some(address!("0x4200000000000000000000000000000000000007")));
        assert_eq!(tx.tx.input, bytes!("deadbeef"));
        assert_eq!(
            tx.meta.l1_message_sender,
            Some(address!("0x00000000000000000000000000000000000000aa"))
        );
        assert_eq!(tx.meta.queue_origin, QueueOrigin::L1ToL2);
        assert_eq!(tx.meta.signature_hash_type, SignatureHashType::Eip155);
        assert_eq!(tx.queue_index(), Some(3));
        assert_eq!(tx.index(), None);
        Ok(())
    }

    #[test]
    fn test_should_handle_missing_enqueue() -> eyre::Result<()> {
        let raw = r#"{
            "index": null, "target": null, "data": null, "gasLimit": null,
            "origin": null, "blockNumber": null, "timestamp": null, "ctcIndex": null
        }"#;
        let enqueue: EnqueueResponse = serde_json::from_str(raw)?;
        assert_eq!(enqueue.into_transaction()?, None);

        let partial = EnqueueResponse { index: Some(1), ..Default::default() };
        assert!(matches!(
            partial.into_transaction(),
            Err(ProviderError::MalformedRecord { kind: "enqueue", field: "target" })
        ));
        Ok(())
    }

    #[test]
    fn test_should_convert_sequencer_transaction() -> eyre::Result<()> {
        let raw = r#"{
            "transaction": {
                "index": 12,
                "batchIndex": 1,
                "blockNumber": 11000001,
                "timestamp": 1600000015,
                "gasLimit": 0,
                "target": "0x4200000000000000000000000000000000000005",
                "origin": null,
                "data": "0x01",
                "queueOrigin": "sequencer",
                "type": "EIP155",
                "queueIndex": null,
                "decoded": {
                    "sig": {
                        "r": "0x0000000000000000000000000000000000000000000000000000000000000001",
                        "s": "0x0000000000000000000000000000000000000000000000000000000000000002",
                        "v": 1
                    },
                    "gasLimit": 21000,
                    "gasPrice": 1000000000,
                    "nonce": 5,
                    "target": "0x00000000000000000000000000000000000000bb",
                    "data": "0x1234"
                }
            },
            "batch": {
                "index": 1,
                "blockNumber": 11000010,
                "timestamp": 1600000100,
                "size": 20,
                "prevTotalElements": 10
            }
        }"#;
        let response: TransactionResponse = serde_json::from_str(raw)?;
        assert_eq!(response.batch.as_ref().map(|batch| batch.size), Some(20));

        let tx = response.into_transaction()?.ok_or_else(|| eyre::eyre!("missing transaction"))?;
        assert_eq!(tx.tx.nonce, 5);
        assert_eq!(tx.tx.gas_limit, 21_000);
        assert_eq!(tx.tx.gas_price, 1_000_000_000);
        assert_eq!(tx.to(), Some(address!("0x00000000000000000000000000000000000000bb")));
        assert_eq!(tx.tx.input, bytes!("1234"));
        assert_eq!(tx.signature, Some(Signature::new(U256::from(1), U256::from(2), true)));
        assert_eq!(tx.meta.queue_origin, QueueOrigin::Sequencer);
        assert_eq!(tx.meta.l1_block_number, 11_000_001);
        assert_eq!(tx.index(), Some(12));
        assert_eq!(tx.queue_index(), None);
        Ok(())
    }

    #[test]
    fn test_should_convert_queue_transaction() -> eyre::Result<()> {
        let raw = r#"{
            "transaction": {
                "index": 13,
                "batchIndex": 1,
                "blockNumber": 11000002,
                "timestamp": 1600000030,
                "gasLimit": 500000,
                "target": "0x4200000000000000000000000000000000000007",
                "origin": "0x00000000000000000000000000000000000000aa",
                "data": "0xabcd",
                "queueOrigin": "l1",
                "type": "EIP155",
                "queueIndex": 4,
                "decoded": null
            },
            "batch": null
        }"#;
        let response: TransactionResponse = serde_json::from_str(raw)?;
        let tx = response.into_transaction()?.ok_or_else(|| eyre::eyre!("missing transaction"))?;

        assert_eq!(tx.tx.nonce, 4);
        assert_eq!(tx.tx.gas_limit, 500_000);
        assert_eq!(tx.signature, None);
        assert_eq!(
            tx.meta.l1_message_sender,
            Some(address!("0x00000000000000000000000000000000000000aa"))
        );
        assert_eq!(tx.meta.queue_origin, QueueOrigin::L1ToL2);
        assert_eq!((tx.index(), tx.queue_index()), (Some(13), Some(4)));

        let invalid = SignatureResponse { v: 5, ..Default::default() };
        assert_eq!(invalid.signature(), None);

        let empty: TransactionResponse =
            serde_json::from_str(r#"{"transaction": null, "batch": null}"#)?;
        assert_eq!(empty.into_transaction()?, None);
        Ok(())
    }
}
