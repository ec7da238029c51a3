use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{Address, Signature, B256};

/// The origin of a transaction in the canonical transaction chain.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QueueOrigin {
    /// The transaction was ordered directly by the sequencer.
    #[default]
    #[display("sequencer")]
    Sequencer,
    /// The transaction was enqueued on L1 and forwarded through the L1 to L2 queue.
    #[display("l1")]
    L1ToL2,
}

/// The hashing scheme used to sign a transaction.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SignatureHashType {
    /// EIP-155 replay protected signature.
    #[default]
    #[display("EIP155")]
    Eip155,
    /// `eth_sign` style signature over the transaction hash.
    #[display("ETH_SIGN")]
    EthSign,
}

/// The rollup metadata attached to every L2 transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionMeta {
    /// The L1 block number the transaction is anchored at.
    pub l1_block_number: u64,
    /// The L1 timestamp the transaction is anchored at.
    pub l1_timestamp: u64,
    /// The L1 address that enqueued the transaction, only set for queue origin transactions.
    pub l1_message_sender: Option<Address>,
    /// The signature hashing scheme.
    pub signature_hash_type: SignatureHashType,
    /// The origin of the transaction.
    pub queue_origin: QueueOrigin,
    /// The position of the transaction in the canonical transaction chain, if included.
    pub index: Option<u64>,
    /// The position of the transaction in the L1 to L2 queue, if queue origin.
    pub queue_index: Option<u64>,
}

impl TransactionMeta {
    /// Returns a new [`TransactionMeta`] that has not yet been assigned a position in either
    /// stream.
    pub const fn new(
        l1_block_number: u64,
        l1_timestamp: u64,
        l1_message_sender: Option<Address>,
        signature_hash_type: SignatureHashType,
        queue_origin: QueueOrigin,
    ) -> Self {
        Self {
            l1_block_number,
            l1_timestamp,
            l1_message_sender,
            signature_hash_type,
            queue_origin,
            index: None,
            queue_index: None,
        }
    }

    /// Returns true if the transaction originated from the L1 to L2 queue.
    pub const fn is_l1_to_l2(&self) -> bool {
        matches!(self.queue_origin, QueueOrigin::L1ToL2)
    }
}

/// A transaction on the L2 chain, along with its rollup metadata.
///
/// L2 transactions use the legacy envelope. Queue origin transactions are not signed: their
/// sender is the L1 message sender carried by the metadata.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct L2Transaction {
    /// The transaction fields.
    pub tx: TxLegacy,
    /// The signature, [`None`] for queue origin transactions.
    pub signature: Option<Signature>,
    /// The rollup metadata.
    pub meta: TransactionMeta,
}

impl L2Transaction {
    /// Returns a new [`L2Transaction`].
    pub const fn new(tx: TxLegacy, signature: Option<Signature>, meta: TransactionMeta) -> Self {
        Self { tx, signature, meta }
    }

    /// Returns the hash of the transaction. The metadata is not part of the hash.
    pub fn hash(&self) -> B256 {
        match self.signature {
            Some(signature) => *self.tx.clone().into_signed(signature).hash(),
            None => self.tx.signature_hash(),
        }
    }

    /// Returns the recipient, [`None`] for contract creations.
    pub fn to(&self) -> Option<Address> {
        self.tx.to.to().copied()
    }

    /// Returns the position of the transaction in the canonical transaction chain.
    pub const fn index(&self) -> Option<u64> {
        self.meta.index
    }

    /// Returns the position of the transaction in the L1 to L2 queue.
    pub const fn queue_index(&self) -> Option<u64> {
        self.meta.queue_index
    }

    /// Returns true if the fields that the L1 commits to are equal between the two transactions:
    /// the target, the data, the L1 message sender and the gas limit.
    pub fn matches_l1_commitment(&self, other: &Self) -> bool {
        self.tx.to == other.tx.to &&
            self.tx.input == other.tx.input &&
            self.meta.l1_message_sender == other.meta.l1_message_sender &&
            self.tx.gas_limit == other.tx.gas_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes, TxKind, U256};

    fn transaction() -> L2Transaction {
        L2Transaction {
            tx: TxLegacy {
                nonce: 3,
                gas_price: 1_000_000_000,
                gas_limit: 21_000,
                to: TxKind::Call(address!("0x4200000000000000000000000000000000000005")),
                input: bytes!("1234"),
                ..Default::default()
            },
            signature: None,
            meta: TransactionMeta::new(
                10,
                1_600_000_000,
                Some(address!("0x00000000000000000000000000000000000000aa")),
                SignatureHashType::Eip155,
                QueueOrigin::L1ToL2,
            ),
        }
    }

    #[test]
    fn test_hash_ignores_meta() {
        let tx = transaction();
        let mut other = tx.clone();
        other.meta.index = Some(42);
        other.meta.queue_index = Some(7);
        assert_eq!(tx.hash(), other.hash());

        let mut signed = tx.clone();
        signed.signature = Some(Signature::new(U256::from(1), U256::from(2), false));
        assert_ne!(tx.hash(), signed.hash());
    }

    #[test]
    fn test_l1_commitment_comparison() {
        let tx = transaction();
        assert_eq!(tx.to(), Some(address!("0x4200000000000000000000000000000000000005")));

        let mut different_nonce = tx.clone();
        different_nonce.tx.nonce = 99;
        assert!(tx.matches_l1_commitment(&different_nonce));

        let mut different_sender = tx.clone();
        different_sender.meta.l1_message_sender = None;
        assert!(!tx.matches_l1_commitment(&different_sender));

        let mut different_gas = tx.clone();
        different_gas.tx.gas_limit += 1;
        assert!(!tx.matches_l1_commitment(&different_gas));
    }
}
