use crate::{
    from_be_bytes_slice_and_advance_buf, macros::put_uint_checked, DecodingError, EncodingError,
};

use alloy_primitives::{
    bytes::{Buf, BufMut},
    Address, Bytes, FixedBytes, B256, U256,
};
use rollup_sync_primitives::L2Transaction;

/// The unit of the `gasPriceScale` field: the gas price of a transaction is
/// `gas_price_scale * GAS_PRICE_SCALE_UNIT`.
pub const GAS_PRICE_SCALE_UNIT: u64 = 1_000_000_000;

const SIGNATURE_BYTES: usize = 65;
const CREATE_EOA_BODY_BYTES: usize = SIGNATURE_BYTES + 32;
const EIP155_FIXED_BODY_BYTES: usize = SIGNATURE_BYTES + 2 + 1 + 3 + 20;
const NONCE_BYTES: usize = 3;

/// The type tag of a [`CtcTransaction`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum CtcTransactionType {
    /// Deploys the account contract of the signer.
    CreateEoa = 0,
    /// An EIP-155 signed transaction.
    Eip155 = 1,
}

impl TryFrom<u8> for CtcTransactionType {
    type Error = DecodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CreateEoa),
            1 => Ok(Self::Eip155),
            tag => Err(DecodingError::UnknownTransactionType(tag)),
        }
    }
}

/// The serialized form of a sequenced transaction, carried as the data of a sequenced
/// [`crate::ChainElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtcTransaction {
    /// Deploys the account contract for the signer of `hash`.
    CreateEoa {
        /// The `r || s || v` signature.
        signature: FixedBytes<65>,
        /// The signed message hash.
        hash: B256,
    },
    /// A compressed EIP-155 transaction.
    Eip155 {
        /// The `r || s || v` signature.
        signature: FixedBytes<65>,
        /// The gas limit.
        gas_limit: u16,
        /// The gas price in [`GAS_PRICE_SCALE_UNIT`].
        gas_price_scale: u8,
        /// The sender nonce, 24 bits wide.
        nonce: u32,
        /// The recipient.
        target: Address,
        /// The input data.
        data: Bytes,
    },
}

impl CtcTransaction {
    /// Returns the type tag of the transaction.
    pub const fn tx_type(&self) -> CtcTransactionType {
        match self {
            Self::CreateEoa { .. } => CtcTransactionType::CreateEoa,
            Self::Eip155 { .. } => CtcTransactionType::Eip155,
        }
    }

    /// Returns the signature of the transaction.
    pub const fn signature(&self) -> &FixedBytes<65> {
        match self {
            Self::CreateEoa { signature, .. } | Self::Eip155 { signature, .. } => signature,
        }
    }

    /// Returns the gas price of the transaction, zero for [`CtcTransaction::CreateEoa`].
    pub fn gas_price(&self) -> U256 {
        match self {
            Self::CreateEoa { .. } => U256::ZERO,
            Self::Eip155 { gas_price_scale, .. } => {
                U256::from(*gas_price_scale) * U256::from(GAS_PRICE_SCALE_UNIT)
            }
        }
    }

    /// Encodes the transaction, prefixed by its type tag.
    pub fn encode(&self) -> Result<Bytes, EncodingError> {
        let mut out = Vec::with_capacity(1 + self.body_length());
        out.put_u8(self.tx_type() as u8);

        match self {
            Self::CreateEoa { signature, hash } => {
                out.put_slice(signature.as_slice());
                out.put_slice(hash.as_slice());
            }
            Self::Eip155 { signature, gas_limit, gas_price_scale, nonce, target, data } => {
                out.put_slice(signature.as_slice());
                out.put_u16(*gas_limit);
                out.put_u8(*gas_price_scale);
                let buf = &mut out;
                put_uint_checked!(buf, "nonce", *nonce as u64, NONCE_BYTES);
                out.put_slice(target.as_slice());
                out.put_slice(data);
            }
        }

        Ok(out.into())
    }

    /// Decodes a transaction from its tagged serialization.
    pub fn decode(input: &[u8]) -> Result<Self, DecodingError> {
        let buf = &mut &*input;
        if buf.is_empty() {
            return Err(DecodingError::MissingTransactionType)
        }
        let tx_type = CtcTransactionType::try_from(buf.get_u8())?;

        match tx_type {
            CtcTransactionType::CreateEoa => {
                if buf.len() < CREATE_EOA_BODY_BYTES {
                    return Err(DecodingError::Eof)
                }
                if buf.len() > CREATE_EOA_BODY_BYTES {
                    return Err(DecodingError::TrailingBytes(buf.len() - CREATE_EOA_BODY_BYTES))
                }
                let signature = FixedBytes::<65>::from_slice(&buf[..SIGNATURE_BYTES]);
                buf.advance(SIGNATURE_BYTES);
                let hash = B256::from_slice(&buf[..32]);

                Ok(Self::CreateEoa { signature, hash })
            }
            CtcTransactionType::Eip155 => {
                if buf.len() < EIP155_FIXED_BODY_BYTES {
                    return Err(DecodingError::Eof)
                }
                let signature = FixedBytes::<65>::from_slice(&buf[..SIGNATURE_BYTES]);
                buf.advance(SIGNATURE_BYTES);
                let gas_limit = from_be_bytes_slice_and_advance_buf!(u16, buf);
                let gas_price_scale = buf.get_u8();
                let nonce = from_be_bytes_slice_and_advance_buf!(u32, NONCE_BYTES, buf);
                let target = Address::from_slice(&buf[..20]);
                buf.advance(20);
                let data = Bytes::copy_from_slice(&buf[..]);

                Ok(Self::Eip155 { signature, gas_limit, gas_price_scale, nonce, target, data })
            }
        }
    }

    fn body_length(&self) -> usize {
        match self {
            Self::CreateEoa { .. } => CREATE_EOA_BODY_BYTES,
            Self::Eip155 { data, .. } => EIP155_FIXED_BODY_BYTES + data.len(),
        }
    }
}

impl TryFrom<&L2Transaction> for CtcTransaction {
    type Error = EncodingError;

    /// Compresses a signed sequencer transaction into its [`CtcTransaction::Eip155`] form.
    fn try_from(tx: &L2Transaction) -> Result<Self, Self::Error> {
        let hash = tx.hash();
        let signature = tx.signature.as_ref().ok_or(EncodingError::MissingSignature(hash))?;
        let target = tx.to().ok_or(EncodingError::ContractCreation(hash))?;
        let fields = &tx.tx;

        let gas_limit = u16::try_from(fields.gas_limit).map_err(|_| {
            EncodingError::FieldOverflow { field: "gasLimit", value: fields.gas_limit, size: 2 }
        })?;

        let unit = u128::from(GAS_PRICE_SCALE_UNIT);
        if fields.gas_price % unit != 0 {
            return Err(EncodingError::InexactGasPrice(hash))
        }
        let scale = fields.gas_price / unit;
        let gas_price_scale = u8::try_from(scale).map_err(|_| EncodingError::FieldOverflow {
            field: "gasPriceScale",
            value: u64::try_from(scale).unwrap_or(u64::MAX),
            size: 1,
        })?;

        if fields.nonce >> (NONCE_BYTES * 8) != 0 {
            return Err(EncodingError::FieldOverflow {
                field: "nonce",
                value: fields.nonce,
                size: NONCE_BYTES,
            })
        }

        Ok(Self::Eip155 {
            signature: signature.as_bytes().into(),
            gas_limit,
            gas_price_scale,
            nonce: fields.nonce as u32,
            target,
            data: fields.input.clone(),
        })
    }
}
