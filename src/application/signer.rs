use crate::domain::account::Account;
use crate::domain::group::{SignedGroup, TransactionGroup, UnsignedTransaction};
use crate::error::SigningError;
use rmpv::Value;
use std::sync::Arc;
use tracing::debug;

/// Domain separation prefix the ledger expects in front of signed transaction bytes.
const TX_TAG: &[u8] = b"TX";

/// Signs whole transaction groups with the held account key.
///
/// A group is signed in full or not at all: one undecodable transaction fails the
/// whole group.
#[derive(Debug, Clone)]
pub struct GroupSigner {
    account: Arc<Account>,
}

impl GroupSigner {
    pub fn new(account: Arc<Account>) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn sign(&self, group: &TransactionGroup) -> Result<SignedGroup, SigningError> {
        if group.is_empty() {
            return Err(SigningError::EmptyGroup);
        }

        let decoded = group
            .transactions()
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                UnsignedTransaction::decode(raw)
                    .map_err(|message| SigningError::Decode { index, message })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let signed = decoded
            .iter()
            .enumerate()
            .map(|(index, txn)| {
                debug!(index, kind = txn.kind(), "Signing transaction");
                self.sign_transaction(txn)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SignedGroup::new(signed))
    }

    fn sign_transaction(&self, txn: &UnsignedTransaction) -> Result<Vec<u8>, SigningError> {
        let txn_bytes = encode(txn.fields())?;
        let mut message = Vec::with_capacity(TX_TAG.len() + txn_bytes.len());
        message.extend_from_slice(TX_TAG);
        message.extend_from_slice(&txn_bytes);
        let signature = self.account.sign(&message);

        // Keys in canonical (sorted) order. A missing `snd` is the zero address,
        // which never matches a real key.
        let signer = self.account.address();
        let mut signed = Vec::with_capacity(3);
        if txn.sender() != Some(signer.as_bytes().as_slice()) {
            signed.push((Value::from("sgnr"), Value::Binary(signer.as_bytes().to_vec())));
        }
        signed.push((Value::from("sig"), Value::Binary(signature.to_vec())));
        signed.push((Value::from("txn"), txn.fields().clone()));
        encode(&Value::Map(signed))
    }
}

fn encode(value: &Value) -> Result<Vec<u8>, SigningError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value).map_err(|e| SigningError::Encode(e.to_string()))?;
    Ok(buf)
}
