use rmpv::Value;

/// The raw unsigned transactions the resolver returned for one payment.
///
/// Order matters: the ledger settles the group atomically using the grouping
/// metadata embedded in each transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionGroup {
    transactions: Vec<Vec<u8>>,
}

impl TransactionGroup {
    pub fn new(transactions: Vec<Vec<u8>>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Vec<u8>] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// A decoded unsigned transaction: a msgpack map with a string `type` field.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    fields: Value,
    kind: String,
}

impl UnsignedTransaction {
    /// Decodes exactly one msgpack map from `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let mut cursor = bytes;
        let fields = rmpv::decode::read_value(&mut cursor).map_err(|e| e.to_string())?;
        if !cursor.is_empty() {
            return Err(format!("{} trailing bytes", cursor.len()));
        }
        let map = fields.as_map().ok_or("transaction is not a map")?;
        let kind = map
            .iter()
            .find(|(key, _)| key.as_str() == Some("type"))
            .and_then(|(_, value)| value.as_str())
            .ok_or("transaction has no type")?
            .to_string();
        Ok(Self { fields, kind })
    }

    /// The transaction type tag, e.g. `pay` or `axfer`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn fields(&self) -> &Value {
        &self.fields
    }

    /// Raw `snd` public key bytes, if the field is present.
    pub fn sender(&self) -> Option<&[u8]> {
        self.fields
            .as_map()?
            .iter()
            .find(|(key, _)| key.as_str() == Some("snd"))
            .and_then(|(_, value)| match value {
                Value::Binary(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
    }
}

/// Signed transactions in the same order as their source group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedGroup {
    transactions: Vec<Vec<u8>>,
}

impl SignedGroup {
    pub fn new(transactions: Vec<Vec<u8>>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Vec<u8>] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Wire form accepted by the ledger node: the signed blobs back to back.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.transactions.concat()
    }
}
