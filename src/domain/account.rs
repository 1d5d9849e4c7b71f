use crate::error::KeyError;
use bip39::Language;
use data_encoding::BASE32_NOPAD;
use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

/// Number of words in a wallet mnemonic: 24 data words plus one checksum word.
pub const MNEMONIC_WORDS: usize = 25;

const CHECKSUM_LEN: usize = 4;

/// A ledger address: an ed25519 public key rendered as base32 with a 4-byte checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 32]);

impl Address {
    pub fn from_public_key(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = Sha512_256::digest(self.0);
        let mut checksum = [0u8; CHECKSUM_LEN];
        checksum.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
        checksum
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(32 + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = BASE32_NOPAD
            .decode(s.trim().as_bytes())
            .map_err(|e| KeyError::InvalidAddress(e.to_string()))?;
        if raw.len() != 32 + CHECKSUM_LEN {
            return Err(KeyError::InvalidAddress(format!(
                "expected {} decoded bytes, found {}",
                32 + CHECKSUM_LEN,
                raw.len()
            )));
        }
        let (key, checksum) = raw.split_at(32);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(key);
        let address = Self(bytes);
        if address.checksum() != checksum {
            return Err(KeyError::InvalidAddress("checksum mismatch".to_string()));
        }
        Ok(address)
    }
}

/// The process-wide signing account.
///
/// Loaded once at startup and shared read-only with the signer. `Debug` never
/// prints key material.
pub struct Account {
    signing_key: SigningKey,
    address: Address,
}

impl Account {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Address::from_public_key(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Recovers the account from a 25-word wallet mnemonic.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, KeyError> {
        Ok(Self::from_seed(seed_from_mnemonic(phrase)?))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Decodes a wallet mnemonic into its 32-byte ed25519 seed.
///
/// Each word encodes 11 bits, packed little-endian. The 25th word carries the
/// first 11 bits of the SHA-512/256 digest of the seed.
pub fn seed_from_mnemonic(phrase: &str) -> Result<[u8; 32], KeyError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(KeyError::WordCount(words.len()));
    }

    let indices = words
        .iter()
        .map(|word| word_index(word))
        .collect::<Result<Vec<u16>, KeyError>>()?;
    let (data, checksum) = indices.split_at(MNEMONIC_WORDS - 1);

    let bytes = unpack_words(data);
    // 24 words carry 264 bits: a 32-byte seed followed by an all-zero byte.
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(KeyError::Checksum);
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);

    if checksum[0] != checksum_word(&seed) {
        return Err(KeyError::Checksum);
    }
    Ok(seed)
}

/// Encodes a seed as a 25-word wallet mnemonic.
pub fn mnemonic_from_seed(seed: &[u8; 32]) -> String {
    let list = Language::English.word_list();
    let mut indices = pack_words(seed);
    indices.push(checksum_word(seed));
    indices
        .into_iter()
        .map(|index| list[usize::from(index)])
        .collect::<Vec<_>>()
        .join(" ")
}

fn word_index(word: &str) -> Result<u16, KeyError> {
    let lowered = word.to_lowercase();
    Language::English
        .word_list()
        .iter()
        .position(|candidate| *candidate == lowered)
        .map(|index| index as u16)
        .ok_or_else(|| KeyError::UnknownWord(word.to_string()))
}

fn checksum_word(seed: &[u8; 32]) -> u16 {
    let digest = Sha512_256::digest(seed);
    pack_words(&digest[..2])[0]
}

fn pack_words(bytes: &[u8]) -> Vec<u16> {
    let mut buffer: u32 = 0;
    let mut bits = 0;
    let mut out = Vec::new();
    for &byte in bytes {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= 11 {
            out.push((buffer & 0x7ff) as u16);
            buffer >>= 11;
            bits -= 11;
        }
    }
    if bits != 0 {
        out.push((buffer & 0x7ff) as u16);
    }
    out
}

fn unpack_words(indices: &[u16]) -> Vec<u8> {
    let mut buffer: u32 = 0;
    let mut bits = 0;
    let mut out = Vec::new();
    for &index in indices {
        buffer |= u32::from(index) << bits;
        bits += 11;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
