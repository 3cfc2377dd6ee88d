//! Deterministic alias derivation from a URL digest.
//!
//! An alias is produced by hashing the long URL with SHA-256, reading the
//! 32-byte digest as one big-endian unsigned integer and repeatedly dividing it
//! by the alphabet length. Each remainder selects one output symbol. Output
//! stops when the quotient reaches zero or [`MAX_ALIAS_LENGTH`] symbols were
//! emitted.
//!
//! The same URL and alphabet always yield the same alias, across calls and
//! across process restarts. Persisted aliases depend on this exact derivation.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the number of symbols in an alias.
pub const MAX_ALIAS_LENGTH: usize = 10;

/// Default alphabet: lowercase, uppercase, digits (base 62).
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors raised while building an encoder from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    #[error("alphabet must contain at least 2 symbols, got {len}")]
    AlphabetTooShort { len: usize },

    #[error("alphabet contains duplicate symbol '{symbol}'")]
    DuplicateSymbol { symbol: char },

    #[error("alias length must be between 1 and {MAX_ALIAS_LENGTH}, got {len}")]
    InvalidMaxLength { len: usize },
}

/// Ordered, duplicate-free set of output symbols.
///
/// Its length is the numeric base used by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Builds an alphabet, rejecting fewer than two symbols or repeated symbols.
    pub fn new(symbols: &str) -> Result<Self, EncoderError> {
        let symbols: Vec<char> = symbols.chars().collect();

        if symbols.len() < 2 {
            return Err(EncoderError::AlphabetTooShort { len: symbols.len() });
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for &symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(EncoderError::DuplicateSymbol { symbol });
            }
        }

        Ok(Self { symbols })
    }

    /// Number of symbols, i.e. the encoding base.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; an alphabet holds at least two symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Stateless alias encoder bound to one alphabet and length limit.
#[derive(Debug, Clone)]
pub struct AliasEncoder {
    alphabet: Alphabet,
    max_len: usize,
}

impl AliasEncoder {
    /// Creates an encoder emitting at most `max_len` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::InvalidMaxLength`] unless
    /// `1 <= max_len <= MAX_ALIAS_LENGTH`.
    pub fn new(alphabet: Alphabet, max_len: usize) -> Result<Self, EncoderError> {
        if max_len == 0 || max_len > MAX_ALIAS_LENGTH {
            return Err(EncoderError::InvalidMaxLength { len: max_len });
        }

        Ok(Self { alphabet, max_len })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Derives the alias for `long_url`.
    pub fn encode(&self, long_url: &str) -> String {
        encode(long_url, &self.alphabet, self.max_len)
    }
}

impl Default for AliasEncoder {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            max_len: MAX_ALIAS_LENGTH,
        }
    }
}

/// Derives an alias of at most `max_len` symbols from the SHA-256 digest of `long_url`.
///
/// Returns an empty string only when the digest integer is zero.
pub fn encode(long_url: &str, alphabet: &Alphabet, max_len: usize) -> String {
    let mut value: [u8; 32] = Sha256::digest(long_url.as_bytes()).into();
    let base = alphabet.len() as u64;
    let mut alias = String::with_capacity(max_len);
    let mut emitted = 0;

    while emitted < max_len && !is_zero(&value) {
        let remainder = div_rem_in_place(&mut value, base);
        alias.push(alphabet.symbol(remainder as usize));
        emitted += 1;
    }

    alias
}

fn is_zero(value: &[u8]) -> bool {
    value.iter().all(|&b| b == 0)
}

/// Divides a big-endian unsigned integer by `divisor` in place and returns the remainder.
fn div_rem_in_place(value: &mut [u8], divisor: u64) -> u64 {
    let divisor = u128::from(divisor);
    let mut remainder: u128 = 0;

    for byte in value.iter_mut() {
        let current = (remainder << 8) | u128::from(*byte);
        // current < divisor * 256, so the quotient digit fits in a byte
        *byte = (current / divisor) as u8;
        remainder = current % divisor;
    }

    remainder as u64
}
