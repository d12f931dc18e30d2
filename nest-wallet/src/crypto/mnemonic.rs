//! Seed phrase generation

use std::fmt;

use bip39::Mnemonic;
use rand::{rngs::OsRng, seq::SliceRandom, RngCore};
use tracing::warn;

use crate::error::{Error, Result};

/// The fixed demo wordlist: the first 66 words of the BIP-39 English list.
pub const DEMO_WORDLIST: [&str; 66] = [
    "abandon", "ability", "able", "about", "above", "absent",
    "absorb", "abstract", "absurd", "abuse", "access", "accident",
    "account", "accuse", "achieve", "acid", "acoustic", "acquire",
    "across", "act", "action", "actor", "actress", "actual",
    "adapt", "add", "addict", "address", "adjust", "admit",
    "adult", "advance", "advice", "aerobic", "affair", "afford",
    "afraid", "again", "age", "agent", "agree", "ahead",
    "aim", "air", "airport", "aisle", "alarm", "album",
    "alcohol", "alert", "alien", "all", "alley", "allow",
    "almost", "alone", "alpha", "already", "also", "alter",
    "always", "amateur", "amazing", "among", "amount", "amused",
];

/// Phrase lengths a BIP-39 mnemonic can have
pub const BIP39_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// An ordered sequence of lowercase recovery words.
///
/// Held in session memory only. `Debug` never prints the words.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase {
    words: Vec<String>,
}

impl SeedPhrase {
    /// Build a phrase from words, normalising them to lowercase
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Get the words in order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the phrase has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The words joined by single spaces, for display to the owner
    pub fn to_phrase(&self) -> String {
        self.words.join(" ")
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedPhrase([REDACTED; {}])", self.words.len())
    }
}

/// Source of fresh seed phrases for the create flow
pub trait SeedPhraseGenerator: Send + Sync {
    /// Produce exactly `word_count` lowercase words
    fn generate(&self, word_count: usize) -> Result<SeedPhrase>;

    /// Whether the words come from a cryptographically secure source
    fn is_secure(&self) -> bool;
}

/// Draws words uniformly, with repetition, from [`DEMO_WORDLIST`].
///
/// Not cryptographically secure and the list is far too small to protect funds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoWordlistGenerator;

impl SeedPhraseGenerator for DemoWordlistGenerator {
    fn generate(&self, word_count: usize) -> Result<SeedPhrase> {
        warn!(word_count, "generating seed phrase from the demo wordlist; not suitable for real funds");

        let mut rng = rand::thread_rng();
        let mut words = Vec::with_capacity(word_count);
        for _ in 0..word_count {
            let word = DEMO_WORDLIST
                .choose(&mut rng)
                .ok_or_else(|| Error::Mnemonic("Demo wordlist is empty".to_string()))?;
            words.push(*word);
        }

        Ok(SeedPhrase::new(words))
    }

    fn is_secure(&self) -> bool {
        false
    }
}

/// BIP-39 mnemonic from operating-system entropy over the 2048-word list
#[derive(Debug, Default, Clone, Copy)]
pub struct Bip39Generator;

impl Bip39Generator {
    /// Entropy length in bytes for a supported word count
    fn entropy_bytes(word_count: usize) -> Result<usize> {
        if !BIP39_WORD_COUNTS.contains(&word_count) {
            return Err(Error::Mnemonic(format!(
                "Unsupported BIP-39 word count: {}",
                word_count
            )));
        }
        Ok(word_count * 4 / 3)
    }
}

impl SeedPhraseGenerator for Bip39Generator {
    fn generate(&self, word_count: usize) -> Result<SeedPhrase> {
        let mut entropy = vec![0u8; Self::entropy_bytes(word_count)?];
        OsRng.fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| Error::Mnemonic(e.to_string()))?;

        Ok(SeedPhrase::new(mnemonic.to_string().split_whitespace()))
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// Draw `word_count` words from the demo wordlist
pub fn generate_seed_phrase(word_count: usize) -> Result<SeedPhrase> {
    DemoWordlistGenerator.generate(word_count)
}

/// Validate a phrase against the BIP-39 checksum
pub fn validate_mnemonic(phrase: &SeedPhrase) -> Result<()> {
    Mnemonic::parse_normalized(&phrase.to_phrase())
        .map(|_| ())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}
