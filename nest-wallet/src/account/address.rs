//! Address validation and display

use crate::crypto::keys::KeyType;

/// Validate an address for a specific address family
pub fn validate_address(address: &str, key_type: KeyType) -> bool {
    match key_type {
        KeyType::Ethereum => {
            // "0x" followed by 20 hex-encoded bytes
            if !address.starts_with("0x") || address.len() != 42 {
                return false;
            }
            matches!(hex::decode(&address[2..]), Ok(bytes) if bytes.len() == 20)
        }
        KeyType::Solana => {
            // Base58 encoding of a 32-byte public key
            if address.len() != 44 && address.len() != 43 {
                return false;
            }
            matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == 32)
        }
    }
}

/// Shorten an address to its first 6 and last 4 characters for display
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
