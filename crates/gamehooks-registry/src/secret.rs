//! Per-endpoint shared secret generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Prefix identifying a webhook secret.
pub const SECRET_PREFIX: &str = "vrsec_";

/// Secret length in bytes (256 bits).
pub const SECRET_BYTES: usize = 32;

/// Generate a new endpoint secret.
///
/// Draws [`SECRET_BYTES`] from the operating system CSPRNG and renders them
/// as uppercase hex behind [`SECRET_PREFIX`].
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{}{}", SECRET_PREFIX, hex::encode_upper(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_secret_format() {
        let secret = generate_secret();
        assert!(secret.starts_with(SECRET_PREFIX));

        let hex_part = &secret[SECRET_PREFIX.len()..];
        assert_eq!(hex_part.len(), 64);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!hex_part.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_secret_decodes_to_256_bits() {
        let secret = generate_secret();
        let bytes = hex::decode(&secret[SECRET_PREFIX.len()..]).unwrap();
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_secrets_are_unique() {
        let secrets: HashSet<String> = (0..100).map(|_| generate_secret()).collect();
        assert_eq!(secrets.len(), 100);
    }
}
