//! API key generator for trusted machine clients

use rand::RngCore;

/// Generates opaque API keys.
///
/// Keys are random hex with a recognizable prefix and are stored verbatim on
/// the owning user row; validation is an exact string match.
#[derive(Clone)]
pub struct ApiKeyGenerator {
    /// Length of the random portion in bytes (hex doubles it)
    key_length: usize,
    /// Prefix for generated keys (e.g., "sk_")
    prefix: String,
}

impl ApiKeyGenerator {
    /// Create a new API key generator with default settings
    pub fn new() -> Self {
        Self {
            key_length: 32,
            prefix: "sk_".to_string(),
        }
    }

    /// Create a new API key generator with custom prefix and length
    pub fn with_prefix_and_length(prefix: String, key_length: usize) -> Self {
        Self { prefix, key_length }
    }

    /// Generate a new opaque API key
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_length];
        rand::rng().fill_bytes(&mut random_bytes);

        format!("{}{}", self.prefix, hex::encode(random_bytes))
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let generator = ApiKeyGenerator::new();
        let key1 = generator.generate();
        let key2 = generator.generate();

        assert_ne!(key1, key2);
    }

    #[test]
    fn test_keys_carry_prefix() {
        let generator = ApiKeyGenerator::new();
        assert!(generator.generate().starts_with("sk_"));
    }

    #[test]
    fn test_custom_length() {
        let generator = ApiKeyGenerator::with_prefix_and_length("mk_".to_string(), 16);
        let key = generator.generate();

        // prefix + 16 bytes hex-encoded
        assert_eq!(key.len(), "mk_".len() + 32);
        assert!(key.starts_with("mk_"));
    }
}
