//! Random username generation.
//!
//! When no custom list is configured, the checker probes a generated batch
//! of random candidates. Names are drawn uniformly from mixed-case letters
//! and digits.

use crate::error::CheckError;
use rand::Rng;

/// Alphabet for generated usernames: mixed-case letters plus digits.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate one random username of `length` characters.
///
/// Length zero is a configuration error, not an empty name.
pub fn generate_username(length: usize) -> Result<String, CheckError> {
    if length == 0 {
        return Err(CheckError::config("username length must be greater than 0"));
    }

    let mut rng = rand::thread_rng();
    let name = (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    Ok(name)
}

/// Generate a batch of `amount` random usernames, each `length` characters.
///
/// Duplicates across the batch are possible and intentional; the dedup
/// store downstream is the authority on what has been seen.
pub fn generate_usernames(amount: usize, length: usize) -> Result<Vec<String>, CheckError> {
    let mut usernames = Vec::with_capacity(amount);
    for _ in 0..amount {
        usernames.push(generate_username(length)?);
    }
    Ok(usernames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_length() {
        for length in [1, 4, 16, 32] {
            let name = generate_username(length).unwrap();
            assert_eq!(name.len(), length);
        }
    }

    #[test]
    fn test_generated_charset() {
        let name = generate_username(256).unwrap();
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(generate_username(0).is_err());
    }

    #[test]
    fn test_batch_size() {
        let batch = generate_usernames(50, 8).unwrap();
        assert_eq!(batch.len(), 50);
        assert!(batch.iter().all(|n| n.len() == 8));
    }

    #[test]
    fn test_empty_batch() {
        let batch = generate_usernames(0, 8).unwrap();
        assert!(batch.is_empty());
    }
}
