//! Deterministic risk tier for a plaintext sample
//!
//! The tier is `sha256(plaintext) mod 4 + 1`, reading the hash as a big-endian
//! integer. Since 4 divides 256, only the low two bits of the last byte matter.
//! What a tier is worth downstream is not decided here.

use sha2::{Digest as _, Sha256};

/// Lowest possible score
pub const MIN_RISK_SCORE: u32 = 1;
/// Highest possible score
pub const MAX_RISK_SCORE: u32 = 4;

/// Score a plaintext sample, returning a value in `1..=4`
pub fn score(plaintext: &str) -> u32 {
    let hash = Sha256::digest(plaintext.as_bytes());
    let last = hash[hash.len() - 1];
    u32::from(last % 4) + MIN_RISK_SCORE
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_score_in_range() {
        for sample in ["", "A", "AGTC", "AGTCAGTC", "This is a test gene data."] {
            let s = score(sample);
            assert!((MIN_RISK_SCORE..=MAX_RISK_SCORE).contains(&s), "{sample}: {s}");
        }
    }

    #[test]
    fn test_score_is_pure() {
        let first = score("AGTCAGTC");
        for _ in 0..10 {
            assert_eq!(score("AGTCAGTC"), first);
        }
    }

    #[test]
    fn test_known_values() {
        // sha256("") ends in 0x55 -> 85 mod 4 = 1 -> 2
        assert_eq!(score(""), 2);
        // sha256("abc") ends in 0xad -> 173 mod 4 = 1 -> 2
        assert_eq!(score("abc"), 2);
    }

    #[test]
    fn test_all_tiers_reachable() {
        let mut seen = [false; 4];
        for i in 0..256 {
            seen[(score(&i.to_string()) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
