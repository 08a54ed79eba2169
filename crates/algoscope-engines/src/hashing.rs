//! Bucket selection shared by the hash set and hash map.

const MULTIPLIER: u64 = 31;

/// Polynomial string hash reduced into `0..bucket_count`.
///
/// Folds `h = (h * 31 + unit) % bucket_count` over the UTF-16 code units of
/// `key`, so the result is stable across runs and platforms.
pub fn bucket_for(key: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    let modulus = bucket_count.max(1) as u64;
    let hash = key
        .encode_utf16()
        .fold(0u64, |h, unit| (h * MULTIPLIER + u64::from(unit)) % modulus);
    hash as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_buckets() {
        assert_eq!(bucket_for("", 8), 0);
        // 'a' = 97
        assert_eq!(bucket_for("a", 8), 1);
        // (97 * 31 + 98) % 8
        assert_eq!(bucket_for("ab", 8), 3105 % 8);
        assert_eq!(bucket_for("grape", 8), 3);
        assert_eq!(bucket_for("lemon", 8), 3);
    }

    #[test]
    fn always_in_range() {
        for count in 1..20 {
            for key in ["", "x", "hello world", "ünïcødé", "🦀"] {
                assert!(bucket_for(key, count) < count);
            }
        }
    }

    #[test]
    fn single_bucket() {
        assert_eq!(bucket_for("anything", 1), 0);
    }
}
