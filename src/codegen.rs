//! Shortcode generation

use rand::Rng;

/// Alphabet shortcodes are drawn from: digits, lowercase, uppercase
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated shortcodes
pub const CODE_LENGTH: usize = 7;

/// Generate a random shortcode of `length` characters
///
/// Every character is an independent uniform draw from [`ALPHABET`]. Not
/// cryptographically secure; collisions are possible and handled with a
/// bounded retry against the storage uniqueness constraint.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generate_code_length() {
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(CODE_LENGTH, generate_code(&mut rng, CODE_LENGTH).len());
        assert_eq!(12, generate_code(&mut rng, 12).len());
        assert_eq!(0, generate_code(&mut rng, 0).len());
    }

    #[test]
    fn test_generate_code_uses_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);

        let code = generate_code(&mut rng, 1000);

        assert!(code.bytes().all(|byte| ALPHABET.contains(&byte)));
    }

    #[test]
    fn test_generate_code_is_deterministic_for_a_seed() {
        let mut first = StdRng::seed_from_u64(1547);
        let mut second = StdRng::seed_from_u64(1547);

        assert_eq!(
            generate_code(&mut first, CODE_LENGTH),
            generate_code(&mut second, CODE_LENGTH)
        );
    }
}
