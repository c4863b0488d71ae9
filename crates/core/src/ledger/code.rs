//! Transaction code generation.

use rand::Rng;

use crate::error::{LedgerError, LedgerResult};

/// Smallest generated code.
pub const CODE_MIN: u32 = 10_000_000;
/// Largest generated code.
pub const CODE_MAX: u32 = 99_999_999;

/// Draws a random 8-digit transaction code.
pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Draws `attempts` candidate codes, at least one.
pub fn draw_codes<R: Rng + ?Sized>(rng: &mut R, attempts: u32) -> Vec<String> {
    (0..attempts.max(1)).map(|_| random_code(rng)).collect()
}

/// Picks the first candidate `is_taken` rejects none of.
///
/// # Errors
///
/// Returns [`LedgerError::TransactionCodeExhausted`] when every candidate collided.
pub fn unique_code<F>(candidates: Vec<String>, mut is_taken: F) -> LedgerResult<String>
where
    F: FnMut(&str) -> bool,
{
    let attempts = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
    candidates
        .into_iter()
        .find(|code| !is_taken(code))
        .ok_or(LedgerError::TransactionCodeExhausted(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_code_is_eight_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let code = random_code(&mut rng);
            assert_eq!(code.len(), 8);
            let n: u32 = code.parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
        }
    }

    #[test]
    fn test_unique_code_retries_on_collision() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = draw_codes(&mut rng, 4);
        assert_eq!(candidates.len(), 4);
        let third = candidates[2].clone();
        let mut calls = 0;
        let code = unique_code(candidates, |_| {
            calls += 1;
            calls < 3
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert_eq!(code, third);
    }

    #[test]
    fn test_unique_code_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_codes(&mut rng, 0).len(), 1);
        let err = unique_code(draw_codes(&mut rng, 5), |_| true).unwrap_err();
        assert_eq!(err, LedgerError::TransactionCodeExhausted(5));
        assert!(err.is_retryable());
    }
}
