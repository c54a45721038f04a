//! Transform length factorization
//!
//! Splits a length into the stage factors of a mixed-radix transform and
//! picks cheap lengths for analysis windows.

use log::debug;

/// Factors with closed-form butterflies, tried in this order
pub const PREFERRED_FACTORS: [usize; 6] = [7, 6, 5, 4, 3, 2];

/// Default "tolerable largest prime factor" for analysis windows
pub const DEFAULT_MAX_PRIME_FACTOR: usize = 512;

/// Factorize `n` into transform stage factors
///
/// Each preferred factor is divided out as often as it goes before moving on
/// to the next. Whatever remains is split by trial division (2 first, then
/// odd candidates ascending), so any length is representable.
///
/// # Returns
/// Stage factors in discovery order. Empty for `n <= 1`.
pub fn factorize(n: usize) -> Vec<usize> {
    factorize_with(n, &PREFERRED_FACTORS)
}

/// Factorize `n`, trying `preferred` factors before the trial-division sieve
pub fn factorize_with(n: usize, preferred: &[usize]) -> Vec<usize> {
    let mut factors = Vec::new();
    if n <= 1 {
        return factors;
    }

    let mut rest = n;
    for &factor in preferred.iter().filter(|&&f| f > 1) {
        while rest % factor == 0 {
            rest /= factor;
            factors.push(factor);
        }
    }

    while rest % 2 == 0 {
        rest /= 2;
        factors.push(2);
    }

    let mut candidate = 3;
    while rest > 1 {
        if candidate * candidate > rest {
            // Whatever survives the sieve up to sqrt(rest) is prime
            factors.push(rest);
            break;
        }
        while rest % candidate == 0 {
            rest /= candidate;
            factors.push(candidate);
        }
        candidate += 2;
    }

    factors
}

/// Largest prime factor of `n` (1 for `n <= 1`)
pub fn max_prime_factor(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }

    let mut rest = n;
    let mut largest = 1;

    while rest % 2 == 0 {
        rest /= 2;
        largest = 2;
    }

    let mut candidate = 3;
    while candidate * candidate <= rest {
        while rest % candidate == 0 {
            rest /= candidate;
            largest = candidate;
        }
        candidate += 2;
    }

    if rest > 1 {
        largest = largest.max(rest);
    }
    largest
}

/// Shorten `len` until its largest prime factor is at most `max_prime`
///
/// Tests `len`, `len - 1`, `len - 2`, ... and returns the first length that
/// qualifies. The caller drops the trailing `len - result` samples. This
/// bounds transform cost for arbitrary selection lengths.
pub fn reduce_to_tolerable_length(len: usize, max_prime: usize) -> usize {
    let mut candidate = len;
    while candidate > 1 && max_prime_factor(candidate) > max_prime {
        candidate -= 1;
    }

    if candidate != len {
        debug!(
            "reduced transform length {} -> {} (max prime factor {})",
            len, candidate, max_prime
        );
    }
    candidate
}
