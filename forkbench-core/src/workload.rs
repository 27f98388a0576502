//! Prime Factorization Workload
//!
//! Trial division with a fresh linear scan for the smallest divisor on every
//! extraction. The O(n) cost per call is what the benchmark measures, so no
//! sieve or square-root cutoff is applied.

/// Decompose `n` into its prime factors, smallest first, with multiplicity.
///
/// `0` and `1` have no divisor in `2..n` and come back as `[n]`.
pub fn factorize(n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut rest = n;

    loop {
        match smallest_divisor(rest) {
            Some(divisor) => {
                factors.push(divisor);
                rest /= divisor;
            }
            None => {
                factors.push(rest);
                return factors;
            }
        }
    }
}

/// Smallest `d` in `2..n` dividing `n`, if any.
#[inline]
fn smallest_divisor(n: u64) -> Option<u64> {
    (2..n).find(|d| n % d == 0)
}
