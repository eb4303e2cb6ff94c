//! # Reference — Independent Primality Oracle
//!
//! Supplies expected verdicts for the exhaustive range sweep. It shares no
//! code path with the layered test beyond GMP itself: trial division by the
//! primes up to 19, then strong-probable-prime (Miller–Rabin) rounds for every
//! base `2..=4·(bit_length(n) + 1)`.
//!
//! This is not a proof, but no composite is known to survive that many
//! consecutive small bases in the ranges the harness sweeps.

use rug::Integer;

/// Primes used for trial division before any Miller–Rabin round.
const TRIAL_PRIMES: [u32; 8] = [2, 3, 5, 7, 11, 13, 17, 19];

/// One Miller–Rabin round: is `n` a strong probable prime to `base`?
///
/// Bases are taken mod `n`; a base congruent to 0 or ±1 carries no
/// information and passes. `n < 2` fails, 2 and 3 pass.
pub fn is_prime_mr(n: &Integer, base: u32) -> bool {
    if *n < 2 {
        return false;
    }
    if *n < 4 {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n1 = Integer::from(n - 1u32);
    let b = Integer::from(base) % n;
    if b.is_zero() || b == 1 || b == n1 {
        return true;
    }

    let s = n1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n1 >> s);

    let mut x = match b.pow_mod(&d, n) {
        Ok(x) => x,
        Err(_) => return false,
    };
    if x == 1 || x == n1 {
        return true;
    }
    for _ in 1..s {
        x.square_mut();
        x %= n;
        if x == n1 {
            return true;
        }
        if x == 1 {
            return false;
        }
    }
    false
}

/// Expected primality of `n`: trial division, then `4·(bits + 1)` bases.
pub fn is_prime_expected(n: &Integer) -> bool {
    if *n < 2 {
        return false;
    }
    for &p in &TRIAL_PRIMES {
        if n.is_divisible_u(p) {
            return *n == p;
        }
    }

    let limit = 4 * (n.significant_bits() + 1);
    (2..=limit).all(|base| is_prime_mr(n, base))
}
