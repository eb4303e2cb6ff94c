//! # Shunia — Layered Probable-Prime Test
//!
//! A probabilistic primality test built from four gates, each cheap enough to
//! run on every candidate and each able to prove compositeness on its own:
//!
//! 1. **Fermat gate**: `2^(n-1) ≡ 1 (mod n)`.
//! 2. **Degree selection**: the smallest `d >= 3` not dividing `n - 1`,
//!    bounded by `log2 n`.
//! 3. **Auxiliary check** on `v0 = 2^((n-1)/d) mod n` (see [`AuxCheck`]).
//! 4. **Ring gate**: `(1 + x)^n` in `Z_n[x]/(x^d - 2)` must match
//!    `1 + v0·x^(n mod d)`, compared at `x = 1` or coefficient by coefficient
//!    (see [`RingCheck`]).
//!
//! A candidate that passes every gate is a *probable* prime. No proof is
//! produced.
//!
//! ## Modules
//!
//! - [`arith`], [`poly`]: scalar and polynomial arithmetic on GMP integers.
//! - [`primality`]: the layered test itself.
//! - [`reference`]: an independent Miller–Rabin oracle for expected verdicts.
//! - [`corpus`], [`harness`], [`checkpoint`], [`progress`]: the validation
//!   harness that runs the test over prime lists, pseudoprime lists and
//!   exhaustive ranges.

pub mod arith;
pub mod checkpoint;
pub mod corpus;
pub mod harness;
pub mod poly;
pub mod primality;
pub mod progress;
pub mod reference;

pub use arith::{bit_length_minus_one, pow, wrap_to_range, ArithError};
pub use poly::{poly_degree, poly_eval, poly_mul, poly_pow, poly_reduce, Poly};
pub use primality::{
    is_probable_prime, is_probable_prime_with, AuxCheck, RingCheck, Verdict, Witness,
};

use rug::Integer;

/// Estimate decimal digit count from bit length, avoiding expensive to_string conversion.
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::ops::Pow;

    #[test]
    fn estimate_digits_within_one_of_exact() {
        let values: Vec<Integer> = vec![
            Integer::from(1u32),
            Integer::from(9u32),
            Integer::from(10u32),
            Integer::from(99u32),
            Integer::from(1000u32),
            Integer::from(10u32).pow(50),
            Integer::from(10u32).pow(100) - 1u32,
            Integer::from(2u32).pow(127) - 1u32,
        ];
        for v in &values {
            let est = estimate_digits(v);
            let exact = v.to_string().len() as u64;
            assert!(
                (est as i64 - exact as i64).abs() <= 1,
                "estimate_digits({}) = {} but exact = {}",
                v,
                est,
                exact
            );
        }
    }

    #[test]
    fn estimate_digits_zero() {
        assert_eq!(estimate_digits(&Integer::from(0u32)), 1);
    }

    #[test]
    fn reexports_reach_the_layered_test() {
        let m127 = Integer::from(2u32).pow(127) - 1u32;
        assert!(is_probable_prime(&m127));
        let psp = is_probable_prime_with(&Integer::from(341), AuxCheck::Gcd, RingCheck::Eval);
        assert_eq!(psp, Ok(false));
        assert_eq!(estimate_digits(&m127), 39);
    }
}
