//! # Primality — Layered Fermat + Quotient-Ring Test
//!
//! Decides whether `n` is composite by running four gates in order. The first
//! gate that fails yields a [`Witness`] of compositeness; passing every gate
//! yields [`Verdict::ProbablePrime`].
//!
//! 1. **Trivial cases**: `n < 2` and even `n != 2` are composite; 2, 3, 5, 7
//!    are prime.
//! 2. **Fermat**: `2^(n-1) ≡ 1 (mod n)`.
//! 3. **Degree selection**: the ring degree `d` is the first `i` in
//!    `3..=max(log2 n, 3)` that does not divide `n - 1`, or the upper bound
//!    when every `i` divides it. [`RingCheck::Coefficients`] only considers
//!    prime `i` (see [`select_prime_degree`]).
//! 4. **Auxiliary + ring**: with `v0 = 2^((n-1)/d) mod n`, an auxiliary check
//!    on `v0` (see [`AuxCheck`]), then `(1 + x)^n` in `Z_n[x]/(x^d - 2)` is
//!    compared against `1 + v0·x^(n mod d)`, either through its value at
//!    `x = 1` or coefficient by coefficient (see [`RingCheck`]).
//!
//! The test is one-sided: a composite verdict is a proof, a prime verdict is
//! not. Every call is independent and allocation-local, so callers may fan
//! candidates out across threads freely.

use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::arith::{bit_length_minus_one, pow, wrap_to_range, ArithError};
use crate::poly::{poly_eval, poly_pow, Poly};
use crate::reference;

/// Primes answered without running any gate.
pub const SMALL_PRIMES: [u32; 4] = [2, 3, 5, 7];

/// Auxiliary check applied to `v0 = 2^((n-1)/d) mod n` before the ring gate.
///
/// The two variants are not known to be equivalent in general; they agree
/// with trial division on every `n < 200_000`. `Power` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxCheck {
    /// `(v0 + 1)^n ≡ v0 + 1 (mod n)`.
    #[default]
    Power,
    /// `gcd(n, v0 - 1)` is 1 or `n`.
    Gcd,
}

impl std::fmt::Display for AuxCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuxCheck::Power => write!(f, "power"),
            AuxCheck::Gcd => write!(f, "gcd"),
        }
    }
}

impl std::str::FromStr for AuxCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power" | "pow" => Ok(AuxCheck::Power),
            "gcd" => Ok(AuxCheck::Gcd),
            other => Err(format!(
                "unknown auxiliary check '{}' (expected 'power' or 'gcd')",
                other
            )),
        }
    }
}

/// How the ring gate compares `(1 + x)^n` with `1 + v0·x^(n mod d)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingCheck {
    /// Both sides evaluated at `x = 1`: `(1 + 1)^n ≡ v0 + 1`. Degree from
    /// [`select_degree`].
    #[default]
    Eval,
    /// Every coefficient must match: constant term 1, `v0` at `x^(n mod d)`,
    /// zero elsewhere. Degree from [`select_prime_degree`].
    Coefficients,
}

impl RingCheck {
    /// Ring degree this check uses for `n`.
    pub fn degree(self, n: &Integer) -> u32 {
        match self {
            RingCheck::Eval => select_degree(n),
            RingCheck::Coefficients => select_prime_degree(n),
        }
    }
}

impl std::fmt::Display for RingCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RingCheck::Eval => write!(f, "eval"),
            RingCheck::Coefficients => write!(f, "coefficients"),
        }
    }
}

impl std::str::FromStr for RingCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eval" => Ok(RingCheck::Eval),
            "coefficients" | "coeffs" => Ok(RingCheck::Coefficients),
            other => Err(format!(
                "unknown ring check '{}' (expected 'eval' or 'coefficients')",
                other
            )),
        }
    }
}

/// The gate that proved `n` composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness {
    /// `n < 2`.
    BelowTwo,
    /// Even and not 2.
    Even,
    /// `2^(n-1) mod n` was `residue`, not 1.
    Fermat { residue: Integer },
    /// The auxiliary check on `v0` failed.
    Auxiliary { check: AuxCheck, degree: u32 },
    /// `(1 + x)^n` evaluated at 1 was `value`, not `expected`.
    Ring {
        degree: u32,
        value: Integer,
        expected: Integer,
    },
    /// `(1 + x)^n` reduced to `found` instead of `expected`.
    RingPolynomial {
        degree: u32,
        found: Poly,
        expected: Poly,
    },
}

impl std::fmt::Display for Witness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Witness::BelowTwo => write!(f, "below two"),
            Witness::Even => write!(f, "even"),
            Witness::Fermat { residue } => write!(f, "fermat: 2^(n-1) ≡ {}", residue),
            Witness::Auxiliary { check, degree } => {
                write!(f, "auxiliary ({}) check failed at d={}", check, degree)
            }
            Witness::Ring {
                degree,
                value,
                expected,
            } => write!(
                f,
                "ring: (1+x)^n at x=1 is {}, expected {} (d={})",
                value, expected, degree
            ),
            Witness::RingPolynomial {
                degree,
                found,
                expected,
            } => write!(
                f,
                "ring: (1+x)^n ≡ {}, expected {} (d={})",
                found, expected, degree
            ),
        }
    }
}

/// Outcome of the layered test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    ProbablePrime,
    Composite(Witness),
}

impl Verdict {
    pub fn is_probable_prime(&self) -> bool {
        matches!(self, Verdict::ProbablePrime)
    }

    pub fn witness(&self) -> Option<&Witness> {
        match self {
            Verdict::ProbablePrime => None,
            Verdict::Composite(w) => Some(w),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::ProbablePrime => write!(f, "probably prime"),
            Verdict::Composite(w) => write!(f, "composite ({})", w),
        }
    }
}

/// Ring degree `d` for candidate `n`.
///
/// Scans `i = 3..=max(log2 n, 3)` and stops at the first `i` not dividing
/// `n - 1`. If all of them divide it, the bound itself is returned.
pub fn select_degree(n: &Integer) -> u32 {
    let n1 = Integer::from(n - 1u32);
    let ilimit = bit_length_minus_one(n).max(3);
    let mut d = 3;
    for i in 3..=ilimit {
        d = i;
        if !n1.is_divisible_u(i) {
            break;
        }
    }
    d
}

/// Like [`select_degree`], but composite `i` are skipped.
///
/// If no prime `i` in range fails to divide `n - 1`, the bound itself is
/// returned even when it is composite.
pub fn select_prime_degree(n: &Integer) -> u32 {
    let n1 = Integer::from(n - 1u32);
    let ilimit = bit_length_minus_one(n).max(3);
    let mut d = 3;
    for i in 3..=ilimit {
        d = i;
        if !reference::is_prime_expected(&Integer::from(i)) {
            continue;
        }
        if !n1.is_divisible_u(i) {
            break;
        }
    }
    d
}

/// Run the layered test with the given auxiliary and ring checks.
///
/// Errors only surface from the arithmetic core; on every gated path the
/// modulus is `n >= 9` and exponents are non-negative, so none is expected.
pub fn check(n: &Integer, aux: AuxCheck, ring: RingCheck) -> Result<Verdict, ArithError> {
    if *n < 2 {
        return Ok(Verdict::Composite(Witness::BelowTwo));
    }
    if n.is_even() {
        return Ok(if *n == 2 {
            Verdict::ProbablePrime
        } else {
            Verdict::Composite(Witness::Even)
        });
    }
    if SMALL_PRIMES.iter().any(|&p| *n == p) {
        return Ok(Verdict::ProbablePrime);
    }

    let two = Integer::from(2);
    let n1 = Integer::from(n - 1u32);

    let fermat = pow(&two, &n1, Some(n))?;
    if fermat != 1 {
        debug!(n = %n, residue = %fermat, "fermat gate failed");
        return Ok(Verdict::Composite(Witness::Fermat { residue: fermat }));
    }

    let d = ring.degree(n);
    debug!(n = %n, d, ring = %ring, "ring degree selected");

    let v0 = pow(&two, &Integer::from(&n1 / d), Some(n))?;
    let v0_plus_one = Integer::from(&v0 + 1u32);
    let v1_expected = wrap_to_range(&v0_plus_one, n)?;

    let aux_ok = match aux {
        AuxCheck::Power => pow(&v0_plus_one, n, Some(n))? == v1_expected,
        AuxCheck::Gcd => {
            let g = Integer::from(n.gcd_ref(&Integer::from(&v0 - 1u32)));
            g == 1 || g == *n
        }
    };
    if !aux_ok {
        debug!(n = %n, d, check = %aux, "auxiliary gate failed");
        return Ok(Verdict::Composite(Witness::Auxiliary { check: aux, degree: d }));
    }

    let a = Poly::from([1, 1]);
    let q = Poly::from([2]);
    let p1 = poly_pow(&a, n, Some(n), (d - 1) as usize, &q)?;

    match ring {
        RingCheck::Eval => {
            let v1 = wrap_to_range(&poly_eval(&p1, &Integer::from(1), Some(n))?, n)?;
            if v1 != v1_expected {
                debug!(n = %n, d, value = %v1, expected = %v1_expected, "ring gate failed");
                return Ok(Verdict::Composite(Witness::Ring {
                    degree: d,
                    value: v1,
                    expected: v1_expected,
                }));
            }
        }
        RingCheck::Coefficients => {
            let ndm = n.mod_u(d) as usize;
            let mut coeffs = vec![Integer::new(); ndm + 1];
            coeffs[0] = Integer::from(1);
            if ndm > 0 {
                coeffs[ndm] = v0;
            }
            let expected = Poly::new(coeffs);
            // d | n leaves no room for the x^(n mod d) term
            if ndm == 0 || p1 != expected {
                debug!(n = %n, d, found = %p1, expected = %expected, "ring gate failed");
                return Ok(Verdict::Composite(Witness::RingPolynomial {
                    degree: d,
                    found: p1,
                    expected,
                }));
            }
        }
    }

    debug!(n = %n, d, "all gates passed");
    Ok(Verdict::ProbablePrime)
}

/// `Ok(true)` if `n` passed every gate with the given checks, `Ok(false)` if
/// a witness of compositeness was found.
pub fn is_probable_prime_with(
    n: &Integer,
    aux: AuxCheck,
    ring: RingCheck,
) -> Result<bool, ArithError> {
    check(n, aux, ring).map(|verdict| verdict.is_probable_prime())
}

/// `true` if `n` passed every gate with the default checks, `false` if a
/// witness of compositeness was found.
///
/// An arithmetic error cannot occur on the gated paths; should one surface it
/// is logged and reported as `false`. Use [`is_probable_prime_with`] or
/// [`check`] to observe it instead.
pub fn is_probable_prime(n: &Integer) -> bool {
    match is_probable_prime_with(n, AuxCheck::default(), RingCheck::default()) {
        Ok(prime) => prime,
        Err(e) => {
            error!(n = %n, error = %e, "arithmetic failure, treating as composite");
            false
        }
    }
}
