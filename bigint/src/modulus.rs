use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::debug;

use crate::error::BigIntError;
use crate::residue::{InvertOutcome, Residue};

/// The representation a [`Modulus`] picked for its `N` at construction time.
///
/// Chosen once, by inspecting `N`'s size and shape; every subsequent `mul`
/// and `sqr` composes correctly under the chosen form, and `get_integer`
/// always yields the canonical representative regardless of which form was
/// picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    /// No redundant encoding; every operation reduces immediately with `%`.
    /// Used for even moduli, where Montgomery form does not apply.
    Plain,
    /// Residues are held as `x * R mod N`. `R` is a power of two wider than
    /// `N`, so REDC trades a division by `N` for a shift.
    Montgomery,
    /// `N = 2^k - 1` (or adjacent to that shape): reduction mod `N` is a
    /// fold of the high half onto the low half instead of a full division.
    Mersenne { k: u64 },
}

/// A process-scoped, immutable arithmetic context for one modulus `N`.
///
/// Every [`Residue`] operation takes a `&Modulus` explicitly; residues carry
/// no back-pointer to their context (mirroring GMP's `mpz_powm(rop, base,
/// exp, mod)` style rather than a typeclass-indexed field element). A
/// `Modulus` is built once per stage-2 run and handed to worker threads via
/// [`Modulus::clone_for_thread`], which returns an owned copy rather than an
/// alias, so no thread ever observes another thread's mutable state (there
/// is none: every field here is fixed after [`Modulus::init`] returns).
#[derive(Clone)]
pub struct Modulus {
    pub(crate) n: BigUint,
    pub(crate) repr: Representation,
    pub(crate) bits: u64,
    pub(crate) word_bits: u64,
    /// Montgomery-only: width of `R = 2^r_bits` in bits.
    pub(crate) r_bits: u64,
    /// Montgomery-only: `R^2 mod N`, used to move a plain integer into
    /// Montgomery form via one REDC.
    pub(crate) r2: BigUint,
    /// Montgomery-only: `-N^-1 mod R`, the REDC multiplier.
    pub(crate) neg_n_inv: BigUint,
    pub(crate) r_mask: BigUint,
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modulus")
            .field("bits", &self.bits)
            .field("repr", &self.repr)
            .finish_non_exhaustive()
    }
}

impl Modulus {
    /// Machine word width used for sizing (`W` in the on-disk large-residue
    /// format of EXTERNAL INTERFACES).
    pub const WORD_BITS: u64 = 64;

    /// Builds a modulus context for `n`, choosing a representation by
    /// inspecting `n`'s size and shape (plain for even `n`, a Mersenne-style
    /// fold for `n = 2^k - 1`, Montgomery otherwise).
    pub fn init(n: BigUint) -> Result<Self, BigIntError> {
        if n <= BigUint::one() {
            return Err(BigIntError::ModulusTooSmall);
        }
        let bits = n.bits();
        let repr = Self::choose_representation(&n);
        debug!(bits, ?repr, "initializing modulus context");

        match repr {
            Representation::Plain => Ok(Modulus {
                n,
                repr,
                bits,
                word_bits: Self::WORD_BITS,
                r_bits: 0,
                r2: BigUint::zero(),
                neg_n_inv: BigUint::zero(),
                r_mask: BigUint::zero(),
            }),
            Representation::Mersenne { k } => Ok(Modulus {
                n,
                repr: Representation::Mersenne { k },
                bits,
                word_bits: Self::WORD_BITS,
                r_bits: 0,
                r2: BigUint::zero(),
                neg_n_inv: BigUint::zero(),
                r_mask: BigUint::zero(),
            }),
            Representation::Montgomery => {
                let words = bits.div_ceil(Self::WORD_BITS).max(1);
                let r_bits = words * Self::WORD_BITS;
                let r_mask = (BigUint::one() << r_bits) - BigUint::one();
                let r = BigUint::one() << r_bits;
                let r2 = (&r * &r) % &n;
                let neg_n_inv = Self::neg_mod_inverse(&n, r_bits)?;
                Ok(Modulus {
                    n,
                    repr,
                    bits,
                    word_bits: Self::WORD_BITS,
                    r_bits,
                    r2,
                    neg_n_inv,
                    r_mask,
                })
            }
        }
    }

    fn choose_representation(n: &BigUint) -> Representation {
        if n.is_even() {
            return Representation::Plain;
        }
        // Mersenne shape: n == 2^k - 1.
        let bits = n.bits();
        let candidate = (BigUint::one() << bits) - BigUint::one();
        if &candidate == n {
            return Representation::Mersenne { k: bits };
        }
        Representation::Montgomery
    }

    /// `-N^-1 mod 2^r_bits`, computed via extended gcd on `BigInt` — we rely
    /// on the assumed arbitrary-precision gcd/invert primitive rather than a
    /// word-at-a-time Newton-Hensel lift.
    fn neg_mod_inverse(n: &BigUint, r_bits: u64) -> Result<BigUint, BigIntError> {
        let modulus = BigInt::from(BigUint::one() << r_bits);
        let n_signed = BigInt::from(n.clone());
        let egcd = n_signed.extended_gcd(&modulus);
        if egcd.gcd != BigInt::one() {
            // n is even, which choose_representation already excludes; this
            // would indicate an internal inconsistency.
            return Err(BigIntError::ModulusEven);
        }
        let inv = egcd.x.mod_floor(&modulus);
        let neg_inv = (&modulus - &inv).mod_floor(&modulus);
        let (sign, mag) = neg_inv.into_parts();
        debug_assert_eq!(sign, Sign::Plus);
        Ok(mag)
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn representation(&self) -> Representation {
        self.repr
    }

    /// Returns an owned, independent copy of this context for handing to a
    /// worker thread. Every field is immutable after `init`, so this is
    /// purely a data copy, never a shared mutable alias.
    pub fn clone_for_thread(&self) -> Modulus {
        self.clone()
    }

    fn reduce_plain(&self, x: &BigUint) -> BigUint {
        x % &self.n
    }

    fn reduce_mersenne(&self, x: &BigUint, k: u64) -> BigUint {
        let mask = (BigUint::one() << k) - BigUint::one();
        let mut acc = x.clone();
        while acc.bits() > k {
            let lo = &acc & &mask;
            let hi = &acc >> k;
            acc = lo + hi;
        }
        if acc >= self.n {
            acc - &self.n
        } else {
            acc
        }
    }

    fn redc(&self, t: &BigUint) -> BigUint {
        let t_lo = t & &self.r_mask;
        let m = (&t_lo * &self.neg_n_inv) & &self.r_mask;
        let sum = t + (&m * &self.n);
        let result = sum >> self.r_bits;
        if result >= self.n {
            result - &self.n
        } else {
            result
        }
    }

    /// Lifts a plain integer in `[0, N)` into the active representation.
    pub fn residue_from_integer(&self, x: &BigUint) -> Residue {
        let x = if x >= &self.n { x % &self.n } else { x.clone() };
        match self.repr {
            Representation::Plain | Representation::Mersenne { .. } => Residue::new(x),
            Representation::Montgomery => Residue::new(self.redc(&(&x * &self.r2))),
        }
    }

    pub fn set_ui(&self, x: u64) -> Residue {
        self.residue_from_integer(&BigUint::from(x))
    }

    /// Returns the canonical representative of `a` in `[0, N)`, undoing any
    /// redundant (Montgomery/Mersenne) coding.
    pub fn get_integer(&self, a: &Residue) -> BigUint {
        match self.repr {
            Representation::Plain | Representation::Mersenne { .. } => a.raw().clone(),
            Representation::Montgomery => self.redc(a.raw()),
        }
    }

    pub fn is_zero(&self, a: &Residue) -> bool {
        a.raw().is_zero()
    }

    pub fn add(&self, a: &Residue, b: &Residue) -> Residue {
        let sum = a.raw() + b.raw();
        let reduced = match self.repr {
            Representation::Plain => self.reduce_plain(&sum),
            Representation::Mersenne { k } => self.reduce_mersenne(&sum, k),
            Representation::Montgomery => {
                if sum >= self.n {
                    sum - &self.n
                } else {
                    sum
                }
            }
        };
        Residue::new(reduced)
    }

    pub fn sub(&self, a: &Residue, b: &Residue) -> Residue {
        if a.raw() >= b.raw() {
            Residue::new(a.raw() - b.raw())
        } else {
            Residue::new(&self.n - (b.raw() - a.raw()))
        }
    }

    pub fn neg(&self, a: &Residue) -> Residue {
        if a.raw().is_zero() {
            Residue::new(BigUint::zero())
        } else {
            Residue::new(&self.n - a.raw())
        }
    }

    pub fn mul(&self, a: &Residue, b: &Residue) -> Residue {
        let prod = a.raw() * b.raw();
        let reduced = match self.repr {
            Representation::Plain => self.reduce_plain(&prod),
            Representation::Mersenne { k } => self.reduce_mersenne(&prod, k),
            Representation::Montgomery => self.redc(&prod),
        };
        Residue::new(reduced)
    }

    pub fn sqr(&self, a: &Residue) -> Residue {
        self.mul(a, a)
    }

    /// `a^e mod N` for signed `e`; negative exponents invert first. Returns
    /// `InvertOutcome::FactorFound` if a negative exponent is requested and
    /// `a` turns out not to be invertible mod `N`.
    pub fn pow(&self, a: &Residue, e: i64) -> InvertOutcome {
        let (base, mag) = if e < 0 {
            match self.invert(a) {
                InvertOutcome::Invertible(inv) => (inv, (-e) as u64),
                other @ InvertOutcome::FactorFound(_) => return other,
            }
        } else {
            (a.clone(), e as u64)
        };
        let mut result = self.set_ui(1);
        let mut base = base;
        let mut mag = mag;
        while mag > 0 {
            if mag & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.sqr(&base);
            mag >>= 1;
        }
        InvertOutcome::Invertible(result)
    }

    /// Computes `a^-1 mod N`. If `gcd(a, N) != 1`, the inversion "fails" in
    /// the classical sense but this is the factor-discovery mechanism: the
    /// nontrivial gcd is returned rather than an error.
    pub fn invert(&self, a: &Residue) -> InvertOutcome {
        let plain = self.get_integer(a);
        if plain.is_zero() {
            return InvertOutcome::FactorFound(self.n.clone());
        }
        let a_signed = BigInt::from(plain);
        let n_signed = BigInt::from(self.n.clone());
        let egcd = a_signed.extended_gcd(&n_signed);
        let (_, gcd_mag) = egcd.gcd.clone().into_parts();
        if gcd_mag != BigUint::one() {
            return InvertOutcome::FactorFound(gcd_mag);
        }
        let inv_plain = egcd.x.mod_floor(&n_signed);
        let (_, inv_mag) = inv_plain.into_parts();
        InvertOutcome::Invertible(self.residue_from_integer(&inv_mag))
    }

    /// `gcd(a, N)`, taking `a` as a plain (non-residue) integer — the
    /// accumulator form produced by [`Self::set_integer_for_gcd`] /
    /// [`Self::mul_by_integer_to_integer`].
    pub fn gcd_with_n(&self, a: &BigUint) -> BigUint {
        a.gcd(&self.n)
    }

    /// Wraps a plain integer (e.g. a running product of many `F(g_i)`
    /// evaluations) for gcd extraction without round-tripping it through the
    /// residue representation on every multiply. The value need not be
    /// reduced mod `N` yet; only [`Self::gcd_with_n`] cares about it, and
    /// gcd is invariant under adding multiples of `N`.
    pub fn set_integer_for_gcd(&self, x: BigUint) -> BigUint {
        x
    }

    /// Multiplies a residue by a plain integer accumulator and returns a
    /// plain integer, skipping the Montgomery round trip. Used by the
    /// stage-2 gcd accumulator, which only ever needs `gcd(product, N)`.
    pub fn mul_by_integer_to_integer(&self, a: &Residue, acc: &BigUint) -> BigUint {
        (&self.get_integer(a) * acc) % &self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_odd_biguint(rng: &mut impl Rng, bits: u64) -> BigUint {
        loop {
            let mut bytes = vec![0u8; ((bits + 7) / 8) as usize];
            rng.fill(bytes.as_mut_slice());
            let mut n = BigUint::from_bytes_le(&bytes);
            n.set_bit(0, true);
            n.set_bit(bits - 1, true);
            if n > BigUint::one() {
                return n;
            }
        }
    }

    #[test]
    fn montgomery_roundtrip_add_mul() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let bits = 64 + (rng.gen::<u64>() % 1024);
            let n = random_odd_biguint(&mut rng, bits);
            let modulus = Modulus::init(n.clone()).unwrap();
            assert_eq!(modulus.representation(), Representation::Montgomery);

            let a_plain = &random_odd_biguint(&mut rng, bits) % &n;
            let b_plain = &random_odd_biguint(&mut rng, bits) % &n;
            let a = modulus.residue_from_integer(&a_plain);
            let b = modulus.residue_from_integer(&b_plain);

            assert_eq!(modulus.get_integer(&a), a_plain);
            assert_eq!(modulus.get_integer(&modulus.add(&a, &b)), (&a_plain + &b_plain) % &n);
            assert_eq!(modulus.get_integer(&modulus.mul(&a, &b)), (&a_plain * &b_plain) % &n);
        }
    }

    #[test]
    fn invert_recovers_identity_or_factor() {
        let n = BigUint::from(187u32); // 11 * 17
        let modulus = Modulus::init(n.clone()).unwrap();
        let a = modulus.set_ui(5); // gcd(5, 187) = 1
        match modulus.invert(&a) {
            InvertOutcome::Invertible(inv) => {
                let prod = modulus.mul(&a, &inv);
                assert_eq!(modulus.get_integer(&prod), BigUint::one());
            }
            InvertOutcome::FactorFound(_) => panic!("5 should be invertible mod 187"),
        }

        let b = modulus.set_ui(11); // shares a factor with 187
        match modulus.invert(&b) {
            InvertOutcome::FactorFound(f) => assert_eq!(f, BigUint::from(11u32)),
            InvertOutcome::Invertible(_) => panic!("11 should not be invertible mod 187"),
        }
    }

    #[test]
    fn plain_representation_for_even_modulus() {
        let n = BigUint::from(200u32);
        let modulus = Modulus::init(n).unwrap();
        assert_eq!(modulus.representation(), Representation::Plain);
        let a = modulus.set_ui(123);
        let b = modulus.set_ui(77);
        assert_eq!(modulus.get_integer(&modulus.add(&a, &b)), BigUint::from(200u32 % 200));
    }

    #[test]
    fn mersenne_representation_detected() {
        let n = (BigUint::one() << 67u32) - BigUint::one();
        let modulus = Modulus::init(n).unwrap();
        assert_eq!(modulus.representation(), Representation::Mersenne { k: 67 });
    }
}
