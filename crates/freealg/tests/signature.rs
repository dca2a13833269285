//! Series identities, signatures of paths and the CBH combination.

use std::rc::Rc;

use freealg::prelude::*;
use num_rational::BigRational;

/// Deterministic pseudo-random increments in `[-scale, scale)`.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn increment(&mut self, width: usize, scale: f64) -> Vec<f64> {
        (0..width)
            .map(|_| (2.0 * self.next_f64() - 1.0) * scale)
            .collect()
    }

    /// Approximately standard normal: the sum of twelve uniforms, centred.
    fn gaussian(&mut self) -> f64 {
        (0..12).map(|_| self.next_f64()).sum::<f64>() - 6.0
    }
}

fn path(maps: &Maps, seed: u64, steps: usize, scale: f64) -> Vec<Lie<f64>> {
    let mut rng = Lcg(seed);
    let width = maps.shape().width();
    (0..steps)
        .map(|_| maps.lie_increment(&rng.increment(width, scale)))
        .collect()
}

/// Brownian increments over unit time: `steps` normal steps per letter with
/// standard deviation `1 / sqrt(steps)`.
fn brownian_path(maps: &Maps, seed: u64, steps: usize) -> Vec<Lie<f64>> {
    let mut rng = Lcg(seed);
    let width = maps.shape().width();
    let sd = 1.0 / (steps as f64).sqrt();
    (0..steps)
        .map(|_| {
            let increment: Vec<f64> = (0..width).map(|_| rng.gaussian() * sd).collect();
            maps.lie_increment(&increment)
        })
        .collect()
}

/// `factors[0] * factors[1] * ...`, starting from the unit.
fn running_product(maps: &Maps, factors: &[FreeTensor<f64>]) -> FreeTensor<f64> {
    let mut out = FreeTensor::unit(maps.tensor_basis());
    for factor in factors {
        out *= factor;
    }
    out
}

fn rational(n: i64, d: i64) -> BigRational {
    <BigRational as Scalar>::from_integer(n) / <BigRational as Scalar>::from_integer(d)
}

fn tensor_basis(width: usize, depth: usize) -> Rc<TensorBasis> {
    Rc::new(TensorBasis::new(Shape::new(width, depth).unwrap()))
}

// =============================================================================
// Products
// =============================================================================

#[test]
fn test_width_two_depth_three_product() {
    let b = tensor_basis(2, 3);
    let lhs = FreeTensor::from_term(&b, Word::from_letters(&[1, 1]), 1.0);
    let rhs = FreeTensor::from_term(&b, Word::letter(2), 1.0);
    let product = &lhs * &rhs;
    let entries: Vec<(Word, f64)> = product.iter().map(|(w, c)| (w, *c)).collect();
    assert_eq!(entries, vec![(Word::from_letters(&[1, 1, 2]), 1.0)]);
}

#[test]
fn test_product_beyond_depth_is_dropped() {
    let b = tensor_basis(2, 3);
    let lhs = FreeTensor::from_term(&b, Word::from_letters(&[1, 2]), 1.0);
    let rhs = FreeTensor::from_term(&b, Word::from_letters(&[2, 1]), 1.0);
    assert!((&lhs * &rhs).is_empty());
}

// =============================================================================
// exp / log / inverse
// =============================================================================

#[test]
fn test_log_exp_round_trip() {
    let b = tensor_basis(3, 4);
    let mut rng = Lcg(7);
    for _ in 0..5 {
        let mut x = FreeTensor::new(&b);
        for key in b.keys().skip(1) {
            x.set(key, rng.next_f64() * 0.2 - 0.1);
        }
        let back = x.exp().log();
        assert!((&back - &x).norm_linf() < 2e-15);

        let mut one_plus_x = x.clone();
        one_plus_x.set(Word::EMPTY, 1.0);
        let again = one_plus_x.log().exp();
        assert!((&again - &one_plus_x).norm_linf() < 2e-15);
    }
}

#[test]
fn test_exact_rational_round_trip() {
    let b = tensor_basis(2, 4);
    let x = FreeTensor::from_terms(
        &b,
        [
            (Word::letter(1), rational(1, 2)),
            (Word::letter(2), rational(-3, 7)),
            (Word::from_letters(&[2, 1]), rational(5, 3)),
            (Word::from_letters(&[1, 2, 2]), rational(-1, 11)),
        ],
    );
    assert_eq!(x.exp().log(), x);
    let inv = x.exp().inverse().unwrap();
    assert_eq!(inv, (-&x).exp());
}

#[test]
fn test_exp_zero_and_log_one() {
    let b = tensor_basis(4, 3);
    assert_eq!(FreeTensor::<f64>::new(&b).exp(), FreeTensor::unit(&b));
    assert!(FreeTensor::<f64>::unit(&b).log().is_empty());
}

#[test]
fn test_inverse_times_self_is_unit() {
    let b = tensor_basis(2, 4);
    let x = FreeTensor::from_terms(
        &b,
        [
            (Word::EMPTY, rational(2, 1)),
            (Word::letter(1), rational(1, 3)),
            (Word::from_letters(&[1, 2]), rational(-1, 1)),
        ],
    );
    let inv = x.inverse().unwrap();
    assert_eq!(&inv * &x, FreeTensor::unit(&b));
    assert_eq!(&x * &inv, FreeTensor::unit(&b));
}

#[test]
fn test_inverse_without_unit_fails() {
    let b = tensor_basis(2, 3);
    let x = FreeTensor::from_letter(&b, 1, 1.0);
    assert!(matches!(
        x.inverse(),
        Err(freealg::AlgebraError::NonInvertibleUnit)
    ));
}

#[test]
fn test_log_of_scaled_unit_fails() {
    let b = tensor_basis(2, 3);
    let y = FreeTensor::from_terms(&b, [(Word::EMPTY, 2.0), (Word::letter(1), 0.5)]);
    assert!(matches!(
        y.try_log(),
        Err(freealg::AlgebraError::NonUnitLogarithm)
    ));
    let one_plus = FreeTensor::from_terms(&b, [(Word::EMPTY, 1.0), (Word::letter(1), 0.5)]);
    assert!((&one_plus.try_log().unwrap().exp() - &one_plus).norm_linf() < 1e-15);
}

// =============================================================================
// Signatures
// =============================================================================

#[test]
fn test_chen_identity_at_every_split() {
    let maps = Maps::new(Shape::new(2, 4).unwrap());
    let steps = path(&maps, 42, 8, 0.1);
    let whole = maps.signature(&steps);
    for i in 0..=steps.len() {
        let head = maps.signature(&steps[..i]);
        let tail = maps.signature(&steps[i..]);
        let joined = &head * &tail;
        assert!(
            (&joined - &whole).norm_linf() < 2e-15,
            "split at {i}"
        );
    }
}

#[test]
fn test_chen_identity_on_brownian_path() {
    let maps = Maps::new(Shape::new(5, 5).unwrap());
    let steps = brownian_path(&maps, 9, 60);
    let exps: Vec<FreeTensor<f64>> = steps.iter().map(|x| maps.exp_lie(x)).collect();
    let whole = maps.signature(&steps);
    let mut head = FreeTensor::unit(maps.tensor_basis());
    for i in 0..=exps.len() {
        let joined = &head * &running_product(&maps, &exps[i..]);
        assert!(
            (&joined - &whole).norm_linf() < 2e-15,
            "split at {i}"
        );
        if let Some(factor) = exps.get(i) {
            head *= factor;
        }
    }
}

#[test]
fn test_signature_of_empty_path_is_unit() {
    let maps = Maps::new(Shape::new(3, 3).unwrap());
    let none: [Lie<f64>; 0] = [];
    assert_eq!(
        maps.signature(&none),
        FreeTensor::unit(maps.tensor_basis())
    );
    assert!(maps.log_signature(&none).is_empty());
}

#[test]
fn test_log_signature_of_single_step_is_the_step() {
    let maps = Maps::new(Shape::new(3, 4).unwrap());
    let step = maps.lie_increment(&[rational(1, 2), rational(2, 3), rational(-1, 5)]);
    assert_eq!(maps.log_signature([&step]), step);
}

// =============================================================================
// CBH
// =============================================================================

#[test]
fn test_cbh_of_unit_letters_matches_tensor_route() {
    let shape = Shape::new(5, 5).unwrap();
    let cbh = Cbh::<f64>::new(shape);
    let maps = cbh.maps();
    let letters: Vec<Lie<f64>> = (1..=5)
        .map(|l| Lie::from_letter(maps.lie_basis(), l, 1.0))
        .collect();
    let refs: Vec<&Lie<f64>> = letters.iter().collect();

    let via_lie = cbh.full(&refs);
    let via_tensor = cbh.full_via_tensor(&refs);
    for (key, c) in via_tensor.iter() {
        let diff = (via_lie.get(&key) - c).abs();
        assert!(diff < 7e-16, "{}: {diff}", maps.lie_basis().bracket_string(key));
    }
    assert!((&via_lie - &via_tensor).norm_linf() < 7e-16);
    assert_eq!(maps.lie_basis().dimension(), 829);
}

#[test]
fn test_cbh_of_brownian_path_matches_log_signature() {
    let shape = Shape::new(5, 5).unwrap();
    let cbh = Cbh::<f64>::new(shape);
    let maps = cbh.maps();
    let steps = brownian_path(maps, 9, 60);
    let refs: Vec<&Lie<f64>> = steps.iter().collect();

    let logsig = maps.log_signature(&steps);
    let combined = cbh.full(&refs);
    for (key, c) in logsig.iter() {
        let diff = (combined.get(&key) - c).abs();
        assert!(diff < 7e-16, "{}: {diff}", maps.lie_basis().bracket_string(key));
    }
    assert!((&combined - &logsig).norm_linf() < 7e-16);
    assert_eq!(logsig.len(), 829);
}

#[test]
fn test_cbh_of_long_uniform_path() {
    let cbh = Cbh::<f64>::new(Shape::new(3, 4).unwrap());
    let maps = cbh.maps();
    let steps = path(maps, 2024, 100, 0.1);
    let refs: Vec<&Lie<f64>> = steps.iter().collect();
    let logsig = maps.log_signature(&steps);
    assert!((&cbh.full(&refs) - &logsig).norm_linf() < 1e-15);
}

#[test]
fn test_cbh_exact_rational() {
    let cbh = Cbh::<BigRational>::new(Shape::new(3, 4).unwrap());
    let maps = cbh.maps();
    let steps = [
        maps.lie_increment(&[rational(1, 1), rational(-1, 2), rational(0, 1)]),
        maps.lie_increment(&[rational(1, 3), rational(1, 3), rational(2, 1)]),
        maps.lie_increment(&[rational(0, 1), rational(5, 4), rational(-1, 6)]),
        maps.lie_increment(&[rational(-2, 1), rational(0, 1), rational(1, 7)]),
    ];
    let refs: Vec<&Lie<BigRational>> = steps.iter().collect();
    assert_eq!(cbh.full(&refs), cbh.full_via_tensor(&refs));
}

#[test]
fn test_f64_cbh_close_to_exact() {
    let shape = Shape::new(2, 5).unwrap();
    let exact = Cbh::<BigRational>::new(shape);
    let float = Cbh::<f64>::new(shape);
    let x = [rational(1, 4), rational(-1, 2)];
    let y = [rational(3, 8), rational(1, 16)];
    let to_f64 = |v: &[BigRational]| v.iter().map(Scalar::approx_f64).collect::<Vec<_>>();

    let ex = exact.maps().lie_increment(&x);
    let ey = exact.maps().lie_increment(&y);
    let fx = float.maps().lie_increment(&to_f64(&x));
    let fy = float.maps().lie_increment(&to_f64(&y));

    let reference = exact.pair(&ex, &ey);
    let approx = float.pair(&fx, &fy);
    for (key, c) in reference.iter() {
        assert!((approx.get(&key) - c.approx_f64()).abs() < 1e-15);
    }
    for (key, c) in approx.iter() {
        assert!((c - reference.get(&key).approx_f64()).abs() < 1e-15);
    }
}
