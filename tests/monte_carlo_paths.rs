use optpricer::core::PricingError;
use optpricer::engines::monte_carlo::{GbmPathSimulator, simulate_gbm_paths};
use optpricer::registry::MonteCarloParams;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "parallel")]
use optpricer::engines::monte_carlo::simulate_gbm_paths_parallel;

const S0: f64 = 100.0;
const MU: f64 = 0.07;
const SIGMA: f64 = 0.2;
const EXPIRY: f64 = 1.0;

/// Row `n_steps - 1` sits at `(n_steps - 1) * dt`.
fn expected_final_mean(n_steps: usize) -> f64 {
    MonteCarloParams {
        spot: S0,
        mu: MU,
        vol: SIGMA,
        expiry: EXPIRY,
        n_simulations: 1,
        n_steps,
    }
    .expected_final_price()
}

#[test]
fn final_row_mean_matches_gbm_expectation() {
    let mut rng = StdRng::seed_from_u64(2024);
    let paths = simulate_gbm_paths(S0, MU, SIGMA, EXPIRY, 10_000, 252, &mut rng).unwrap();

    assert_eq!(paths.shape(), (252, 10_000));
    assert!(paths.as_slice().iter().all(|&s| s > 0.0 && s.is_finite()));
    assert!(paths.row(0).unwrap().iter().all(|&s| s == S0));

    let mean = paths.mean_final_price();
    let se = paths.standard_error_final();
    let expected = expected_final_mean(252);
    assert!(se > 0.0);
    assert!(
        (mean - expected).abs() < 3.0 * se,
        "mean={mean} expected={expected} se={se}"
    );
}

#[test]
fn seeded_simulator_is_reproducible() {
    let sim = GbmPathSimulator::new(500, 50, 7);
    let a = sim.simulate(S0, MU, SIGMA, EXPIRY).unwrap();
    let b = sim.simulate(S0, MU, SIGMA, EXPIRY).unwrap();
    assert_eq!(a, b);

    let other = GbmPathSimulator::new(500, 50, 8)
        .simulate(S0, MU, SIGMA, EXPIRY)
        .unwrap();
    assert_ne!(a.final_prices(), other.final_prices());
}

#[test]
fn zero_volatility_paths_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(1);
    let paths = simulate_gbm_paths(S0, MU, 0.0, EXPIRY, 3, 5, &mut rng).unwrap();
    let dt = EXPIRY / 5.0;
    for (t, row) in paths.rows().enumerate() {
        let expected = S0 * (MU * dt * t as f64).exp();
        for &s in row {
            assert!((s - expected).abs() <= 1e-12 * expected);
        }
    }
}

#[test]
fn single_row_and_single_path_shapes() {
    let mut rng = StdRng::seed_from_u64(3);
    let one_row = simulate_gbm_paths(S0, MU, SIGMA, EXPIRY, 4, 1, &mut rng).unwrap();
    assert_eq!(one_row.shape(), (1, 4));
    assert_eq!(one_row.final_prices(), &[S0; 4]);

    let one_path = simulate_gbm_paths(S0, MU, SIGMA, EXPIRY, 1, 10, &mut rng).unwrap();
    assert_eq!(one_path.path(0).unwrap().len(), 10);
    assert_eq!(one_path.standard_error_final(), 0.0);
}

#[test]
fn invalid_simulation_inputs_are_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let cases = [
        (0.0, SIGMA, EXPIRY, 10, 10),
        (S0, -0.1, EXPIRY, 10, 10),
        (S0, SIGMA, -1.0, 10, 10),
        (S0, SIGMA, EXPIRY, 0, 10),
        (S0, SIGMA, EXPIRY, 10, 0),
        (f64::NAN, SIGMA, EXPIRY, 10, 10),
        (S0, SIGMA, EXPIRY, usize::MAX, 2),
    ];
    for (s0, sigma, expiry, n_sims, n_steps) in cases {
        let result = simulate_gbm_paths(s0, MU, sigma, expiry, n_sims, n_steps, &mut rng);
        assert!(
            matches!(result, Err(PricingError::InvalidArgument(_))),
            "s0={s0} sigma={sigma} T={expiry} sims={n_sims} steps={n_steps}"
        );
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_simulation_matches_gbm_expectation() {
    let paths = simulate_gbm_paths_parallel(S0, MU, SIGMA, EXPIRY, 10_000, 252, 11).unwrap();
    let again = simulate_gbm_paths_parallel(S0, MU, SIGMA, EXPIRY, 10_000, 252, 11).unwrap();
    assert_eq!(paths, again);

    let mean = paths.mean_final_price();
    let se = paths.standard_error_final();
    let expected = expected_final_mean(252);
    assert!((mean - expected).abs() < 3.0 * se, "mean={mean} expected={expected} se={se}");
}
