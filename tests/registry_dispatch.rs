use approx::assert_relative_eq;
use optpricer::core::{OptionType, PricingError};
use optpricer::registry::{Model, ModelFn, ModelOutput, ModelRequest, resolve};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn registry_lists_exactly_three_models() {
    let names: Vec<&str> = Model::ALL.iter().map(|m| m.name()).collect();
    assert_eq!(names, ["Black-Scholes", "Binomial Tree", "Monte Carlo"]);
}

#[test]
fn unknown_model_name_is_not_found() {
    let err = resolve("Unknown Model").unwrap_err();
    assert!(matches!(err, PricingError::NotFound(_)));
    assert!(err.to_string().contains("Unknown Model"));
}

#[test]
fn resolved_binomial_function_validates_steps() {
    let ModelFn::BinomialTree(tree) = resolve("Binomial Tree").unwrap().function() else {
        panic!("Binomial Tree resolved to another function");
    };
    let err = tree(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0, 0).unwrap_err();
    assert!(matches!(err, PricingError::InvalidArgument(_)));
    let px = tree(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0, 100).unwrap();
    assert!((px - 10.450_583_572_185_565).abs() < 0.05);
}

#[test]
fn json_requests_drive_every_model() {
    let mut rng = StdRng::seed_from_u64(5);

    let bs: ModelRequest =
        serde_json::from_str(r#"{"model": "Black-Scholes", "option_type": "put"}"#).unwrap();
    let price = bs.evaluate(&mut rng).unwrap().price().unwrap();
    assert_relative_eq!(price, 5.573_526_022_256_971, epsilon = 1e-10);

    let mc: ModelRequest = serde_json::from_str(
        r#"{"model": "Monte Carlo", "n_simulations": 20, "n_steps": 12, "mu": 0.0}"#,
    )
    .unwrap();
    match mc.evaluate(&mut rng).unwrap() {
        ModelOutput::Paths(paths) => assert_eq!(paths.shape(), (12, 20)),
        ModelOutput::Price(px) => panic!("Monte Carlo returned a price {px}"),
    }
}

#[test]
fn request_errors_surface_unchanged() {
    let mut rng = StdRng::seed_from_u64(0);
    let bad: ModelRequest =
        serde_json::from_str(r#"{"model": "Black-Scholes", "vol": 0.0}"#).unwrap();
    assert!(matches!(
        bad.evaluate(&mut rng),
        Err(PricingError::NumericDomain(_))
    ));
}

#[test]
fn monte_carlo_output_serializes_with_shape() {
    let mut rng = StdRng::seed_from_u64(9);
    let output = Model::MonteCarlo
        .default_request()
        .evaluate(&mut rng)
        .unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["paths"]["n_steps"], 252);
    assert_eq!(json["paths"]["n_simulations"], 1_000);
}
