// End-to-end checks: configuration in, per-point properties out.

use approx::assert_abs_diff_eq;
use glam::DVec3;
use more_asserts::{assert_ge, assert_le};
use peridotite_melt::config::PropertyConfig;
use peridotite_melt::heating_model::HeatingModelRegistry;
use peridotite_melt::parameters::ParameterSet;
use peridotite_melt::{ConfigError, PointInput, PointProperties, PropertyEvaluator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DECK: &str = r#"{
    "compositional_field_names": ["maximum_melt_fraction", "oceanic_crust", "continental_crust"],
    "beta": 1.5,
    "Mass fraction cpx": 0.17,
    "Exponential depletion strengthening factor": 4.6,
    "Maximum Depletion viscosity change": 100.0,
    "heating_model": "compositional heating",
    "Compositional heating values": [0.0, 0.0, 2.5e-7, 1.0e-6],
    "Use compositional field for heat production averaging": 1
}"#;

fn deck_evaluator() -> PropertyEvaluator {
    let config = PropertyConfig::from_json_str(DECK).unwrap();
    PropertyEvaluator::from_config(&config, &HeatingModelRegistry::with_builtin_models()).unwrap()
}

fn random_composition(rng: &mut StdRng) -> [f64; 3] {
    [
        rng.random_range(-0.05..1.05),
        rng.random_range(-0.05..0.6),
        rng.random_range(0.0..0.6),
    ]
}

#[test]
fn test_parse_emit_parse_recovers_parameters() {
    let params = ParameterSet::from_json_str(DECK).unwrap();
    let emitted = params.to_config().to_json_string().unwrap();
    let reparsed = ParameterSet::from_json_str(&emitted).unwrap();

    assert_eq!(reparsed, params);
    assert_eq!(reparsed.melt().mass_fraction_cpx, 0.17);
    assert_eq!(reparsed.heating().heating_values(), &[0.0, 0.0, 2.5e-7, 1.0e-6]);
    assert_eq!(reparsed.heating().averaging_mask().as_slice(), &[true; 4]);
}

#[test]
fn test_configuration_file_on_disk() {
    let file_name = format!("peridotite_melt_deck_{}.json", std::process::id());
    let path = std::env::temp_dir().join(file_name);
    std::fs::write(&path, DECK).unwrap();
    let params = ParameterSet::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(params.fields().len(), 3);
    assert_eq!(params.depletion().delta_eta_depletion_max(), 100.0);
}

#[test]
fn test_invalid_decks_fail_before_evaluation() {
    let registry = HeatingModelRegistry::with_builtin_models();
    let cases = [
        (r#"{"Maximum Depletion viscosity change": 0.5}"#, "cap below one"),
        (
            r#"{"compositional_field_names": ["a", "b"], "heating_values": [0.0, 1.0]}"#,
            "short heating list",
        ),
        (
            r#"{"compositional_field_names": ["a"], "averaging_mask": [true, false, true]}"#,
            "long mask",
        ),
        (r#"{"heating_model": "latent heat"}"#, "unknown model"),
        (r#"{"beta": -1.5}"#, "negative exponent"),
        (r#"{"compositional_field_names": ["crust", "crust"]}"#, "repeated field"),
        (r#"{"A1": 1085.7, "A1x": 0.0}"#, "unknown key"),
    ];
    for (deck, why) in cases {
        let result = PropertyConfig::from_json_str(deck)
            .and_then(|config| PropertyEvaluator::from_config(&config, &registry));
        assert!(result.is_err(), "{why} should be rejected");
    }

    let config = PropertyConfig::from_json_str(r#"{"heating_model": "latent heat"}"#).unwrap();
    assert!(matches!(
        PropertyEvaluator::from_config(&config, &registry),
        Err(ConfigError::UnknownModel(_))
    ));
}

#[test]
fn test_invariants_over_random_points() {
    let evaluator = deck_evaluator();
    let mut rng = StdRng::seed_from_u64(2003);

    for _ in 0..5_000 {
        let composition = random_composition(&mut rng);
        let input = PointInput {
            temperature_k: rng.random_range(1000.0..2400.0),
            pressure_pa: rng.random_range(-1.0e8..6.0e9),
            composition: &composition,
            position: DVec3::ZERO,
        };
        let out = evaluator.evaluate_point(&input);

        assert!((0.0..=1.0).contains(&out.melt_fraction));
        assert_ge!(out.viscosity_multiplier, 1.0);
        assert_le!(out.viscosity_multiplier, 100.0);
        assert_ge!(out.heat_source_term, 0.0);
        assert_le!(out.heat_source_term, 1.0e-6 + 1e-18);
        assert_eq!(out.latent_heat_term, 0.0);
    }
}

#[test]
fn test_batch_agrees_with_pointwise_and_is_repeatable() {
    let evaluator = deck_evaluator();
    let mut rng = StdRng::seed_from_u64(7);
    let compositions: Vec<[f64; 3]> = (0..256).map(|_| random_composition(&mut rng)).collect();
    let inputs: Vec<PointInput<'_>> = compositions
        .iter()
        .map(|composition| PointInput {
            temperature_k: rng.random_range(1300.0..2100.0),
            pressure_pa: rng.random_range(0.0..4.0e9),
            composition,
            position: DVec3::new(rng.random(), rng.random(), rng.random()),
        })
        .collect();

    let mut first = vec![PointProperties::default(); inputs.len()];
    let mut second = vec![PointProperties::default(); inputs.len()];
    evaluator.evaluate(&inputs, &mut first);
    evaluator.evaluate(&inputs, &mut second);

    for ((input, a), b) in inputs.iter().zip(&first).zip(&second) {
        assert_eq!(a.melt_fraction.to_bits(), b.melt_fraction.to_bits());
        assert_eq!(a.viscosity_multiplier.to_bits(), b.viscosity_multiplier.to_bits());
        assert_eq!(a.heat_source_term.to_bits(), b.heat_source_term.to_bits());
        assert_eq!(*a, evaluator.evaluate_point(input));
    }
}

#[test]
fn test_concurrent_workers_share_one_evaluator() {
    let evaluator = deck_evaluator();
    let mut rng = StdRng::seed_from_u64(11);
    let compositions: Vec<[f64; 3]> = (0..1024).map(|_| random_composition(&mut rng)).collect();
    let inputs: Vec<PointInput<'_>> = compositions
        .iter()
        .map(|composition| PointInput {
            temperature_k: rng.random_range(1300.0..2100.0),
            pressure_pa: rng.random_range(0.0..4.0e9),
            composition,
            position: DVec3::ZERO,
        })
        .collect();

    let mut serial = vec![PointProperties::default(); inputs.len()];
    evaluator.evaluate(&inputs, &mut serial);

    let mut parallel = vec![PointProperties::default(); inputs.len()];
    std::thread::scope(|scope| {
        for (input_chunk, output_chunk) in inputs.chunks(128).zip(parallel.chunks_mut(128)) {
            let evaluator = &evaluator;
            scope.spawn(move || evaluator.evaluate(input_chunk, output_chunk));
        }
    });

    assert_eq!(serial, parallel);
}

#[test]
fn test_depletion_raises_viscosity_but_not_melting() {
    let evaluator = deck_evaluator();
    let fertile = evaluator.evaluate_point(&PointInput {
        temperature_k: 1700.0,
        pressure_pa: 1.0e9,
        composition: &[0.0, 0.0, 0.0],
        position: DVec3::ZERO,
    });
    let depleted = evaluator.evaluate_point(&PointInput {
        temperature_k: 1700.0,
        pressure_pa: 1.0e9,
        composition: &[0.5, 0.0, 0.0],
        position: DVec3::ZERO,
    });

    assert_eq!(fertile.melt_fraction, depleted.melt_fraction);
    assert_eq!(fertile.viscosity_multiplier, 1.0);
    // exp(4.6 * 0.5)
    assert_abs_diff_eq!(depleted.viscosity_multiplier, 2.3_f64.exp(), epsilon = 1e-12);
}

#[test]
fn test_constant_heating_deck() {
    let config = PropertyConfig::from_json_str(
        r#"{"heating_model": "constant heating", "constant heating value": 5e-8}"#,
    )
    .unwrap();
    let registry = HeatingModelRegistry::with_builtin_models();
    let evaluator = PropertyEvaluator::from_config(&config, &registry).unwrap();
    let out = evaluator.evaluate_point(&PointInput {
        temperature_k: 1600.0,
        pressure_pa: 0.0,
        composition: &[],
        position: DVec3::ZERO,
    });
    assert_eq!(out.heat_source_term, 5e-8);
    assert_eq!(out.viscosity_multiplier, 1.0);
}
