use fuzzy_irrigation::ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp};
use fuzzy_irrigation::service::CalculateRequest;
use fuzzy_irrigation::{
    compute_irrigation, Config, Inputs, IrrigationCategory, IrrigationModel, IrrigationService, MamdaniInference,
    MembershipFunction, Rules, Terms, Variables,
};

#[test]
fn test_reference_durations() {
    use IrrigationCategory::*;

    let model = IrrigationModel::new().unwrap();

    // (soil, temperature, humidity) -> rounded minutes
    let cases = [
        ((50., 25., 50.), 30., Moderate),
        ((10., 40., 15.), 49.77, Heavy),
        ((55., 27., 65.), 21.99, Moderate),
        ((40., 30., 30.), 39.3, Moderate),
        ((60., 18., 60.), 24.16, Moderate),
        ((80., 10., 80.), 7.8, Light),
        ((35., 35., 20.), 42.01, Heavy),
        ((65., 22., 40.), 25.36, Moderate),
        ((0., 25., 50.), 0., Off),
        ((150., 25., 50.), 0., Off),
    ];

    for ((soil, temp, hum), minutes, category) in cases {
        let decision = model.compute(soil, temp, hum).unwrap();

        assert_eq!(decision.duration_minutes, minutes, "{soil} {temp} {hum}");
        assert_eq!(decision.category, category, "{soil} {temp} {hum}");
    }
}

#[test]
fn test_entry_point_matches_model() {
    let model = IrrigationModel::new().unwrap();

    assert_eq!(
        compute_irrigation(40., 30., 30.).unwrap(),
        model.compute(40., 30., 30.).unwrap()
    );
}

#[test]
fn test_firing_strengths_for_mixed_inputs() {
    let eval = IrrigationModel::new().unwrap().evaluate(60., 18., 60.).unwrap();

    assert_eq!(eval.firing_strengths, vec![0., 0.5, 0.25, 0., 0., 0.25, 0.25, 0., 0.25]);
    assert!(!eval.no_rule_fired());
    assert!((eval.aggregated.area() - 15.425).abs() < 1e-9);
}

#[test]
fn test_decision_serializes_with_snake_case_category() {
    let decision = compute_irrigation(80., 10., 80.).unwrap();
    let json = serde_json::to_value(decision).unwrap();

    assert_eq!(json["duration_minutes"], 7.8);
    assert_eq!(json["category"], "light");
}

#[test]
fn test_service_from_json_config() {
    let json = r#"{
        "service": { "default_soil_moisture": 10.0, "default_temperature": 40.0, "default_humidity": 15.0 }
    }"#;
    let config = Config::from_json(json).unwrap();
    let service = IrrigationService::new(&config).unwrap();
    let decision = service.calculate(CalculateRequest::default()).unwrap();

    assert_eq!(decision.category, IrrigationCategory::Heavy);
    assert_eq!(service.history()[0].soil_moisture, 10.);
}

#[test]
fn test_generic_engine_with_custom_rule_base() {
    use fixed_map::Key;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Light {
        Dim,
        Bright,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Shade {
        Open,
        Closed,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum BlindTerms {
        Light(Light),
        Shade(Shade),
    }

    impl From<Light> for BlindTerms {
        fn from(l: Light) -> Self {
            Self::Light(l)
        }
    }

    impl From<Shade> for BlindTerms {
        fn from(s: Shade) -> Self {
            Self::Shade(s)
        }
    }

    let mut light_terms = Terms::new();
    let mut shade_terms = Terms::new();

    light_terms.insert(Light::Dim, MembershipFunction::trapezoidal(0., 0., 200., 600.).unwrap());
    light_terms.insert(Light::Bright, MembershipFunction::trapezoidal(400., 800., 1000., 1000.).unwrap());
    shade_terms.insert(Shade::Open, MembershipFunction::triangular(0., 10., 20.).unwrap());
    shade_terms.insert(Shade::Closed, MembershipFunction::triangular(80., 90., 100.).unwrap());

    let mut vars = Variables::<BlindTerms>::new();
    let light = vars.add("light", 0. ..=1000., light_terms, Some(1.)).unwrap();
    let shade = vars.add("shade", 0. ..=100., shade_terms, None).unwrap();
    let mut rules = Rules::new();

    rules.add(light.is(Light::Dim), shade.is(Shade::Open)).unwrap();
    rules.add(light.is(Light::Bright), shade.is(Shade::Closed)).unwrap();

    let mut inputs = Inputs::new();
    inputs.add(light, 900.);

    let model = MamdaniInference::new(AndOp::Min, OrOp::Max, ImplicationOp::Clip, DefuzzificationOp::Centroid);
    let outputs = model.eval(&vars, &rules, &inputs).unwrap();
    let closed = outputs.defuzzified(shade).unwrap();

    assert!((closed - 90.).abs() < 1e-9, "{closed}");

    // Larsen scaling keeps a symmetric consequent symmetric
    let larsen = MamdaniInference {
        imp_op: ImplicationOp::Scale,
        ..model
    };
    let mut inputs = Inputs::new();
    inputs.add(light, 500.);

    let blended = larsen.eval(&vars, &rules, &inputs).unwrap().defuzzified(shade).unwrap();

    assert!((blended - 50.).abs() < 1e-9, "{blended}");
}
