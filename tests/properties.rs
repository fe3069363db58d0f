use approx::assert_relative_eq;
use num_complex::Complex;
use num_traits::Float;

use lc_ladder::circuits::netlist::{Netlist, INPUT_NODE, OUTPUT_NODE};
use lc_ladder::circuits::nodal::solve_ac;
use lc_ladder::circuits::ComponentKind;
use lc_ladder::constants::{RIPPLE_HALF_DB, RIPPLE_ONE_DB};
use lc_ladder::filters::assembler::{expand_poles, normalize, to_component_polynomial};
use lc_ladder::filters::poles::butterworth_poles;
use lc_ladder::filters::{cauer_elements, design, synthesize, Cutoff, Excitation, FilterSpec, LadderDesign};
use lc_ladder::math::{Real, Scalar};

/// Butterworth coefficients from the product recurrence `a_k = a_{k-1}·cos((k-1)γ)/sin(kγ)`.
fn butterworth_table(order: usize) -> Vec<f64> {
    let gamma = std::f64::consts::PI / (2.0 * order as f64);
    let mut a = vec![1.0];
    for k in 1..=order {
        let prev = a[k - 1];
        a.push(prev * ((k - 1) as f64 * gamma).cos() / (k as f64 * gamma).sin());
    }
    a.reverse();
    a
}

fn all_topologies() -> Vec<(Excitation, bool)> {
    vec![
        (Excitation::Voltage, false),
        (Excitation::Voltage, true),
        (Excitation::Current, false),
        (Excitation::Current, true),
    ]
}

fn butterworth_spec<T: Real>(order: usize, excitation: Excitation, source: bool) -> FilterSpec<T> {
    let spec = FilterSpec::butterworth(order, Cutoff::Hertz(T::lit(1.0e3)), T::lit(50.0))
        .unwrap()
        .with_excitation(excitation);
    if source {
        spec.with_source_resistance()
    } else {
        spec
    }
}

#[test]
fn butterworth_poles_reproduce_the_table() {
    for order in 1..=8 {
        let table = butterworth_table(order);
        let wc = 2.0 * std::f64::consts::PI * 1.0e3;
        let low = normalize(&expand_poles(&butterworth_poles(order, wc)).unwrap(), wc);
        let high = normalize(
            &expand_poles(&butterworth_poles(order, Scalar::lit(wc))).unwrap(),
            Scalar::lit(wc),
        );
        for ((a, b), want) in low.coefficients().iter().zip(high.coefficients()).zip(&table) {
            assert_relative_eq!(*a, *want, max_relative = 1.0e-9);
            assert_relative_eq!(b.as_f64(), *want, max_relative = 1.0e-12);
        }
    }
}

#[test]
fn chebyshev_components_match_published_tables() {
    let tables: [(f64, usize, &[f64]); 6] = [
        (RIPPLE_HALF_DB, 2, &[1.4029, 0.7071]),
        (RIPPLE_HALF_DB, 3, &[1.5963, 1.0967, 1.5963]),
        (RIPPLE_HALF_DB, 4, &[1.6703, 1.1926, 2.3661, 0.8419]),
        (RIPPLE_ONE_DB, 2, &[1.8219, 0.6850]),
        (RIPPLE_ONE_DB, 3, &[2.0236, 0.9941, 2.0236]),
        (RIPPLE_ONE_DB, 4, &[2.0991, 1.0644, 2.8311, 0.7892]),
    ];
    for (ripple, order, reactive) in tables {
        let spec = FilterSpec::chebyshev(order, Cutoff::Radians(1.0), 1.0, ripple).unwrap();
        let ladder = design(&spec).unwrap();
        assert_eq!(ladder.components.len(), order + 2);
        assert_eq!(ladder.components[0].kind(), ComponentKind::Resistor);
        assert_eq!(ladder.components[1].kind(), ComponentKind::Capacitor);
        for (component, want) in ladder.components[1..=order].iter().zip(reactive) {
            assert_relative_eq!(component.value(), *want, max_relative = 2.0e-4);
        }
    }
}

#[test]
fn component_polynomial_is_three_db_down_at_cutoff() {
    for order in 1..=8 {
        for (excitation, source) in all_topologies() {
            let ladder = design(&butterworth_spec::<f64>(order, excitation, source)).unwrap();
            let wc = *ladder.spec.cutoff();
            let d = &ladder.component_polynomial;
            let ratio = d.constant().abs() / d.eval_complex(Complex::new(0.0, wc)).norm();
            assert_relative_eq!(ratio, std::f64::consts::FRAC_1_SQRT_2, max_relative = 1.0e-9);
        }
    }
}

#[test]
fn chebyshev_component_polynomial_sits_on_the_ripple_edge() {
    let eps = RIPPLE_ONE_DB;
    for order in 1..=6 {
        let spec = FilterSpec::chebyshev(order, Cutoff::Radians(10.0), 75.0, eps).unwrap();
        let ladder = design(&spec).unwrap();
        let at_edge = ladder.normalized.eval_complex(Complex::new(0.0, 1.0)).norm();
        assert_relative_eq!(at_edge, (1.0 + eps * eps).sqrt(), max_relative = 1.0e-9);
        // Reconstructing from the normalized polynomial gives back the stored one.
        let dc = *ladder.component_polynomial.constant();
        let rebuilt = to_component_polynomial(&ladder.normalized, dc, 10.0).unwrap();
        assert!(rebuilt.deviation(&ladder.component_polynomial) < 1.0e-12);
    }
}

#[test]
fn realized_ladders_match_their_targets_in_high_precision() {
    let limit = Scalar::lit(1.0e-24);
    for order in 1..=8 {
        for (excitation, source) in all_topologies() {
            let ladder = design(&butterworth_spec::<Scalar>(order, excitation, source)).unwrap();
            assert!(ladder.deviation < limit, "order {order}: {}", ladder.deviation);
        }
        for excitation in [Excitation::Voltage, Excitation::Current] {
            let spec = FilterSpec::chebyshev_db(
                order,
                Cutoff::Hertz(Scalar::lit(2.0e6)),
                Scalar::lit(50.0),
                Scalar::lit(0.5),
            )
            .unwrap()
            .with_excitation(excitation);
            let ladder = design(&spec).unwrap();
            assert!(ladder.deviation < limit, "order {order}: {}", ladder.deviation);
        }
    }
}

#[test]
fn megahertz_butterworth_designs_hold_up_to_order_25() {
    let limit = Scalar::lit(1.0e-24);
    for order in [10, 16, 18, 20, 25] {
        for (excitation, source) in all_topologies() {
            let spec = FilterSpec::butterworth(order, Cutoff::Hertz(Scalar::lit(1.0e6)), Scalar::lit(50.0))
                .unwrap()
                .with_excitation(excitation);
            let spec = if source { spec.with_source_resistance() } else { spec };
            let ladder = design(&spec).unwrap_or_else(|e| panic!("order {order}: {e}"));
            assert!(ladder.deviation < limit, "order {order}: {}", ladder.deviation);
            assert!(ladder.components.iter().all(|c| c.value().is_finite()));

            let wc = *ladder.spec.cutoff();
            let dc = ladder.response(Scalar::lit(0.0)).norm();
            let edge = ladder.response(wc).norm() / dc;
            assert_relative_eq!(edge.as_f64(), std::f64::consts::FRAC_1_SQRT_2, max_relative = 1.0e-12);
        }
    }
}

#[test]
fn bessel_denominators_verify_in_high_precision() {
    let cases: [&[f64]; 3] = [&[1.0, 3.0, 3.0], &[1.0, 6.0, 15.0, 15.0], &[1.0, 10.0, 45.0, 105.0, 105.0]];
    for coefficients in cases {
        for excitation in [Excitation::Voltage, Excitation::Current] {
            let spec = FilterSpec::cauer_normalized(coefficients.iter().copied().map(Scalar::lit).collect())
                .unwrap()
                .with_excitation(excitation);
            let ladder = design(&spec).unwrap_or_else(|e| panic!("{coefficients:?}: {e}"));
            assert!(ladder.deviation < Scalar::lit(1.0e-24), "{coefficients:?}: {}", ladder.deviation);
        }
    }
    let third = cauer_elements(&[1.0, 6.0, 15.0, 15.0].map(Scalar::lit)).unwrap();
    assert_relative_eq!(third.load().as_f64(), 5.341_731_501_788_360, max_relative = 1.0e-14);
}

#[test]
fn chebyshev_denominator_resynthesizes_in_high_precision() {
    // Monic 0.5 dB third-order denominator as produced by an f64 design.
    let reference = design(&FilterSpec::chebyshev(3, Cutoff::Radians(1.0), 1.0, RIPPLE_HALF_DB).unwrap()).unwrap();
    let monic: Vec<Scalar> = reference
        .normalized
        .monic()
        .unwrap()
        .coefficients()
        .iter()
        .copied()
        .map(Scalar::lit)
        .collect();

    let elements = cauer_elements(&monic).unwrap();
    assert!(elements.repeated_root());
    for (got, want) in elements.values().iter().zip([1.0, 1.5963, 1.0967, 1.5963, 1.0]) {
        assert_relative_eq!(got.as_f64(), want, max_relative = 1.0e-4);
    }
    for excitation in [Excitation::Voltage, Excitation::Current] {
        let spec = FilterSpec::cauer_normalized(monic.clone()).unwrap().with_excitation(excitation);
        let ladder = design(&spec).unwrap();
        assert!(ladder.deviation < Scalar::lit(1.0e-12), "{}", ladder.deviation);
    }
}

#[test]
fn cauer_two_coefficients() {
    let ladder = synthesize(&[1.0_f64, 1.0]).unwrap();
    let summary: Vec<(ComponentKind, f64)> = ladder.iter().map(|c| (c.kind(), c.value())).collect();
    assert_eq!(
        summary,
        [
            (ComponentKind::Resistor, 1.0),
            (ComponentKind::Capacitor, 2.0),
            (ComponentKind::Resistor, 1.0)
        ]
    );
}

#[test]
fn cauer_coefficient_count_boundaries() {
    for count in [1, 7] {
        let err = synthesize(&vec![1.0_f64; count]).unwrap_err();
        assert!(err.is_invalid_spec(), "{count}: {err}");
        assert_eq!(err.exit_code(), 2);
    }
}

#[test]
fn cauer_designs_verify_for_both_excitations() {
    let cases: [&[f64]; 4] = [
        &[1.0, 1.0],
        &[1.0, std::f64::consts::SQRT_2, 1.0],
        &[1.0, 2.0, 2.0, 1.0],
        &[1.0, 2.0, 3.0, 2.5, 1.0],
    ];
    for coefficients in cases {
        for excitation in [Excitation::Voltage, Excitation::Current] {
            let spec = FilterSpec::cauer_normalized(coefficients.iter().copied().map(Scalar::lit).collect())
                .unwrap()
                .with_excitation(excitation);
            let ladder = design(&spec).unwrap();
            assert_eq!(ladder.components.len(), coefficients.len() + 1);
            assert!(ladder.deviation < Scalar::lit(1.0e-24), "{coefficients:?}");
        }
    }
}

#[test]
fn designs_are_repeatable() {
    let spec = FilterSpec::chebyshev_db(5, Cutoff::Hertz(Scalar::lit(1.0e3)), Scalar::lit(50.0), Scalar::lit(1.0))
        .unwrap();
    let first = design(&spec).unwrap();
    let second = design(&spec).unwrap();
    assert_eq!(first.components, second.components);
    assert_eq!(first.poles, second.poles);
    assert_eq!(first.realized, second.realized);

    let cauer = [1.0_f64, 2.0, 2.0, 1.0];
    assert_eq!(synthesize(&cauer).unwrap(), synthesize(&cauer).unwrap());
}

fn load_voltage(ladder: &LadderDesign<f64>, deck: &Netlist, omega: f64) -> Complex<f64> {
    let solution = solve_ac(deck, omega).unwrap();
    let node = if ladder.components.iter().any(|c| c.kind() == ComponentKind::Inductor)
        || (ladder.spec.source_resistance() && ladder.spec.excitation() == Excitation::Voltage)
    {
        OUTPUT_NODE
    } else {
        INPUT_NODE
    };
    solution.voltage(node).unwrap()
}

#[test]
fn emitted_netlists_reproduce_the_response() {
    let mut specs: Vec<FilterSpec<f64>> = Vec::new();
    for order in 1..=5 {
        for (excitation, source) in all_topologies() {
            specs.push(butterworth_spec(order, excitation, source));
        }
        specs.push(
            FilterSpec::chebyshev(order, Cutoff::Hertz(1.0e3), 50.0, RIPPLE_HALF_DB)
                .unwrap()
                .with_excitation(Excitation::Current),
        );
    }
    for spec in specs {
        let ladder = design(&spec).unwrap();
        let mut buf = Vec::new();
        ladder.write_netlist(&mut buf).unwrap();
        let deck = Netlist::parse(&String::from_utf8(buf).unwrap()).unwrap();
        let wc = *spec.cutoff();
        for omega in [0.1 * wc, wc, 3.0 * wc] {
            let expected = ladder.response(omega);
            let solved = load_voltage(&ladder, &deck, omega);
            assert_relative_eq!(solved.re, expected.re, max_relative = 1.0e-6, epsilon = 1.0e-9);
            assert_relative_eq!(solved.im, expected.im, max_relative = 1.0e-6, epsilon = 1.0e-9);
        }
    }
}
