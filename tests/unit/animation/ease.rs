use proptest::prelude::*;

use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
    }
}

#[test]
fn out_of_range_input_is_clamped() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(-3.0), ease.apply(0.0));
        assert_eq!(ease.apply(7.5), ease.apply(1.0));
    }
}

#[test]
fn in_out_cubic_is_symmetric() {
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    for t in [0.1, 0.2, 0.35, 0.45] {
        let a = Ease::InOutCubic.apply(t);
        let b = Ease::InOutCubic.apply(1.0 - t);
        assert!((a + b - 1.0).abs() < 1e-12);
    }
}

#[test]
fn out_back_overshoots_then_settles() {
    let peak = (1..100)
        .map(|i| Ease::OutBack.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert_eq!(Ease::OutBack.apply(1.0), 1.0);
}

#[test]
fn monotonic_spot_check() {
    for ease in [Ease::Linear, Ease::OutCubic, Ease::InOutCubic] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

proptest! {
    #[test]
    fn non_overshooting_curves_stay_in_unit_range(t in -2.0f64..3.0) {
        for ease in [Ease::Linear, Ease::OutCubic, Ease::InOutCubic] {
            let v = ease.apply(t);
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
