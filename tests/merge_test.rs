use std::time::{Duration, Instant};

use polymers::merge::{cross_valid, merge};
use polymers::{generate, Walk};
use polymers::utils::rng::seeded;

#[test]
fn test_merge_length_law() {
    let mut rng = seeded(21);
    for (a, b) in [(0, 0), (1, 4), (7, 3), (25, 40)] {
        let left = generate(a, 2, &mut rng).unwrap();
        let right = generate(b, 2, &mut rng).unwrap();
        let joined = merge(&left, &right);
        assert_eq!(joined.len(), left.len() + right.len());
        assert_eq!(joined.first(), left.first());
        assert!(joined.has_unit_steps(), "junction must be a single unit step away");
    }
}

#[test]
fn test_shared_interior_site_is_detected() {
    let left = Walk::from_points(&[[0, -1], [0, 0], [1, 0], [1, 1], [0, 1]]).unwrap();
    // Translated to start at (0,1), the second site lands on (0,0).
    let right = Walk::from_points(&[[0, 0], [0, -1], [0, -2]]).unwrap();
    assert!(!cross_valid(&left, &right));
}

#[test]
fn test_disjoint_half_spaces_are_valid() {
    let left = Walk::from_points(&[[-3, 0], [-2, 0], [-1, 0], [0, 0]]).unwrap();
    let right = Walk::from_points(&[[0, 0], [1, 0], [1, 1], [2, 1], [2, 2]]).unwrap();
    assert!(cross_valid(&left, &right));
    assert!(merge(&left, &right).is_self_avoiding());
}

#[test]
fn test_cross_valid_agrees_with_full_check() {
    // The outward scan must give the same verdict as checking the joined walk.
    let mut rng = seeded(99);
    let mut rejected = 0;
    for _ in 0..300 {
        let left = generate(12, 2, &mut rng).unwrap();
        let right = generate(9, 2, &mut rng).unwrap();
        let valid = cross_valid(&left, &right);
        assert_eq!(valid, merge(&left, &right).is_self_avoiding());
        if !valid {
            rejected += 1;
        }
    }
    assert!(rejected > 0, "some random pairs should collide");
}

#[test]
fn test_cross_valid_does_not_mutate_inputs() {
    let left = Walk::rod(5, 3);
    let right = Walk::from_points(&[[9, 9, 9], [9, 9, 10]]).unwrap();
    let (l0, r0) = (left.clone(), right.clone());
    let _ = cross_valid(&left, &right);
    assert_eq!(left, l0);
    assert_eq!(right, r0);
}

/// A straight walk of `n` steps along `-axis 0`.
fn backward_rod(n: i32) -> Walk {
    let pts: Vec<[i32; 2]> = (0..=n).map(|i| [-i, 0]).collect();
    Walk::from_points(&pts).unwrap()
}

fn fastest_round<F: FnMut()>(calls: usize, mut f: F) -> Duration {
    (0..5)
        .map(|_| {
            let tic = Instant::now();
            for _ in 0..calls {
                f();
            }
            tic.elapsed()
        })
        .min()
        .unwrap()
}

#[test]
fn test_clash_at_junction_cost_does_not_grow_with_length() {
    // The second half turns straight back, so it clashes one site past the junction.
    let (short_l, short_r) = (Walk::rod(100, 2), backward_rod(100));
    let (long_l, long_r) = (Walk::rod(100_000, 2), backward_rod(100_000));
    assert!(!cross_valid(&long_l, &long_r));

    let t_short = fastest_round(200, || assert!(!cross_valid(&short_l, &short_r)));
    let t_long = fastest_round(200, || assert!(!cross_valid(&long_l, &long_r)));
    assert!(
        t_long <= t_short * 20 + Duration::from_micros(500),
        "clash at the junction took {t_long:?} on N=1e5 vs {t_short:?} on N=100"
    );
}
