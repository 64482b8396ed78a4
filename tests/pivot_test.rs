use std::time::{Duration, Instant};

use nalgebra::DMatrix;
use polymers::pivot::attempt_pivot;
use polymers::symmetry::SymmetryTransform;
use polymers::Walk;

fn transform(rows: &[i32]) -> SymmetryTransform {
    let dim = (rows.len() as f64).sqrt() as usize;
    SymmetryTransform::from_matrix(&DMatrix::from_row_slice(dim, dim, rows)).unwrap()
}

fn u_shape() -> Walk {
    Walk::from_points(&[[0, 0], [1, 0], [1, 1], [0, 1]]).unwrap()
}

#[test]
fn test_colliding_pivot_is_rejected() {
    // Rotating (0,1) by +90° about (1,1) lands on (1,0).
    let mut walk = u_shape();
    let ccw = transform(&[0, -1, 1, 0]);
    let out = attempt_pivot(&mut walk, 2, &ccw);

    assert!(!out.accepted);
    assert!(out.intersections >= 1);
    assert_eq!(walk, u_shape(), "rejected pivot must leave the walk untouched");
}

#[test]
fn test_free_pivot_matches_hand_rotation() {
    // Rotating (0,1) by -90° about (1,1) gives (1,2).
    let mut walk = u_shape();
    let cw = transform(&[0, 1, -1, 0]);
    let out = attempt_pivot(&mut walk, 2, &cw);

    assert!(out.accepted);
    assert_eq!(out.intersections, 0);
    let expected = Walk::from_points(&[[0, 0], [1, 0], [1, 1], [1, 2]]).unwrap();
    assert_eq!(walk, expected);
}

#[test]
fn test_lower_side_is_rotated_when_pivot_is_near_the_start() {
    let mut walk = Walk::rod(4, 2);
    let ccw = transform(&[0, -1, 1, 0]);
    let out = attempt_pivot(&mut walk, 1, &ccw);

    assert!(out.accepted);
    let expected = Walk::from_points(&[[1, -1], [1, 0], [2, 0], [3, 0], [4, 0]]).unwrap();
    assert_eq!(walk, expected, "only the short side before the pivot may move");
}

#[test]
fn test_collision_next_to_pivot_on_lower_side() {
    // Point reflection about (1,0) sends (0,0) onto (2,0).
    let pts = [[0, 1], [0, 0], [1, 0], [2, 0], [3, 0], [4, 0]];
    let mut walk = Walk::from_points(&pts).unwrap();
    let inversion = transform(&[-1, 0, 0, -1]);
    let out = attempt_pivot(&mut walk, 2, &inversion);

    assert!(!out.accepted);
    assert_eq!(out.intersections, 1, "scan stops at the first collision");
    assert_eq!(walk, Walk::from_points(&pts).unwrap());
}

#[test]
fn test_three_dimensional_pivot() {
    let mut walk = Walk::rod(3, 3);
    // x -> y, y -> z, z -> x
    let cycle = transform(&[0, 0, 1, 1, 0, 0, 0, 1, 0]);
    let out = attempt_pivot(&mut walk, 2, &cycle);

    assert!(out.accepted);
    let expected = Walk::from_points(&[[0, 0, 0], [1, 0, 0], [2, 0, 0], [2, 1, 0]]).unwrap();
    assert_eq!(walk, expected);
}

#[test]
#[should_panic(expected = "d=2")]
fn test_dimension_mismatch_panics() {
    let mut walk = Walk::rod(4, 2);
    attempt_pivot(&mut walk, 1, &SymmetryTransform::identity(3));
}

/// Fastest of several timed rounds of `attempts` calls to `f`.
fn fastest_round<F: FnMut()>(attempts: usize, mut f: F) -> Duration {
    (0..5)
        .map(|_| {
            let tic = Instant::now();
            for _ in 0..attempts {
                f();
            }
            tic.elapsed()
        })
        .min()
        .unwrap()
}

#[test]
fn test_early_collision_cost_does_not_grow_with_length() {
    // Point inversion about the middle of a rod: the first rotated site lands
    // on the first fixed site, whatever the length.
    let inversion = transform(&[-1, 0, 0, -1]);
    let mut short = Walk::rod(100, 2);
    let mut long = Walk::rod(100_000, 2);

    let out = attempt_pivot(&mut long, 50_000, &inversion);
    assert!(!out.accepted);
    assert_eq!(out.intersections, 1);
    assert_eq!(long, Walk::rod(100_000, 2));

    let t_short = fastest_round(200, || {
        assert!(!attempt_pivot(&mut short, 50, &inversion).accepted);
    });
    let t_long = fastest_round(200, || {
        assert!(!attempt_pivot(&mut long, 50_000, &inversion).accepted);
    });
    assert!(
        t_long <= t_short * 20 + Duration::from_micros(500),
        "rejecting at the pivot took {t_long:?} on N=1e5 vs {t_short:?} on N=100"
    );
}
