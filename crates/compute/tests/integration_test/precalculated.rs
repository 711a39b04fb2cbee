use crate::helpers::{compute, load_expected, load_grid};

const FIXTURES: &[&str] = &[
    "CV_8U_2x2x1",
    "CV_16U_3x2x1",
    "CV_8U_6x6x1",
    "CV_8U_2x2x3",
    "CV_16S_4x5x2",
    "CV_8U_159x181x3",
];

fn check_fixture(name: &str) {
    let expected = load_expected(name);
    let grid = load_grid(name);
    assert_eq!(grid.channels(), expected.len(), "{}", name);

    let delivered = compute(name, grid, 0);
    assert_eq!(delivered.len(), 1, "{}: one completion expected", name);
    let (id, channels) = &delivered[0];
    assert_eq!(id, name);
    assert_eq!(channels.len(), expected.len());

    for (i, (result, expect)) in channels.iter().zip(&expected).enumerate() {
        let result = result.as_ref().unwrap_or_else(|e| panic!("{} channel {}: {}", name, i, e));
        assert_eq!(result, expect, "{} channel {}", name, i);
    }
}

#[test]
fn precalculated_fixtures_match() {
    for name in FIXTURES {
        check_fixture(name);
    }
}

#[test]
fn two_by_two_example_values() {
    let delivered = compute("example", load_grid("CV_8U_2x2x1"), 1);
    let buffer = delivered[0].1[0].as_ref().unwrap();
    assert_eq!(buffer.row(0), &[1.0, 3.0]);
    assert_eq!(buffer.row(1), &[4.0, 10.0]);
}
