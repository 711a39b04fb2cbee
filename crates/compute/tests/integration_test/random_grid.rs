use rand::rngs::StdRng;
use rand::SeedableRng;

use integral_core::{ElementType, Grid};

use crate::helpers::{compute, random_grid, reference_sat};

struct Case {
    rows: usize,
    cols: usize,
    channels: usize,
    element_type: ElementType,
    low: i64,
    high: i64,
}

const fn case(rows: usize, cols: usize, channels: usize, element_type: ElementType, low: i64, high: i64) -> Case {
    Case {
        rows,
        cols,
        channels,
        element_type,
        low,
        high,
    }
}

const CASES: &[Case] = &[
    case(1, 1, 1, ElementType::U8, 0, 255),
    case(1, 1, 3, ElementType::I16, -32768, 32767),
    case(1, 500, 2, ElementType::U16, 0, 65535),
    case(500, 1, 2, ElementType::I16, -32768, 32767),
    case(10, 10, 1, ElementType::U8, 0, 100),
    case(10, 10, 2, ElementType::U8, 0, 100),
    case(10, 10, 3, ElementType::U8, 0, 100),
    case(100, 100, 1, ElementType::U8, 0, 255),
    case(100, 100, 2, ElementType::U8, 0, 255),
    case(100, 100, 3, ElementType::U8, 0, 255),
    case(1001, 257, 1, ElementType::U16, 0, 3400),
    case(1001, 257, 2, ElementType::U16, 0, 65535),
    case(1001, 257, 3, ElementType::U16, 0, 65535),
    case(313, 278, 1, ElementType::I16, -32768, 32767),
    case(313, 278, 2, ElementType::I16, -32768, 32767),
    case(313, 278, 3, ElementType::I16, -100, 100),
];

fn build(rng: &mut StdRng, c: &Case) -> Grid {
    match c.element_type {
        ElementType::U8 => random_grid(rng, c.rows, c.cols, c.channels, c.low as u8, c.high as u8),
        ElementType::U16 => random_grid(rng, c.rows, c.cols, c.channels, c.low as u16, c.high as u16),
        ElementType::I16 => random_grid(rng, c.rows, c.cols, c.channels, c.low as i16, c.high as i16),
        other => panic!("no random generator for {}", other),
    }
}

#[test]
fn random_grids_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed_1234);
    for (n, c) in CASES.iter().enumerate() {
        let grid = build(&mut rng, c);
        let expected: Vec<_> = (0..c.channels).map(|ch| reference_sat(&grid, ch)).collect();

        let delivered = compute("random", grid, 0);
        assert_eq!(delivered.len(), 1, "case {}", n);
        let channels = &delivered[0].1;
        assert_eq!(channels.len(), c.channels, "case {}", n);
        for (ch, (result, expect)) in channels.iter().zip(&expected).enumerate() {
            assert_eq!(result.as_ref().unwrap(), expect, "case {} channel {}", n, ch);
        }
    }
}

#[test]
fn extreme_values_saturate_nothing() {
    // Every sample at the type's extreme: the corner equals rows * cols * extreme.
    let (rows, cols) = (640, 480);
    for (grid, extreme) in [
        (Grid::new(rows, cols, 1, vec![u8::MAX; rows * cols]).unwrap(), 255.0),
        (Grid::new(rows, cols, 1, vec![u16::MAX; rows * cols]).unwrap(), 65535.0),
        (Grid::new(rows, cols, 1, vec![i16::MIN; rows * cols]).unwrap(), -32768.0),
    ] {
        let delivered = compute("extreme", grid, 0);
        let buffer = delivered[0].1[0].as_ref().unwrap();
        assert_eq!(buffer.get(rows - 1, cols - 1), Some((rows * cols) as f64 * extreme));
    }
}
