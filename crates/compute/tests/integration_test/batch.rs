use rand::rngs::StdRng;
use rand::SeedableRng;

use integral_compute::TransformError;
use integral_core::{ElementType, Grid};

use crate::helpers::{compute_many, random_grid, reference_sat};

#[test]
fn mixed_batch_completes_every_identifier_once() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut grids = Vec::new();
    for i in 0..12 {
        let channels = 1 + i % 3;
        grids.push((format!("grid-{:02}", i), random_grid(&mut rng, 37, 53, channels, 0u8, 255u8)));
    }
    grids.push(("unsupported".to_string(), Grid::zeros(8, 8, 2, ElementType::F64).unwrap()));
    grids.push(("empty".to_string(), Grid::new(8, 8, 0, Vec::<u16>::new()).unwrap()));

    let references: Vec<(String, Vec<_>)> = grids
        .iter()
        .map(|(id, g)| (id.clone(), (0..g.channels()).map(|c| reference_sat(g, c)).collect()))
        .collect();

    let mut delivered = compute_many(grids, 3);
    delivered.sort_by(|a, b| a.0.cmp(&b.0));

    // "empty" never completes.
    assert_eq!(delivered.len(), 13);
    assert!(delivered.iter().all(|(id, _)| id != "empty"));

    for (id, channels) in &delivered {
        let (_, expected) = references.iter().find(|(rid, _)| rid == id).unwrap();
        assert_eq!(channels.len(), expected.len(), "{}", id);
        if id == "unsupported" {
            for result in channels {
                assert_eq!(
                    result.as_ref().unwrap_err(),
                    &TransformError::UnsupportedElementType(ElementType::F64)
                );
            }
            continue;
        }
        for (result, expect) in channels.iter().zip(expected) {
            assert_eq!(result.as_ref().unwrap(), expect, "{}", id);
        }
    }
}

#[test]
fn single_worker_processes_whole_batch() {
    let mut rng = StdRng::seed_from_u64(11);
    let grids: Vec<_> = (0..5)
        .map(|i| (format!("g{}", i), random_grid(&mut rng, 16, 16, 3, -500i16, 500i16)))
        .collect();
    let delivered = compute_many(grids, 1);
    assert_eq!(delivered.len(), 5);
    assert!(delivered.iter().all(|(_, channels)| channels.len() == 3 && channels.iter().all(|r| r.is_ok())));
}
