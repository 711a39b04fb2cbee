/// Integration tests for the computation engine covering precalculated
/// fixtures, randomized grids against a reference summed-area table, and
/// batch behaviour across many identifiers.

mod batch;
mod helpers;
mod precalculated;
mod random_grid;
