use rand::Rng;

use crate::board::{Cell, Occupancy};

/// Picks a vacant cell uniformly at random.
///
/// # Panics
///
/// Panics when the board has no vacant cell. Callers must detect a full
/// board (the win condition) before asking for food.
#[must_use]
pub fn spawn_cell<R: Rng + ?Sized>(rng: &mut R, occupancy: &Occupancy) -> Cell {
    let vacant = occupancy.vacant_count();
    let bounds = occupancy.bounds();

    assert!(
        vacant > 0,
        "spawn_cell: no vacant cells on the board ({}×{})",
        bounds.rows,
        bounds.cols,
    );

    let choice = rng.gen_range(0..vacant);
    occupancy
        .nth_vacant(choice)
        .expect("vacant count must match the vacant cells in the index")
}
