//! The sandbox arena: a walkable lattice with a wall down the middle.
//!
//! ```text
//!   y
//!   8  o o o o o o o o o
//!   6  o o o o o o o o o
//!   4  o o o o # o o o o
//!   2  o o o o # o o o o
//!   0  o o o o # o o o o
//!  -2  o o o o # o o o o
//!  -4  o o o o # o o o o
//!  -6  o o o o o o o o o
//!  -8  o o o o o o o o o
//!     -8    -4  0  4    8  x
//! ```
//!
//! Paths between the two halves detour through the gaps at the top and
//! bottom, so the budgeted reach differs from the straight-line distance.

use pb_core::{NodeId, Position};
use pb_nav::{NavGraph, NavGraphBuilder, NavResult};

const SIDE:    usize = 9;
const SPACING: f32   = 2.0;
const ORIGIN:  f32   = -8.0;

/// Half the arena width, in world units.
pub const HALF_EXTENT: f32 = 8.0;

fn is_wall(col: usize, row: usize) -> bool {
    col == SIDE / 2 && (2..=6).contains(&row)
}

/// Build the arena graph.  Returns the graph and its walkable nodes.
pub fn build_arena() -> NavResult<(NavGraph, Vec<NodeId>)> {
    let mut b = NavGraphBuilder::new();
    let mut grid: Vec<Option<NodeId>> = vec![None; SIDE * SIDE];
    let mut nodes = Vec::new();

    for row in 0..SIDE {
        for col in 0..SIDE {
            if is_wall(col, row) {
                continue;
            }
            let pos = Position::new(
                ORIGIN + col as f32 * SPACING,
                ORIGIN + row as f32 * SPACING,
                0.0,
            );
            let id = b.add_node(pos);
            grid[row * SIDE + col] = Some(id);
            nodes.push(id);
        }
    }

    for row in 0..SIDE {
        for col in 0..SIDE {
            let Some(here) = grid[row * SIDE + col] else { continue };
            if col + 1 < SIDE {
                if let Some(east) = grid[row * SIDE + col + 1] {
                    b.add_link(here, east)?;
                }
            }
            if row + 1 < SIDE {
                if let Some(north) = grid[(row + 1) * SIDE + col] {
                    b.add_link(here, north)?;
                }
            }
        }
    }

    Ok((b.build(), nodes))
}
