use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{LAST_PIT_COLUMNS, Layout, parse_layout};

/// Chunk width in cells (each procedural section is this wide).
const CHUNK_WIDTH: usize = 10;
/// Flat run-up at the start of every zone.
const START_COLUMNS: usize = 10;

/// Generate a deterministic layout from a seed, in the same text format the
/// layout files use. Zones fall back to this when their file is unusable.
///
/// Every obstacle is at most two cells tall so the whole party can clear it
/// without abilities, and the trailing exit columns have no floor.
pub fn generate_layout(width: usize, height: usize, cell_size: f32, seed: u64) -> Layout {
    let mut rows = vec![vec!['.'; width]; height];
    let mut rng = StdRng::seed_from_u64(seed);

    if height >= 4 && width > LAST_PIT_COLUMNS {
        let ground = height - 2;
        let exit_start = width - LAST_PIT_COLUMNS;

        for row in rows.iter_mut().skip(ground) {
            for cell in row.iter_mut().take(exit_start) {
                *cell = 'w';
            }
        }

        // Rings on the run-up
        for col in 4..START_COLUMNS.min(exit_start) {
            put(&mut rows, col, ground - 2, 'r');
        }

        let mut base = START_COLUMNS;
        while base + CHUNK_WIDTH <= exit_start {
            generate_chunk(&mut rows, &mut rng, base, ground);
            base += CHUNK_WIDTH;
        }
    }

    let text: String = rows
        .iter()
        .map(|r| {
            let mut line: String = r.iter().collect();
            line.push('\n');
            line
        })
        .collect();
    parse_layout(&text, width, height, cell_size)
}

fn put(rows: &mut [Vec<char>], col: usize, row: usize, glyph: char) {
    if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
        *cell = glyph;
    }
}

fn generate_chunk(rows: &mut [Vec<char>], rng: &mut StdRng, base: usize, ground: usize) {
    let surface = ground - 1;
    let pattern = rng.random_range(0u8..5);

    match pattern {
        0 => {
            // Pit with a ring arc over it
            let pit_start = base + rng.random_range(3..6);
            let pit_width = rng.random_range(2..4);
            for col in pit_start..pit_start + pit_width {
                put(rows, col, ground, '.');
                put(rows, col, ground + 1, '.');
                put(rows, col, surface.saturating_sub(2), 'r');
            }
        },
        1 => {
            // Raised one-way platform with rings on top
            let plat_row = ground.saturating_sub(2);
            let plat_start = base + rng.random_range(1..4);
            let plat_len = rng.random_range(3..6);
            for col in plat_start..plat_start + plat_len {
                put(rows, col, plat_row, 'p');
                put(rows, col, plat_row.saturating_sub(1), 'r');
            }
        },
        2 => {
            // Two-step staircase
            let step = base + rng.random_range(2..5);
            for col in step..step + 2 {
                put(rows, col, surface, 'w');
            }
            for col in step + 2..step + 4 {
                put(rows, col, surface, 'w');
                put(rows, col, surface - 1, 'w');
            }
        },
        3 => {
            // Spike bed with a ring above
            let start = base + rng.random_range(2..6);
            let len = rng.random_range(1..3);
            for col in start..start + len {
                put(rows, col, surface, 'o');
            }
            put(rows, start, surface.saturating_sub(3), 'r');
        },
        _ => {
            // Breakable wall column
            let col = base + rng.random_range(3..7);
            put(rows, col, surface, 'b');
            put(rows, col, surface - 1, 'b');
        },
    }

    // Rare pickups resting on the surface of the chunk's last column
    let bonus_col = base + CHUNK_WIDTH - 1;
    match rng.random_range(0u8..12) {
        0 => put(rows, bonus_col, surface, 'l'),
        1 => put(rows, bonus_col, surface, 'z'),
        _ => {},
    }
}
