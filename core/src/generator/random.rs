use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Generation strategy that keeps the 3x3 block around the starting tile clear, but other than that is purely
/// random. Identical seeds and starting tiles always give identical layouts.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout {
        let (outside, inside): (Vec<Coord2>, Vec<Coord2>) = iter_coords(config.size)
            .filter(|&coords| coords != start)
            .partition(|&coords| !is_within_one(coords, start));

        let mines = usize::from(config.mines);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());

        // the start tile always stays safe, its neighbors only take what does not fit outside
        let overflow = mines.saturating_sub(outside.len());
        if overflow > 0 {
            log::warn!(
                "Cannot keep the area around {:?} clear with {} mines, {} neighbors get mined",
                start,
                config.mines,
                overflow
            );
        }
        for (pool, amount) in [(&outside, mines - overflow), (&inside, overflow)] {
            let amount = amount.min(pool.len());
            for i in index::sample(&mut rng, pool.len(), amount).into_vec() {
                mine_mask[pool[i].to_nd_index()] = true;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        layout
    }
}
