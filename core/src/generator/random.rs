use super::*;

/// Uniformly random placement of exactly `config.mines` distinct mines,
/// reproducible from its seed.
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
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let config = GameConfig::new(config.width, config.height, config.mines)?;
        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut free_cells = config.total_cells();
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mines.as_slice_mut().expect("layout should be standard");
            while mines_placed < config.mines {
                // pick the n-th free cell
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        let layout = MineLayout::from_mine_mask(mines);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Generated {}x{} minefield with {} mines from seed {}",
            config.width,
            config.height,
            layout.mine_count(),
            self.seed
        );
        Ok(layout)
    }
}
