use std::env;
use std::path::PathBuf;

use crate::vector::Vector;

/// Fixed board geometry and timing.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Side of one grid cell, in pixels.
    pub cell_size: i32,
    /// Pixels between neighbouring cells.
    pub gap: i32,
    /// Cells per side of the square board.
    pub cells: i32,
    /// Ticks per second before the first tick.
    pub base_tick_rate: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { cell_size: 12, gap: 2, cells: 40, base_tick_rate: 30.0 }
    }
}

impl GameConfig {
    pub fn canvas_side(&self) -> i32 {
        self.cell_size * self.cells + self.gap * (self.cells - 1)
    }

    /// Top-left pixel of a grid cell. Cell 0 lands at `-gap`, which is how
    /// the board has always been drawn.
    pub fn position(&self, cell: Vector) -> Vector {
        cell * self.cell_size + (cell - Vector::new(1, 1)) * self.gap
    }
}

/// Host settings read from the environment.
pub struct Settings {
    pub log_path: PathBuf,
    pub muted: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        let log_path = env::var_os("SNAKE_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("snake.log"));
        let muted = env::var("SNAKE_MUTE").map_or(false, |v| !v.is_empty());

        Settings { log_path, muted }
    }
}
