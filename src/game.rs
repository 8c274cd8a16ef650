use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, trace};

use crate::color::{Rgba, WHITE};
use crate::config::GameConfig;
use crate::scheduler::{Scheduler, Task};
use crate::snake::{Direction, Snake, INITIAL_MAX_LENGTH};
use crate::sound::{SoundEmitter, DEFAULT_VOLUME_DB};
use crate::surface::Surface;
use crate::vector::Vector;

/// `hsl(140 81% 8% / 0.24)`
pub const WASH_COLOR: Rgba = Rgba::rgba(4, 37, 15, 0.24);
/// `hsl(0 0% 100% / 0.08)`
pub const GRID_COLOR: Rgba = Rgba::rgba(255, 255, 255, 0.08);
pub const BODY_COLOR: Rgba = WHITE;
/// `#E83015`
pub const FOOD_COLOR: Rgba = Rgba::rgb(0xE8, 0x30, 0x15);
pub const BURST_COLOR: Rgba = Rgba::rgb(255, 0, 0);

const BURST_START_RADIUS: i32 = 2;
const BURST_END_RADIUS: i32 = 100;

const POINTS_PER_FOOD: usize = 10;

/// (note, volume in dB, delay in ms)
type Cue = [(&'static str, f32, u64)];

const START_CUE: &Cue = &[("C#5", -20.0, 0), ("E5", -20.0, 200)];
const GAME_OVER_CUE: &Cue = &[
    ("A3", DEFAULT_VOLUME_DB, 0),
    ("E2", -10.0, 200),
    ("A2", -10.0, 400),
];
const SPAWN_CUE: &Cue = &[("E5", -20.0, 0), ("A5", -20.0, 200)];
const STEP_CUE: &Cue = &[("A2", -20.0, 0)];

/// The start/score overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Panel {
    pub visible: bool,
    /// Score of the last finished game, if any.
    pub score: Option<usize>,
}

/// Expanding ring drawn where food appears. Purely cosmetic.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    center: Vector,
    radius: i32,
}

impl Burst {
    pub fn new(center: Vector) -> Self {
        Burst { center, radius: BURST_START_RADIUS }
    }

    /// Draws one frame of the ring and rearms itself until it has faded out.
    pub fn run(mut self, surface: &mut impl Surface, scheduler: &mut Scheduler) {
        self.radius += 1;

        let alpha = (BURST_END_RADIUS - self.radius) as f32 / BURST_END_RADIUS as f32;
        surface.stroke_circle(self.center, self.radius as f64, BURST_COLOR.with_alpha(alpha));

        if self.radius < BURST_END_RADIUS {
            scheduler.next_frame(Task::Burst(self));
        }
    }
}

pub struct GameLoop<A, R> {
    config: GameConfig,
    snake: Snake,
    foods: Vec<Vector>,
    running: bool,
    panel: Panel,
    ticks_per_second: f64,
    sound: A,
    rng: R,
}

impl<A: SoundEmitter, R: Rng> GameLoop<A, R> {
    /// Builds the game in its pre-start state and arms the render and tick
    /// loops on `scheduler`.
    pub fn new(config: GameConfig, sound: A, rng: R, scheduler: &mut Scheduler) -> Self {
        let ticks_per_second = config.base_tick_rate;
        let mut game = GameLoop {
            config,
            snake: Snake::new(),
            foods: vec![],
            running: false,
            panel: Panel { visible: true, score: None },
            ticks_per_second,
            sound,
            rng,
        };

        game.spawn_food(scheduler);
        scheduler.next_frame(Task::Render);
        scheduler.after(game.tick_interval(), Task::Tick);
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn sound_mut(&mut self) -> &mut A {
        &mut self.sound
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second)
    }

    pub fn score(&self) -> usize {
        (self.snake.max_length() - INITIAL_MAX_LENGTH) * POINTS_PER_FOOD
    }

    /// Dispatches a scheduled task to the loop it belongs to.
    pub fn run(&mut self, task: Task, surface: &mut impl Surface, scheduler: &mut Scheduler) {
        match task {
            Task::Tick => self.tick(scheduler),
            Task::Render => self.render(surface, scheduler),
            Task::Burst(burst) => burst.run(surface, scheduler),
        }
    }

    pub fn turn(&mut self, direction: Direction) {
        if !self.snake.set_heading(direction) {
            trace!(?direction, "heading change ignored");
        }
    }

    pub fn start_game(&mut self) {
        self.running = true;
        self.snake = Snake::new();
        self.panel.visible = false;
        self.play(START_CUE);
        info!("game started");
    }

    pub fn end_game(&mut self) {
        self.running = false;
        let score = self.score();
        self.panel = Panel { visible: true, score: Some(score) };
        self.play(GAME_OVER_CUE);
        info!(score, length = self.snake.max_length(), "game over");
    }

    pub fn tick(&mut self, scheduler: &mut Scheduler) {
        if self.running {
            self.play(STEP_CUE);
            self.snake.advance();

            let head = self.snake.head();
            let before = self.foods.len();
            self.foods.retain(|food| *food != head);

            for _ in 0..before - self.foods.len() {
                self.snake.grow();
                self.spawn_food(scheduler);
            }

            if self.snake.bites_itself() {
                self.end_game();
            } else if !self.snake.in_bounds(self.config.cells) {
                self.end_game();
            }

            trace!(head = %self.snake.head(), body = self.snake.body().len(), "tick");
        }

        // Speeds up as the trail grows
        self.ticks_per_second = (self.snake.body().len() as f64).sqrt() + 5.0;
        scheduler.after(self.tick_interval(), Task::Tick);
    }

    pub fn render(&self, surface: &mut impl Surface, scheduler: &mut Scheduler) {
        surface.clear(WASH_COLOR);

        for x in 0..self.config.cells {
            for y in 0..self.config.cells {
                self.draw_block(surface, Vector::new(x, y), GRID_COLOR);
            }
        }
        for segment in self.snake.body() {
            self.draw_block(surface, *segment, BODY_COLOR);
        }
        for food in &self.foods {
            self.draw_block(surface, *food, FOOD_COLOR);
        }

        scheduler.next_frame(Task::Render);
    }

    /// Drops one food on a random cell. The cell may be occupied.
    pub fn spawn_food(&mut self, scheduler: &mut Scheduler) {
        let cells = self.config.cells as f64;
        let x = (self.rng.gen::<f64>() * cells).floor() as i32;
        let y = (self.rng.gen::<f64>() * cells).floor() as i32;
        let food = Vector::new(x, y);

        self.foods.push(food);
        debug!(%food, "food spawned");

        let half = self.config.cell_size / 2;
        let center = self.config.position(food) + Vector::new(half, half);
        scheduler.next_frame(Task::Burst(Burst::new(center)));

        self.play(SPAWN_CUE);
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_block(&self, surface: &mut impl Surface, cell: Vector, color: Rgba) {
        let size = Vector::new(self.config.cell_size, self.config.cell_size);
        surface.fill_rect(self.config.position(cell), size, color);
    }

    fn play(&mut self, cue: &Cue) {
        for &(note, volume_db, delay_ms) in cue {
            self.sound.play(note, volume_db, Duration::from_millis(delay_ms));
        }
    }
}
