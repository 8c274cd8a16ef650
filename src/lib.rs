pub mod app;
pub mod color;
pub mod config;
pub mod game;
pub mod note;
pub mod scheduler;
pub mod snake;
pub mod sound;
pub mod surface;
pub mod term;
pub mod vector;

pub type TermInt = u16;
pub type Coords = (u16, u16);
