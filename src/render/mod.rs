pub mod renderer;

pub use renderer::{Renderer, game_over_text};
