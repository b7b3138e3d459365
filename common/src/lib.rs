mod game_log;
mod projection;

pub mod map;

pub use game_log::*;
pub use projection::*;
