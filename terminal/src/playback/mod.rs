pub mod controller;
pub mod reader;

pub use controller::{Advance, PlaybackController, PlaybackState};
pub use reader::LogReader;
