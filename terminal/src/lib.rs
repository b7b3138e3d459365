pub mod app;
pub mod playback;
pub mod render;
pub mod scene;
pub mod views;
