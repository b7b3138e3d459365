pub mod grid;
pub mod map_view;

pub use grid::CellGrid;
pub use map_view::MapRenderer;
