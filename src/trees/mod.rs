pub mod classifier;
pub mod node;
pub mod params;
mod render;
pub mod split;
