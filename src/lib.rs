//! Lesson canvas: animated, interactive visual explanations of beginner
//! programming concepts, drawn as character cells.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod explain;
pub mod logging;
pub mod params;
pub mod playback;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod sequence;
pub mod surface;
pub mod timeline;
pub mod types;
pub mod visualizer;
