//////////////////////////////////////////////////////////////////////
// Penrose rhombus tilings rendered as background art.
//
// TilingGenerator builds the mesh by golden-ratio subdivision of a
// ten-spoke seed wheel; TileRenderer rasterizes it with cairo and
// lays a vertical fade over the top.

#[macro_use]
extern crate error_chain;

#[macro_use]
pub mod errors;

pub mod geometry;
pub mod tiling;
pub mod render;
pub mod settings;

pub use crate::render::{Palette, PixelSize, Raster, RenderOptions, TileRenderer, Vignette};
pub use crate::tiling::{RhombusClass, TilingGenerator, TilingMesh, Triangle};
