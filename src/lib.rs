//! dds2png - terrain texture converter
//!
//! Turns the map's DDS terrain textures into PNGs the browser renderer can
//! load directly.

pub mod convert;
pub mod paths;
pub mod textures;
