//! Fixed conversion table
//!
//! Terrain textures the map renderer loads in the browser. Sources are
//! relative to the base directory, as are destinations.

use super::ConversionEntry;

/// Textures converted on every run, in order
pub const CONVERSIONS: &[ConversionEntry] = &[
    ConversionEntry::new("terrain/atlas0.dds", "public/atlas0.png"),
    ConversionEntry::new("terrain/atlas_normal0.dds", "public/atlas_normal0.png"),
    ConversionEntry::new(
        "terrain/colormap_rgb_cityemissivemask_a.dds",
        "public/colormap_land.png",
    ),
    ConversionEntry::new("terrain/colormap_water_0.dds", "public/colormap_water.png"),
];
