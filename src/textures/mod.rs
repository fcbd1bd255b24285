//! Texture decoding and raster encoding
//!
//! Pure Rust DDS decoding via image_dds with a DirectXTex fallback for
//! legacy formats. Output is written with the `image` crate.

mod codec;
mod decode;

use std::path::PathBuf;

pub use codec::{save_by_extension, Capability, Codec, DecodedImage, ImageCodec, RasterFormat, SourceKind};
pub use decode::{DdsEncoding, DdsSummary};

/// Texture codec errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse DDS: {0}")]
    Dds(String),

    #[error("Failed to decode DDS (format: {format}). image_dds: {image_dds}, DirectXTex: {directxtex}")]
    Decode {
        format: String,
        image_dds: String,
        directxtex: String,
    },

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to encode {format}: {source}")]
    Encode {
        format: RasterFormat,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No raster encoder for destination {}", path.display())]
    UnsupportedTarget { path: PathBuf },
}
