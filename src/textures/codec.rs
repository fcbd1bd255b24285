//! Codec seam between the conversion runner and the image crates
//!
//! The runner only needs two capabilities: open a file into pixels with a
//! known size, and save those pixels somewhere in a raster format.

use image::RgbaImage;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use super::decode::{decode_dds, decode_raster, is_dds, DdsSummary};
use super::TextureError;

/// Supported destination encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Lossless, keeps alpha (emissive masks live in the alpha channel)
    Png,
}

impl RasterFormat {
    /// Convert to the `image` crate's format enum
    fn to_image_format(self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
        }
    }

    /// Get format name for logging
    pub fn name(&self) -> &'static str {
        match self {
            RasterFormat::Png => "PNG",
        }
    }

    /// Pick a format from a destination file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "png" => Some(RasterFormat::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a decoded image came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// DDS container and what its header declared
    Dds(DdsSummary),
    /// Anything the `image` crate recognised
    Raster { format: Option<image::ImageFormat> },
}

/// Decoded pixels plus their origin
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbaImage,
    source: SourceKind,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage, source: SourceKind) -> Self {
        Self { pixels, source }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn source_kind(&self) -> &SourceKind {
        &self.source
    }
}

/// Open/save capability used by the conversion runner
pub trait Codec {
    /// Decode the file at `path`
    fn open(&self, path: &Path) -> Result<DecodedImage, TextureError>;

    /// Encode `image` as `format` and write it to `path`
    fn save(&self, image: &DecodedImage, path: &Path, format: RasterFormat) -> Result<(), TextureError>;
}

/// One row of the start-up capability report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub format: &'static str,
    pub decode: &'static str,
    pub encode: Option<&'static str>,
}

/// Production codec: image_dds + DirectXTex for DDS, `image` for the rest
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }

    /// Formats this build can read and write.
    ///
    /// Everything is linked statically, so this is a fixed table rather than
    /// a probe.
    pub fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability {
                format: "DDS",
                decode: "image_dds (DirectXTex fallback)",
                encode: None,
            },
            Capability {
                format: "PNG",
                decode: "image",
                encode: Some("image"),
            },
        ]
    }
}

impl Codec for ImageCodec {
    fn open(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        let data = fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_dds(&data) {
            debug!("Decoding {} as DDS ({} bytes)", path.display(), data.len());
            decode_dds(&data)
        } else {
            debug!("Decoding {} as raster ({} bytes)", path.display(), data.len());
            decode_raster(&data, path)
        }
    }

    fn save(&self, image: &DecodedImage, path: &Path, format: RasterFormat) -> Result<(), TextureError> {
        // Encode fully in memory so a failed encode never touches the destination
        let mut encoded = Cursor::new(Vec::new());
        image
            .pixels()
            .write_to(&mut encoded, format.to_image_format())
            .map_err(|source| TextureError::Encode { format, source })?;
        let encoded = encoded.into_inner();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let persist_err = |source: std::io::Error| TextureError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
        tmp.write_all(&encoded).map_err(persist_err)?;
        tmp.flush().map_err(persist_err)?;
        tmp.persist(path).map_err(|e| persist_err(e.error))?;

        debug!("Wrote {} bytes of {} to {}", encoded.len(), format, path.display());
        Ok(())
    }
}

/// Save with the format implied by the destination extension
pub fn save_by_extension<C: Codec + ?Sized>(
    codec: &C,
    image: &DecodedImage,
    path: &Path,
) -> Result<RasterFormat, TextureError> {
    let format = RasterFormat::from_path(path)
        .ok_or_else(|| TextureError::UnsupportedTarget {
            path: path.to_path_buf(),
        })?;
    codec.save(image, path, format)?;
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::test_support::{dds_bytes, gradient};
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_raster_format_from_path() {
        assert_eq!(RasterFormat::from_path(Path::new("public/atlas0.png")), Some(RasterFormat::Png));
        assert_eq!(RasterFormat::from_path(Path::new("ATLAS.PNG")), Some(RasterFormat::Png));
        assert_eq!(RasterFormat::from_path(Path::new("atlas0.dds")), None);
        assert_eq!(RasterFormat::from_path(Path::new("no_extension")), None);
        assert_eq!(RasterFormat::Png.name(), "PNG");
    }

    #[test]
    fn test_open_dds_and_save_png() -> Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("atlas0.dds");
        let dst = dir.path().join("atlas0.png");
        fs::write(&src, dds_bytes(64, 64)?)?;

        let codec = ImageCodec::new();
        let decoded = codec.open(&src)?;
        assert_eq!(decoded.dimensions(), (64, 64));

        codec.save(&decoded, &dst, RasterFormat::Png)?;

        let written = image::open(&dst)?.into_rgba8();
        assert_eq!(written.dimensions(), (64, 64));
        assert_eq!(written.as_raw(), decoded.pixels().as_raw());
        Ok(())
    }

    #[test]
    fn test_open_png_source() -> Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("colormap.png");
        gradient(16, 4).save(&src)?;

        let decoded = ImageCodec::new().open(&src)?;
        assert_eq!(decoded.dimensions(), (16, 4));
        assert_eq!(
            decoded.source_kind(),
            &SourceKind::Raster {
                format: Some(image::ImageFormat::Png)
            }
        );
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = ImageCodec::new().open(&dir.path().join("nope.dds")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_save_leaves_no_temp_files() -> Result<()> {
        let dir = tempdir()?;
        let dst = dir.path().join("out.png");
        let image = DecodedImage::new(gradient(4, 4), SourceKind::Raster { format: None });

        ImageCodec::new().save(&image, &dst, RasterFormat::Png)?;

        let names: Vec<_> = fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["out.png".to_string()]);
        Ok(())
    }

    #[test]
    fn test_save_by_extension_rejects_unknown() {
        let dir = tempdir().unwrap();
        let dst = dir.path().join("out.dds");
        let image = DecodedImage::new(gradient(2, 2), SourceKind::Raster { format: None });

        let err = save_by_extension(&ImageCodec::new(), &image, &dst).unwrap_err();
        assert!(matches!(err, TextureError::UnsupportedTarget { .. }));
        assert_eq!(
            err.to_string(),
            format!("No raster encoder for destination {}", dst.display())
        );
        assert!(!dst.exists());
    }

    #[test]
    fn test_capabilities_cover_dds_to_png() {
        let caps = ImageCodec::new().capabilities();
        assert!(caps.iter().any(|c| c.format == "DDS"));
        assert!(caps.iter().any(|c| c.format == "PNG" && c.encode.is_some()));
    }
}
