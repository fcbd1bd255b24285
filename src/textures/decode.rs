//! Source image decoding
//!
//! DDS goes through image_dds first. DirectXTex is only used as a fallback
//! for legacy layouts image_dds rejects (L8, RGB565, etc.). Anything that is
//! not DDS is handed to the `image` crate.
//!
//! Only the first surface of a DDS is kept: layer 0, depth slice 0, mip 0.
//! Arrays, cubemaps and volumes therefore convert to a single face with the
//! header's width and height.

use anyhow::{bail, Context, Result};
use directxtex::{ScratchImage, DDS_FLAGS, DXGI_FORMAT, TEX_FILTER_FLAGS};
use image::{ImageFormat, ImageReader, RgbaImage};
use image_dds::ddsfile::{Caps2, Dds, MiscFlag};
use image_dds::SurfaceRgba8;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

use super::codec::{DecodedImage, SourceKind};
use super::TextureError;

/// Magic bytes at the start of every DDS container
const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Check for the DDS magic
pub fn is_dds(data: &[u8]) -> bool {
    data.starts_with(DDS_MAGIC)
}

/// How the pixels of a DDS are stored, as far as its header tells
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DdsEncoding {
    /// A format image_dds can decode
    Supported(String),
    /// A D3D/DXGI format image_dds does not handle
    Legacy(String),
    /// Unrecognised FOURCC code
    FourCC([u8; 4]),
    /// Uncompressed layout matching no known format
    Masks { bit_count: u32 },
}

impl fmt::Display for DdsEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DdsEncoding::Supported(name) => f.write_str(name),
            DdsEncoding::Legacy(name) => write!(f, "legacy {}", name),
            DdsEncoding::FourCC(code) => write!(f, "FOURCC={}", String::from_utf8_lossy(code)),
            DdsEncoding::Masks { bit_count } => write!(f, "RGBBitCount={}", bit_count),
        }
    }
}

/// Header facts carried with a decoded DDS and quoted in decode errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsSummary {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
    pub mipmaps: u32,
    pub encoding: DdsEncoding,
}

impl DdsSummary {
    pub fn from_header(dds: &Dds) -> Self {
        let encoding = match image_dds::dds_image_format(dds) {
            Ok(format) => DdsEncoding::Supported(format!("{:?}", format)),
            Err(info) => {
                if let Some(d3d) = info.d3d {
                    DdsEncoding::Legacy(format!("{:?}", d3d))
                } else if let Some(dxgi) = info.dxgi {
                    DdsEncoding::Legacy(format!("{:?}", dxgi))
                } else if let Some(fourcc) = info.fourcc {
                    DdsEncoding::FourCC(fourcc.0.to_le_bytes())
                } else {
                    DdsEncoding::Masks {
                        bit_count: dds.header.spf.rgb_bit_count.unwrap_or(0),
                    }
                }
            }
        };

        let is_cube_array =
            matches!(&dds.header10, Some(h) if h.misc_flag == MiscFlag::TEXTURECUBE);
        let layers = if is_cube_array {
            dds.get_num_array_layers().max(1) * 6
        } else if dds.header.caps2.contains(Caps2::CUBEMAP) {
            6
        } else {
            dds.get_num_array_layers().max(1)
        };

        Self {
            width: dds.get_width(),
            height: dds.get_height(),
            layers,
            mipmaps: dds.get_num_mipmap_levels().max(1),
            encoding,
        }
    }
}

impl fmt::Display for DdsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}, {}", self.width, self.height, self.encoding)?;
        if self.layers > 1 {
            write!(f, ", {} layers", self.layers)?;
        }
        if self.mipmaps > 1 {
            write!(f, ", {} mips", self.mipmaps)?;
        }
        Ok(())
    }
}

/// Decode the first surface of a DDS container to RGBA
pub fn decode_dds(input_data: &[u8]) -> Result<DecodedImage, TextureError> {
    let dds = Dds::read(Cursor::new(input_data)).map_err(|e| TextureError::Dds(e.to_string()))?;
    let summary = DdsSummary::from_header(&dds);

    let pixels = match first_surface(&dds) {
        Ok(rgba) => rgba,
        Err(primary) => {
            debug!("image_dds rejected {}, trying DirectXTex: {}", summary, primary);

            match first_surface_directxtex(input_data) {
                Ok(rgba) => rgba,
                Err(fallback) => {
                    return Err(TextureError::Decode {
                        format: summary.to_string(),
                        image_dds: primary,
                        directxtex: format!("{:#}", fallback),
                    })
                }
            }
        }
    };

    Ok(DecodedImage::new(pixels, SourceKind::Dds(summary)))
}

/// Layer 0 / mip 0 through image_dds
fn first_surface(dds: &Dds) -> Result<RgbaImage, String> {
    let surface = SurfaceRgba8::decode_layers_mipmaps_dds(dds, 0..1, 0..1).map_err(|e| e.to_string())?;
    let stacked = surface.into_image().map_err(|e| e.to_string())?;

    // Volume textures still come back with their depth slices stacked
    Ok(top_rows(stacked, dds.get_height()))
}

fn top_rows(image: RgbaImage, height: u32) -> RgbaImage {
    if height == 0 || image.height() <= height {
        return image;
    }
    image::imageops::crop_imm(&image, 0, 0, image.width(), height).to_image()
}

/// Layer 0 / mip 0 through DirectXTex, expanded to R8G8B8A8
fn first_surface_directxtex(input_data: &[u8]) -> Result<RgbaImage> {
    let flags = DDS_FLAGS::DDS_FLAGS_ALLOW_LARGE_FILES | DDS_FLAGS::DDS_FLAGS_EXPAND_LUMINANCE;
    let loaded =
        ScratchImage::load_dds(input_data, flags, None, None).context("DirectXTex: load failed")?;

    let source_format = loaded.metadata().format;
    let rgba = if source_format == DXGI_FORMAT::DXGI_FORMAT_R8G8B8A8_UNORM {
        loaded
    } else {
        info!("DirectXTex: expanding {:?} to RGBA", source_format);
        loaded
            .convert(
                DXGI_FORMAT::DXGI_FORMAT_R8G8B8A8_UNORM,
                TEX_FILTER_FLAGS::TEX_FILTER_DEFAULT,
                0.5,
            )
            .context("DirectXTex: convert failed")?
    };

    let Some(first) = rgba.images().first() else {
        bail!("DirectXTex: texture has no surfaces");
    };
    let (width, height) = (first.width as u32, first.height as u32);
    let row_bytes = first.width * 4;

    // SAFETY: DirectXTex owns `slice_pitch` bytes at `pixels` while `rgba` is
    // alive, and everything is copied out below.
    let raw = unsafe { std::slice::from_raw_parts(first.pixels, first.slice_pitch) };

    // Rows may be padded past width * 4
    let mut packed = Vec::with_capacity(row_bytes * first.height);
    for row in raw.chunks(first.row_pitch.max(row_bytes)).take(first.height) {
        packed.extend_from_slice(&row[..row_bytes.min(row.len())]);
    }

    RgbaImage::from_raw(width, height, packed)
        .context("DirectXTex: pixel buffer does not match image size")
}

/// Decode a regular raster file (PNG, TGA, ...) with the `image` crate.
///
/// The format is sniffed from the content first and falls back to the file
/// extension, so a mislabelled file still decodes if its bytes are valid.
pub fn decode_raster(input_data: &[u8], path: &Path) -> Result<DecodedImage, TextureError> {
    let mut reader = ImageReader::new(Cursor::new(input_data))
        .with_guessed_format()
        .map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }

    let format = reader.format();
    let pixels = reader.decode()?.into_rgba8();

    Ok(DecodedImage::new(pixels, SourceKind::Raster { format }))
}
