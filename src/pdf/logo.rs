//! Logo image decoding and XObject encoding.

use byteorder::{BigEndian, ByteOrder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{GenericImageView, ImageFormat};
use std::io::Write;

use super::writer::stream_object;

/// Pixel data ready to be written as an image XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
    /// Zlib-compressed 8-bit alpha plane, when any pixel is not opaque
    alpha: Option<Vec<u8>>,
}

impl LogoImage {
    /// Decode image bytes. Returns `None` when the data cannot be decoded.
    ///
    /// JPEG data is kept as-is; anything else is re-encoded as compressed
    /// RGB with a separate alpha mask.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Option<Self> {
        let format = match content_type {
            Some(ct) if ct.contains("jpeg") || ct.contains("jpg") => Some(ImageFormat::Jpeg),
            Some(ct) if ct.contains("png") => Some(ImageFormat::Png),
            _ => image::guess_format(bytes).ok(),
        };

        let decoded = match format {
            Some(format) => image::load_from_memory_with_format(bytes, format)
                .or_else(|_| image::load_from_memory(bytes)),
            None => image::load_from_memory(bytes),
        };
        let decoded = match decoded {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Dropping logo: {}", e);
                return None;
            }
        };
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        // Only gray and RGB JPEGs are embedded as-is; CMYK and anything
        // unusual goes through the RGB path below.
        let jpeg_color_space = match (format, jpeg_components(bytes)) {
            (Some(ImageFormat::Jpeg), Some(1)) => Some("/DeviceGray"),
            (Some(ImageFormat::Jpeg), Some(3)) => Some("/DeviceRGB"),
            _ => None,
        };
        if let Some(color_space) = jpeg_color_space {
            return Some(Self {
                width,
                height,
                color_space,
                filter: "/DCTDecode",
                data: bytes.to_vec(),
                alpha: None,
            });
        }

        let rgba = decoded.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.len() / 4);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }
        let has_alpha = alpha.iter().any(|&a| a != 255);

        Some(Self {
            width,
            height,
            color_space: "/DeviceRGB",
            filter: "/FlateDecode",
            data: zlib_compress(&rgb)?,
            alpha: if has_alpha {
                Some(zlib_compress(&alpha)?)
            } else {
                None
            },
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether a soft mask object accompanies the image.
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Displayed height for a given displayed width, keeping the aspect ratio.
    pub fn height_for_width(&self, width: f64) -> f64 {
        f64::from(self.height) * width / f64::from(self.width)
    }

    /// Soft mask object body, if the image has transparency.
    pub fn smask_object(&self) -> Option<Vec<u8>> {
        self.alpha.as_ref().map(|alpha| {
            stream_object(
                &format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode",
                    self.width, self.height
                ),
                alpha,
            )
        })
    }

    /// Image object body, referencing the soft mask object when present.
    pub fn image_object(&self, smask: Option<&str>) -> Vec<u8> {
        let smask = smask
            .map(|reference| format!(" /SMask {}", reference))
            .unwrap_or_default();
        stream_object(
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} /BitsPerComponent 8 /Filter {}{}",
                self.width, self.height, self.color_space, self.filter, smask
            ),
            &self.data,
        )
    }
}

/// Component count from the first JPEG frame header.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // fill byte
            0xFF => pos += 1,
            // standalone markers
            0x01 | 0xD0..=0xD9 => pos += 2,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return data.get(pos + 9).copied();
            }
            _ => pos += 2 + BigEndian::read_u16(&data[pos + 2..pos + 4]) as usize,
        }
    }
    None
}

fn zlib_compress(data: &[u8]) -> Option<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).ok()?;
    encoder.finish().ok()
}
