//! PNG in, PNG out.
//!
//! Every supported PNG layout is normalized to 8-bit RGBA on read. Writes
//! are always 8-bit RGBA with an sRGB chunk.

use anyhow::{bail, Context, Result};
use pixpaint_core::PixelBuffer;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Reads a PNG into a [`PixelBuffer`].
pub fn read_png(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    // Palette and sub-byte depths expand, 16-bit strips to 8.
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().context("PNG header")?;

    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).context("PNG frame")?;
    let bytes = &buf[..info.buffer_size()];
    debug!(w = info.width, h = info.height, color = ?info.color_type, "read png");

    let buffer = match info.color_type {
        png::ColorType::Rgba => PixelBuffer::from_rgba_bytes(info.width, info.height, bytes)?,
        png::ColorType::Rgb => PixelBuffer::from_rgb_bytes(info.width, info.height, bytes)?,
        png::ColorType::Grayscale => {
            let rgb: Vec<u8> = bytes.iter().flat_map(|&g| [g, g, g]).collect();
            PixelBuffer::from_rgb_bytes(info.width, info.height, &rgb)?
        }
        png::ColorType::GrayscaleAlpha => {
            let rgba: Vec<u8> = bytes
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            PixelBuffer::from_rgba_bytes(info.width, info.height, &rgba)?
        }
        other => bail!("unsupported PNG color type {other:?}"),
    };
    Ok(buffer)
}

/// Writes a [`PixelBuffer`] as 8-bit RGBA PNG.
pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder.write_header().context("PNG header")?;
    png_writer
        .write_image_data(&buffer.to_rgba_bytes())
        .context("PNG data")?;
    png_writer.finish().context("PNG finish")?;
    debug!(w = buffer.width(), h = buffer.height(), "wrote png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpaint_core::Rgba8;
    use tempfile::tempdir;

    #[test]
    fn test_png_roundtrip_keeps_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.png");

        let mut buffer = PixelBuffer::blank(7, 5);
        buffer.set_pixel(3, 2, Rgba8::new(10, 20, 30, 40));
        write_png(&path, &buffer).unwrap();

        assert_eq!(read_png(&path).unwrap(), buffer);
    }

    #[test]
    fn test_rgb_png_is_opaque() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rgb.png");

        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        writer.finish().unwrap();

        let buffer = read_png(&path).unwrap();
        assert_eq!(buffer.pixel(0, 0), Rgba8::opaque(1, 2, 3));
        assert_eq!(buffer.pixel(1, 0), Rgba8::opaque(4, 5, 6));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_png(&dir.path().join("nope.png")).is_err());
    }
}
