//! Writing rendered images to disk.

use crate::error::RenderResult;
use crate::renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `image` as plain-text PPM (`P3`).
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    Ok(())
}

/// Save `image` as a PPM file.
pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_ppm(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save `image` through the `image` crate; the format follows the file
/// extension (PNG, JPEG, ...).
pub fn save_encoded(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    image::save_buffer(
        path.as_ref(),
        &image.to_rgb8(),
        image.width,
        image.height,
        image::ColorType::Rgb8,
    )?;
    Ok(())
}

/// Save `image`, choosing PPM for a `.ppm` extension and the `image` crate
/// encoders otherwise.
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        save_ppm(image, path)?;
    } else {
        save_encoded(image, path)?;
    }

    log::info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
