#![cfg(feature = "host")]
//! PNG previews of what the OLED shows, for inspecting renders on the host.

use crate::display::MonoFrame;
use png::{BitDepth, ColorType, Encoder};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// SSD1306 panels are commonly white or pale blue; preview lit pixels in pale blue.
const LIT_RGB: [u8; 3] = [0xB8, 0xE0, 0xFF];
const UNLIT_RGB: [u8; 3] = [0x10, 0x10, 0x10];
const BORDER_RGB: [u8; 3] = [0x00, 0x00, 0x00];

/// Render a `MonoFrame` into a PNG file no wider or taller than `target_max_dimension`.
///
/// Every display pixel becomes a square cell with a thin dark gap around it, so the
/// preview reads like the physical panel.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded.
pub fn write_mono_frame_png<const W: usize, const H: usize>(
    frame: &MonoFrame<W, H>,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(W, H, target_max_dimension)?;
    let (width, height, pixels) = panel_pixels(frame, cell_size)?;

    let mut writer = create_encoder(output_path, width, height)?.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    log::info!("wrote PNG to {}", output_path.display());
    Ok(())
}

/// Render successive `MonoFrame`s (for example, several scroll steps) into a looping APNG.
///
/// # Errors
///
/// Returns an error if `frames` is empty, `frame_delay_ms` does not fit in a `u16`, or the
/// file cannot be created or encoded.
pub fn write_mono_frames_apng<const W: usize, const H: usize>(
    frames: &[MonoFrame<W, H>],
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    frame_delay_ms: u32,
) -> Result<(), Box<dyn Error>> {
    if frames.is_empty() {
        return Err("frames must not be empty".into());
    }
    let output_path = output_path.as_ref();
    let cell_size = select_cell_size(W, H, target_max_dimension)?;
    let frame_count = u32::try_from(frames.len())?;
    let delay_num = u16::try_from(frame_delay_ms)?;

    let mut encoded = Vec::with_capacity(frames.len());
    let mut dimensions = (0, 0);
    for frame in frames {
        let (width, height, pixels) = panel_pixels(frame, cell_size)?;
        dimensions = (width, height);
        encoded.push(pixels);
    }

    let mut encoder = create_encoder(output_path, dimensions.0, dimensions.1)?;
    encoder.set_animated(frame_count, 0)?;
    let mut writer = encoder.write_header()?;
    for pixels in encoded {
        writer.set_frame_delay(delay_num, 1000)?;
        writer.write_image_data(&pixels)?;
    }
    writer.finish()?;
    log::info!("wrote APNG to {}", output_path.display());
    Ok(())
}

fn create_encoder(
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<Encoder<'static, BufWriter<File>>, Box<dyn Error>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);
    Ok(encoder)
}

/// Largest cell size (at least 1) whose full image fits `target_max_dimension`.
fn select_cell_size(
    panel_width: usize,
    panel_height: usize,
    target_max_dimension: u32,
) -> Result<u32, Box<dyn Error>> {
    if target_max_dimension == 0 {
        return Err("target_max_dimension must be positive".into());
    }
    let longest = u32::try_from(panel_width.max(panel_height).max(1))?;
    Ok((target_max_dimension / longest).max(1))
}

fn panel_pixels<const W: usize, const H: usize>(
    frame: &MonoFrame<W, H>,
    cell_size: u32,
) -> Result<(u32, u32, Vec<u8>), Box<dyn Error>> {
    let cell = usize::try_from(cell_size)?;
    // One-pixel gap inside each cell once the cell is big enough to show it.
    let gap = usize::from(cell >= 4);
    let width = W * cell;
    let height = H * cell;
    let mut bytes = vec![0u8; width * height * 3];

    for (y, pixel_rgb) in bytes.chunks_exact_mut(width.max(1) * 3).enumerate() {
        let row_index = y / cell;
        let local_y = y % cell;
        for (x, rgb) in pixel_rgb.chunks_exact_mut(3).enumerate() {
            let column_index = x / cell;
            let local_x = x % cell;
            let in_gap = local_x < gap || local_y < gap;
            let color = if in_gap {
                BORDER_RGB
            } else if frame.is_on(column_index, row_index) {
                LIT_RGB
            } else {
                UNLIT_RGB
            };
            rgb.copy_from_slice(&color);
        }
    }

    Ok((u32::try_from(width)?, u32::try_from(height)?, bytes))
}
