use std::path::Path;

use log::info;

use crate::{compute::Frame, error::ExportError};

/// Write `frame` as a PNG, whatever extension `path` has.
pub fn png(frame: &Frame, path: &Path) -> Result<(), ExportError> {
    let size = frame.size();
    image::save_buffer_with_format(
        path,
        frame.as_bytes(),
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| ExportError {
        path: path.to_owned(),
        source,
    })?;

    info!("exported {}x{} frame to {}", size.width, size.height, path.display());
    Ok(())
}
