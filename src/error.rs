use std::path::PathBuf;

/// Failures that stop the program before the first frame is shown.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("no graphics adapter can present to the window")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("the surface supports no texture formats on this adapter")]
    NoSurfaceFormat,
    #[error("frame size {0}x{1} has no pixels")]
    EmptyFrame(u32, u32),
    #[error("invalid viewport scale {0}; it must be positive and finite")]
    InvalidScale(f64),
    #[error("graphics device ran out of memory")]
    OutOfMemory,
}

#[derive(thiserror::Error, Debug)]
#[error("failed to export {}: {source}", .path.display())]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}
