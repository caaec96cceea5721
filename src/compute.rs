use std::{
    num::NonZeroUsize,
    thread,
    time::{Duration, Instant},
};

use log::{debug, trace};

use crate::{colour::ColourTable, mandelbrot, pixel::Rgba, screen, viewport::Viewport};

/// A fully computed (or not yet computed) grid of pixels, row-major.
pub struct Frame {
    size: screen::Size,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            pixels: vec![Rgba::default(); size.area()],
        }
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

/**
Height of each band when `height` rows are split over `bands` workers.

Every band but the last has exactly this many rows; the last takes the
remainder. Asking for more bands than rows yields single-row bands.
*/
pub fn rows_per_band(height: u32, bands: NonZeroUsize) -> usize {
    let height = height as usize;
    let bands = bands.get().min(height.max(1));
    height.div_ceil(bands).max(1)
}

/**
Overwrite every pixel of `frame` with the colour of its escape time.

The rows are split into horizontal bands and each band is filled on its own
thread, spawned for this frame only. Bands are disjoint slices of the frame, so
workers never share a pixel. The function returns once every worker has joined,
at which point the frame is safe to display or export.

The iteration budget is the one `colours` was generated for.
*/
pub fn render(
    viewport: &Viewport,
    colours: &ColourTable,
    frame: &mut Frame,
    bands: NonZeroUsize,
) -> Duration {
    debug_assert_eq!(viewport.size(), frame.size);

    let started = Instant::now();
    let width = frame.size.width as usize;
    if frame.pixels.is_empty() {
        return started.elapsed();
    }

    let rows = rows_per_band(frame.size.height, bands);
    debug!(
        "rendering {}x{} in bands of {} rows",
        frame.size.width, frame.size.height, rows
    );

    thread::scope(|scope| {
        for (band, pixels) in frame.pixels.chunks_mut(rows * width).enumerate() {
            let first_row = band * rows;
            scope.spawn(move || fill_band(viewport, colours, first_row, width, pixels));
        }
    });

    started.elapsed()
}

fn fill_band(
    viewport: &Viewport,
    colours: &ColourTable,
    first_row: usize,
    width: usize,
    pixels: &mut [Rgba],
) {
    trace!("begin band at row {}", first_row);

    let budget = colours.budget();
    for (offset, row) in pixels.chunks_mut(width).enumerate() {
        let y = (first_row + offset) as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            let c = viewport.screen_to_world(x as u32, y);
            *pixel = colours.get(mandelbrot::escape_time(c, budget));
        }
    }

    trace!("end band at row {}", first_row);
}
