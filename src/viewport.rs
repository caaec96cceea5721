use crate::{pixel::Complex, screen};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Mapping from pixel coordinates to the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    center: Complex,
    /// World units per pixel. Always positive and finite.
    scale: f64,
    size: screen::Size,
}

impl Viewport {
    /// `None` unless `scale` is positive and finite.
    pub fn new(center: Complex, scale: f64, size: screen::Size) -> Option<Self> {
        is_valid_scale(scale).then_some(Self {
            center,
            scale,
            size,
        })
    }

    pub fn center(&self) -> Complex {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    /// `center + scale * (x - W/2, y - H/2)`; screen `y` grows downwards, as does the imaginary part.
    pub fn screen_to_world(&self, x: u32, y: u32) -> Complex {
        let dx = x as f64 - self.size.width as f64 / 2.0;
        let dy = y as f64 - self.size.height as f64 / 2.0;
        Complex::new(
            self.center.real + self.scale * dx,
            self.center.imaginary + self.scale * dy,
        )
    }

    /// Move the center by `step` pixels' worth of world distance.
    pub fn pan(&mut self, direction: Direction, step: f64) {
        let distance = step * self.scale;
        match direction {
            Direction::Up => self.center.imaginary -= distance,
            Direction::Down => self.center.imaginary += distance,
            Direction::Left => self.center.real -= distance,
            Direction::Right => self.center.real += distance,
        }
    }

    pub fn zoom_in(&mut self) {
        self.rescale(self.scale / 2.0);
    }

    pub fn zoom_out(&mut self) {
        self.rescale(self.scale * 2.0);
    }

    fn rescale(&mut self, scale: f64) {
        if is_valid_scale(scale) {
            self.scale = scale;
        } else {
            log::warn!("ignoring zoom to scale {:e}", scale);
        }
    }
}

fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(Complex::new(-0.7, 0.0), 0.004, screen::Size::new(1500, 1000)).unwrap()
    }

    #[test]
    fn rejects_non_positive_scales() {
        let size = screen::Size::new(10, 10);
        assert!(Viewport::new(Complex::ZERO, 0.0, size).is_none());
        assert!(Viewport::new(Complex::ZERO, -1.0, size).is_none());
        assert!(Viewport::new(Complex::ZERO, f64::INFINITY, size).is_none());
        assert!(Viewport::new(Complex::ZERO, f64::NAN, size).is_none());
    }

    #[test]
    fn screen_center_is_the_viewport_center() {
        assert_eq!(viewport().screen_to_world(750, 500), Complex::new(-0.7, 0.0));
    }

    #[test]
    fn top_left_corner() {
        let corner = viewport().screen_to_world(0, 0);
        assert!((corner.real - (-0.7 - 3.0)).abs() < 1e-12);
        assert!((corner.imaginary - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn pan_right_moves_by_step_times_scale() {
        let mut viewport = viewport();
        viewport.pan(Direction::Right, 140.0);
        assert_eq!(viewport.center().real, -0.7 + 140.0 * 0.004);
        assert_eq!(viewport.center().imaginary, 0.0);
        assert_eq!(viewport.scale(), 0.004);
    }

    #[test]
    fn pan_up_moves_towards_negative_imaginary() {
        let mut viewport = viewport();
        viewport.pan(Direction::Up, 140.0);
        assert_eq!(viewport.center().imaginary, -140.0 * 0.004);
        assert_eq!(viewport.center().real, -0.7);
    }

    #[test]
    fn zoom_in_halves_and_zoom_out_doubles() {
        let mut viewport = viewport();
        viewport.zoom_in();
        assert_eq!(viewport.scale(), 0.002);
        viewport.zoom_out();
        viewport.zoom_out();
        assert_eq!(viewport.scale(), 0.008);
    }

    #[test]
    fn zoom_never_reaches_zero_or_infinity() {
        let mut viewport = viewport();
        for _ in 0..2000 {
            viewport.zoom_in();
        }
        assert!(viewport.scale() > 0.0);
        for _ in 0..4000 {
            viewport.zoom_out();
        }
        assert!(viewport.scale().is_finite());
    }

    proptest! {
        #[test]
        fn opposite_pans_cancel(step in 1.0f64..500.0, scale in 1e-9f64..1.0) {
            let mut viewport = Viewport::new(Complex::ZERO, scale, screen::Size::new(8, 8)).unwrap();
            viewport.pan(Direction::Left, step);
            viewport.pan(Direction::Right, step);
            viewport.pan(Direction::Down, step);
            viewport.pan(Direction::Up, step);
            prop_assert!(viewport.center().real.abs() < 1e-12);
            prop_assert!(viewport.center().imaginary.abs() < 1e-12);
        }
    }
}
