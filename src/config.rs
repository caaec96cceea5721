//! Defaults for an interactive session.

use std::{num::NonZeroUsize, path::PathBuf};

use crate::{pixel::Complex, screen};

pub const DEFAULT_SIZE: screen::Size = screen::Size::new(1500, 1000);
pub const DEFAULT_CENTER: Complex = Complex {
    real: -0.7,
    imaginary: 0.0,
};
pub const DEFAULT_SCALE: f64 = 0.004;
pub const DEFAULT_BUDGET: u32 = 120;

/// Distance of a single pan, in pixels at the current scale.
pub const PAN_STEP: f64 = 140.0;

pub const EXPORT_PATH: &str = "mandelbrot.png";

/// Bounds and increment for the iteration budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetLimits {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl BudgetLimits {
    pub fn clamp(&self, budget: u32) -> u32 {
        budget.clamp(self.min, self.max)
    }

    pub fn increase(&self, budget: u32) -> u32 {
        self.clamp(budget.saturating_add(self.step))
    }

    pub fn decrease(&self, budget: u32) -> u32 {
        self.clamp(budget.saturating_sub(self.step))
    }
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            min: 20,
            max: 10_000,
            step: 20,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub size: screen::Size,
    pub center: Complex,
    pub scale: f64,
    pub budget: u32,
    pub budget_limits: BudgetLimits,
    pub pan_step: f64,
    /// Number of horizontal bands rendered concurrently.
    pub bands: NonZeroUsize,
    pub export_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            center: DEFAULT_CENTER,
            scale: DEFAULT_SCALE,
            budget: DEFAULT_BUDGET,
            budget_limits: BudgetLimits::default(),
            pan_step: PAN_STEP,
            bands: default_bands(),
            export_path: PathBuf::from(EXPORT_PATH),
        }
    }
}

/// One band per logical CPU.
pub fn default_bands() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}
