/*!
State of an interactive exploration.

Everything that changes between frames lives in [`Session`]. Commands mutate it
on the main thread only; render workers see it through shared references for
the duration of one frame.
*/

use std::{num::NonZeroUsize, path::Path, time::Duration};

use log::{debug, info};

use crate::{
    colour::ColourTable,
    compute::{self, Frame},
    config::{BudgetLimits, Settings},
    error::{Error, ExportError},
    export,
    input::Command,
    viewport::Viewport,
};

pub struct Session {
    viewport: Viewport,
    colours: ColourTable,
    budget_limits: BudgetLimits,
    pan_step: f64,
    bands: NonZeroUsize,
    frame: Frame,
    /// Time taken by the last completed render, if there has been one.
    elapsed: Option<Duration>,
}

impl Session {
    pub fn new(settings: &Settings) -> Result<Self, Error> {
        let viewport = Viewport::new(settings.center, settings.scale, settings.size)
            .ok_or(Error::InvalidScale(settings.scale))?;
        let budget = settings.budget_limits.clamp(settings.budget);
        Ok(Self {
            viewport,
            colours: ColourTable::generate(budget),
            budget_limits: settings.budget_limits,
            pan_step: settings.pan_step,
            bands: settings.bands,
            frame: Frame::new(settings.size),
            elapsed: None,
        })
    }

    pub fn budget(&self) -> u32 {
        self.colours.budget()
    }

    /// The last rendered frame. Only meaningful once [`Session::render`] has run.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /**
    Apply a state-changing command.

    Returns `true` when the frame must be recomputed. Budget changes recompute
    immediately, like pans and zooms. [`Command::Export`] is not handled here;
    see [`Session::export`].
    */
    pub fn apply(&mut self, command: Command) -> bool {
        debug!("applying {:?}", command);
        match command {
            Command::Export => false,
            Command::Pan(direction) => {
                self.viewport.pan(direction, self.pan_step);
                true
            }
            Command::ZoomIn => {
                self.viewport.zoom_in();
                true
            }
            Command::ZoomOut => {
                self.viewport.zoom_out();
                true
            }
            Command::IncreaseBudget => {
                self.set_budget(self.budget_limits.increase(self.budget()));
                true
            }
            Command::DecreaseBudget => {
                self.set_budget(self.budget_limits.decrease(self.budget()));
                true
            }
            Command::Redraw => true,
        }
    }

    fn set_budget(&mut self, budget: u32) {
        if budget != self.colours.budget() {
            self.colours = ColourTable::generate(budget);
        }
    }

    /// Recompute every pixel of the frame, blocking until all bands finish.
    pub fn render(&mut self) -> Duration {
        info!("Beginning to calculate");
        let elapsed = compute::render(&self.viewport, &self.colours, &mut self.frame, self.bands);
        info!("Finished calculating in {} seconds", elapsed.as_secs_f64());
        self.elapsed = Some(elapsed);
        elapsed
    }

    /// Diagnostic line shown alongside the frame.
    pub fn overlay(&self) -> String {
        let elapsed = match self.elapsed {
            Some(elapsed) => format!("{:.3}s", elapsed.as_secs_f64()),
            None => "-".to_owned(),
        };
        let center = self.viewport.center();
        format!(
            "Mandelbrot | {} | iterations {} | scale {:e} | center ({}, {})",
            elapsed,
            self.budget(),
            self.viewport.scale(),
            center.real,
            center.imaginary
        )
    }

    pub fn export(&self, path: &Path) -> Result<(), ExportError> {
        export::png(&self.frame, path)
    }
}

#[cfg(test)]
impl Session {
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn colours(&self) -> &ColourTable {
        &self.colours
    }

    pub fn is_rendered(&self) -> bool {
        self.elapsed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        colour::INTERIOR_COLOUR, mandelbrot, pixel::Complex, screen, viewport::Direction,
    };

    fn settings() -> Settings {
        Settings {
            size: screen::Size::new(60, 40),
            bands: NonZeroUsize::new(4).unwrap(),
            ..Settings::default()
        }
    }

    #[test]
    fn starts_from_settings() {
        let session = Session::new(&settings()).unwrap();
        assert_eq!(session.viewport().center(), Complex::new(-0.7, 0.0));
        assert_eq!(session.viewport().scale(), 0.004);
        assert_eq!(session.budget(), 120);
        assert_eq!(session.colours().len(), 122);
        assert!(!session.is_rendered());
    }

    #[test]
    fn rejects_invalid_scale() {
        let settings = Settings {
            scale: 0.0,
            ..settings()
        };
        assert!(matches!(Session::new(&settings), Err(Error::InvalidScale(_))));
    }

    #[test]
    fn pan_right_shifts_by_step_times_scale() {
        let mut session = Session::new(&settings()).unwrap();
        assert!(session.apply(Command::Pan(Direction::Right)));
        assert_eq!(session.viewport().center().real, -0.7 + 140.0 * 0.004);
        assert_eq!(session.viewport().scale(), 0.004);
    }

    #[test]
    fn zoom_commands_halve_and_double() {
        let mut session = Session::new(&settings()).unwrap();
        assert!(session.apply(Command::ZoomIn));
        assert_eq!(session.viewport().scale(), 0.002);
        assert!(session.apply(Command::ZoomOut));
        assert!(session.apply(Command::ZoomOut));
        assert_eq!(session.viewport().scale(), 0.008);
    }

    #[test]
    fn budget_changes_regenerate_the_table() {
        let mut session = Session::new(&settings()).unwrap();
        assert!(session.apply(Command::IncreaseBudget));
        assert_eq!(session.budget(), 140);
        assert_eq!(session.colours().len(), 142);
        assert!(session.apply(Command::DecreaseBudget));
        assert_eq!(session.budget(), 120);
        assert_eq!(session.colours(), &ColourTable::generate(120));
    }

    #[test]
    fn budget_stops_at_the_floor_and_ceiling() {
        let settings = Settings {
            budget: 30,
            budget_limits: BudgetLimits {
                min: 10,
                max: 50,
                step: 20,
            },
            ..settings()
        };
        let mut session = Session::new(&settings).unwrap();
        session.apply(Command::DecreaseBudget);
        assert_eq!(session.budget(), 10);
        session.apply(Command::DecreaseBudget);
        assert_eq!(session.budget(), 10);
        assert_eq!(session.colours().len(), 12);

        for _ in 0..5 {
            session.apply(Command::IncreaseBudget);
        }
        assert_eq!(session.budget(), 50);
        assert_eq!(session.colours().len(), 52);
    }

    #[test]
    fn out_of_range_initial_budget_is_clamped() {
        let settings = Settings {
            budget: 1,
            ..settings()
        };
        assert_eq!(Session::new(&settings).unwrap().budget(), 20);
    }

    #[test]
    fn export_and_redraw_leave_the_view_alone() {
        let mut session = Session::new(&settings()).unwrap();
        let before = *session.viewport();
        assert!(!session.apply(Command::Export));
        assert!(session.apply(Command::Redraw));
        assert_eq!(*session.viewport(), before);
        assert_eq!(session.budget(), 120);
    }

    #[test]
    fn render_fills_the_frame_and_reports_in_the_overlay() {
        let mut session = Session::new(&settings()).unwrap();
        assert!(session.overlay().contains("iterations 120"));
        session.render();
        assert!(session.is_rendered());

        let center = session.frame().pixel(30, 20);
        assert_eq!(center, session.colours().get(mandelbrot::interior(120)));
        assert_eq!(center, INTERIOR_COLOUR);

        let overlay = session.overlay();
        assert!(overlay.contains("iterations 120"), "{}", overlay);
        assert!(overlay.contains("scale 4e-3"), "{}", overlay);
        assert!(overlay.contains("center (-0.7, 0)"), "{}", overlay);
    }
}
