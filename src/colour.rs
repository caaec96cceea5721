//! Colouring of escape counts.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{mandelbrot, pixel::Rgba};

/// Colour of points that never escape.
pub const INTERIOR_COLOUR: Rgba = Rgba::BLACK;

/**
Lookup table from escape count to colour.

Holds `budget + 2` entries: one per escape count in `[0, budget]` and a final
entry for [`mandelbrot::interior`]. The table remembers the budget it was built
for, and is never patched in place; a budget change builds a new table.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColourTable {
    budget: u32,
    colours: Vec<Rgba>,
}

impl ColourTable {
    pub fn generate(budget: u32) -> Self {
        trace!("begin generate colour table for budget {}", budget);

        let mut colours = vec![INTERIOR_COLOUR; budget as usize + 2];
        let interior = mandelbrot::interior(budget) as usize;
        colours[..interior]
            .par_iter_mut()
            .enumerate()
            .for_each(|(count, colour)| *colour = gradient(count as u32, budget));

        trace!("end generate colour table");
        Self { budget, colours }
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Colour for a value returned by [`mandelbrot::escape_time`] with this table's budget.
    pub fn get(&self, escape_time: u32) -> Rgba {
        self.colours[escape_time as usize]
    }
}

#[cfg(test)]
impl ColourTable {
    pub fn as_slice(&self) -> &[Rgba] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

/**
Green ramp over the normalised escape count `count / budget`.

The lower half fades from black to pure green. The upper half keeps green
saturated and brings red and blue up with it, ending in white.
*/
fn gradient(count: u32, budget: u32) -> Rgba {
    let quotient = if budget == 0 {
        1.0
    } else {
        (count as f64 / budget as f64).clamp(0.0, 1.0)
    };
    let level = (quotient * 255.0) as u8;
    if quotient > 0.5 {
        Rgba::opaque(level, 255, level)
    } else {
        Rgba::opaque(0, level, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_entry_is_the_interior_colour() {
        let table = ColourTable::generate(120);
        assert_eq!(table.get(mandelbrot::interior(120)), INTERIOR_COLOUR);
        assert_eq!(table.as_slice().last(), Some(&INTERIOR_COLOUR));
    }

    #[test]
    fn gradient_runs_from_black_to_white() {
        let table = ColourTable::generate(10);
        assert_eq!(table.get(0), Rgba::opaque(0, 0, 0));
        assert_eq!(table.get(5), Rgba::opaque(0, 127, 0));
        assert_eq!(table.get(10), Rgba::opaque(255, 255, 255));
    }

    #[test]
    fn zero_budget_still_has_two_entries() {
        let table = ColourTable::generate(0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Rgba::opaque(255, 255, 255));
        assert_eq!(table.get(1), INTERIOR_COLOUR);
    }

    proptest! {
        #[test]
        fn table_length_is_budget_plus_two(budget in 0u32..4096) {
            prop_assert_eq!(ColourTable::generate(budget).len(), budget as usize + 2);
        }

        #[test]
        fn regeneration_is_idempotent(budget in 0u32..2048) {
            prop_assert_eq!(ColourTable::generate(budget), ColourTable::generate(budget));
        }
    }
}
