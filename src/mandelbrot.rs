//! Escape-time evaluation of `z ← z² + c`.

use crate::pixel::Complex;

/// Points whose squared magnitude reaches this have escaped.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// The value [`escape_time`] returns for points that stay bounded for the whole budget.
pub const fn interior(budget: u32) -> u32 {
    budget + 1
}

/**
Number of iterations before the orbit of `c` escapes.

The orbit starts at `z₀ = c` and is iterated while `|z_k|² < 4` and `k < budget`.
A point that escapes at some step `k < budget` yields `k`. Once the budget is
spent the point counts as bounded and yields [`interior(budget)`](interior), even
if the escape test would also fire on that final step. With a zero budget,
points outside the escape radius still yield 0.

The result is always in `[0, budget + 1]`, so it can index a colour table of
length `budget + 2` directly.
*/
pub fn escape_time(c: Complex, budget: u32) -> u32 {
    let mut z = c;
    let mut count = 0;
    while z.norm_sqr() < ESCAPE_RADIUS_SQR && count < budget {
        z = z * z + c;
        count += 1;
    }

    if count < budget {
        count
    } else if budget == 0 && c.norm_sqr() >= ESCAPE_RADIUS_SQR {
        0
    } else {
        interior(budget)
    }
}
