//! Grid arithmetic for synthesized note lines.

use num::Integer;

/// Returns the coarsest tick step which divides the measure and places every tick on a slot.
///
/// The measure size is the initial accumulator, so a single tick at `0` collapses the grid into
/// one slot spanning the whole measure.
#[must_use]
pub fn grid_step(measure_size: u64, ticks: impl IntoIterator<Item = u64>) -> u64 {
    ticks
        .into_iter()
        .fold(measure_size, |step, tick| step.gcd(&tick))
}
