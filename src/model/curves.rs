//! Pure numeric transforms shared by the driver and team updates.

/// Maps a finishing position to a reward in `[-amplitude, amplitude]`.
///
/// The first half of the field eases out (cubic) from `amplitude` down to 0 at
/// `span / 2`, the second half eases in from 0 down to `-amplitude` at `span`.
/// Positions outside the field are worth nothing.
///
/// - `position <= 0`: `amplitude`
/// - `0 < position <= span / 2`: `amplitude * (1 - (position - 1) / (span / 2 - 1))^3`
/// - `span / 2 < position <= span`: `-amplitude * ((position - span / 2) / (span - span / 2))^3`
/// - `position > span`: 0
///
/// Positions between 0 and 1 are read as 1 so the curve never exceeds its bound.
pub fn position_reward(position: f64, span: f64, amplitude: f64) -> f64 {
    if !position.is_finite() || !span.is_finite() || !amplitude.is_finite() {
        return 0.0;
    }

    let half = span / 2.0;
    if position <= 0.0 {
        amplitude
    } else if position <= half {
        if half <= 1.0 {
            return amplitude;
        }
        let progress = (position.max(1.0) - 1.0) / (half - 1.0);
        amplitude * (1.0 - progress).powi(3)
    } else if position <= span {
        -amplitude * ((position - half) / (span - half)).powi(3)
    } else {
        0.0
    }
}

/// [`position_reward`] for a position that may not be numeric. `None` is worth 0.
pub fn optional_position_reward(position: Option<u32>, span: f64, amplitude: f64) -> f64 {
    match position {
        Some(p) => position_reward(p as f64, span, amplitude),
        None => 0.0
    }
}

/// Signed reward for a gap between two positions (places gained from the grid,
/// or places ahead of a teammate).
///
/// The magnitude is how far the curve has dropped from its top value when the
/// gap is read as a position in a field one place larger, halved so it stays
/// within `amplitude`. No gap is worth 0, a gap across the whole span or more
/// is worth the full amplitude. The sign of `gap` is kept.
pub fn gap_reward(gap: f64, span: f64, amplitude: f64) -> f64 {
    if !gap.is_finite() || gap == 0.0 {
        return 0.0;
    }

    let distance = gap.abs().min(span);
    let magnitude = (amplitude - position_reward(distance + 1.0, span + 1.0, amplitude)) / 2.0;
    if gap < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Elo expected score of `own` against `opponent`.
pub fn expected_score(own: f64, opponent: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - own) / scale))
}

/// Logarithmic compression anchored at `(1, 1)`:
/// `ln(a * x + 1) * b + (1 - b * ln(a + 1))`.
///
/// Returns `None` outside the logarithm's domain.
pub fn influence(x: f64, a: f64, b: f64) -> Option<f64> {
    if a * x + 1.0 <= 0.0 || a + 1.0 <= 0.0 {
        return None;
    }

    let c = 1.0 - b * (a + 1.0).ln();
    Some((a * x + 1.0).ln() * b + c)
}
