// ABOUTME: Shot chart geometry: converts court-diagram pixel offsets into a distance from the hoop.
// ABOUTME: The diagram is a 500x472 px raster of a 50 ft x 47 ft half court.

const FT_TO_CM: f64 = 30.48;

/// Court diagram size in pixels.
pub const COURT_SIZE_PX: (f64, f64) = (500.0, 472.0);

/// Real-world size of the half court shown on the diagram, in feet.
pub const COURT_SIZE_FT: (f64, f64) = (50.0, 94.0 / 2.0);

/// Distance of the hoop centre from the baseline, in centimeters.
pub const HOOP_FROM_BASELINE_CM: f64 = 160.02;

/// Hoop position on the court in centimeters: horizontally centred.
pub fn hoop_position_cm() -> (f64, f64) {
    (COURT_SIZE_FT.0 * FT_TO_CM / 2.0, HOOP_FROM_BASELINE_CM)
}

/// Straight-line distance in centimeters from a shot at pixel offset
/// `(x, y)` to the hoop.
///
/// Pixel offsets are tenths of a foot from the diagram origin. The result is
/// not rounded.
pub fn distance_cm(x: f64, y: f64) -> f64 {
    let pos = (x / 10.0 * FT_TO_CM, y / 10.0 * FT_TO_CM);
    let hoop = hoop_position_cm();
    ((pos.0 - hoop.0).powi(2) + (pos.1 - hoop.1).powi(2)).sqrt()
}

/// Like [`distance_cm`], for offsets scraped as decimal strings.
pub fn distance_cm_from_str(x: &str, y: &str) -> Option<f64> {
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    Some(distance_cm(x, y))
}
