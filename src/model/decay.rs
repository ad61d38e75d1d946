/// # How this works
/// Every race, each rating is pulled back toward its baseline by a share of its
/// deviation. `window_races` is the number of races after which the full
/// deviation would have been removed in a season of normal length. Seasons with
/// fewer races (a larger `num_races_weight`) pull harder per race so the
/// per-season pull stays comparable across eras.
///
/// `decay = (current - baseline) / (window_races / num_races_weight)`
///
/// The result is subtracted from the rating, so ratings below baseline decay
/// upward.
pub fn rating_decay(current: f64, baseline: f64, window_races: f64, num_races_weight: f64) -> f64 {
    let deviation = current - baseline;
    if deviation == 0.0 || window_races <= 0.0 || num_races_weight <= 0.0 {
        return 0.0;
    }

    deviation / (window_races / num_races_weight)
}
