/// Port trait for percentage progress of one action (0 to 100).
///
/// The terminal implementation lives in `cli::progress`.
pub trait ProgressReporter: Send + Sync {
    /// Names the stage that is now running.
    fn stage(&self, description: &str);

    /// Moves the bar forward by `percent` points.
    fn advance(&self, percent: f64);
}

/// Splits a stage's weight evenly across `count` items. An empty stage yields
/// zero per item; callers advance the whole weight at once instead.
pub fn even_share(weight: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        weight / count as f64
    }
}
