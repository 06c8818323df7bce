/// Display color of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarColor {
    #[default]
    Normal,
    Complete,
}

/// Fraction of the goal reached. Values `>= 1.0` mean the goal is met.
pub fn progress(word_count: usize, goal_words: u32) -> f64 {
    if goal_words == 0 {
        return 0.0;
    }
    word_count as f64 / goal_words as f64
}

/// How far the text has faded, `0` being full contrast and `255` fully faded.
///
/// Linear between `warn_at` and `fail_at`, clamped outside of it.
pub fn intensity(idle_seconds: f64, warn_at: f64, fail_at: f64) -> u8 {
    let span = fail_at - warn_at;
    if span.is_nan() || span <= 0.0 {
        return 0;
    }
    let fraction = ((idle_seconds - warn_at) / span).clamp(0.0, 1.0);
    (255.0 * fraction).round() as u8
}
