//! Spinner shown while a submission or fetch is in flight. The prompt
//! loop is blocked for the duration, so the user cannot re-submit.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_MS: u64 = 80;

/// Starts a steady-tick spinner with the given message. Call
/// `finish_and_clear()` when the operation resolves.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.yellow} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(TICK_MS));
    bar
}
