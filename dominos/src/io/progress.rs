//! Spinner around provider calls.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Run `future` behind a spinner showing `message`.
///
/// The spinner finishes with `done` on success and `failed` on error. It draws
/// to stderr and stays hidden when stderr is not a terminal.
pub async fn with_spinner<T, E, F>(
    message: &str,
    done: &str,
    failed: &str,
    future: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    match &result {
        Ok(_) => spinner.finish_with_message(format!("✓ {done}")),
        Err(_) => spinner.finish_with_message(format!("✗ {failed}")),
    }
    result
}
