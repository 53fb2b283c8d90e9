//! End-of-session handling: failure banner, pause, process exit code.

use crate::{bootstrap::Outcome, printer::Console};

pub const FAILURE_MESSAGE: &str = "The application crashed or failed to start.";

/// Report `outcome` and return the code this process should exit with.
/// Success is silent.
pub fn conclude<C: Console>(outcome: Outcome, console: &C, pause_on_failure: bool) -> i32 {
    match outcome {
        Outcome::Success => 0,
        Outcome::Failed { code } => {
            let detail = match code {
                Some(c) => format!("exit code {}", c),
                None => "no exit code".to_string(),
            };
            console.failure(&format!("{} ({})", FAILURE_MESSAGE, detail));
            if pause_on_failure {
                console.pause();
            }
            match code {
                Some(c) if c != 0 => c,
                _ => 1,
            }
        }
    }
}

/// Report an error raised before anything was launched.
pub fn abort<C: Console>(err: &anyhow::Error, console: &C, pause_on_failure: bool) -> i32 {
    console.failure(&format!("{:#}", err));
    if pause_on_failure {
        console.pause();
    }
    1
}
