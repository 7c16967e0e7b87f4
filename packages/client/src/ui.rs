//! UI utilities for the control panel.

use std::io::Write;

pub const PROMPT: &str = "merlinfest> ";

/// Redisplay the prompt after printing a notification
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
