//! Message formatting utilities for the control panel.

use merlinfest_server::domain::VisualState;
use merlinfest_shared::time::timestamp_to_rfc3339;

use crate::agent::SyncEvent;

const SEPARATOR: &str = "============================================================";

/// Message formatter for control panel display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a full visual state snapshot
    ///
    /// # Arguments
    ///
    /// * `title` - Heading printed above the snapshot
    /// * `state` - The visual state to show
    ///
    /// # Returns
    ///
    /// A multi-line string framed by separators
    pub fn format_visual_state(title: &str, state: &VisualState) -> String {
        let effects = if state.parameters.effect_ids.is_empty() {
            "(none)".to_string()
        } else {
            state.parameters.effect_ids.join(", ")
        };

        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", SEPARATOR));
        output.push_str(&format!("{}:\n", title));
        output.push_str(&format!("  theme        : {}\n", state.active_theme));
        output.push_str(&format!("  speed        : {}\n", state.parameters.speed));
        output.push_str(&format!("  intensity    : {}\n", state.parameters.intensity));
        output.push_str(&format!("  color scheme : {}\n", state.parameters.color_scheme));
        output.push_str(&format!("  effects      : {}\n", effects));
        output.push_str(&format!("  active users : {}\n", state.active_users));
        output.push_str(&format!(
            "  last updated : {}\n",
            timestamp_to_rfc3339(state.last_updated.value())
        ));
        output.push_str(&format!("{}\n", SEPARATOR));
        output
    }

    /// Format a user-count notification
    pub fn format_user_count(count: usize) -> String {
        let noun = if count == 1 { "user" } else { "users" };
        format!("\n* {} {} online\n", count, noun)
    }

    /// Format a theme-changed notification
    pub fn format_theme_changed(theme: &str) -> String {
        format!("\n~ theme changed to '{}'\n", theme)
    }

    /// Format an effect-triggered notification
    pub fn format_effect_triggered(effect_id: &str) -> String {
        format!("\n! effect '{}'\n", effect_id)
    }

    /// Format any sync event for display
    ///
    /// # Arguments
    ///
    /// * `event` - The event received from the sync agent
    ///
    /// # Returns
    ///
    /// The text to print for the event
    pub fn format_event(event: &SyncEvent) -> String {
        match event {
            SyncEvent::Connect { profile } => format!("\nConnected via {}\n", profile),
            SyncEvent::Disconnect { reason } => format!("\nDisconnected: {}\n", reason),
            SyncEvent::ConnectError {
                profile,
                attempt,
                error,
            } => format!("\n{} attempt {} failed: {}\n", profile, attempt, error),
            SyncEvent::InitialState(state) => Self::format_visual_state("Current visuals", state),
            SyncEvent::VisualUpdate(state) => Self::format_visual_state("Visuals updated", state),
            SyncEvent::UserCountUpdate { count } => Self::format_user_count(*count),
            SyncEvent::ThemeChanged { theme } => Self::format_theme_changed(theme),
            SyncEvent::EffectTriggered { effect_id } => Self::format_effect_triggered(effect_id),
            SyncEvent::GaveUp => "\nCould not reach the hub. Giving up.\n".to_string(),
        }
    }
}
