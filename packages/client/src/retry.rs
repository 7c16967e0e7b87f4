//! Connection profiles and the retry schedule that escalates through them.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

/// One way of reaching the hub, tried `max_attempts` times before moving on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub name: String,
    pub url: String,
    pub max_attempts: u32,
}

impl ConnectionProfile {
    pub fn new(name: impl Into<String>, url: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            max_attempts,
        }
    }
}

/// Exponential backoff between connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per profile when profiles are built from plain URLs.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows `failures` consecutive failures
    /// (`initial_delay * 2^failures`, capped at `max_delay`).
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        let factor = 1u32.checked_shl(failures).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// One step of an `AttemptPlan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAttempt {
    pub profile_index: usize,
    /// 1-based attempt number within the profile
    pub attempt: u32,
    /// Wait before making this attempt
    pub delay: Duration,
}

/// Iterates over every attempt to make, profile by profile.
///
/// The first attempt of a fresh `connect()` goes out immediately. After a
/// dropped connection (`delay_first`) even the first attempt waits.
#[derive(Debug, Clone)]
pub struct AttemptPlan<'a> {
    profiles: &'a [ConnectionProfile],
    policy: &'a RetryPolicy,
    profile_index: usize,
    attempt: u32,
    delay_first: bool,
}

impl<'a> AttemptPlan<'a> {
    pub fn new(profiles: &'a [ConnectionProfile], policy: &'a RetryPolicy, delay_first: bool) -> Self {
        Self {
            profiles,
            policy,
            profile_index: 0,
            attempt: 0,
            delay_first,
        }
    }
}

impl Iterator for AttemptPlan<'_> {
    type Item = PlannedAttempt;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let profile = self.profiles.get(self.profile_index)?;
            if self.attempt < profile.max_attempts {
                break;
            }
            self.profile_index += 1;
            self.attempt = 0;
        }

        let is_very_first = self.profile_index == 0 && self.attempt == 0;
        let delay = if is_very_first && !self.delay_first {
            Duration::ZERO
        } else {
            self.policy.backoff_delay(self.attempt)
        };

        self.attempt += 1;
        Some(PlannedAttempt {
            profile_index: self.profile_index,
            attempt: self.attempt,
            delay,
        })
    }
}
