//! Retry policy for the provider: key rotation on rate limits, exponential
//! backoff on everything else.
//!
//! Rate limits and transport failures are handled differently. A rate limit
//! on one key costs nothing; the next key in the pool is tried immediately.
//! Only once every key in the pool has been rate-limited in the current round
//! does the policy sleep, with exponential backoff plus jitter, and start a
//! fresh round. Transport failures always back off. The backoff budget is
//! `max_retries` sleeps; rotations are free, so the worst case is
//! `max_retries * key_count` requests.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

/// What the caller should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryAction {
    /// Switch to the next API key and retry immediately.
    RotateKey,
    /// Sleep for the given duration, then retry.
    Backoff(Duration),
    /// The budget is spent; stop retrying.
    GiveUp,
}

/// Mutable retry state for one logical request.
#[derive(Debug)]
pub struct RetryState {
    max_retries: u32,
    key_count: usize,
    base_secs: f64,
    jitter_secs: f64,
    retries: u32,
    attempts: u32,
    /// Keys rate-limited in the current rotation round.
    rate_limited_keys: HashSet<usize>,
}

impl RetryState {
    pub fn new(max_retries: u32, key_count: usize, base_secs: f64, jitter_secs: f64) -> Self {
        Self {
            max_retries,
            key_count: key_count.max(1),
            base_secs,
            jitter_secs,
            retries: 0,
            attempts: 0,
            rate_limited_keys: HashSet::new(),
        }
    }

    /// Record that a request is about to be made.
    pub fn begin_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Total requests made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The key at `key_index` was rate-limited.
    pub fn on_rate_limited(&mut self, key_index: usize) -> RetryAction {
        self.rate_limited_keys.insert(key_index);
        if self.rate_limited_keys.len() < self.key_count {
            tracing::debug!(key_index, "rate limited, rotating to next key");
            return RetryAction::RotateKey;
        }
        tracing::warn!("all {} keys rate limited this round", self.key_count);
        self.rate_limited_keys.clear();
        self.consume_backoff()
    }

    /// The request failed for a non-rate-limit reason.
    pub fn on_transport_error(&mut self) -> RetryAction {
        self.consume_backoff()
    }

    fn consume_backoff(&mut self) -> RetryAction {
        let delay = self.backoff_delay();
        self.retries += 1;
        if self.retries >= self.max_retries {
            RetryAction::GiveUp
        } else {
            RetryAction::Backoff(delay)
        }
    }

    /// `base * 2^retries` plus uniform jitter in `[0, jitter_secs)`.
    fn backoff_delay(&self) -> Duration {
        let exp = self.base_secs * f64::powi(2.0, self.retries as i32);
        let jitter = rand::thread_rng().r#gen::<f64>() * self.jitter_secs;
        Duration::from_secs_f64((exp + jitter).max(0.0))
    }
}
