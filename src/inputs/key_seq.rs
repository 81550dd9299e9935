use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};

/// Multi-key commands for the document pane: `gg`, `<count>G`.
///
/// Keys and a numeric count prefix accumulate until a command consumes them
/// or the sequence goes stale.
#[derive(Debug)]
pub struct KeySeq {
    keys: Vec<KeyCode>,
    count: Option<u64>,
    last_key_time: Instant,
    timeout: Duration,
}

impl Default for KeySeq {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySeq {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(1))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            keys: Vec::new(),
            count: None,
            last_key_time: Instant::now(),
            timeout,
        }
    }

    /// Record a key; returns true if it was taken as a count digit
    pub fn push(&mut self, key: KeyEvent) -> bool {
        self.check_timeout();
        self.last_key_time = Instant::now();
        if let KeyCode::Char(c) = key.code {
            if let Some(digit) = c.to_digit(10) {
                // A leading zero is not a count
                if self.keys.is_empty() && (digit != 0 || self.count.is_some()) {
                    let count = self.count.unwrap_or(0);
                    self.count = Some(count.saturating_mul(10).saturating_add(digit as u64));
                    return true;
                }
            }
        }
        self.keys.push(key.code);
        false
    }

    /// Check if the keys typed after the count match a pattern exactly
    pub fn matches(&self, pattern: &[KeyCode]) -> bool {
        !self.is_expired() && self.keys == pattern
    }

    pub fn count(&self) -> Option<u64> {
        if self.is_expired() { None } else { self.count }
    }

    pub fn is_expired(&self) -> bool {
        self.last_key_time.elapsed() > self.timeout
    }

    pub fn is_empty(&self) -> bool {
        self.is_expired() || (self.keys.is_empty() && self.count.is_none())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.count = None;
    }

    fn check_timeout(&mut self) {
        if self.is_expired() {
            self.clear();
        }
    }
}
