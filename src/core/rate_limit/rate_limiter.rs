use crate::shared::constants::{BLOCK_DURATION_MS, MAX_ATTEMPTS, RATE_LIMIT_WINDOW_MS};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub max_attempts: u32,
    pub window: Duration,
    pub block_duration: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            window: Duration::from_millis(RATE_LIMIT_WINDOW_MS),
            block_duration: Duration::from_millis(BLOCK_DURATION_MS),
        }
    }
}

/// Per-key attempt state
///
/// Invariants: `blocked` holds only while `now < block_until`; `count`
/// resets to 0 whenever the window has elapsed.
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_time: Instant,
    pub blocked: bool,
    pub block_until: Option<Instant>,
}

impl RateLimitEntry {
    fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 0,
            reset_time: now + window,
            blocked: false,
            block_until: None,
        }
    }

    fn block_active(&self, now: Instant) -> bool {
        self.blocked && self.block_until.map_or(false, |until| now < until)
    }

    /// Window and block have both expired
    fn expired(&self, now: Instant) -> bool {
        now > self.reset_time && self.block_until.map_or(true, |until| now >= until)
    }
}

/// Entry counts reported by `get_stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStats {
    pub total_entries: usize,
    pub blocked_entries: usize,
    pub active_entries: usize,
}

/// Sliding-window rate limiter with escalating lockout
///
/// State is keyed by (identifier, action) and held behind a single write
/// lock so check-then-mutate sequences stay atomic on a parallel runtime.
pub struct RateLimiter {
    config: RateLimiterConfig,
    limits: Arc<RwLock<HashMap<(String, String), RateLimitEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            limits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Whether the (identifier, action) pair is currently locked out
    ///
    /// A lockout holds until `block_until` passes regardless of window
    /// expiry; once it has passed the entry is lazily deleted, restoring the
    /// full allowance.
    pub async fn is_rate_limited(&self, identifier: &str, action: &str) -> bool {
        let key = (identifier.to_string(), action.to_string());
        let now = Instant::now();
        let mut limits = self.limits.write().await;

        match limits.get(&key) {
            None => false,
            Some(entry) => {
                if entry.blocked {
                    if entry.block_active(now) {
                        true
                    } else {
                        limits.remove(&key);
                        false
                    }
                } else {
                    if now > entry.reset_time {
                        limits.remove(&key);
                    }
                    false
                }
            }
        }
    }

    /// Record an attempt for the (identifier, action) pair
    pub async fn record_attempt(&self, identifier: &str, action: &str) {
        let key = (identifier.to_string(), action.to_string());
        let now = Instant::now();
        let mut limits = self.limits.write().await;

        let entry = limits
            .entry(key)
            .or_insert_with(|| RateLimitEntry::fresh(now, self.config.window));

        if entry.blocked {
            if entry.block_active(now) {
                // lockout holds; attempts during it change nothing
                return;
            }
            *entry = RateLimitEntry::fresh(now, self.config.window);
        } else if now > entry.reset_time {
            *entry = RateLimitEntry::fresh(now, self.config.window);
        }

        entry.count += 1;
        if entry.count >= self.config.max_attempts {
            entry.blocked = true;
            entry.block_until = Some(now + self.config.block_duration);
        }
    }

    /// Attempts left in the current window
    pub async fn get_remaining_attempts(&self, identifier: &str, action: &str) -> u32 {
        let key = (identifier.to_string(), action.to_string());
        let now = Instant::now();
        let limits = self.limits.read().await;

        match limits.get(&key) {
            None => self.config.max_attempts,
            Some(entry) => {
                if entry.block_active(now) {
                    0
                } else if entry.blocked || now > entry.reset_time {
                    self.config.max_attempts
                } else {
                    self.config.max_attempts.saturating_sub(entry.count)
                }
            }
        }
    }

    /// Time left on an active lockout, zero otherwise
    pub async fn get_block_time_remaining(&self, identifier: &str, action: &str) -> Duration {
        let key = (identifier.to_string(), action.to_string());
        let now = Instant::now();
        let limits = self.limits.read().await;

        match limits.get(&key) {
            Some(entry) if entry.blocked => entry
                .block_until
                .map(|until| until.saturating_duration_since(now))
                .unwrap_or(Duration::ZERO),
            _ => Duration::ZERO,
        }
    }

    /// Remove one entry, or every entry for the identifier
    pub async fn clear_limits(&self, identifier: &str, action: Option<&str>) {
        let mut limits = self.limits.write().await;
        match action {
            Some(action) => {
                limits.remove(&(identifier.to_string(), action.to_string()));
            }
            None => limits.retain(|(id, _), _| id != identifier),
        }
    }

    /// Idempotent sweep removing entries whose window and block have both
    /// expired, bounding unbounded growth
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut limits = self.limits.write().await;
        limits.retain(|_, entry| !entry.expired(now));
    }

    /// Spawn a periodic cleanup task independent of request handling
    pub fn spawn_cleanup(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                limiter.cleanup().await;
            }
        })
    }

    /// Entry counts over the current table
    pub async fn get_stats(&self) -> RateLimitStats {
        let now = Instant::now();
        let limits = self.limits.read().await;

        let mut blocked = 0;
        let mut active = 0;
        for entry in limits.values() {
            if entry.block_active(now) {
                blocked += 1;
            } else if now < entry.reset_time {
                active += 1;
            }
        }

        RateLimitStats {
            total_entries: limits.len(),
            blocked_entries: blocked,
            active_entries: active,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn fast_config() -> RateLimiterConfig {
        RateLimiterConfig {
            max_attempts: 3,
            window: Duration::from_millis(50),
            block_duration: Duration::from_millis(80),
        }
    }

    #[tokio::test]
    async fn test_reaching_the_cap_blocks() {
        let limiter = RateLimiter::default();

        for _ in 0..5 {
            assert!(!limiter.is_rate_limited("u1", "login").await);
            limiter.record_attempt("u1", "login").await;
        }

        assert!(limiter.is_rate_limited("u1", "login").await);
    }

    #[tokio::test]
    async fn test_remaining_attempts_decrease_monotonically() {
        let limiter = RateLimiter::default();

        for expected in (0..=5).rev() {
            assert_eq!(limiter.get_remaining_attempts("u1", "login").await, expected);
            if expected > 0 {
                limiter.record_attempt("u1", "login").await;
            }
        }
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = RateLimiter::default();

        for _ in 0..5 {
            limiter.record_attempt("u1", "login").await;
        }

        assert!(limiter.is_rate_limited("u1", "login").await);
        assert!(!limiter.is_rate_limited("u1", "export").await);
        assert!(!limiter.is_rate_limited("u2", "login").await);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_count() {
        let limiter = RateLimiter::new(fast_config());

        limiter.record_attempt("u1", "login").await;
        limiter.record_attempt("u1", "login").await;
        assert_eq!(limiter.get_remaining_attempts("u1", "login").await, 1);

        sleep(Duration::from_millis(70)).await;
        assert_eq!(limiter.get_remaining_attempts("u1", "login").await, 3);
        assert!(!limiter.is_rate_limited("u1", "login").await);
    }

    #[tokio::test]
    async fn test_block_outlives_window_and_then_clears() {
        let limiter = RateLimiter::new(fast_config());

        for _ in 0..3 {
            limiter.record_attempt("u1", "login").await;
        }
        assert!(limiter.is_rate_limited("u1", "login").await);
        assert_eq!(limiter.get_remaining_attempts("u1", "login").await, 0);
        assert!(limiter.get_block_time_remaining("u1", "login").await > Duration::ZERO);

        // window (50ms) has elapsed but the block (80ms) has not
        sleep(Duration::from_millis(60)).await;
        assert!(limiter.is_rate_limited("u1", "login").await);

        sleep(Duration::from_millis(40)).await;
        assert!(!limiter.is_rate_limited("u1", "login").await);
        assert_eq!(limiter.get_remaining_attempts("u1", "login").await, 3);
        assert_eq!(limiter.get_block_time_remaining("u1", "login").await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_attempts_during_block_do_not_extend_it() {
        let limiter = RateLimiter::new(fast_config());

        for _ in 0..3 {
            limiter.record_attempt("u1", "login").await;
        }
        limiter.record_attempt("u1", "login").await;

        sleep(Duration::from_millis(100)).await;
        assert!(!limiter.is_rate_limited("u1", "login").await);
    }

    #[tokio::test]
    async fn test_clear_limits_narrow_and_wide() {
        let limiter = RateLimiter::default();

        for _ in 0..5 {
            limiter.record_attempt("u1", "login").await;
            limiter.record_attempt("u1", "export").await;
        }

        limiter.clear_limits("u1", Some("login")).await;
        assert!(!limiter.is_rate_limited("u1", "login").await);
        assert!(limiter.is_rate_limited("u1", "export").await);

        limiter.clear_limits("u1", None).await;
        assert!(!limiter.is_rate_limited("u1", "export").await);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_fully_expired_entries() {
        let limiter = RateLimiter::new(fast_config());

        limiter.record_attempt("stale", "login").await;
        for _ in 0..3 {
            limiter.record_attempt("blocked", "login").await;
        }

        sleep(Duration::from_millis(60)).await;
        limiter.cleanup().await;

        let stats = limiter.get_stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.blocked_entries, 1);

        sleep(Duration::from_millis(40)).await;
        limiter.cleanup().await;
        assert_eq!(limiter.get_stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_spawned_cleanup_sweeps_in_the_background() {
        let limiter = Arc::new(RateLimiter::new(fast_config()));
        let handle = limiter.spawn_cleanup(Duration::from_millis(20));

        limiter.record_attempt("stale", "login").await;
        sleep(Duration::from_millis(120)).await;

        assert_eq!(limiter.get_stats().await.total_entries, 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let limiter = RateLimiter::default();

        limiter.record_attempt("active", "login").await;
        for _ in 0..5 {
            limiter.record_attempt("blocked", "login").await;
        }

        let stats = limiter.get_stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.blocked_entries, 1);
        assert_eq!(stats.active_entries, 1);
    }
}
