#![cfg(feature = "reaper")]

// std
use std::time::Duration as StdDuration;
// crates.io
use time::{Duration, OffsetDateTime};
// self
use login_throttle::{
	key::ClientKey,
	limiter::RateLimiter,
	quota::QuotaLimiter,
	reaper::{spawn_reaper, spawn_window_reaper},
};

async fn settle<F>(mut done: F)
where
	F: FnMut() -> bool,
{
	for _ in 0..32 {
		if done() {
			return;
		}

		tokio::task::yield_now().await;
	}
}

#[tokio::test(start_paused = true)]
async fn reaper_evicts_idle_login_buckets() {
	let limiter = RateLimiter::new();
	let key = ClientKey::new("ip:10.0.0.1");
	let stale = OffsetDateTime::now_utc() - Duration::minutes(16);

	limiter.check_at(&key, stale);

	assert_eq!(limiter.tracked_keys(), 1);

	let handle = spawn_window_reaper(limiter.clone());

	// One policy window passes before the first eviction pass runs.
	tokio::time::sleep(StdDuration::from_secs(15 * 60 + 1)).await;
	settle(|| limiter.is_empty()).await;

	assert!(limiter.is_empty());

	handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn reaper_never_evicts_blocked_buckets() {
	let limiter = RateLimiter::new();
	let key = ClientKey::new("ip:10.0.0.1");
	let now = OffsetDateTime::now_utc();

	for _ in 0..30 {
		limiter.check_at(&key, now);
	}

	// Starts a cooldown that ends well in the future.
	assert!(!limiter.check_at(&key, now).is_allow());

	let handle = spawn_reaper(limiter.clone(), StdDuration::from_secs(1));

	// Several eviction passes run; the blocked bucket must survive each of them.
	tokio::time::sleep(StdDuration::from_secs(5)).await;
	settle(|| false).await;

	assert_eq!(limiter.tracked_keys(), 1);

	handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn reaper_serves_the_quota_limiter_through_the_same_seam() {
	let limiter = QuotaLimiter::new();
	let key = ClientKey::from_user("alice");
	let stale = OffsetDateTime::now_utc() - Duration::hours(25);

	limiter.check_at(&key, stale);

	assert_eq!(limiter.tracked_keys(), 1);

	let handle = spawn_reaper(limiter.clone(), StdDuration::from_secs(60));

	tokio::time::sleep(StdDuration::from_secs(61)).await;
	settle(|| limiter.is_empty()).await;

	assert!(limiter.is_empty());

	handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_is_graceful_and_prompt() {
	let limiter = RateLimiter::new();
	let key = ClientKey::new("ip:10.0.0.1");

	limiter.check_at(&key, OffsetDateTime::now_utc());

	let handle = spawn_window_reaper(limiter.clone());

	// Stop lands before the first tick; the in-window bucket is untouched.
	handle.stop().await;

	assert_eq!(limiter.tracked_keys(), 1);
}
