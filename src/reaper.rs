//! Background eviction of idle buckets.
//!
//! [`spawn_reaper`] runs [`Reap::reap_now`] on a fixed period so idle keys cannot grow the
//! bucket store without bound. The task is best-effort maintenance, not a liveness
//! requirement: tokio tasks never keep the process alive, and the loop simply stops when
//! the runtime shuts down. [`ReaperHandle::stop`] is the graceful path for tests and
//! shutdown hooks; dropping the handle detaches the task instead of cancelling it.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{self, MissedTickBehavior},
};
// self
use crate::{limiter::RateLimiter, quota::QuotaLimiter};

/// Store maintenance contract consumed by the reaper task.
pub trait Reap
where
	Self: Send + Sync,
{
	/// Evicts idle state and returns the number of evicted buckets.
	fn reap_now(&self) -> usize;
}
impl Reap for RateLimiter {
	fn reap_now(&self) -> usize {
		self.reap()
	}
}
impl Reap for QuotaLimiter {
	fn reap_now(&self) -> usize {
		self.reap()
	}
}

/// Handle controlling a spawned reaper task.
#[derive(Debug)]
pub struct ReaperHandle {
	shutdown: watch::Sender<bool>,
	task: JoinHandle<()>,
}
impl ReaperHandle {
	/// Signals the task to exit and waits for it to finish.
	pub async fn stop(self) {
		let _ = self.shutdown.send(true);
		let _ = self.task.await;
	}
}

/// Spawns a periodic reaper for `target`, ticking once per `period`.
///
/// Must be called from within a tokio runtime. The first eviction pass runs one full
/// period after the spawn; missed ticks are delayed rather than bursted.
pub fn spawn_reaper<R>(target: R, period: StdDuration) -> ReaperHandle
where
	R: 'static + Reap,
{
	let (shutdown, mut on_shutdown) = watch::channel(false);
	// The task holds its own sender so a dropped handle detaches the loop instead of
	// closing the channel out from under it.
	let keep_open = shutdown.clone();
	let task = tokio::spawn(async move {
		let _keep_open = keep_open;
		let mut ticker = time::interval_at(time::Instant::now() + period, period);

		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				_ = ticker.tick() => {
					target.reap_now();
				},
				_ = on_shutdown.changed() => {
					if *on_shutdown.borrow() {
						break;
					}
				},
			}
		}
	});

	ReaperHandle { shutdown, task }
}

/// Spawns a reaper for the login limiter, ticking once per policy window.
pub fn spawn_window_reaper(limiter: RateLimiter) -> ReaperHandle {
	let period = limiter.policy().window.unsigned_abs();

	spawn_reaper(limiter, period)
}
