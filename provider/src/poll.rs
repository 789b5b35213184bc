//! Many operations of the API complete asynchronously: a cluster takes a
//! while before all of its components are up, and deleting a resource only
//! marks it for deletion. The lifecycle handlers wait for those with
//! [`poll_until`], which calls a status check until it reports the resource
//! as ready, the check fails, or the timeout elapses.

use std::future::Future;

use tokio::time::{self, Duration, Instant};

use crate::prelude::*;

/// How a poll loop waits between its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
	/// How long to wait in total before giving up
	pub timeout: Duration,
	/// How long to wait before the first attempt
	pub delay: Duration,
	/// How long to wait between two attempts
	pub min_wait: Duration,
}

impl PollConfig {
	/// The delay before the first attempt, giving the API some time to act
	/// on the request that was just made
	pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);
	/// The time between two attempts
	pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(5);

	/// Polls with the default delays, giving up after `timeout`
	pub fn with_timeout(timeout: Duration) -> Self {
		Self {
			timeout,
			delay: Self::DEFAULT_DELAY,
			min_wait: Self::DEFAULT_MIN_WAIT,
		}
	}
}

/// The result of a single status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
	/// The resource reached the expected state
	Ready(T),
	/// The resource is not there yet, for the given reason. The check will be
	/// retried.
	Pending(String),
}

/// Calls `check` until it returns [`PollOutcome::Ready`]. An error returned by
/// `check` stops the loop and is returned unchanged. If the resource is still
/// pending once the timeout elapses, an [`AppError::NotReady`] naming
/// `resource` is returned.
pub async fn poll_until<T, F, Fut>(
	config: PollConfig,
	resource: &str,
	mut check: F,
) -> Result<T, AppError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<PollOutcome<T>, AppError>>,
{
	let deadline = Instant::now() + config.timeout;
	time::sleep(config.delay.min(config.timeout)).await;

	let mut attempt = 0u32;
	loop {
		attempt += 1;
		let reason = match check().await? {
			PollOutcome::Ready(value) => {
				debug!(resource, attempt, "Resource is ready");
				return Ok(value);
			}
			PollOutcome::Pending(reason) => reason,
		};

		let now = Instant::now();
		if now >= deadline {
			warn!(resource, attempt, %reason, "Gave up waiting for resource");
			return Err(AppError::NotReady {
				resource: resource.to_string(),
				timeout: config.timeout,
				reason,
			});
		}

		trace!(resource, attempt, %reason, "Resource is not ready yet");
		time::sleep(config.min_wait.min(deadline - now)).await;
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	fn config() -> PollConfig {
		PollConfig {
			timeout: Duration::from_secs(60),
			delay: Duration::from_secs(1),
			min_wait: Duration::from_secs(10),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn retries_until_ready() {
		let attempts = Cell::new(0);
		let start = Instant::now();

		let value = poll_until(config(), "nd-1", || {
			attempts.set(attempts.get() + 1);
			let attempt = attempts.get();
			async move {
				if attempt < 3 {
					Ok(PollOutcome::Pending(format!("attempt {}", attempt)))
				} else {
					Ok(PollOutcome::Ready(attempt))
				}
			}
		})
		.await
		.unwrap();

		assert_eq!(value, 3);
		assert_eq!(start.elapsed(), Duration::from_secs(21));
	}

	#[tokio::test(start_paused = true)]
	async fn errors_stop_the_loop() {
		let attempts = Cell::new(0);

		let error = poll_until::<(), _, _>(config(), "nd-1", || {
			attempts.set(attempts.get() + 1);
			async { Err(AppError::validation("health check failed")) }
		})
		.await
		.unwrap_err();

		assert_eq!(error.to_string(), "health check failed");
		assert_eq!(attempts.get(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn gives_up_after_the_timeout() {
		let start = Instant::now();

		let error = poll_until::<(), _, _>(config(), "abcdef1234", || async {
			Ok(PollOutcome::Pending("etcd is not up".to_string()))
		})
		.await
		.unwrap_err();

		assert!(matches!(
			&error,
			AppError::NotReady { resource, reason, .. }
				if resource == "abcdef1234" && reason == "etcd is not up"
		));
		assert_eq!(start.elapsed(), Duration::from_secs(60));
	}
}
