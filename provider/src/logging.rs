use tracing::{level_filters::LevelFilter, Dispatch};
use tracing_subscriber::{
	filter::Targets,
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	Layer,
};

use crate::{config::LogLevel, prelude::*};

/// Sets up the global tracing subscriber. Logs are written to stderr, since
/// stdout belongs to the framework. Only the events of this crate and of the
/// API models are logged, up to the given level.
///
/// This can only be done once per process. Calling it again returns an error
/// instead of replacing the subscriber.
pub fn init(level: LogLevel) -> Result<(), AppError> {
	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_writer(std::io::stderr)
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(false)
						.with_file(false)
						.with_target(true)
						.compact(),
				)
				.with_filter(
					Targets::new()
						.with_target(env!("CARGO_PKG_NAME"), LevelFilter::TRACE)
						.with_target("models", LevelFilter::TRACE),
				)
				.with_filter(LevelFilter::from(level)),
		),
	))?;

	debug!("Logging initialised at level `{}`", level);
	Ok(())
}
