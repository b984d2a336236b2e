//! Async wrapper for handlers served by `lambda_runtime`.
//!
//! [`LambdaFiretailLogger`] follows the same rules as
//! [`FiretailLogger`](crate::FiretailLogger): one line per successful
//! invocation and padding up to the timing floor before the response is
//! returned. Here the padding is awaited. The runtime only posts the response
//! once the handler future resolves, so the delay still happens before the
//! environment can be frozen.
//!
//! # Example
//!
//! ```rust,no_run
//! use firetail_lambda_logger::{lambda, LambdaFiretailLogger, LoggerConfig};
//! use lambda_runtime::Context;
//! use serde_json::{json, Value};
//!
//! async fn endpoint(_event: Value, _ctx: Context) -> Result<Value, lambda_runtime::Error> {
//!     Ok(json!({"statusCode": 200, "body": "ok"}))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     lambda_runtime::tracing::init_default_subscriber();
//!
//!     let logger = LambdaFiretailLogger::new(endpoint, LoggerConfig::from_env()?)?;
//!     lambda::run(logger).await
//! }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use lambda_runtime::{service_fn, Context, LambdaEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::LoggerConfig;
use crate::error::{InvokeError, LoggerError};
use crate::record::capture_value;
use crate::sink::{LogSink, StdoutSink};
use crate::timing::{saturating_millis, TimingPolicy};
use crate::wrapper::emit_record;

/// Wraps an async `Fn(event, context) -> Future<Output = Result<response, error>>`.
#[derive(Debug, Clone)]
pub struct LambdaFiretailLogger<H, S = StdoutSink> {
    handler: H,
    config: LoggerConfig,
    timing: TimingPolicy,
    sink: S,
}

impl<H> LambdaFiretailLogger<H, StdoutSink> {
    /// Wraps `handler`, writing lines to standard output.
    pub fn new(handler: H, config: LoggerConfig) -> Result<Self, LoggerError> {
        LambdaFiretailLogger::with_sink(handler, config, StdoutSink)
    }
}

impl<H, S: LogSink> LambdaFiretailLogger<H, S> {
    /// Wraps `handler`, writing lines to `sink`.
    pub fn with_sink(handler: H, config: LoggerConfig, sink: S) -> Result<Self, LoggerError> {
        config.validate()?;
        Ok(Self {
            handler,
            timing: TimingPolicy::from(&config),
            config,
            sink,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// The sink lines are written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Awaits the handler, logs the invocation and pads to the timing floor.
    pub async fn invoke<Ev, C, R, E, Fut>(&self, event: Ev, context: C) -> Result<R, InvokeError<E>>
    where
        H: Fn(Ev, C) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        Ev: Serialize,
        R: Serialize,
    {
        let started = Instant::now();
        let event_json = capture_value(&event);

        let response = (self.handler)(event, context)
            .await
            .map_err(InvokeError::Handler)?;
        let handler_elapsed = started.elapsed();

        emit_record(&self.config, &self.sink, event_json, &response, handler_elapsed)?;

        let padding = self.timing.padding_after(started, Instant::now());
        if !padding.is_zero() {
            tracing::debug!(
                padding_ms = saturating_millis(padding),
                floor_ms = saturating_millis(self.timing.floor()),
                "Padding invocation to timing floor"
            );
            tokio::time::sleep(padding).await;
        }

        Ok(response)
    }

    /// Entry point for `lambda_runtime`: splits the event and invokes.
    ///
    /// Handler errors are converted into [`lambda_runtime::Error`] as-is;
    /// logger errors are boxed.
    pub async fn handle<Ev, R, E, Fut>(
        &self,
        event: LambdaEvent<Ev>,
    ) -> Result<R, lambda_runtime::Error>
    where
        H: Fn(Ev, Context) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        Ev: Serialize,
        R: Serialize,
        E: Into<lambda_runtime::Error>,
    {
        let (payload, context) = event.into_parts();
        let request_id = context.request_id.clone();

        self.invoke(payload, context).await.map_err(|e| match e {
            InvokeError::Handler(error) => error.into(),
            InvokeError::Logger(error) => {
                tracing::warn!(request_id = %request_id, error = %error, "FireTail logging failed");
                Box::new(error) as lambda_runtime::Error
            }
        })
    }
}

/// Serves a wrapped handler with `lambda_runtime` until the runtime shuts down.
pub async fn run<H, S, Ev, R, E, Fut>(
    logger: LambdaFiretailLogger<H, S>,
) -> Result<(), lambda_runtime::Error>
where
    H: Fn(Ev, Context) -> Fut + Send + Sync + 'static,
    S: LogSink + 'static,
    Fut: Future<Output = Result<R, E>> + Send,
    Ev: Serialize + DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
    E: Into<lambda_runtime::Error>,
{
    let logger = Arc::new(logger);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Ev>| {
        let logger = Arc::clone(&logger);
        async move { logger.handle(event).await }
    }))
    .await
}
