//! Hello Time Example
//!
//! An HTTP-shaped endpoint that reports the current time, wrapped so that
//! every successful invocation is logged for the FireTail extension.
//!
//! Set `FIRETAIL_TOKEN` to tag lines with a tenant token and
//! `FIRETAIL_LOG_FLOOR_MS` to change the 500ms timing floor.

use firetail_lambda_logger::{lambda, LambdaFiretailLogger, LoggerConfig};
use lambda_runtime::{Context, Error};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct Greeting {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpResponse {
    status_code: u16,
    body: String,
}

/// Returns a greeting with the current time of day.
async fn endpoint(_event: Value, _ctx: Context) -> Result<HttpResponse, Error> {
    let greeting = Greeting {
        message: format!(
            "Hello, the current time is {}",
            chrono::Local::now().time()
        ),
    };

    Ok(HttpResponse {
        status_code: 200,
        body: serde_json::to_string(&greeting)?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize the default subscriber
    lambda_runtime::tracing::init_default_subscriber();

    let logger = LambdaFiretailLogger::new(endpoint, LoggerConfig::from_env()?)?;
    lambda::run(logger).await
}
