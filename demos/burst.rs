//! Fires a burst of simultaneous `GET`s at a URL and reports which were admitted.
//!
//! ```text
//! cargo run --example burst -- http://localhost:8080/test 3 10
//! ```

use std::{env, time::Duration};

use futures::future::join_all;
use restricted_http::{Config, Error, RestrictedClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8080/test".to_string());
    let ceiling: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3);
    let requests: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);

    let client = RestrictedClient::new(Config::new(ceiling, Duration::from_secs(5)))?;

    let responses = join_all((0..requests).map(|_| client.get(url.as_str()))).await;
    for (index, response) in responses.into_iter().enumerate() {
        match response {
            Ok(response) => tracing::info!(index, status = %response.status()),
            Err(Error::MaxConcurrencyReached) => tracing::info!(index, "rejected"),
            Err(error) => tracing::warn!(index, %error),
        }
    }
    Ok(())
}
