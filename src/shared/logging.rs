use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::config::Environment;

/// Installs the global subscriber. `RUST_LOG` wins over the per-environment
/// default. Production logs are JSON lines.
pub fn init(environment: Environment) {
  let default_directive = match environment {
    Environment::Development => "debug,actix_server=info",
    Environment::Production => "info",
  };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive));
  let json = environment == Environment::Production;

  tracing_subscriber::registry()
    .with(filter)
    .with(json.then(|| fmt::layer().json()))
    .with((!json).then(fmt::layer))
    .init();
}
