use tracing_subscriber::{EnvFilter, fmt};

use crate::args::LogArgs;

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logger(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.filter.as_str()));

    let builder = fmt().with_env_filter(filter).with_target(false);
    let result = if args.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("logger already initialized: {e}");
    }
}
