/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/
use std::sync::Once;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

static INIT_LOGGER: Once = Once::new();

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Installs the line-oriented, timestamped subscriber used for operator output.
///
/// `RUST_LOG` overrides the default `info` level. Calling it more than once is a
/// no-op, so tests can call it freely.
pub fn setup_logger() {
    INIT_LOGGER.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_target(false)
            .try_init();
    });
}
