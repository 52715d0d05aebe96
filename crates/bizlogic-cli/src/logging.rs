//! stderr への開発用トレース。
//!
//! stdout には JSON の結果だけを出す。診断は `RUST_LOG` で制御し、stderr に流す。

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Output is compact, on stderr.
///
/// ```bash
/// RUST_LOG=bizlogic_core=debug bizlogic-cli condition sdkAtLeast 30
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
