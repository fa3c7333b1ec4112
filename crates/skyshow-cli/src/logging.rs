//! Tracing setup shared by the CLI binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr, filtered by `RUST_LOG` with `skyshow` at `info` by default.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("skyshow=info".parse()?)
                .add_directive("skyshow_core=info".parse()?),
        )
        .try_init()?;
    Ok(())
}
