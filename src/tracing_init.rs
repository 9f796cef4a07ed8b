use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log to stderr. Filter from QUERY_TREE_LOG (e.g. "debug",
/// "query_tree::editor=trace"), default info.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("QUERY_TREE_LOG")
        .from_env_lossy();

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry().with(filter).with(layer).init()
}
