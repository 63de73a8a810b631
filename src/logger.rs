use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so stdout stays free for results.
///
/// `--verbose` and `--quiet` win over `RUST_LOG`, which wins over `default_filter`.
/// The returned guard must be held until exit to flush buffered records.
pub fn init_logger(verbose: bool, quiet: bool, default_filter: &str) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_target(false)
        .with_env_filter(build_filter(
            verbose,
            quiet,
            env_directives.as_deref(),
            default_filter,
        ))
        .init();

    guard
}

fn build_filter(
    verbose: bool,
    quiet: bool,
    env_directives: Option<&str>,
    default_filter: &str,
) -> EnvFilter {
    if verbose {
        return EnvFilter::new("moodle_plugin_ci=debug");
    }
    if quiet {
        return EnvFilter::new("moodle_plugin_ci=error");
    }

    env_directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}
