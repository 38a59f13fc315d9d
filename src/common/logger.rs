use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset. Per-line problems are logged at
/// `debug`, so the quiet default never repeats what the menu already printed.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "toll_booth=debug,info" } else { "toll_booth=warn" }
}

/// Logs go to stderr; stdout belongs to the interactive menu.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
