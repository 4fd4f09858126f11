//! Solar quote entry point: CLI wiring, config loading and report output.

mod cli;

use std::path::Path;
use std::process;

use solar_quote::config::QuoteConfig;
use solar_quote::io::export::export_projection_csv;
use solar_quote::quote::{QuoteInput, QuoteReport};
use tracing::Level;

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install log subscriber: {e}");
    }
}

fn load_config(path: Option<&Path>) -> QuoteConfig {
    let config = match path {
        Some(path) => QuoteConfig::from_toml_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => QuoteConfig::standard(),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

fn main() {
    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(2);
    });
    if cli.help {
        cli::print_usage();
        return;
    }

    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_quote::api::AppState { config });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port()));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(solar_quote::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
        return;
    }

    let Some(quote_path) = cli.quote.as_deref() else {
        cli::print_usage();
        process::exit(2);
    };
    let input = QuoteInput::from_toml_file(quote_path).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let report = QuoteReport::build(&input, &config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    println!("{report}");

    if let Some(ref path) = cli.projection_out {
        if let Err(e) = export_projection_csv(&report.projection, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Projection written to {}", path.display());
    }
}
