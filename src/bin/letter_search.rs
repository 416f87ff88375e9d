//! letter-search CLI - index and search letter folders
//!
//! # Examples
//!
//! ```bash
//! # Index new and changed documents
//! letter-search index /srv/letters
//!
//! # Start over from an empty index
//! letter-search rebuild /srv/letters
//!
//! # Search
//! letter-search search "penalty AND \"site survey\""
//!
//! # Show index status
//! letter-search status
//! ```

use clap::Parser;
use letter_search::cli::output::print_error;
use letter_search::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing on stderr so stdout stays clean for results
fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "letter_search=info".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
