//! `bugdesk` -- terminal client for the bug-tracker backend.
//!
//! # Environment variables
//!
//! | Variable               | Default                               | Description                     |
//! |------------------------|---------------------------------------|---------------------------------|
//! | `API_BASE_URL`         | `http://localhost:8000`               | Backend base URL                |
//! | `BUGDESK_SESSION_FILE` | `<config dir>/bugdesk/session.json`   | Where the login session is kept |
//! | `TESSERACT_CMD`        | `tesseract`                           | OCR binary for `bugs ocr`       |
//! | `RUST_LOG`             | `bugdesk=info`                        | Log filter (logs go to stderr)  |

use bugdesk_cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bugdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
