//! # Folio Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        folio (binary)                                   │
//! │                                                                         │
//! │  main.rs ────► logging, argument parsing                                │
//! │  lib.rs  ────► Storefront::init (config, catalog, cart, checkout)       │
//! │  cli.rs  ────► dispatch to commands/, render to stdout                  │
//! │                                                                         │
//! │                 ┌────────────────┐      ┌──────────────────────┐        │
//! │                 │ Bookstore API  │      │ SQLite (folio.db)    │        │
//! │                 │ :8000/api/...  │      │ cart key/value entry │        │
//! │                 └────────────────┘      └──────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use folio_storefront::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio_storefront::init_tracing();

    let cli = Cli::parse();
    cli::run(cli).await
}
