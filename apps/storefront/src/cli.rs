//! # Command Line
//!
//! `folio` - browse the bookstore, manage the cart and place orders.
//!
//! ## Usage
//!
//! ```bash
//! # Featured books
//! folio home
//!
//! # Search the catalog (empty values are never sent)
//! folio shop --search dune
//! folio shop --query "featured=true&limit=3"
//!
//! # One book
//! folio book 42
//!
//! # Cart
//! folio cart add 42
//! folio cart set 42 3
//! folio cart
//!
//! # Checkout
//! folio checkout --name "Ada Lovelace" --email ada@example.com --address "12 Analytical Way"
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_client::{ClientConfig, QueryParams};
use folio_core::CustomerDetails;
use serde::Serialize;

use crate::commands::{cart, catalog, checkout};
use crate::{render, Storefront};

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Folio bookstore storefront")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Featured books
    Home,
    /// Browse and search the catalog
    Shop {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Only featured books
        #[arg(long)]
        featured: bool,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<u32>,

        /// Raw filter query string, passed through (e.g. "genre=scifi")
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one book
    Book {
        /// Book id
        id: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Shipping address
        #[arg(long)]
        address: String,
    },
    /// Show the confirmation for an order
    Order {
        /// Order id
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// List cart lines and totals
    Show,
    /// Add one copy of a book
    Add { id: String },
    /// One more copy
    Inc { id: String },
    /// One fewer copy (never below 1)
    Dec { id: String },
    /// Set the quantity of a line
    Set {
        id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
}

/// Shop filter state from the command line flags.
///
/// Flags win over keys of the same name in `--query`; unset flags are left
/// out entirely.
pub fn shop_params(
    search: Option<String>,
    featured: bool,
    limit: Option<u32>,
    query: Option<&str>,
) -> QueryParams {
    let mut params = QueryParams::from_query_string(query.unwrap_or_default());
    if let Some(search) = search {
        params.set("search", search);
    }
    if featured {
        params.set("featured", true);
    }
    if let Some(limit) = limit {
        params.set("limit", limit);
    }
    params
}

/// Runs one command against a freshly initialized storefront.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    let store = Storefront::init(config).await?;
    let output = execute(&store, cli.command, cli.json).await?;
    print!("{output}");
    Ok(())
}

/// Executes a command and returns what should be printed.
pub async fn execute(store: &Storefront, command: Commands, json: bool) -> anyhow::Result<String> {
    let Storefront {
        config,
        catalog: books,
        cart: cart_state,
        checkout: orders,
    } = store;

    let output = match command {
        Commands::Home => {
            let view = catalog::home(books, config).await?;
            emit(json, &view, render::home)?
        }
        Commands::Shop {
            search,
            featured,
            limit,
            query,
        } => {
            let params = shop_params(search, featured, limit, query.as_deref());
            let view = catalog::shop(books, config, &params.to_query_string()).await?;
            emit(json, &view, render::shop)?
        }
        Commands::Book { id } => {
            let view = catalog::book_details(books, cart_state, config, &id).await?;
            emit(json, &view, render::book_details)?
        }
        Commands::Cart { action } => {
            let response = match action.unwrap_or(CartAction::Show) {
                CartAction::Show => cart::get_cart(cart_state),
                CartAction::Add { id } => cart::add_to_cart(books, cart_state, &id).await?,
                CartAction::Inc { id } => cart::increment_item(cart_state, &id).await?,
                CartAction::Dec { id } => cart::decrement_item(cart_state, &id).await?,
                CartAction::Set { id, quantity } => {
                    cart::set_item_quantity(cart_state, &id, quantity).await?
                }
                CartAction::Remove { id } => cart::remove_from_cart(cart_state, &id).await?,
                CartAction::Clear => cart::clear_cart(cart_state).await,
            };
            emit(json, &response, |r| render::cart(r, config))?
        }
        Commands::Checkout {
            name,
            email,
            address,
        } => {
            let customer = CustomerDetails::new(name, email, address);
            let view = orders.place_order(books, cart_state, config, customer).await?;
            emit(json, &view, render::confirmation)?
        }
        Commands::Order { id } => {
            let view = checkout::order_confirmation(&id)?;
            emit(json, &view, render::confirmation)?
        }
    };

    Ok(output)
}

fn emit<T, F>(json: bool, view: &T, text: F) -> anyhow::Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        let mut out = serde_json::to_string_pretty(view)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(text(view))
    }
}
