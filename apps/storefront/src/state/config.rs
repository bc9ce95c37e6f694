//! # Configuration State
//!
//! Stores storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FOLIO_*`)
//! 2. Config file (`folio.toml`)
//! 3. Defaults
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use folio_client::ClientConfig;
use folio_core::{Money, TaxRate};
use serde::Serialize;

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Backend, storage and view settings
    pub client: ClientConfig,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Sales tax applied at checkout (basis points on the wire)
    pub tax_rate: TaxRate,
}

impl Default for ConfigState {
    /// USD, 7% sales tax, default backend at `http://localhost:8000`.
    fn default() -> Self {
        ConfigState::new(ClientConfig::default())
    }
}

impl ConfigState {
    pub fn new(client: ClientConfig) -> Self {
        ConfigState {
            client,
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            tax_rate: TaxRate::storefront(),
        }
    }

    /// Number of featured books on the home view.
    pub fn home_featured_limit(&self) -> u32 {
        self.client.storefront.home_featured_limit
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use folio_storefront::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }

    pub fn format_money(&self, money: Money) -> String {
        self.format_currency(money.cents())
    }
}
