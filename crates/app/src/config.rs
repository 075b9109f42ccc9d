//! Application configuration
//!
//! Settings are clap `Args` groups bound to environment variables so outer
//! binaries can flatten them into their own CLI. A `.env` file is honoured
//! when present.

use clap::Args;
use tally::billing::ShippingPolicy;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

/// Shipping fee settings.
///
/// Store-configurable business parameters; the defaults match the store's
/// current tier rule.
#[derive(Debug, Args)]
pub struct ShippingConfig {
    /// Orders above this amount (after discount) ship free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value = "999")]
    pub free_shipping_threshold: u64,

    /// Flat fee charged below the free-shipping threshold
    #[arg(long, env = "FLAT_SHIPPING_FEE", default_value = "49")]
    pub flat_shipping_fee: u64,
}

impl ShippingConfig {
    /// Build the engine's shipping policy from these settings.
    #[must_use]
    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(self.free_shipping_threshold, self.flat_shipping_fee)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        shipping: ShippingConfig,
    }

    #[test]
    fn shipping_defaults_match_the_store_tier_rule() {
        let cli = TestCli::try_parse_from(["test"]).expect("defaults should parse");

        assert_eq!(cli.shipping.policy(), ShippingPolicy::new(999, 49));
    }

    #[test]
    fn shipping_settings_are_overridable() {
        let cli = TestCli::try_parse_from([
            "test",
            "--free-shipping-threshold",
            "1500",
            "--flat-shipping-fee",
            "99",
        ])
        .expect("overrides should parse");

        assert_eq!(cli.shipping.policy(), ShippingPolicy::new(1500, 99));
    }
}
