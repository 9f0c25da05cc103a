use crate::config::toml_config::TomlConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "billing-gateway")]
#[command(about = "Send billing requests to the payment provider")]
pub struct CliConfig {
    #[arg(long, short, default_value = "billing-gateway.toml")]
    pub config: PathBuf,

    /// Overrides `gateway.endpoint` from the config file.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, help = "Use the provider's test endpoint")]
    pub test_mode: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print the validated payload without calling the provider")]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show one subscription.
    FetchSubscription {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        reference: Option<String>,
    },
    /// List invoice numbers, or fetch one invoice with --invoice-id.
    Invoices {
        #[arg(long)]
        subscription_id: Option<String>,
        #[arg(long)]
        subscription_reference: Option<String>,
        /// Open, Due, Paid, Overdue or WrittenOff.
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        invoice_id: Option<String>,
    },
    CancelSubscription {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        disentitle: bool,
    },
    /// Finish a PayPal purchase after the customer returns from PayPal.
    CompletePaypal {
        /// Provider reference from the return URL.
        #[arg(long)]
        reference: String,
        /// The customer came back through the cancel URL.
        #[arg(long)]
        cancelled: bool,
    },
    /// Refund a transaction in full, or partially with --amount.
    Refund {
        #[arg(long)]
        transaction_id: Option<String>,
        #[arg(long)]
        transaction_reference: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
}

impl CliConfig {
    /// Applies command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut TomlConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.set_endpoint(endpoint.clone());
        }
        if self.test_mode {
            config.set_test_mode(true);
        }
    }

    pub fn verbose_logging(&self, config: &TomlConfig) -> bool {
        self.verbose || config.debug_logging()
    }

    pub fn json_logging(&self, config: &TomlConfig) -> bool {
        self.json_logs || config.json_logging()
    }
}
