use anyhow::Context;
use billing_gateway::config::{CliConfig, Command, TomlConfig};
use billing_gateway::utils::{logger, validation::Validate};
use billing_gateway::{
    CancelSubscriptionRequest, CompletePayPalPurchaseRequest, FetchSubscriptionInvoiceRequest,
    FetchSubscriptionRequest, Gateway, GatewayError, HttpTransport, InvoiceState, Operation,
    RefundRequest, Response,
};
use clap::Parser;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply(&mut config);

    if cli.json_logging(&config) {
        logger::init_json_logger(cli.verbose_logging(&config));
    } else {
        logger::init_cli_logger(cli.verbose_logging(&config));
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    tracing::debug!("Configuration loaded from {}", cli.config.display());

    let gateway = Gateway::from_config(&config).context("failed to build HTTP transport")?;

    let outcome = match cli.command.clone() {
        Command::FetchSubscription { id, reference } => {
            let mut request = FetchSubscriptionRequest::new();
            if let Some(id) = id {
                request.set_subscription_id(id);
            }
            if let Some(reference) = reference {
                request.set_subscription_reference(reference);
            }
            execute(&gateway, request, cli.dry_run, |response| {
                json!({
                    "subscriptionId": response.subscription_id(),
                    "subscriptionReference": response.subscription_reference(),
                    "status": response.subscription_status(),
                    "billingState": response.billing_state(),
                    "products": response.product_ids(),
                })
            })
            .await
        }
        Command::Invoices {
            subscription_id,
            subscription_reference,
            state,
            invoice_id,
        } => {
            let mut request = FetchSubscriptionInvoiceRequest::new();
            if let Some(id) = subscription_id {
                request.set_subscription_id(id);
            }
            if let Some(reference) = subscription_reference {
                request.set_subscription_reference(reference);
            }
            if let Some(state) = state {
                match state.parse::<InvoiceState>() {
                    Ok(state) => request.set_invoice_state(state),
                    Err(e) => exit_with(&e),
                };
            }
            if let Some(invoice_id) = invoice_id {
                request.set_invoice_id(invoice_id);
            }
            execute(&gateway, request, cli.dry_run, |response| {
                json!({
                    "invoiceNumbers": response.invoice_numbers(),
                    "invoice": response.invoice(),
                })
            })
            .await
        }
        Command::CancelSubscription {
            id,
            reference,
            reason,
            disentitle,
        } => {
            let mut request = CancelSubscriptionRequest::new();
            if let Some(id) = id {
                request.set_subscription_id(id);
            }
            if let Some(reference) = reference {
                request.set_subscription_reference(reference);
            }
            if let Some(reason) = reason {
                request.set_cancel_reason(reason);
            }
            request.set_disentitle(disentitle);
            execute(&gateway, request, cli.dry_run, |response| {
                json!({
                    "subscriptionId": response.subscription_id(),
                    "status": response.subscription_status(),
                })
            })
            .await
        }
        Command::CompletePaypal {
            reference,
            cancelled,
        } => {
            let mut request = CompletePayPalPurchaseRequest::new();
            request
                .set_pay_pal_transaction_reference(reference)
                .set_success(!cancelled);
            execute(&gateway, request, cli.dry_run, |response| {
                json!({
                    "transactionId": response.transaction_id(),
                    "transactionReference": response.transaction_reference(),
                })
            })
            .await
        }
        Command::Refund {
            transaction_id,
            transaction_reference,
            amount,
            currency,
            note,
        } => {
            let mut request = RefundRequest::new();
            if let Some(id) = transaction_id {
                request.set_transaction_id(id);
            }
            if let Some(reference) = transaction_reference {
                request.set_transaction_reference(reference);
            }
            if let Some(amount) = amount {
                request.set_amount(amount);
            }
            if let Some(currency) = currency {
                request.set_currency(currency);
            }
            if let Some(note) = note {
                request.set_note(note);
            }
            execute(&gateway, request, cli.dry_run, |response| {
                json!({ "refunds": response.refund_references() })
            })
            .await
        }
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(2),
        Err(e) => exit_with(&e),
    }
}

/// Prints the payload on a dry run, otherwise sends the request and prints the
/// reply summary. Returns whether the provider reported success.
async fn execute<O, F>(
    gateway: &Gateway<HttpTransport>,
    request: O,
    dry_run: bool,
    summarize: F,
) -> Result<bool, GatewayError>
where
    O: Operation,
    F: Fn(&Response<O>) -> Value,
{
    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing is sent");
        let data = request.get_data()?;
        println!("{} {}", request.object(), serde_json::to_string_pretty(&data)?);
        return Ok(true);
    }

    let response = gateway.send(request).await?;
    let mut summary = summarize(&response);
    if let Value::Object(map) = &mut summary {
        map.insert("code".to_string(), json!(response.code()));
        map.insert("message".to_string(), json!(response.message()));
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if response.is_successful() {
        println!("✅ Request completed successfully");
    } else {
        eprintln!("❌ Provider declined the request");
    }
    Ok(response.is_successful())
}

fn exit_with(e: &GatewayError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = if e.is_validation() { 2 } else { 1 };
    std::process::exit(exit_code)
}
