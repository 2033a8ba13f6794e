use checkout_gateway::application::port::CheckoutPaymentPort;
use checkout_gateway::domain::payment::{
    KlarnaInfo, PaymentData, PaymentInfo, PaymentMethodInfo, UserData,
};
use checkout_gateway::domain::ports::{ClientFactoryBox, RequestFactory, RequestFactoryBox};
use checkout_gateway::infrastructure::client_factory::CheckoutClientFactory;
use checkout_gateway::infrastructure::config::CheckoutConfigProperties;
use checkout_gateway::infrastructure::request_factory::DefaultRequestFactory;
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Authorise payments through the hosted checkout API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a redirect payment (`/payments`)
    Authorise {
        #[command(flatten)]
        payment: PaymentArgs,

        /// Where the shopper returns after the redirect
        #[arg(long)]
        return_url: String,

        #[arg(long)]
        shopper_email: Option<String>,
    },
    /// Complete a redirect payment (`/payments/details`)
    Complete {
        #[command(flatten)]
        payment: PaymentArgs,

        /// Continuation token returned by the authorise step
        #[arg(long)]
        payment_data: String,

        /// Shopper supplied detail, as key=value (repeatable)
        #[arg(long = "detail", value_parser = parse_key_val)]
        details: Vec<(String, String)>,
    },
}

#[derive(Args)]
struct PaymentArgs {
    /// ISO country code used to pick the API key
    #[arg(long)]
    country: String,

    #[arg(long)]
    merchant_account: String,

    #[arg(long)]
    amount: Decimal,

    #[arg(long)]
    currency: String,

    /// Payment transaction external key, sent as the merchant reference
    #[arg(long)]
    reference: String,

    /// Gateway payment method type
    #[arg(long, default_value = "klarna")]
    method: String,

    /// Print the request that would be sent and exit
    #[arg(long)]
    dry_run: bool,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}

fn payment_method(method: &str) -> PaymentMethodInfo {
    match method {
        "klarna" => PaymentMethodInfo::Klarna(KlarnaInfo::default()),
        other => PaymentMethodInfo::Redirect {
            payment_method_type: other.to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (is_complete, args, info, user_data) = match cli.command {
        Command::Authorise {
            payment,
            return_url,
            shopper_email,
        } => {
            let info = PaymentInfo::new(&payment.country, payment_method(&payment.method))
                .with_return_url(return_url);
            let user_data = UserData {
                shopper_email,
                ..UserData::default()
            };
            (false, payment, info, user_data)
        }
        Command::Complete {
            payment,
            payment_data,
            details,
        } => {
            let info = PaymentInfo::new(&payment.country, payment_method(&payment.method))
                .with_continuation(payment_data, details.into_iter().collect::<BTreeMap<_, _>>());
            (true, payment, info, UserData::default())
        }
    };

    let payment_data =
        PaymentData::new(args.amount, &args.currency, &args.reference, info).into_diagnostic()?;
    let request_factory = DefaultRequestFactory::new();

    if args.dry_run {
        let body = if is_complete {
            let request = request_factory
                .complete_payment(&args.merchant_account, &payment_data, &user_data)
                .into_diagnostic()?;
            serde_json::to_string_pretty(&request)
        } else {
            let request = request_factory
                .create_payment(&args.merchant_account, &payment_data, &user_data)
                .into_diagnostic()?;
            serde_json::to_string_pretty(&request)
        };
        println!("{}", body.into_diagnostic()?);
        return Ok(());
    }

    let config = CheckoutConfigProperties::from_env().into_diagnostic()?;
    let request_factory: RequestFactoryBox = Box::new(request_factory);
    let client_factory: ClientFactoryBox = Box::new(CheckoutClientFactory::new(Arc::new(config)));
    let port = CheckoutPaymentPort::new(request_factory, client_factory);

    let result = port
        .authorise_redirect_payment(is_complete, &args.merchant_account, &payment_data, &user_data)
        .await;

    println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    Ok(())
}
