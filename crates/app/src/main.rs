//! Tally storefront CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use uuid::Uuid;

use tally_app::{
    checkout::{Checkout, CheckoutError},
    config::{DatabaseConfig, ShippingConfig},
    context::{AppContext, AppInitError},
    domain::identity::{CustomerUuid, Identity},
};

#[derive(Debug, Parser)]
#[command(name = "tally-app", about = "Tally storefront CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(CartCommand),
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show a customer's cart and its billing snapshot
    Show(ShowCartArgs),
}

#[derive(Debug, Args)]
struct ShowCartArgs {
    /// Customer UUID whose cart to show
    #[arg(long)]
    customer_uuid: Uuid,

    /// Promo code to apply before computing the snapshot
    #[arg(long)]
    promo: Option<String>,

    /// Print the snapshot as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    shipping: ShippingConfig,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("failed to encode snapshot")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Cart(cart) => match cart.command {
            CartSubcommand::Show(args) => show_cart(args).await,
        },
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        process::exit(1);
    }
}

async fn show_cart(args: ShowCartArgs) -> Result<(), CliError> {
    let context = AppContext::from_database_url(&args.database.database_url).await?;

    let identity = Identity::Customer(CustomerUuid::from_uuid(args.customer_uuid));
    let mut checkout = context.checkout(identity, args.shipping.policy());

    let now = Timestamp::now();

    checkout.load(now).await?;

    if let Some(code) = &args.promo {
        match checkout.apply_code(code, now).await {
            Ok(discount) => println!("promo {code}: -{discount}"),
            Err(error) => println!("promo {code} not applied: {error}"),
        }
    }

    print_cart(&checkout, args.json)?;

    Ok(())
}

fn print_cart(checkout: &Checkout, json: bool) -> Result<(), CliError> {
    let snapshot = checkout.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for line in checkout.store().lines() {
        println!(
            "{:>3} x {:<10} product {:<8} @ {}",
            line.quantity, line.weight_key, line.product_id, line.unit_price
        );
    }

    println!("subtotal:  {:>8}", snapshot.subtotal);
    println!("discount:  {:>8}", snapshot.discount);
    println!("shipping:  {:>8}", snapshot.shipping_fee);
    println!("total:     {:>8}", snapshot.total);

    Ok(())
}
