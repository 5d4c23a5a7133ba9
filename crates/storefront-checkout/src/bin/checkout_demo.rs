//! # Checkout Demo
//!
//! Runs the four checkout scenarios against the in-memory collaborators and
//! prints each outcome as JSON.
//!
//! ## Usage
//! ```bash
//! # Default pricing schedule
//! cargo run -p storefront-checkout --bin checkout-demo
//!
//! # Custom pricing / log filter
//! cargo run -p storefront-checkout --bin checkout-demo -- --config ./checkout.toml
//! ```
//!
//! ## Scenarios
//! - success: stock available, payment authorized, stock deducted
//! - out of stock: one product has no stock, payment never called
//! - declined: credit limit below the cart total
//! - deduction failure: warehouse refuses the deduction, payment cancelled

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use storefront_checkout::memory::{InMemoryDirectory, InMemoryPaymentGateway, InMemoryWarehouse};
use storefront_checkout::{init_tracing, CheckoutConfig, CheckoutOrchestrator};
use storefront_core::money::{Money, Weight};
use storefront_core::pricing::PricingCalculator;
use storefront_core::types::{
    Cart, CartId, CartLine, CheckoutOutcome, Customer, CustomerId, LoyaltyTier, Product,
    ProductCategory, ProductId,
};
use tracing::info;

const CUSTOMER: CustomerId = CustomerId(1);
const CART: CartId = CartId(100);

/// How the in-memory store is rigged for a scenario.
#[derive(Debug, Clone, Copy)]
enum Scenario {
    Success,
    OutOfStock,
    Declined,
    DeductionFailure,
}

impl Scenario {
    const ALL: [Scenario; 4] = [
        Scenario::Success,
        Scenario::OutOfStock,
        Scenario::Declined,
        Scenario::DeductionFailure,
    ];

    fn name(&self) -> &'static str {
        match self {
            Scenario::Success => "success",
            Scenario::OutOfStock => "out_of_stock",
            Scenario::Declined => "declined",
            Scenario::DeductionFailure => "deduction_failure",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Checkout Demo");
                println!();
                println!("Usage: checkout-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CheckoutConfig::load(config_path)?;
    init_tracing(&config.logging);

    info!("Starting checkout demo");
    let calculator = config.calculator()?;

    for scenario in Scenario::ALL {
        let orchestrator = seed(scenario, calculator.clone()).await?;

        let (code, outcome) = match orchestrator.finalize_checkout(CART, CUSTOMER).await {
            Ok(outcome) => (None, outcome),
            Err(err) => {
                let outcome = CheckoutOutcome::failed(err.user_message());
                (Some(err.code()), outcome)
            }
        };

        let report = json!({
            "scenario": scenario.name(),
            "errorCode": code,
            "httpStatus": code.map_or(200, |c| c.http_status()),
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Builds a fresh store for one scenario.
///
/// The cart is the same every time: Silver customer, 2 × monitor (300, 4 kg)
/// and 1 × keyboard (150, 2 kg). Total 685.
async fn seed(
    scenario: Scenario,
    calculator: PricingCalculator,
) -> Result<CheckoutOrchestrator, Box<dyn std::error::Error>> {
    let directory = Arc::new(InMemoryDirectory::new());
    let warehouse = Arc::new(InMemoryWarehouse::new());
    let gateway = Arc::new(InMemoryPaymentGateway::new());

    let customer = Customer::new(CUSTOMER, "Ana Souza", "Rua das Flores, 10", LoyaltyTier::Silver);
    let monitor = Product::new(
        ProductId(1),
        "Monitor 24\"",
        Money::from_major(300),
        Weight::from_kg(4),
        ProductCategory::Electronics,
    )?
    .with_description("Full HD, IPS panel");
    let keyboard = Product::new(
        ProductId(2),
        "Mechanical keyboard",
        Money::from_major(150),
        Weight::from_kg(2),
        ProductCategory::Electronics,
    )?;

    directory.insert_customer(customer.clone()).await;
    directory
        .insert_cart(Cart::new(
            CART,
            Arc::new(customer),
            vec![CartLine::new(monitor, 2)?, CartLine::new(keyboard, 1)?],
        ))
        .await;

    warehouse.set_stock(ProductId(1), 20).await;
    warehouse.set_stock(ProductId(2), 20).await;
    gateway.set_credit_limit(CUSTOMER, Money::from_major(2000)).await;

    match scenario {
        Scenario::Success => {}
        Scenario::OutOfStock => warehouse.set_stock(ProductId(2), 0).await,
        Scenario::Declined => gateway.set_credit_limit(CUSTOMER, Money::from_major(100)).await,
        Scenario::DeductionFailure => warehouse.refuse_deductions(true),
    }

    Ok(CheckoutOrchestrator::new(
        directory.clone(),
        directory,
        warehouse,
        gateway,
        calculator,
    ))
}
