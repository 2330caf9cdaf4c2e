use crate::infra::seed_catalog;
use chrono::Local;
use clap::Args;
use forno::catalog::{AddonId, ProductId};
use forno::config::OrderingConfig;
use forno::error::AppError;
use forno::ordering::{
    CartLine, DeliveryMethod, HalfChoice, InMemoryOrderRepository, Order, OrderRequest,
    OrderService, SelectionSet, VariantChoice,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Delivery surcharge in minor currency units (defaults to the configured fee).
    #[arg(long)]
    pub(crate) delivery_fee: Option<u64>,
    /// Enforce the forward-only status flow during the lifecycle walk.
    #[arg(long)]
    pub(crate) strict: bool,
    /// Print the stored order as JSON after the lifecycle walk.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        delivery_fee,
        strict,
        json,
    } = args;

    let config = OrderingConfig {
        delivery_fee: delivery_fee.unwrap_or(OrderingConfig::DEFAULT_DELIVERY_FEE),
        strict_status_flow: strict,
    };

    println!("Forno ordering demo ({})", Local::now().date_naive());

    let catalog = Arc::new(seed_catalog()?);
    let (products, addons) = catalog.len();
    println!("Seeded menu: {products} products, {addons} add-ons");

    let repository = Arc::new(InMemoryOrderRepository::default());
    let service = Arc::new(OrderService::new(repository, catalog, config));

    let delivery = service.place_order(delivery_order())?;
    println!("\nDelivery order {}", delivery.id);
    render_order(&delivery);

    let pickup = service.place_order(pickup_order())?;
    println!("\nPickup order {}", pickup.id);
    render_order(&pickup);

    println!("\nLifecycle walk for {}", delivery.id);
    for status in ["confirmed", "preparing", "ready", "delivered"] {
        let updated = service.transition(&delivery.id, status)?;
        println!("- {} at {}", updated.status, updated.updated_at);
    }

    let cancelled = service.transition(&pickup.id, "cancelled")?;
    println!("\nCancelled pickup order {}: {}", cancelled.id, cancelled.status);

    if json {
        let stored = service.get(&delivery.id)?;
        match serde_json::to_string_pretty(&stored) {
            Ok(payload) => println!("\nStored order payload:\n{payload}"),
            Err(err) => println!("\nStored order payload unavailable: {err}"),
        }
    }

    Ok(())
}

fn delivery_order() -> OrderRequest {
    OrderRequest {
        customer_name: "Layla Hassan".to_string(),
        phone: "+20 100 555 0147".to_string(),
        delivery_method: DeliveryMethod::Delivery,
        address: Some("14 Corniche El Nil, Cairo".to_string()),
        selected_branch: None,
        cart_lines: vec![
            CartLine::Regular {
                product_id: ProductId("pepperoni".to_string()),
                quantity: 2,
                selection: SelectionSet {
                    variants: vec![
                        VariantChoice::Legacy("large".to_string()),
                        VariantChoice::Selection {
                            axis: "crust".to_string(),
                            option_id: "stuffed".to_string(),
                        },
                    ],
                    addons: vec![AddonId("extra-cheese".to_string())],
                    notes: None,
                },
                notes: Some("extra crispy".to_string()),
            },
            CartLine::Regular {
                product_id: ProductId("cola".to_string()),
                quantity: 2,
                selection: SelectionSet::default(),
                notes: None,
            },
        ],
        notes: Some("call on arrival".to_string()),
    }
}

fn pickup_order() -> OrderRequest {
    OrderRequest {
        customer_name: "Omar Farouk".to_string(),
        phone: "+20 122 555 0199".to_string(),
        delivery_method: DeliveryMethod::Pickup,
        address: None,
        selected_branch: Some("downtown".to_string()),
        cart_lines: vec![CartLine::HalfHalf {
            left: Some(HalfChoice {
                product_id: ProductId("margherita".to_string()),
                selection: SelectionSet {
                    addons: vec![AddonId("mushroom".to_string())],
                    ..SelectionSet::default()
                },
            }),
            right: Some(HalfChoice {
                product_id: ProductId("vegetariana".to_string()),
                selection: SelectionSet::default(),
            }),
            shared: SelectionSet {
                variants: vec![VariantChoice::Selection {
                    axis: "crust".to_string(),
                    option_id: "stuffed".to_string(),
                }],
                addons: Vec::new(),
                notes: None,
            },
            quantity: 1,
            notes: None,
        }],
        notes: None,
    }
}

fn render_order(order: &Order) {
    for item in &order.items {
        println!(
            "- {} x{} @ {} = {}",
            item.name,
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.line_total())
        );
    }
    println!(
        "Subtotal {} | delivery fee {} | total {}",
        format_amount(order.subtotal),
        format_amount(order.delivery_fee),
        format_amount(order.total_amount)
    );
}

fn format_amount(minor_units: u64) -> String {
    format!("{}.{:02}", minor_units / 100, minor_units % 100)
}
