use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::catalog::{
    Addon, AddonId, InMemoryCatalog, PricedOption, Product, ProductId, VariantAxis,
};
use crate::config::OrderingConfig;
use crate::ordering::cart::CartLine;
use crate::ordering::repository::InMemoryOrderRepository;
use crate::ordering::selection::{HalfChoice, SelectionSet, VariantChoice};
use crate::ordering::service::{OrderRequest, OrderService};
use crate::ordering::DeliveryMethod;

pub(super) const DELIVERY_FEE: u64 = 20;

fn crust_axis() -> VariantAxis {
    VariantAxis {
        axis: "crust".to_string(),
        options: vec![
            PricedOption::default_option("classic", "Classic", 0),
            PricedOption::new("thin", "Thin", 0),
            PricedOption::new("stuffed", "Stuffed Crust", 10),
        ],
    }
}

pub(super) fn margherita() -> Product {
    Product {
        id: ProductId("margherita".to_string()),
        name: "Margherita".to_string(),
        category: "pizza".to_string(),
        subcategory: Some("classic".to_string()),
        available: true,
        sizes: vec![
            PricedOption::new("small", "Small", 30),
            PricedOption::default_option("medium", "Medium", 40),
            PricedOption::new("large", "Large", 52),
        ],
        axes: vec![crust_axis()],
    }
}

pub(super) fn pepperoni() -> Product {
    Product {
        id: ProductId("pepperoni".to_string()),
        name: "Pepperoni".to_string(),
        category: "pizza".to_string(),
        subcategory: Some("meat".to_string()),
        available: true,
        sizes: vec![
            PricedOption::new("small", "Small", 42),
            PricedOption::default_option("medium", "Medium", 55),
            PricedOption::new("large", "Large", 68),
        ],
        axes: vec![crust_axis()],
    }
}

pub(super) fn catalog() -> InMemoryCatalog {
    let mut calzone = Product::flat_priced("calzone", "Calzone", "pizza", 45);
    calzone.available = false;

    let mut anchovies = Addon::flat_priced(
        "anchovies",
        "Anchovies",
        "topping",
        12,
        ["pizza".to_string()],
    );
    anchovies.available = false;

    InMemoryCatalog::new(
        vec![
            margherita(),
            pepperoni(),
            calzone,
            Product::flat_priced("garlic-bread", "Garlic Bread", "sides", 15),
        ],
        vec![
            Addon::flat_priced("mushroom", "Mushroom", "topping", 15, ["pizza".to_string()]),
            Addon::flat_priced(
                "extra-cheese",
                "Extra Cheese",
                "topping",
                20,
                ["pizza".to_string()],
            ),
            Addon::flat_priced(
                "ranch-dip",
                "Ranch Dip",
                "sauce",
                5,
                ["pizza".to_string(), "sides".to_string()],
            ),
            Addon::flat_priced(
                "chocolate-sauce",
                "Chocolate Sauce",
                "sauce",
                8,
                ["desserts".to_string()],
            ),
            anchovies,
        ],
    )
}

pub(super) fn selection(variants: Vec<VariantChoice>, addons: Vec<&str>) -> SelectionSet {
    SelectionSet {
        variants,
        addons: addons
            .into_iter()
            .map(|id| AddonId(id.to_string()))
            .collect(),
        notes: None,
    }
}

pub(super) fn size(option_id: &str) -> VariantChoice {
    VariantChoice::Selection {
        axis: "size".to_string(),
        option_id: option_id.to_string(),
    }
}

pub(super) fn crust(option_id: &str) -> VariantChoice {
    VariantChoice::Selection {
        axis: "crust".to_string(),
        option_id: option_id.to_string(),
    }
}

pub(super) fn half(product_id: &str, selection: SelectionSet) -> HalfChoice {
    HalfChoice {
        product_id: ProductId(product_id.to_string()),
        selection,
    }
}

pub(super) fn regular_line(product_id: &str, quantity: i64, selection: SelectionSet) -> CartLine {
    CartLine::Regular {
        product_id: ProductId(product_id.to_string()),
        quantity,
        selection,
        notes: None,
    }
}

pub(super) fn ordering_config() -> OrderingConfig {
    OrderingConfig {
        delivery_fee: DELIVERY_FEE,
        strict_status_flow: false,
    }
}

pub(super) fn strict_config() -> OrderingConfig {
    OrderingConfig {
        strict_status_flow: true,
        ..ordering_config()
    }
}

pub(super) type TestService = OrderService<InMemoryOrderRepository, InMemoryCatalog>;

pub(super) fn build_service(
    config: OrderingConfig,
) -> (Arc<TestService>, Arc<InMemoryOrderRepository>) {
    let repository = Arc::new(InMemoryOrderRepository::default());
    let service = Arc::new(OrderService::new(
        repository.clone(),
        Arc::new(catalog()),
        config,
    ));
    (service, repository)
}

pub(super) fn delivery_request(cart_lines: Vec<CartLine>) -> OrderRequest {
    OrderRequest {
        customer_name: "Nadia".to_string(),
        phone: "0100000000".to_string(),
        delivery_method: DeliveryMethod::Delivery,
        address: Some("12 Nile St".to_string()),
        selected_branch: None,
        cart_lines,
        notes: None,
    }
}

pub(super) fn pickup_request(cart_lines: Vec<CartLine>) -> OrderRequest {
    OrderRequest {
        customer_name: "Nadia".to_string(),
        phone: "0100000000".to_string(),
        delivery_method: DeliveryMethod::Pickup,
        address: None,
        selected_branch: Some("downtown".to_string()),
        cart_lines,
        notes: None,
    }
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
