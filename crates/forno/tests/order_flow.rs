use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use forno::catalog::{import_menu_str, InMemoryCatalog};
use forno::config::OrderingConfig;
use forno::ordering::{
    CartLine, DeliveryMethod, InMemoryOrderRepository, OrderRequest, OrderService, OrderStatus,
    SelectionSet, VariantChoice,
};

const MENU: &str = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
product,margherita,Margherita,pizza,classic,size,small,Small,30,,,true
product,margherita,Margherita,pizza,classic,size,medium,Medium,40,true,,true
product,margherita,Margherita,pizza,classic,crust,stuffed,Stuffed Crust,10,,,true
product,pepperoni,Pepperoni,pizza,meat,size,medium,Medium,55,true,,true
product,pepperoni,Pepperoni,pizza,meat,crust,stuffed,Stuffed Crust,10,,,true
addon,mushroom,Mushroom,topping,,size,regular,Regular,15,true,pizza,true
addon,extra-cheese,Extra Cheese,topping,,size,regular,Regular,20,true,pizza,true
";

type Service = OrderService<InMemoryOrderRepository, InMemoryCatalog>;

fn build_service() -> Arc<Service> {
    let (products, addons) = import_menu_str(MENU).expect("menu imports");
    let catalog = Arc::new(InMemoryCatalog::new(products, addons));
    let repository = Arc::new(InMemoryOrderRepository::default());
    Arc::new(OrderService::new(
        repository,
        catalog,
        OrderingConfig {
            delivery_fee: 20,
            strict_status_flow: false,
        },
    ))
}

fn margherita_line(quantity: i64) -> CartLine {
    CartLine::Regular {
        product_id: forno::catalog::ProductId("margherita".to_string()),
        quantity,
        selection: SelectionSet {
            variants: vec![
                VariantChoice::Legacy("medium".to_string()),
                VariantChoice::Selection {
                    axis: "crust".to_string(),
                    option_id: "stuffed".to_string(),
                },
            ],
            addons: vec![forno::catalog::AddonId("mushroom".to_string())],
            notes: None,
        },
        notes: None,
    }
}

fn delivery_request(lines: Vec<CartLine>) -> OrderRequest {
    OrderRequest {
        customer_name: "Omar".to_string(),
        phone: "0111111111".to_string(),
        delivery_method: DeliveryMethod::Delivery,
        address: Some("5 Corniche Rd".to_string()),
        selected_branch: None,
        cart_lines: lines,
        notes: Some("ring the bell".to_string()),
    }
}

#[test]
fn seeded_menu_prices_a_full_order_end_to_end() {
    let service = build_service();

    let half_line = CartLine::HalfHalf {
        left: Some(forno::ordering::HalfChoice {
            product_id: forno::catalog::ProductId("margherita".to_string()),
            selection: SelectionSet::default(),
        }),
        right: Some(forno::ordering::HalfChoice {
            product_id: forno::catalog::ProductId("pepperoni".to_string()),
            selection: SelectionSet {
                addons: vec![forno::catalog::AddonId("extra-cheese".to_string())],
                ..SelectionSet::default()
            },
        }),
        shared: SelectionSet::default(),
        quantity: 1,
        notes: None,
    };

    let order = service
        .place_order(delivery_request(vec![margherita_line(2), half_line]))
        .expect("order places");

    // Regular line: (40 + 10 + 15) * 2 = 130.
    // Half line: max(40, 55) + extra cheese 20 halved = 65.
    assert_eq!(order.subtotal, 130 + 65);
    assert_eq!(order.delivery_fee, 20);
    assert_eq!(order.total_amount, 215);
    assert_eq!(order.status, OrderStatus::Pending);

    let confirmed = service
        .transition(&order.id, "confirmed")
        .expect("confirmation applies");
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert_eq!(confirmed.total_amount, order.total_amount);

    for status in ["preparing", "ready", "delivered"] {
        service.transition(&order.id, status).expect("walks forward");
    }
    let delivered = service.get(&order.id).expect("order readable");
    assert_eq!(delivered.status, OrderStatus::Delivered);
}

#[test]
fn concurrent_creations_never_share_an_identifier() {
    let service = build_service();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || {
                service
                    .place_order(delivery_request(vec![margherita_line(1)]))
                    .expect("order places")
                    .id
            })
        })
        .collect();

    let ids: HashSet<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("creation thread succeeds").0)
        .collect();

    assert_eq!(ids.len(), 100);
}
