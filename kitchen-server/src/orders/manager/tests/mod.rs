use super::*;
use shared::models::{NotificationLevel, PrepProfile};
use std::time::Duration;

fn test_catalog() -> CatalogService {
    CatalogService::new(vec![
        PrepProfile::new("dosa", "Masala Dosa", 5, 5),
        PrepProfile::new("pizza", "Margherita Pizza", 15, 2),
    ])
}

fn create_test_manager() -> OrdersManager {
    OrdersManager::new(test_catalog(), QueueConfig::default())
}

fn create_manager_with(config: QueueConfig) -> OrdersManager {
    OrdersManager::new(test_catalog(), config)
}

fn dosa(quantity: u32) -> Vec<CartLine> {
    vec![CartLine::new("dosa", quantity, 40.0)]
}

fn pizza(quantity: u32) -> Vec<CartLine> {
    vec![CartLine::new("pizza", quantity, 120.0)]
}

fn place(manager: &OrdersManager, lines: Vec<CartLine>) -> QueuedOrder {
    manager
        .place_order(lines, serde_json::json!({ "name": "Test Customer" }))
        .expect("order should be admitted")
}

fn status_of(manager: &OrdersManager, order_id: OrderId) -> OrderStatus {
    manager.get_order(order_id).unwrap().status
}

/// Sleep on the (paused) tokio clock
async fn advance_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

mod test_flows;
