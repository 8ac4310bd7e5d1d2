//! Subscription binder: turns host favorites/cart events into tracker
//! operations.
//!
//! Handlers re-read the current config on every event, so a re-init that
//! replaces the config takes effect without re-subscribing. Binding happens
//! at most once per widget instance and is never undone.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use storebridge_core::EventBus;

use crate::constants::{CART_EVENT, FAVORITES_EVENT};
use crate::event_data::{
    extract_cart_order_lines, extract_favorites_products, map_cart_order_lines, map_favorites_products,
};
use crate::global::WidgetGlobal;
use crate::sender::SendOperation;

pub struct SubscriptionBinder {
    global: Arc<WidgetGlobal>,
    sender: Arc<dyn SendOperation>,
}

impl SubscriptionBinder {
    pub fn new(global: Arc<WidgetGlobal>, sender: Arc<dyn SendOperation>) -> Self {
        Self { global, sender }
    }

    /// Returns `true` once handlers are bound (now or earlier), `false` when
    /// the event bus is not ready yet and binding should be retried.
    pub fn bind(&self, event_bus: Option<&dyn EventBus>) -> bool {
        let state = self.global.state();
        if state.lock().events_bound {
            return true;
        }

        let Some(event_bus) = event_bus.filter(|bus| bus.can_subscribe()) else {
            debug!("event bus not ready");
            return false;
        };

        let global = Arc::clone(&self.global);
        let sender = Arc::clone(&self.sender);
        event_bus.subscribe(
            FAVORITES_EVENT,
            Arc::new(move |data: &Value| {
                let Some(config) = global.config() else {
                    return;
                };
                let products = extract_favorites_products(data);
                let list = map_favorites_products(&products, config.id_key_or_default());
                dispatch_list(
                    sender.as_ref(),
                    &list,
                    &config.operations.set_wish_list,
                    &config.operations.clear_wish_list,
                );
            }),
        );

        let global = Arc::clone(&self.global);
        let sender = Arc::clone(&self.sender);
        event_bus.subscribe(
            CART_EVENT,
            Arc::new(move |data: &Value| {
                let Some(config) = global.config() else {
                    return;
                };
                let order_lines = extract_cart_order_lines(data);
                let list = map_cart_order_lines(&order_lines, config.id_key_or_default());
                dispatch_list(
                    sender.as_ref(),
                    &list,
                    &config.operations.set_cart,
                    &config.operations.clear_cart,
                );
            }),
        );

        state.lock().events_bound = true;
        info!("storefront event subscriptions bound");
        true
    }
}

/// Set/clear fallback: a non-empty list replaces the contents; an empty
/// list clears them when a clear operation is configured, and otherwise
/// still goes out as an empty set so the signal is not lost.
fn dispatch_list<T: Serialize>(sender: &dyn SendOperation, list: &[T], set_operation: &str, clear_operation: &str) {
    if !list.is_empty() {
        sender.send(set_operation, json!({ "productList": list }));
    } else if !clear_operation.is_empty() {
        sender.send(clear_operation, json!({}));
    } else {
        sender.send(set_operation, json!({ "productList": [] }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::normalize_and_validate_config;
    use crate::sender::testing::RecordingSender;
    use storebridge_core::InMemoryEventBus;

    fn global_with(raw: Value) -> Arc<WidgetGlobal> {
        let global = Arc::new(WidgetGlobal::new());
        let config = normalize_and_validate_config(Some(&raw)).unwrap();
        global.store_config(Arc::new(config));
        global
    }

    fn full_config() -> Value {
        json!({
            "apiDomain": "api.mindbox.ru",
            "idKey": "website",
            "operations": {
                "setWishList": "SetWishList",
                "clearWishList": "ClearWishList",
                "setCart": "SetCart",
                "clearCart": "ClearCart"
            }
        })
    }

    fn bound(raw: Value) -> (Arc<WidgetGlobal>, Arc<RecordingSender>, InMemoryEventBus) {
        let global = global_with(raw);
        let sender = Arc::new(RecordingSender::default());
        let bus = InMemoryEventBus::new();
        let binder = SubscriptionBinder::new(global.clone(), sender.clone());
        assert!(binder.bind(Some(&bus)));
        (global, sender, bus)
    }

    #[test]
    fn test_missing_bus_is_not_ready() {
        let global = global_with(full_config());
        let binder = SubscriptionBinder::new(global.clone(), Arc::new(RecordingSender::default()));
        assert!(!binder.bind(None));

        let pending = InMemoryEventBus::pending();
        assert!(!binder.bind(Some(&pending)));
        assert_eq!(pending.subscriber_count(FAVORITES_EVENT), 0);
        assert!(!global.state_snapshot().events_bound);
    }

    #[test]
    fn test_binding_is_idempotent() {
        let (global, sender, bus) = bound(full_config());
        let binder = SubscriptionBinder::new(global.clone(), sender);

        assert!(binder.bind(Some(&bus)));
        assert!(binder.bind(None));

        assert_eq!(bus.subscriber_count(FAVORITES_EVENT), 1);
        assert_eq!(bus.subscriber_count(CART_EVENT), 1);
        assert!(global.state_snapshot().events_bound);
    }

    #[test]
    fn test_cart_event_sends_set_cart() {
        let (_, sender, bus) = bound(full_config());

        bus.publish(
            CART_EVENT,
            &json!({ "order_lines": [{ "id": "SKU-1", "quantity": 2, "sale_price": 99 }] }),
        );

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "SetCart");
        assert_eq!(
            sent[0].1,
            json!({ "productList": [{ "count": 2, "pricePerItem": 99, "product": { "ids": { "website": "SKU-1" } } }] })
        );
    }

    #[test]
    fn test_favorites_set_then_clear() {
        let (_, sender, bus) = bound(full_config());

        bus.publish(FAVORITES_EVENT, &json!({ "products": [{ "id": 789, "price_min": 299 }] }));
        bus.publish(FAVORITES_EVENT, &json!({ "products": [] }));

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "SetWishList");
        assert_eq!(
            sent[0].1,
            json!({ "productList": [{ "count": 1, "pricePerItem": 299, "productGroup": { "ids": { "website": "789" } } }] })
        );
        assert_eq!(sent[1], ("ClearWishList".to_string(), json!({})));
    }

    #[test]
    fn test_empty_list_without_clear_falls_back_to_empty_set() {
        let (_, sender, bus) = bound(json!({
            "apiDomain": "api.mindbox.ru",
            "idKey": "website",
            "operations": { "setCart": "SetCart", "setWishList": "SetWishList" }
        }));

        bus.publish(CART_EVENT, &json!({ "order_lines": [] }));
        bus.publish(FAVORITES_EVENT, &json!("garbage"));

        let sent = sender.sent.lock();
        assert_eq!(sent[0], ("SetCart".to_string(), json!({ "productList": [] })));
        assert_eq!(sent[1], ("SetWishList".to_string(), json!({ "productList": [] })));
    }

    #[test]
    fn test_handlers_read_current_config() {
        let (global, sender, bus) = bound(full_config());

        let replaced = normalize_and_validate_config(Some(&json!({
            "apiDomain": "api.mindbox.ru",
            "idKey": "external",
            "operations": { "setCart": "Website.SetCart" }
        })))
        .unwrap();
        global.store_config(Arc::new(replaced));

        bus.publish(CART_EVENT, &json!({ "order_lines": [{ "id": 7, "quantity": 1, "sale_price": null }] }));

        let sent = sender.sent.lock();
        assert_eq!(sent[0].0, "Website.SetCart");
        assert_eq!(sent[0].1["productList"][0]["product"]["ids"], json!({ "external": "7" }));
    }

    #[test]
    fn test_handler_without_config_is_noop() {
        let global = Arc::new(WidgetGlobal::new());
        let sender = Arc::new(RecordingSender::default());
        let bus = InMemoryEventBus::new();
        assert!(SubscriptionBinder::new(global, sender.clone()).bind(Some(&bus)));

        bus.publish(CART_EVENT, &json!({ "order_lines": [{ "id": 1, "quantity": 1 }] }));
        assert!(sender.sent.lock().is_empty());
    }
}
