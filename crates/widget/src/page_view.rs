//! Initial page-view operations, sent at most once per widget lifetime.

use parking_lot::Mutex;
use serde_json::json;
use tracing::info;

use crate::config::{create_ids, PageTemplate, WidgetConfig};
use crate::normalize::{is_truthy, stringify_value};
use crate::sender::SendOperation;
use crate::state::WidgetState;

/// Sends "viewed category" on collection pages and "viewed product" on
/// product pages. The category check always runs first; the two checks are
/// independent of each other.
pub fn send_initial_page_views(state: &Mutex<WidgetState>, config: &WidgetConfig, sender: &dyn SendOperation) {
    let Some(page) = config.page.as_ref() else {
        return;
    };
    let id_key = config.id_key_or_default();

    let is_collection = page.template == Some(PageTemplate::Collection);
    if is_collection && is_truthy(page.collection_id.as_ref()) && !state.lock().collection_view_sent {
        if let Some(collection_id) = page.collection_id.as_ref() {
            sender.send(
                &config.operations.view_category,
                json!({
                    "viewProductCategory": {
                        "productCategory": { "ids": create_ids(id_key, collection_id) }
                    }
                }),
            );
            state.lock().collection_view_sent = true;
            info!(collection_id = %stringify_value(collection_id), "category view sent");
        }
    }

    let is_product = page.template == Some(PageTemplate::Product);
    if is_product && is_truthy(page.product_id.as_ref()) && !state.lock().product_view_sent {
        if let Some(product_id) = page.product_id.as_ref() {
            let price = page.product_price.as_ref().map(stringify_value).unwrap_or_default();
            sender.send(
                &config.operations.view_product,
                json!({
                    "viewProduct": {
                        "price": price,
                        "productGroup": { "ids": create_ids(id_key, product_id) }
                    }
                }),
            );
            state.lock().product_view_sent = true;
            info!(product_id = %stringify_value(product_id), "product view sent");
        }
    }
}
