//! Host event payloads: extraction of favorites/cart lines from loosely
//! typed event data and mapping into tracker line items.
//!
//! Extraction never fails: anything that is not an object carrying the
//! expected array degrades to an empty list.

use serde::Serialize;
use serde_json::Value;

use crate::config::create_ids;

/// A favorited product as published by the host (`{id, price_min}`).
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesProduct {
    pub id: Value,
    pub price_min: Value,
}

/// A cart order line as published by the host (`{id, quantity, sale_price}`).
#[derive(Debug, Clone, PartialEq)]
pub struct CartOrderLine {
    pub id: Value,
    pub quantity: Value,
    pub sale_price: Value,
}

/// `{ "ids": { <idKey>: "<id>" } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identified {
    pub ids: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListItem {
    pub count: u32,
    pub price_per_item: Value,
    pub product_group: Identified,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub count: Value,
    pub price_per_item: Value,
    pub product: Identified,
}

fn array_field<'a>(data: &'a Value, name: &str) -> &'a [Value] {
    data.as_object()
        .and_then(|obj| obj.get(name))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn field(item: &Value, name: &str) -> Value {
    item.get(name).cloned().unwrap_or(Value::Null)
}

pub fn extract_favorites_products(data: &Value) -> Vec<FavoritesProduct> {
    array_field(data, "products")
        .iter()
        .map(|item| FavoritesProduct {
            id: field(item, "id"),
            price_min: field(item, "price_min"),
        })
        .collect()
}

pub fn extract_cart_order_lines(data: &Value) -> Vec<CartOrderLine> {
    array_field(data, "order_lines")
        .iter()
        .map(|item| CartOrderLine {
            id: field(item, "id"),
            quantity: field(item, "quantity"),
            sale_price: field(item, "sale_price"),
        })
        .collect()
}

/// One wishlist line per favorited product; favorites have no quantity so
/// `count` is always 1.
pub fn map_favorites_products(products: &[FavoritesProduct], id_key: &str) -> Vec<WishListItem> {
    products
        .iter()
        .map(|item| WishListItem {
            count: 1,
            price_per_item: item.price_min.clone(),
            product_group: Identified {
                ids: create_ids(id_key, &item.id),
            },
        })
        .collect()
}

pub fn map_cart_order_lines(order_lines: &[CartOrderLine], id_key: &str) -> Vec<CartItem> {
    order_lines
        .iter()
        .map(|item| CartItem {
            count: item.quantity.clone(),
            price_per_item: item.sale_price.clone(),
            product: Identified {
                ids: create_ids(id_key, &item.id),
            },
        })
        .collect()
}
