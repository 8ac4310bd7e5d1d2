//! Widget configuration: normalizes the raw JSON object the host supplies
//! into a validated [`WidgetConfig`] with a required-field report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::DEFAULT_ID_KEY;
use crate::normalize::{normalize_value, stringify_value};

/// Tracker operation names. An empty name means "do not send".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operations {
    pub view_category: String,
    pub view_product: String,
    pub set_wish_list: String,
    pub clear_wish_list: String,
    pub set_cart: String,
    pub clear_cart: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTemplate {
    Index,
    Collection,
    Product,
    #[serde(untagged)]
    Other(String),
}

impl PageTemplate {
    fn parse(value: Option<&Value>) -> Option<Self> {
        let name = value?.as_str()?;
        Some(match name {
            "index" => Self::Index,
            "collection" => Self::Collection,
            "product" => Self::Product,
            other => Self::Other(other.to_string()),
        })
    }
}

/// Page the widget was rendered on. Ids and price are passed through as the
/// host wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PageTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_price: Option<Value>,
}

impl PageContext {
    fn from_raw(raw: &Value) -> Option<Self> {
        let page = raw.as_object()?;
        Some(Self {
            template: PageTemplate::parse(page.get("template")),
            collection_id: page.get("collectionId").cloned(),
            product_id: page.get("productId").cloned(),
            product_price: page.get("productPrice").cloned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredSetting {
    ApiDomain,
    IdKey,
}

impl RequiredSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiDomain => "apiDomain",
            Self::IdKey => "idKey",
        }
    }
}

/// Validated widget configuration. Replaced wholesale on re-init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub api_domain: String,
    pub id_key: String,
    pub operations: Operations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageContext>,
    pub is_valid: bool,
    pub missing_settings: Vec<RequiredSetting>,
}

impl WidgetConfig {
    /// Id namespace for line items, falling back to `website`.
    pub fn id_key_or_default(&self) -> &str {
        if self.id_key.is_empty() {
            DEFAULT_ID_KEY
        } else {
            &self.id_key
        }
    }

    /// Missing required settings joined as `apiDomain, idKey`.
    pub fn missing_settings_list(&self) -> String {
        self.missing_settings
            .iter()
            .map(RequiredSetting::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalize and validate a raw host config. `None` when no config object
/// was supplied at all.
pub fn normalize_and_validate_config(raw: Option<&Value>) -> Option<WidgetConfig> {
    let raw = match raw {
        None | Some(Value::Null) => return None,
        Some(raw) => raw,
    };

    let raw_operations = raw.get("operations");
    let operation = |name: &str| normalize_value(raw_operations.and_then(|ops| ops.get(name)));
    let operations = Operations {
        view_category: operation("viewCategory"),
        view_product: operation("viewProduct"),
        set_wish_list: operation("setWishList"),
        clear_wish_list: operation("clearWishList"),
        set_cart: operation("setCart"),
        clear_cart: operation("clearCart"),
    };

    let api_domain = normalize_api_domain(&normalize_value(raw.get("apiDomain")));
    let id_key = normalize_value(raw.get("idKey"));

    let missing_settings: Vec<RequiredSetting> = [
        (RequiredSetting::ApiDomain, &api_domain),
        (RequiredSetting::IdKey, &id_key),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(setting, _)| setting)
    .collect();

    let config = WidgetConfig {
        api_domain,
        id_key,
        operations,
        page: raw.get("page").and_then(PageContext::from_raw),
        is_valid: missing_settings.is_empty(),
        missing_settings,
    };

    debug!(
        api_domain = %config.api_domain,
        is_valid = config.is_valid,
        "widget config normalized"
    );
    Some(config)
}

fn normalize_api_domain(domain: &str) -> String {
    let without_scheme = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain);
    without_scheme.trim_end_matches('/').to_string()
}

/// `{ <idKey>: "<id>" }` identifier object used throughout tracker payloads.
pub fn create_ids(id_key: &str, id: &Value) -> Value {
    let mut ids = Map::new();
    ids.insert(id_key.to_string(), Value::String(stringify_value(id)));
    Value::Object(ids)
}
