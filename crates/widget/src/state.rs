use serde::Serialize;

/// Per-instance flags. Every flag is monotonic: once set it stays set for
/// the lifetime of the widget global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    pub events_bound: bool,
    pub config_error_logged: bool,
    pub missing_settings_logged: bool,
    pub collection_view_sent: bool,
    pub product_view_sent: bool,
}
