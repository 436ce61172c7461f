//! Exchange action wire format.
//!
//! These structs serialize both to msgpack (for the action hash) and to
//! JSON (for the request body). Field declaration order and the
//! short key names are part of the signed bytes: reordering a field or
//! serializing an absent `Option` as nil changes the msgpack output and
//! invalidates the signature, so every optional field carries
//! `skip_serializing_if` and the declarations must not be shuffled.

use serde::Serialize;

/// An exchange action: the `action` object of an authenticated request.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    /// Action kind: "order", "cancel", ...
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderWire>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancels: Option<Vec<CancelWire>>,

    /// Order grouping; "na" for independent orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderInfo>,
}

impl Action {
    /// A plain order placement with no grouping semantics.
    pub fn order(orders: Vec<OrderWire>) -> Self {
        Self {
            action_type: "order".to_string(),
            orders: Some(orders),
            cancels: None,
            grouping: Some("na".to_string()),
            builder: None,
        }
    }

    /// An order placement routed through a builder.
    pub fn order_with_builder(orders: Vec<OrderWire>, builder: BuilderInfo) -> Self {
        Self {
            builder: Some(builder),
            ..Self::order(orders)
        }
    }

    /// A cancel-by-order-id action.
    pub fn cancel(cancels: Vec<CancelWire>) -> Self {
        Self {
            action_type: "cancel".to_string(),
            orders: None,
            cancels: Some(cancels),
            grouping: None,
            builder: None,
        }
    }
}

/// Builder fee routing info.
#[derive(Debug, Clone, Serialize)]
pub struct BuilderInfo {
    /// Builder address.
    #[serde(rename = "b")]
    pub address: String,
    /// Fee in tenths of a basis point.
    #[serde(rename = "f")]
    pub fee: u64,
}

/// One order in wire form. Prices and sizes arrive pre-formatted as
/// strings; the signer does no rounding of its own.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWire {
    /// Asset index.
    #[serde(rename = "a")]
    pub asset: u32,

    /// Buy (true) or sell (false).
    #[serde(rename = "b")]
    pub is_buy: bool,

    /// Limit price.
    #[serde(rename = "p")]
    pub limit_px: String,

    /// Size in base units.
    #[serde(rename = "s")]
    pub sz: String,

    /// Reduce-only flag.
    #[serde(rename = "r")]
    pub reduce_only: bool,

    /// Order type.
    #[serde(rename = "t")]
    pub order_type: OrderTypeWire,

    /// Client order id.
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// Order type in wire form: `{"limit": {...}}` or `{"trigger": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderTypeWire {
    Limit { limit: LimitOrderType },
    Trigger { trigger: TriggerOrderType },
}

impl OrderTypeWire {
    /// Good-till-cancel limit order.
    pub fn gtc() -> Self {
        Self::limit("Gtc")
    }

    /// Immediate-or-cancel limit order.
    pub fn ioc() -> Self {
        Self::limit("Ioc")
    }

    /// Add-liquidity-only (post-only) limit order.
    pub fn alo() -> Self {
        Self::limit("Alo")
    }

    fn limit(tif: &str) -> Self {
        Self::Limit {
            limit: LimitOrderType {
                tif: tif.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitOrderType {
    /// Time in force: "Gtc", "Ioc" or "Alo".
    pub tif: String,
}

/// Trigger order parameters. Declaration order (isMarket, triggerPx, tpsl)
/// matches the reference SDK's packing order.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerOrderType {
    #[serde(rename = "isMarket")]
    pub is_market: bool,

    #[serde(rename = "triggerPx")]
    pub trigger_px: String,

    /// "tp" or "sl".
    pub tpsl: String,
}

/// A cancel in wire form: asset index plus exchange order id.
#[derive(Debug, Clone, Serialize)]
pub struct CancelWire {
    #[serde(rename = "a")]
    pub asset: u32,

    #[serde(rename = "o")]
    pub oid: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_json_shape() {
        assert_eq!(
            serde_json::to_string(&OrderTypeWire::ioc()).unwrap(),
            r#"{"limit":{"tif":"Ioc"}}"#
        );
        assert_eq!(
            serde_json::to_string(&OrderTypeWire::gtc()).unwrap(),
            r#"{"limit":{"tif":"Gtc"}}"#
        );
        let trigger = OrderTypeWire::Trigger {
            trigger: TriggerOrderType {
                is_market: true,
                trigger_px: "101.5".into(),
                tpsl: "tp".into(),
            },
        };
        assert_eq!(
            serde_json::to_string(&trigger).unwrap(),
            r#"{"trigger":{"isMarket":true,"triggerPx":"101.5","tpsl":"tp"}}"#
        );
    }

    #[test]
    fn test_absent_options_are_omitted() {
        let action = Action::order(vec![]);
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.starts_with(r#"{"type":"order""#));
        assert!(!json.contains("cancels"));
        assert!(!json.contains("builder"));
        assert!(json.contains("grouping"));
    }

    #[test]
    fn test_cancel_action_shape() {
        let action = Action::cancel(vec![CancelWire { asset: 5, oid: 123 }]);
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            r#"{"type":"cancel","cancels":[{"a":5,"o":123}]}"#
        );
    }

    #[test]
    fn test_builder_keys() {
        let action = Action::order_with_builder(
            vec![],
            BuilderInfo {
                address: "0x1234567890123456789012345678901234567890".into(),
                fee: 10,
            },
        );
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.ends_with(r#""builder":{"b":"0x1234567890123456789012345678901234567890","f":10}}"#));
    }
}
