//! JS-facing conversions

use crate::keyboard::KeyOutcome;
use crate::types::{MoveDirection, PlaybackOrder};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Parse `"sequential"` / `"shuffle"`
pub fn parse_order(order: &str) -> Result<PlaybackOrder, JsValue> {
    match order {
        "sequential" => Ok(PlaybackOrder::Sequential),
        "shuffle" => Ok(PlaybackOrder::Shuffle),
        _ => Err(JsValue::from_str(
            "Invalid order. Use 'sequential' or 'shuffle'",
        )),
    }
}

/// Parse `"up"` / `"down"`
pub fn parse_direction(direction: &str) -> Result<MoveDirection, JsValue> {
    match direction {
        "up" => Ok(MoveDirection::Up),
        "down" => Ok(MoveDirection::Down),
        _ => Err(JsValue::from_str("Invalid direction. Use 'up' or 'down'")),
    }
}

/// Notification that an item's artist segments are available
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentsLoaded<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub item_id: &'a str,
    pub count: usize,
}

impl<'a> SegmentsLoaded<'a> {
    pub fn new(item_id: &'a str, count: usize) -> Self {
        Self {
            kind: "segmentsLoaded",
            item_id,
            count,
        }
    }
}

/// Result of a keyboard dispatch, for the page's own bookkeeping
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyHandled {
    pub handled: bool,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl From<KeyOutcome> for KeyHandled {
    fn from(outcome: KeyOutcome) -> Self {
        Self {
            handled: outcome.action.is_some(),
            prevent_default: outcome.prevent_default,
            stop_propagation: outcome.stop_propagation,
        }
    }
}
