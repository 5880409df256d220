//! Global keyboard transport
//!
//! Maps a key press to a transport action given what the player currently
//! shows. Presses aimed at editable elements are ignored entirely.

use serde::{Deserialize, Serialize};

/// Kind of element that had focus when the key was pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    #[default]
    Document,
    Input,
    TextArea,
    Select,
    ContentEditable,
    Other,
}

impl FocusTarget {
    /// Classify from a lower- or upper-case tag name and the content-editable flag
    pub fn from_tag(tag: &str, content_editable: bool) -> Self {
        if content_editable {
            return Self::ContentEditable;
        }
        match tag.to_ascii_lowercase().as_str() {
            "input" => Self::Input,
            "textarea" => Self::TextArea,
            "select" => Self::Select,
            "body" | "html" | "" => Self::Document,
            _ => Self::Other,
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(
            self,
            Self::Input | Self::TextArea | Self::Select | Self::ContentEditable
        )
    }
}

/// A key press, `key` as in `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub target: FocusTarget,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, target: FocusTarget) -> Self {
        Self {
            key: key.into(),
            target,
        }
    }
}

/// Player state the bindings depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub has_current: bool,
    pub player_hidden: bool,
    pub fullscreen_open: bool,
}

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportAction {
    OpenFullscreen,
    CloseFullscreen,
    TogglePlay,
    SeekBy(f64),
}

/// Resolution of a key press
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyOutcome {
    pub action: Option<TransportAction>,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl KeyOutcome {
    fn act(action: TransportAction) -> Self {
        Self {
            action: Some(action),
            prevent_default: true,
            stop_propagation: false,
        }
    }
}

/// Resolve a key press
///
/// `f` and the Cyrillic `а` on the same physical key open fullscreen.
pub fn resolve_key(press: &KeyPress, ctx: KeyContext, seek_step: f64) -> KeyOutcome {
    if press.target.is_editable() {
        return KeyOutcome::default();
    }

    match press.key.to_lowercase().as_str() {
        "f" | "а" if !ctx.fullscreen_open => {
            if ctx.has_current && !ctx.player_hidden {
                KeyOutcome::act(TransportAction::OpenFullscreen)
            } else {
                KeyOutcome::default()
            }
        }
        "escape" if ctx.fullscreen_open => KeyOutcome::act(TransportAction::CloseFullscreen),
        " " if ctx.has_current => KeyOutcome {
            stop_propagation: true,
            ..KeyOutcome::act(TransportAction::TogglePlay)
        },
        "arrowleft" if ctx.has_current => KeyOutcome::act(TransportAction::SeekBy(-seek_step)),
        "arrowright" if ctx.has_current => KeyOutcome::act(TransportAction::SeekBy(seek_step)),
        _ => KeyOutcome::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYING: KeyContext = KeyContext {
        has_current: true,
        player_hidden: false,
        fullscreen_open: false,
    };

    #[test]
    fn tag_classification() {
        assert_eq!(FocusTarget::from_tag("INPUT", false), FocusTarget::Input);
        assert_eq!(FocusTarget::from_tag("div", true), FocusTarget::ContentEditable);
        assert_eq!(FocusTarget::from_tag("BODY", false), FocusTarget::Document);
        assert!(!FocusTarget::from_tag("button", false).is_editable());
    }

    #[test]
    fn cyrillic_homoglyph_opens_fullscreen() {
        for key in ["f", "F", "а", "А"] {
            let outcome = resolve_key(&KeyPress::new(key, FocusTarget::Document), PLAYING, 5.0);
            assert_eq!(outcome.action, Some(TransportAction::OpenFullscreen), "{key}");
        }
    }

    #[test]
    fn fullscreen_needs_visible_player() {
        let ctx = KeyContext {
            player_hidden: true,
            ..PLAYING
        };
        let outcome = resolve_key(&KeyPress::new("f", FocusTarget::Document), ctx, 5.0);
        assert_eq!(outcome, KeyOutcome::default());
    }

    #[test]
    fn escape_only_when_open() {
        let press = KeyPress::new("Escape", FocusTarget::Document);
        assert_eq!(resolve_key(&press, PLAYING, 5.0).action, None);

        let open = KeyContext {
            fullscreen_open: true,
            ..PLAYING
        };
        assert_eq!(
            resolve_key(&press, open, 5.0).action,
            Some(TransportAction::CloseFullscreen)
        );
    }

    #[test]
    fn arrows_seek_by_step() {
        let left = resolve_key(&KeyPress::new("ArrowLeft", FocusTarget::Other), PLAYING, 5.0);
        assert_eq!(left.action, Some(TransportAction::SeekBy(-5.0)));
        assert!(left.prevent_default);
        assert!(!left.stop_propagation);
    }

    #[test]
    fn nothing_bound_without_current_item() {
        let idle = KeyContext {
            has_current: false,
            player_hidden: true,
            fullscreen_open: false,
        };
        for key in [" ", "ArrowLeft", "ArrowRight", "f"] {
            let outcome = resolve_key(&KeyPress::new(key, FocusTarget::Document), idle, 5.0);
            assert_eq!(outcome, KeyOutcome::default());
        }
    }
}
