use crate::menu::{ClickKind, CloseReason};
use crate::session::{MenuId, SurfaceId, ViewerId};

/// A click as reported by the host. Click kinds and actions use the host's names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawClickEvent {
    pub viewer: ViewerId,
    pub surface: SurfaceId,
    /// Negative for clicks outside the window, at or above the menu size for
    /// the viewer's own inventory.
    pub raw_slot: i32,
    pub click_kind: String,
    pub action: Option<String>,
}

impl RawClickEvent {
    pub fn new<S: Into<String>>(viewer: ViewerId, surface: SurfaceId, raw_slot: i32, click_kind: S) -> Self {
        RawClickEvent {
            viewer,
            surface,
            raw_slot,
            click_kind: click_kind.into(),
            action: None,
        }
    }

    pub fn with_action<S: Into<String>>(mut self, action: S) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Clicks that would pull items out of the menu or push items into it.
    pub(super) fn is_transfer(&self, kind: ClickKind) -> bool {
        let action = self.action.as_ref().map(String::as_str);
        match (kind, action) {
            (ClickKind::Shift, Some("MOVE_TO_OTHER_INVENTORY")) => true,
            (ClickKind::Other, Some("COLLECT_TO_CURSOR")) => self.click_kind == "DOUBLE_CLICK",
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCloseEvent {
    pub viewer: ViewerId,
    pub surface: SurfaceId,
    pub reason: Option<String>,
}

impl RawCloseEvent {
    pub fn new(viewer: ViewerId, surface: SurfaceId) -> Self {
        RawCloseEvent { viewer, surface, reason: None }
    }

    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub(super) fn close_reason(&self) -> CloseReason {
        match self.reason.as_ref().map(String::as_str) {
            Some("DISCONNECT") => CloseReason::ViewerDisconnected,
            Some("OPEN_NEW") => CloseReason::ReplacedByNewMenu,
            Some("PLUGIN") => CloseReason::ProgrammaticClose,
            _ => CloseReason::ViewerDismissed,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawDisconnectEvent {
    pub viewer: ViewerId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDragEvent {
    pub viewer: ViewerId,
    pub surface: SurfaceId,
    pub raw_slots: Vec<i32>,
}

/// What the host should do with the click it reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not a managed surface, or a stale or malformed event.
    Ignored,
    Handled {
        cancel_default: bool,
        /// Play the host's click feedback.
        feedback: bool,
    },
}

impl ClickOutcome {
    pub fn cancels_default(self) -> bool {
        match self {
            ClickOutcome::Handled { cancel_default, .. } => cancel_default,
            ClickOutcome::Ignored => false,
        }
    }
}

/// Identifies the menu instance a piece of deferred work belongs to.
///
/// The dispatcher only applies work whose ticket still matches the viewer's
/// focused session, so work for a closed or replaced menu is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub viewer: ViewerId,
    pub menu: MenuId,
    pub surface: SurfaceId,
}

#[cfg(test)]
mod test {
    use super::*;

    fn click(kind: &str, action: Option<&str>) -> RawClickEvent {
        let event = RawClickEvent::new(ViewerId(1), SurfaceId(1), 40, kind);
        match action {
            Some(a) => event.with_action(a),
            None => event,
        }
    }

    #[test]
    fn transfers() {
        assert!(click("SHIFT_LEFT", Some("MOVE_TO_OTHER_INVENTORY")).is_transfer(ClickKind::Shift));
        assert!(!click("SHIFT_LEFT", Some("PICKUP_ALL")).is_transfer(ClickKind::Shift));
        assert!(click("DOUBLE_CLICK", Some("COLLECT_TO_CURSOR")).is_transfer(ClickKind::Other));
        assert!(!click("NUMBER_KEY", Some("COLLECT_TO_CURSOR")).is_transfer(ClickKind::Other));
        assert!(!click("LEFT", None).is_transfer(ClickKind::Left));
    }

    #[test]
    fn close_reasons() {
        let event = RawCloseEvent::new(ViewerId(1), SurfaceId(2));
        assert_eq!(event.close_reason(), CloseReason::ViewerDismissed);
        assert_eq!(event.clone().with_reason("DISCONNECT").close_reason(), CloseReason::ViewerDisconnected);
        assert_eq!(event.clone().with_reason("OPEN_NEW").close_reason(), CloseReason::ReplacedByNewMenu);
        assert_eq!(event.clone().with_reason("PLUGIN").close_reason(), CloseReason::ProgrammaticClose);
        assert_eq!(event.with_reason("TELEPORT").close_reason(), CloseReason::ViewerDismissed);
    }

    #[test]
    fn outcome_cancels() {
        assert!(!ClickOutcome::Ignored.cancels_default());
        assert!(ClickOutcome::Handled { cancel_default: true, feedback: false }.cancels_default());
    }
}
