//! Key press dispatcher: one key label in, exactly one edit out.

use crate::editing::{EditingConnection, EditingHost};

pub const DEL: &str = "DEL";
pub const SPACE: &str = "SPACE";
pub const ENTER: &str = "ENTER";

/// What a key label does to the focused field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction<'a> {
    DeleteBefore,
    Space,
    Enter,
    /// Any other label is inserted verbatim.
    Insert(&'a str),
}

impl<'a> KeyAction<'a> {
    pub fn from_label(label: &'a str) -> Self {
        match label {
            DEL => KeyAction::DeleteBefore,
            SPACE => KeyAction::Space,
            ENTER => KeyAction::Enter,
            other => KeyAction::Insert(other),
        }
    }

    /// Keys that repeat while held.
    pub fn repeats(&self) -> bool {
        matches!(self, KeyAction::DeleteBefore)
    }

    pub fn apply(self, conn: &mut dyn EditingConnection) {
        match self {
            KeyAction::DeleteBefore => conn.delete_before(1),
            KeyAction::Space => conn.insert_text(" "),
            KeyAction::Enter => conn.send_enter(),
            KeyAction::Insert(text) => conn.insert_text(text),
        }
    }
}

/// Perform the edit for `label` on `connection`.
///
/// Without a connection there is no focused field and the call does
/// nothing. Every call edits exactly once; repeated calls are never merged.
/// Returns the action performed, if any.
pub fn dispatch_key<'a>(
    label: &'a str,
    connection: Option<&mut dyn EditingConnection>,
) -> Option<KeyAction<'a>> {
    let Some(conn) = connection else {
        log::trace!("dispatch {label:?}: no focused field");
        return None;
    };
    let action = KeyAction::from_label(label);
    log::trace!("dispatch {label:?} -> {action:?}");
    action.apply(conn);
    Some(action)
}

/// Like [`dispatch_key`], acquiring the connection from `host` for this one
/// call.
pub fn dispatch_to<'a>(host: &mut dyn EditingHost, label: &'a str) -> Option<KeyAction<'a>> {
    dispatch_key(label, host.active_connection())
}
