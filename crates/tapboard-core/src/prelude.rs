pub use crate::color::Color;
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::error::LayoutError;
pub use crate::geometry::{Rect, Vec2};
pub use crate::input::*;
pub use crate::modifier::Modifier;
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{Signal, signal};
pub use crate::theme::{
    Density, KeyboardTheme, density, dp_to_px, keyboard_theme, with_density, with_keyboard_theme,
};
pub use crate::timer::{self, TaskHandle, TaskSlot};
pub use crate::view::{Frame, HitRegion, View, ViewId, ViewKind};
pub use taffy::{AlignItems, JustifyContent};
