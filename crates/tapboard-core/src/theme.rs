//! # Keyboard theme and density
//!
//! Visual constants are thread-local "composition locals". Keys and rows read
//! `keyboard_theme()` while composing; a host or test can override them for a
//! subtree:
//!
//! ```rust
//! use tapboard_core::*;
//!
//! let compact = KeyboardTheme {
//!     key_height: 40.0,
//!     ..KeyboardTheme::default()
//! };
//! with_keyboard_theme(compact, || {
//!     assert_eq!(keyboard_theme().key_height, 40.0);
//! });
//! assert_eq!(keyboard_theme().key_height, 48.0);
//! ```
//!
//! Sizes are in dp; `dp_to_px` converts with the current `Density`.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::Color;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardTheme {
    /// Keyboard surface background.
    pub background: Color,
    /// Key face at rest.
    pub key_idle: Color,
    /// Key face while pressed.
    pub key_pressed: Color,
    pub key_label: Color,
    pub popup_background: Color,
    pub popup_label: Color,
    pub corner_radius: f32,
    pub key_height: f32,
    /// Horizontal gap between keys of a row.
    pub key_spacing: f32,
    /// Vertical gap between rows.
    pub row_spacing: f32,
    pub surface_padding: f32,
    pub label_size: f32,
    pub popup_label_size: f32,
    /// Vertical popup offset from the key's top edge (negative is above).
    pub popup_offset: f32,
    pub popup_height: f32,
}

impl Default for KeyboardTheme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#1B1B1F"),
            key_idle: Color::from_hex("#2E2F33"),
            key_pressed: Color::from_hex("#4A4C52"),
            key_label: Color::from_hex("#E6E6E6"),
            popup_background: Color::from_hex("#5A5D66"),
            popup_label: Color::WHITE,
            corner_radius: 6.0,
            key_height: 48.0,
            key_spacing: 6.0,
            row_spacing: 8.0,
            surface_padding: 6.0,
            label_size: 18.0,
            popup_label_size: 24.0,
            popup_offset: -56.0,
            popup_height: 52.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density {
    /// dp→px multiplier
    pub scale: f32,
}

impl Default for Density {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

pub fn dp_to_px(dp: f32) -> f32 {
    dp * density().scale
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Pops on unwind too.
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local<T: Any>(v: T) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(TypeId::of::<T>(), Box::new(v));
        }
    });
}

fn local<T: Any + Copy + Default>() -> T {
    LOCALS_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&TypeId::of::<T>())?.downcast_ref::<T>().copied())
            .unwrap_or_default()
    })
}

pub fn with_keyboard_theme<R>(theme: KeyboardTheme, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(theme);
        f()
    })
}

pub fn with_density<R>(density: Density, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local(density);
        f()
    })
}

pub fn keyboard_theme() -> KeyboardTheme {
    local::<KeyboardTheme>()
}

pub fn density() -> Density {
    local::<Density>()
}
