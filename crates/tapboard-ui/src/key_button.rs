//! One key: visual state, popup and the held-delete repeat.
//!
//! ```text
//! Idle --tap--> Pressed --popup hides--> Idle
//! Idle --long press--> Pressed+Repeating --popup hides | release--> Idle
//! ```
//!
//! A key owns at most two timers: the popup hide timer and the repeat
//! task. Both live in [`TaskSlot`]s, so arming one cancels its predecessor,
//! and both are cancelled when the key's scope is disposed.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tapboard_core::*;

use crate::config::{KeyboardConfig, RepeatPolicy};
use crate::dispatch::KeyAction;
use crate::gestures::KeyGestures;
use crate::{Box, Text, TextStyle};

/// Receives the label of every key press, taps and repeat ticks alike.
pub type KeyPressHandler = Rc<dyn Fn(&str)>;

/// Per-key interaction state.
#[derive(Debug)]
pub struct KeyInteractionState {
    pub pressed: Signal<bool>,
    pub popup_visible: Signal<bool>,
    repeat: TaskSlot,
    hide: TaskSlot,
    /// Pointer is still down after a long press.
    held: Cell<bool>,
}

impl KeyInteractionState {
    fn new() -> Self {
        Self {
            pressed: signal(false),
            popup_visible: signal(false),
            repeat: TaskSlot::new(),
            hide: TaskSlot::new(),
            held: Cell::new(false),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.is_active()
    }

    pub fn hide_pending(&self) -> bool {
        self.hide.is_active()
    }
}

#[derive(Clone)]
pub struct KeyButton {
    inner: Rc<KeyInner>,
}

struct KeyInner {
    label: String,
    repeats: bool,
    on_press: KeyPressHandler,
    config: KeyboardConfig,
    state: KeyInteractionState,
    gestures: KeyGestures,
    disposed: Cell<bool>,
}

impl KeyButton {
    /// Create a key and tie its teardown to the current scope.
    pub fn mount(label: impl Into<String>, on_press: KeyPressHandler, config: KeyboardConfig) -> Self {
        let label = label.into();
        let repeats = KeyAction::from_label(&label).repeats();

        let inner = Rc::new_cyclic(|weak: &Weak<KeyInner>| {
            let mut gestures = KeyGestures::new(config.long_press_timeout)
                .on_tap(with_key(weak, KeyButton::tap))
                .on_release(with_key(weak, KeyButton::release));
            if repeats {
                gestures = gestures.on_long_press(with_key(weak, KeyButton::long_press));
            }
            KeyInner {
                label,
                repeats,
                on_press,
                config,
                state: KeyInteractionState::new(),
                gestures,
                disposed: Cell::new(false),
            }
        });

        let weak = Rc::downgrade(&inner);
        effect(move || {
            on_unmount(move || {
                if let Some(inner) = weak.upgrade() {
                    KeyButton { inner }.dispose();
                }
            })
        });

        log::trace!("key {:?}: mounted", inner.label);
        KeyButton { inner }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn repeats(&self) -> bool {
        self.inner.repeats
    }

    pub fn state(&self) -> &KeyInteractionState {
        &self.inner.state
    }

    pub fn is_pressed(&self) -> bool {
        self.inner.state.pressed.get()
    }

    pub fn is_popup_visible(&self) -> bool {
        self.inner.state.popup_visible.get()
    }

    pub fn is_repeating(&self) -> bool {
        self.inner.state.is_repeating()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn handle_pointer(&self, event: &PointerEvent) {
        if self.is_disposed() {
            return;
        }
        self.inner.gestures.handle_pointer(event);
    }

    /// Single activation: show feedback, press once.
    pub fn tap(&self) {
        if self.is_disposed() {
            return;
        }
        log::debug!("key {:?}: tap", self.inner.label);
        self.show_popup();
        self.press();
    }

    /// Start the held repeat. Ignored on keys that do not repeat.
    pub fn long_press(&self) {
        if self.is_disposed() {
            return;
        }
        if !self.inner.repeats {
            log::debug!("key {:?}: long press ignored", self.inner.label);
            return;
        }
        log::debug!("key {:?}: long press, repeating", self.inner.label);
        let state = &self.inner.state;
        state.held.set(true);
        self.show_popup();
        if self.inner.config.repeat_policy == RepeatPolicy::UntilRelease {
            state.hide.cancel();
        }

        self.press();
        let weak = Rc::downgrade(&self.inner);
        state
            .repeat
            .replace(timer::launch_every(self.inner.config.repeat_interval, move || {
                if let Some(inner) = weak.upgrade() {
                    (inner.on_press)(&inner.label);
                }
            }));
    }

    /// Pointer went up (or was cancelled) after a long press.
    pub fn release(&self) {
        let state = &self.inner.state;
        let was_held = state.held.replace(false);
        if state.is_repeating() {
            log::debug!("key {:?}: released, repeat stopped", self.inner.label);
        }
        state.repeat.cancel();

        if was_held
            && self.inner.config.repeat_policy == RepeatPolicy::UntilRelease
            && state.popup_visible.get()
        {
            self.arm_hide();
        }
    }

    /// Cancel every timer this key owns. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        let state = &self.inner.state;
        state.repeat.cancel();
        state.hide.cancel();
        state.held.set(false);
        self.inner.gestures.dispose();
        log::trace!("key {:?}: disposed", self.inner.label);
    }

    fn press(&self) {
        (self.inner.on_press)(&self.inner.label);
    }

    fn show_popup(&self) {
        let state = &self.inner.state;
        state.pressed.set_if_changed(true);
        // The hide timer counts from the moment the popup appears; a press
        // while it is already up does not restart it.
        if state.popup_visible.set_if_changed(true) {
            self.arm_hide();
        }
    }

    fn arm_hide(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner
            .state
            .hide
            .replace(timer::launch_after(self.inner.config.popup_duration, move || {
                if let Some(inner) = weak.upgrade() {
                    KeyButton { inner }.hide_popup();
                }
            }));
    }

    fn hide_popup(&self) {
        let state = &self.inner.state;
        state.popup_visible.set_if_changed(false);
        state.pressed.set_if_changed(false);
        state.repeat.cancel();
    }

    /// Compose the key face, with its popup when visible.
    pub fn view(&self) -> View {
        let theme = keyboard_theme();
        let state = &self.inner.state;
        let label = &self.inner.label;
        let face = if state.pressed.get() {
            theme.key_pressed
        } else {
            theme.key_idle
        };

        let mut children = vec![Text(label.as_str()).color(theme.key_label).size(theme.label_size)];
        if state.popup_visible.get() {
            children.push(
                Box(Modifier::new()
                    .absolute()
                    .offset(0.0, theme.popup_offset)
                    .fill_max_width()
                    .height(theme.popup_height)
                    .background(theme.popup_background)
                    .clip_rounded(theme.corner_radius)
                    .align_items(AlignItems::Center)
                    .justify_content(JustifyContent::Center))
                .tagged(format!("popup:{label}"))
                .with_children(vec![
                    Text(label.as_str())
                        .color(theme.popup_label)
                        .size(theme.popup_label_size),
                ]),
            );
        }

        let key = self.clone();
        let down = key.clone();
        let up = key.clone();
        Box(Modifier::new()
            .weight(1.0)
            .height(theme.key_height)
            .background(face)
            .clip_rounded(theme.corner_radius)
            .align_items(AlignItems::Center)
            .justify_content(JustifyContent::Center)
            .on_pointer_down(move |e| down.handle_pointer(&e))
            .on_pointer_up(move |e| up.handle_pointer(&e))
            .on_pointer_cancel(move |e| key.handle_pointer(&e)))
        .tagged(format!("key:{label}"))
        .with_children(children)
    }
}

impl std::fmt::Debug for KeyButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyButton")
            .field("label", &self.inner.label)
            .field("state", &self.inner.state)
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

impl Drop for KeyInner {
    fn drop(&mut self) {
        self.state.repeat.cancel();
        self.state.hide.cancel();
        self.gestures.dispose();
    }
}

fn with_key(weak: &Weak<KeyInner>, f: fn(&KeyButton)) -> impl Fn() + 'static {
    let weak = weak.clone();
    move || {
        if let Some(inner) = weak.upgrade() {
            f(&KeyButton { inner });
        }
    }
}
