//! Rows of keys and the keyboard surface that owns them.

use std::rc::Rc;

use tapboard_core::*;

use crate::config::KeyboardConfig;
use crate::key_button::{KeyButton, KeyPressHandler};
use crate::layout::KeyboardLayout;
use crate::{Column, Row, Surface};

/// One horizontal row; every key gets an equal share of the width.
pub fn KeyRow(keys: &[KeyButton]) -> View {
    let theme = keyboard_theme();
    Row(Modifier::new().fill_max_width().spacing(theme.key_spacing))
        .with_children(keys.iter().map(KeyButton::view).collect())
}

/// The mounted keyboard: its keys, their scope, and the press callback they
/// all share.
pub struct KeyboardSurface {
    scope: Scope,
    layout: KeyboardLayout,
    rows: Vec<Vec<KeyButton>>,
    config: KeyboardConfig,
}

impl KeyboardSurface {
    /// Mount one key per label. The surface scope is a child of the current
    /// scope when there is one.
    pub fn new(
        layout: KeyboardLayout,
        config: KeyboardConfig,
        on_key_press: impl Fn(&str) + 'static,
    ) -> Self {
        let scope = match current_scope() {
            Some(parent) => parent.child("keyboard"),
            None => Scope::named("keyboard"),
        };
        let on_press: KeyPressHandler = Rc::new(on_key_press);

        let rows = scope.run(|| {
            layout
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|label| KeyButton::mount(label.as_str(), on_press.clone(), config))
                        .collect()
                })
                .collect()
        });
        log::debug!(
            "keyboard: mounted {} keys in {} rows",
            layout.labels().count(),
            layout.row_count()
        );

        Self {
            scope,
            layout,
            rows,
            config,
        }
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn rows(&self) -> &[Vec<KeyButton>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &KeyButton> {
        self.rows.iter().flatten()
    }

    /// First key with `label`.
    pub fn key(&self, label: &str) -> Option<&KeyButton> {
        self.buttons().find(|k| k.label() == label)
    }

    /// Call `f` whenever any key's visual state changes.
    pub fn observe(&self, f: impl Fn() + 'static) {
        let f: Rc<dyn Fn()> = Rc::new(f);
        for key in self.buttons() {
            let state = key.state();
            let on_pressed = f.clone();
            state.pressed.subscribe(move |_| on_pressed());
            let on_popup = f.clone();
            state.popup_visible.subscribe(move |_| on_popup());
        }
    }

    pub fn view(&self) -> View {
        let theme = keyboard_theme();
        Surface(
            Modifier::new()
                .fill_max_width()
                .background(theme.background)
                .padding(theme.surface_padding),
            Column(Modifier::new().fill_max_width().spacing(theme.row_spacing))
                .with_children(self.rows.iter().map(|r| KeyRow(r)).collect()),
        )
        .tagged("keyboard")
    }

    pub fn is_disposed(&self) -> bool {
        self.scope.is_disposed()
    }

    /// Unmount every key, cancelling their timers.
    pub fn dispose(&self) {
        self.scope.dispose();
    }
}

impl Drop for KeyboardSurface {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

impl std::fmt::Debug for KeyboardSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardSurface")
            .field("scope", &self.scope)
            .field("rows", &self.layout.row_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The stock QWERTY keyboard with default timing.
pub fn create_keyboard_surface(on_key_press: impl Fn(&str) + 'static) -> KeyboardSurface {
    KeyboardSurface::new(
        KeyboardLayout::qwerty().clone(),
        KeyboardConfig::default(),
        on_key_press,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use web_time::Duration;

    use crate::dispatch::DEL;
    use crate::layout_keys;

    fn recording_surface() -> (KeyboardSurface, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let c = calls.clone();
        let surface = create_keyboard_surface(move |label| c.borrow_mut().push(label.to_string()));
        (surface, calls)
    }

    #[test]
    fn qwerty_surface_mounts_every_key() {
        let (surface, _) = recording_surface();
        assert_eq!(surface.rows().len(), 4);
        assert_eq!(
            surface.rows().iter().map(Vec::len).collect::<Vec<_>>(),
            vec![10, 9, 8, 2]
        );
        assert!(surface.key(DEL).is_some_and(KeyButton::repeats));
        assert!(surface.key("ENTER").is_some());
        assert!(surface.key("?").is_none());
    }

    #[test]
    fn press_callback_is_forwarded_unchanged() {
        let (surface, calls) = recording_surface();
        for label in ["H", "I", "SPACE", "ENTER"] {
            surface.key(label).expect("key").tap();
        }
        assert_eq!(*calls.borrow(), vec!["H", "I", "SPACE", "ENTER"]);
    }

    #[test]
    fn outline_of_small_layout() {
        let layout = KeyboardLayout::from_rows([vec!["A", "B"], vec!["DEL"]]).expect("layout");
        let surface = KeyboardSurface::new(layout, KeyboardConfig::default(), |_| {});
        insta::assert_snapshot!(surface.view().outline(), @r#"
        Surface [keyboard]
          Column
            Row
              Box [key:A]
                Text "A"
              Box [key:B]
                Text "B"
            Row
              Box [key:DEL]
                Text "DEL"
        "#);
    }

    #[test]
    fn popup_is_part_of_the_view_until_it_hides() {
        let (surface, _) = recording_surface();
        surface.key("K").expect("K").tap();
        assert!(surface.view().find("popup:K").is_some());

        timer::advance_by(Duration::from_millis(120));
        assert!(surface.view().find("popup:K").is_none());
    }

    #[test]
    fn observe_reports_state_changes() {
        let (surface, _) = recording_surface();
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        surface.observe(move || c.set(c.get() + 1));

        surface.key("A").expect("A").tap();
        // pressed and popup_visible both flip on.
        assert_eq!(changes.get(), 2);
        timer::advance_by(Duration::from_millis(120));
        assert_eq!(changes.get(), 4);
    }

    #[test]
    fn dispose_unmounts_keys_and_cancels_timers() {
        let (surface, calls) = recording_surface();
        let del = surface.key(DEL).expect("DEL").clone();
        del.long_press();
        assert!(timer::pending() > 0);

        surface.dispose();
        assert!(surface.is_disposed());
        assert!(del.is_disposed());
        assert_eq!(timer::pending(), 0);

        timer::advance_by(Duration::from_secs(1));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn surface_mounted_in_a_scope_dies_with_it() {
        let root = Scope::new();
        let surface = root.run(|| create_keyboard_surface(|_| {}));
        root.dispose();
        assert!(surface.is_disposed());
        assert!(surface.buttons().all(KeyButton::is_disposed));
    }

    #[test]
    fn keys_in_a_row_share_the_width() {
        let (surface, _) = recording_surface();
        let frame = layout_keys(&surface.view(), (400.0, 300.0)).expect("layout");
        assert_eq!(frame.hit_regions.len(), 29);

        let widths: Vec<f32> = surface.rows()[0]
            .iter()
            .map(|k| {
                frame
                    .region(&format!("key:{}", k.label()))
                    .expect("region")
                    .rect
                    .w
            })
            .collect();
        let (min, max) = widths
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), w| (lo.min(*w), hi.max(*w)));
        assert!(max - min <= 1.0, "{widths:?}");

        let q = frame.region("key:Q").expect("Q").rect;
        let hit = frame.hit_test(q.center()).expect("hit");
        assert_eq!(hit.tag.as_deref(), Some("key:Q"));
    }
}
