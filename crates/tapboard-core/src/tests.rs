#[cfg(test)]
mod tests {
    use crate::scope::*;
    use crate::signal::*;
    use crate::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscriber_may_read_back() {
        let sig = signal(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        sig.subscribe({
            let sig = sig.clone();
            let seen = seen.clone();
            move |v| seen.borrow_mut().push((*v, sig.get()))
        });

        sig.set(true);
        assert!(!sig.set_if_changed(true));
        assert!(sig.set_if_changed(false));
        assert_eq!(*seen.borrow(), vec![(true, true), (false, false)]);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(0));

        let scope = Scope::new();
        scope.add_disposer({
            let cleaned_up = cleaned_up.clone();
            move || cleaned_up.set(cleaned_up.get() + 1)
        });

        assert_eq!(cleaned_up.get(), 0);
        scope.dispose();
        scope.dispose();
        assert_eq!(cleaned_up.get(), 1);
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_scope_drop_runs_disposers() {
        let cleaned_up = Rc::new(Cell::new(false));
        {
            let scope = Scope::new();
            let cleaned_up = cleaned_up.clone();
            scope.add_disposer(move || cleaned_up.set(true));
        }
        assert!(cleaned_up.get());
    }

    #[test]
    fn test_child_scopes_dispose_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::named("parent");
        let child = parent.child("child");

        parent.add_disposer({
            let order = order.clone();
            move || order.borrow_mut().push("parent")
        });
        child.add_disposer({
            let order = order.clone();
            move || order.borrow_mut().push("child")
        });

        parent.dispose();
        assert!(child.is_disposed());
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
    }

    #[test]
    fn test_effect_cleanup_tied_to_scope() {
        let unmounted = Rc::new(Cell::new(false));
        let scope = Scope::new();
        let d = scope.run(|| {
            let unmounted = unmounted.clone();
            effect(move || on_unmount(move || unmounted.set(true)))
        });

        assert!(!d.has_run());
        scope.dispose();
        assert!(unmounted.get());
        assert!(d.has_run());
    }

    #[test]
    fn test_scope_cancels_timer_on_teardown() {
        let ticks = Rc::new(Cell::new(0));
        let scope = Scope::new();
        scope.run(|| {
            let handle = timer::launch_every(Duration::from_millis(80), {
                let ticks = ticks.clone();
                move || ticks.set(ticks.get() + 1)
            });
            effect(move || on_unmount(move || handle.cancel()));
        });

        timer::advance_by(Duration::from_millis(160));
        assert_eq!(ticks.get(), 2);

        scope.dispose();
        timer::advance_by(Duration::from_millis(800));
        assert_eq!(ticks.get(), 2);
        assert_eq!(timer::pending(), 0);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));
        assert_eq!(c_alpha.to_hex(), "#FF5733AA");
        assert_eq!(Color::from_hex("nope"), Color::BLACK);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_theme_override_is_scoped() {
        let dark = KeyboardTheme {
            key_idle: Color::BLACK,
            ..KeyboardTheme::default()
        };
        with_keyboard_theme(dark, || {
            assert_eq!(keyboard_theme().key_idle, Color::BLACK);
            with_density(Density { scale: 2.0 }, || {
                assert_eq!(dp_to_px(10.0), 20.0);
                assert_eq!(keyboard_theme().key_idle, Color::BLACK);
            });
        });
        assert_eq!(keyboard_theme(), KeyboardTheme::default());
        assert_eq!(dp_to_px(10.0), 10.0);
    }

    #[test]
    fn test_view_outline_and_find() {
        let tree = View::new(0, ViewKind::Column).with_children(vec![
            View::new(0, ViewKind::Row).with_children(vec![
                View::new(0, ViewKind::Box).tagged("key:A").with_children(vec![View::new(
                    0,
                    ViewKind::Text {
                        text: "A".into(),
                        color: Color::WHITE,
                        font_size: 18.0,
                    },
                )]),
            ]),
        ]);

        assert_eq!(
            tree.outline(),
            "Column\n  Row\n    Box [key:A]\n      Text \"A\"\n"
        );
        assert!(tree.find("key:A").is_some());
        assert!(tree.find("key:B").is_none());
    }
}
