use std::cell::Cell;
use std::rc::Rc;

use tapboard_core::{PointerEvent, PointerEventKind, TaskSlot, timer};
use web_time::Duration;

/// Turns pointer down/up/cancel on one key into tap, long press and release.
///
/// Without a long-press handler every down→up is a tap, however long the
/// hold. With one, a hold past the timeout fires the long press instead and
/// the eventual up fires release.
pub struct KeyGestures {
    long_press_timeout: Duration,
    on_tap: Option<Rc<dyn Fn()>>,
    on_long_press: Option<Rc<dyn Fn()>>,
    on_release: Option<Rc<dyn Fn()>>,

    // Internal state
    press: Rc<PressState>,
}

#[derive(Default)]
struct PressState {
    down: Cell<bool>,
    long_pressed: Cell<bool>,
    timer: TaskSlot,
}

impl KeyGestures {
    pub fn new(long_press_timeout: Duration) -> Self {
        Self {
            long_press_timeout,
            on_tap: None,
            on_long_press: None,
            on_release: None,
            press: Rc::new(PressState::default()),
        }
    }

    pub fn on_tap(mut self, f: impl Fn() + 'static) -> Self {
        self.on_tap = Some(Rc::new(f));
        self
    }

    pub fn on_long_press(mut self, f: impl Fn() + 'static) -> Self {
        self.on_long_press = Some(Rc::new(f));
        self
    }

    pub fn on_release(mut self, f: impl Fn() + 'static) -> Self {
        self.on_release = Some(Rc::new(f));
        self
    }

    pub fn is_down(&self) -> bool {
        self.press.down.get()
    }

    pub fn handle_pointer(&self, event: &PointerEvent) {
        match event.event {
            PointerEventKind::Down => self.down(),
            PointerEventKind::Up => self.up(),
            PointerEventKind::Cancel => self.cancel(),
            PointerEventKind::Move => {}
        }
    }

    fn down(&self) {
        let press = &self.press;
        if press.down.replace(true) {
            return;
        }
        press.long_pressed.set(false);

        if let Some(cb) = &self.on_long_press {
            let cb = cb.clone();
            let weak = Rc::downgrade(press);
            press
                .timer
                .replace(timer::launch_after(self.long_press_timeout, move || {
                    let Some(press) = weak.upgrade() else { return };
                    if press.down.get() {
                        press.long_pressed.set(true);
                        cb();
                    }
                }));
        }
    }

    fn up(&self) {
        let press = &self.press;
        if !press.down.replace(false) {
            return;
        }
        press.timer.cancel();

        let cb = if press.long_pressed.replace(false) {
            &self.on_release
        } else {
            &self.on_tap
        };
        if let Some(cb) = cb {
            cb();
        }
    }

    fn cancel(&self) {
        let press = &self.press;
        if !press.down.replace(false) {
            return;
        }
        press.timer.cancel();
        press.long_pressed.set(false);
        if let Some(cb) = &self.on_release {
            cb();
        }
    }

    /// Drop any pending long-press detection.
    pub fn dispose(&self) {
        self.press.timer.cancel();
        self.press.down.set(false);
        self.press.long_pressed.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tapboard_core::Vec2;

    fn ev(kind: PointerEventKind) -> PointerEvent {
        PointerEvent::touch(1, kind, Vec2::default())
    }

    fn detector(with_long_press: bool) -> (KeyGestures, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = |tag: &'static str| {
            let log = log.clone();
            move || log.borrow_mut().push(tag)
        };
        let mut g = KeyGestures::new(Duration::from_millis(500))
            .on_tap(push("tap"))
            .on_release(push("release"));
        if with_long_press {
            g = g.on_long_press(push("long"));
        }
        (g, log)
    }

    #[test]
    fn quick_press_is_a_tap() {
        let (g, log) = detector(true);
        g.handle_pointer(&ev(PointerEventKind::Down));
        timer::advance_by(Duration::from_millis(100));
        g.handle_pointer(&ev(PointerEventKind::Up));
        timer::advance_by(Duration::from_millis(1000));
        assert_eq!(*log.borrow(), vec!["tap"]);
    }

    #[test]
    fn hold_past_timeout_is_long_press_then_release() {
        let (g, log) = detector(true);
        g.handle_pointer(&ev(PointerEventKind::Down));
        timer::advance_by(Duration::from_millis(499));
        assert!(log.borrow().is_empty());
        timer::advance_by(Duration::from_millis(1));
        assert_eq!(*log.borrow(), vec!["long"]);
        g.handle_pointer(&ev(PointerEventKind::Up));
        assert_eq!(*log.borrow(), vec!["long", "release"]);
    }

    #[test]
    fn without_long_press_handler_a_long_hold_still_taps() {
        let (g, log) = detector(false);
        g.handle_pointer(&ev(PointerEventKind::Down));
        timer::advance_by(Duration::from_secs(2));
        g.handle_pointer(&ev(PointerEventKind::Up));
        assert_eq!(*log.borrow(), vec!["tap"]);
        assert_eq!(timer::pending(), 0);
    }

    #[test]
    fn cancel_never_taps() {
        let (g, log) = detector(true);
        g.handle_pointer(&ev(PointerEventKind::Down));
        g.handle_pointer(&ev(PointerEventKind::Cancel));
        timer::advance_by(Duration::from_secs(1));
        g.handle_pointer(&ev(PointerEventKind::Up));
        assert_eq!(*log.borrow(), vec!["release"]);
    }

    #[test]
    fn repeated_down_is_ignored() {
        let (g, log) = detector(true);
        g.handle_pointer(&ev(PointerEventKind::Down));
        timer::advance_by(Duration::from_millis(300));
        g.handle_pointer(&ev(PointerEventKind::Down));
        timer::advance_by(Duration::from_millis(200));
        assert_eq!(*log.borrow(), vec!["long"]);
    }

    #[test]
    fn dispose_drops_pending_long_press() {
        let (g, log) = detector(true);
        g.handle_pointer(&ev(PointerEventKind::Down));
        g.dispose();
        timer::advance_by(Duration::from_secs(1));
        g.handle_pointer(&ev(PointerEventKind::Up));
        assert!(log.borrow().is_empty());
    }
}
