//! Keyboard host.
//!
//! Platform glue owns one [`KeyboardHost`] per input session. It feeds in
//! pointer events and frame times, and asks for the frame to draw:
//!
//! ```rust
//! use tapboard_core::{PointerEvent, PointerEventKind, timer};
//! use tapboard_platform::{HostOptions, KeyboardHost};
//! use tapboard_ui::TextBuffer;
//!
//! let mut host = KeyboardHost::new(Some(TextBuffer::new()), HostOptions::default());
//! let q = host.key_center("Q").unwrap().unwrap();
//!
//! host.handle_pointer(PointerEvent::touch(1, PointerEventKind::Down, q)).unwrap();
//! host.handle_pointer(PointerEvent::touch(1, PointerEventKind::Up, q)).unwrap();
//! host.tick(timer::now());
//!
//! assert_eq!(host.editing().as_ref().unwrap().text, "Q");
//! ```

mod common;
mod error;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use tapboard_core::*;
use tapboard_ui::{
    EditingHost, KeyboardConfig, KeyboardLayout, KeyboardSurface, dispatch_to, layout_keys,
};
use web_time::Instant;

use crate::common::{Capture, as_cancel, captured_region, deliver};

pub use crate::error::HostError;

pub use tapboard_ui::create_keyboard_surface;

/// Host configuration. Sizes are window pixels.
#[derive(Clone, Debug)]
pub struct HostOptions {
    pub size_px: (f32, f32),
    pub layout: KeyboardLayout,
    pub config: KeyboardConfig,
    pub theme: KeyboardTheme,
    pub density: Density,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            size_px: (1080.0, 720.0),
            layout: KeyboardLayout::qwerty().clone(),
            config: KeyboardConfig::default(),
            theme: KeyboardTheme::default(),
            density: Density::default(),
        }
    }
}

/// Owns a mounted keyboard and routes platform input into it.
///
/// One pointer at a time: while a key is held, other pointers are ignored.
/// Sliding off the held key cancels it.
pub struct KeyboardHost<H: EditingHost + 'static> {
    root: Scope,
    surface: Option<KeyboardSurface>,
    editing: Rc<RefCell<H>>,
    options: HostOptions,
    frame: Option<Frame>,
    dirty: Rc<Cell<bool>>,
    capture: Option<Capture>,
}

impl<H: EditingHost + 'static> KeyboardHost<H> {
    pub fn new(editing: H, options: HostOptions) -> Self {
        let editing = Rc::new(RefCell::new(editing));
        let root = Scope::named("keyboard-host");

        let target = Rc::downgrade(&editing);
        let on_press = move |label: &str| {
            let Some(editing) = target.upgrade() else {
                return;
            };
            // Acquire the connection for this one edit only.
            match editing.try_borrow_mut() {
                Ok(mut host) => {
                    dispatch_to(&mut *host, label);
                }
                Err(_) => log::warn!("key {label:?} dropped: editing host is busy"),
            }
        };
        let surface = root.run(|| KeyboardSurface::new(options.layout.clone(), options.config, on_press));

        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        surface.observe(move || flag.set(true));

        log::info!(
            "keyboard host: {} rows, {:?} repeat policy",
            options.layout.row_count(),
            options.config.repeat_policy
        );

        Self {
            root,
            surface: Some(surface),
            editing,
            options,
            frame: None,
            dirty,
            capture: None,
        }
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    pub fn surface(&self) -> Option<&KeyboardSurface> {
        self.surface.as_ref()
    }

    pub fn editing(&self) -> Ref<'_, H> {
        self.editing.borrow()
    }

    /// Swap focus between fields, or clear it, between key presses.
    pub fn editing_mut(&self) -> RefMut<'_, H> {
        self.editing.borrow_mut()
    }

    pub fn is_shut_down(&self) -> bool {
        self.surface.is_none()
    }

    /// Whether key state changed since the last composed frame.
    pub fn needs_redraw(&self) -> bool {
        self.dirty.get()
    }

    pub fn resize(&mut self, size_px: (f32, f32)) {
        self.options.size_px = size_px;
        self.dirty.set(true);
    }

    /// The current frame, recomposed if any key changed.
    pub fn frame(&mut self) -> Result<&Frame, HostError> {
        self.recompose_if_needed()?;
        self.frame.as_ref().ok_or(HostError::ShutDown)
    }

    /// Centre of the key labelled `label`, in window pixels.
    pub fn key_center(&mut self, label: &str) -> Result<Option<Vec2>, HostError> {
        let tag = format!("key:{label}");
        Ok(self.frame()?.region(&tag).map(|h| h.rect.center()))
    }

    fn recompose_if_needed(&mut self) -> Result<(), HostError> {
        let Some(surface) = &self.surface else {
            return Err(HostError::ShutDown);
        };
        if !self.dirty.get() && self.frame.is_some() {
            return Ok(());
        }
        let HostOptions {
            size_px,
            theme,
            density,
            ..
        } = self.options;
        let frame = with_keyboard_theme(theme, || {
            with_density(density, || layout_keys(&surface.view(), size_px))
        })?;

        log::trace!("keyboard host: recomposed, {} regions", frame.hit_regions.len());
        self.frame = Some(frame);
        self.dirty.set(false);
        Ok(())
    }

    /// Route one pointer event. Returns whether a key consumed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, HostError> {
        self.recompose_if_needed()?;
        let Some(frame) = &self.frame else {
            return Err(HostError::ShutDown);
        };

        if let Some(capture) = &self.capture
            && capture.pointer != event.id
        {
            log::debug!("keyboard host: ignoring pointer {:?} while another is down", event.id);
            return Ok(false);
        }

        match event.event {
            PointerEventKind::Down => {
                if self.capture.is_some() {
                    return Ok(false);
                }
                let Some(hit) = frame.hit_test(event.position) else {
                    return Ok(false);
                };
                let hit = hit.clone();
                self.capture = Some(Capture::new(event.id, &hit));
                Ok(deliver(&hit, event))
            }
            PointerEventKind::Move => {
                let Some(capture) = &self.capture else {
                    return Ok(false);
                };
                let Some(hit) = captured_region(frame, capture).cloned() else {
                    self.capture = None;
                    return Ok(false);
                };
                if !hit.rect.contains(event.position) {
                    log::debug!("keyboard host: pointer left {:?}, cancelling", hit.tag);
                    self.capture = None;
                    deliver(&hit, as_cancel(event));
                }
                Ok(true)
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                let Some(capture) = self.capture.take() else {
                    return Ok(false);
                };
                let Some(hit) = captured_region(frame, &capture).cloned() else {
                    return Ok(false);
                };
                // A lift outside the key may arrive with no move before it.
                if event.event == PointerEventKind::Up && !hit.rect.contains(event.position) {
                    log::debug!("keyboard host: pointer lifted off {:?}, cancelling", hit.tag);
                    deliver(&hit, as_cancel(event));
                    return Ok(false);
                }
                Ok(deliver(&hit, event))
            }
        }
    }

    /// Advance the frame clock to `now`, running due key timers. Returns
    /// whether the keyboard needs to be redrawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.is_shut_down() {
            return false;
        }
        let ran = timer::advance_to(now);
        if ran > 0 {
            log::trace!("keyboard host: {ran} timer callbacks");
        }
        self.dirty.get()
    }

    /// When the host should tick next, if any key timer is pending.
    pub fn next_wakeup(&self) -> Option<Instant> {
        if self.is_shut_down() {
            return None;
        }
        timer::next_deadline()
    }

    /// Unmount the keyboard. Pending timers are cancelled and further input
    /// is rejected. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        // A key still held gets its cancel before the keys go away.
        if let Some(capture) = self.capture.take()
            && let Some(hit) = self
                .frame
                .as_ref()
                .and_then(|f| captured_region(f, &capture))
        {
            let cancel = PointerEvent {
                id: capture.pointer,
                kind: PointerKind::Touch,
                event: PointerEventKind::Cancel,
                position: hit.rect.center(),
            };
            deliver(hit, cancel);
        }
        surface.dispose();
        drop(surface);
        self.root.dispose();
        self.frame = None;
        log::info!("keyboard host: shut down");
    }
}

impl<H: EditingHost + 'static> Drop for KeyboardHost<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Install the platform logger: logcat on Android, `RUST_LOG`-driven stderr
/// elsewhere. Safe to call more than once.
pub fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("tapboard"),
        );
    }
    #[cfg(not(target_os = "android"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
