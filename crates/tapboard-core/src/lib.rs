//! # Timers, Scopes, and Signals
//!
//! Tapboard keeps its runtime small. Everything runs on the UI
//! thread and there are four pieces to know about:
//!
//! - `timer`: a thread-local frame clock with cancellable one-shot and
//!   repeating tasks.
//! - `Scope`: lifetime of mounted UI; disposers run on teardown.
//! - `effect` / `on_unmount`: side-effects that clean up with their scope.
//! - `Signal<T>`: observable value used for per-key visual state.
//!
//! ## Frame clock
//!
//! Timers never sleep. The host advances the clock once per frame and every
//! task whose deadline has passed runs, in deadline order:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tapboard_core::timer;
//! use web_time::Duration;
//!
//! let ticks = Rc::new(Cell::new(0));
//! let handle = timer::launch_every(Duration::from_millis(80), {
//!     let ticks = ticks.clone();
//!     move || ticks.set(ticks.get() + 1)
//! });
//!
//! timer::advance_by(Duration::from_millis(200));
//! assert_eq!(ticks.get(), 2);
//!
//! handle.cancel();
//! timer::advance_by(Duration::from_millis(200));
//! assert_eq!(ticks.get(), 2);
//! ```
//!
//! ## Scopes and effects
//!
//! A `Scope` owns disposers. Effects started while a scope is current are
//! torn down with it:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tapboard_core::*;
//!
//! let unmounted = Rc::new(Cell::new(false));
//! let scope = Scope::new();
//! scope.run(|| {
//!     let unmounted = unmounted.clone();
//!     effect(move || on_unmount(move || unmounted.set(true)));
//! });
//! scope.dispose();
//! assert!(unmounted.get());
//! ```
//!
//! Keys use this to guarantee that no repeat task outlives the button that
//! started it.

pub mod color;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod input;
pub mod modifier;
pub mod prelude;
pub mod scope;
pub mod signal;
pub mod tests;
pub mod theme;
pub mod timer;
pub mod view;

pub use color::*;
pub use effects::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use modifier::*;
pub use scope::*;
pub use signal::*;
pub use theme::*;
pub use timer::{TaskHandle, TaskSlot};
pub use view::*;

pub use taffy::{AlignItems, JustifyContent};
