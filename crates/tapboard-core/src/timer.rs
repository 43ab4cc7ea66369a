//! Frame clock and cancellable timers.
//!
//! Time only moves when the host calls [`advance_to`] (usually once per
//! frame with `Instant::now()`) or [`advance_by`] (tests). Due tasks run
//! strictly in `(deadline, schedule order)` order, and while a task runs the
//! clock reads that task's deadline, so timers scheduled from inside a
//! callback are measured from when the callback was due rather than from
//! when the host got around to running it.
//!
//! Repeating tasks are fixed-rate: a late frame runs every missed tick in
//! order instead of coalescing them.

use std::cell::RefCell;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

new_key_type! {
    /// Identity of a scheduled task. Stale ids never alias new tasks.
    pub struct TaskId;
}

thread_local! {
    static CLOCK: RefCell<FrameClock> = RefCell::new(FrameClock::new());
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

enum Action {
    Once(Box<dyn FnOnce()>),
    Every(Box<dyn FnMut()>),
}

struct Task {
    deadline: Instant,
    seq: u64,
    period: Option<Duration>,
    // Taken out while the callback runs so the clock is not borrowed.
    action: Option<Action>,
}

struct FrameClock {
    now: Instant,
    next_seq: u64,
    tasks: SlotMap<TaskId, Task>,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            now: Instant::now(),
            next_seq: 0,
            tasks: SlotMap::with_key(),
        }
    }

    fn seq(&mut self) -> u64 {
        let s = self.next_seq;
        self.next_seq += 1;
        s
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, action: Action) -> TaskId {
        let deadline = deadline_after(self.now, delay);
        let seq = self.seq();
        self.tasks.insert(Task {
            deadline,
            seq,
            period,
            action: Some(action),
        })
    }

    /// Earliest runnable task due at or before `target`.
    fn next_due(&self, target: Instant) -> Option<TaskId> {
        self.tasks
            .iter()
            .filter(|(_, t)| t.action.is_some() && t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(id, _)| id)
    }
}

/// `from + delay`, saturating at the latest representable instant so an
/// absurd delay parks the task instead of overflowing.
fn deadline_after(from: Instant, delay: Duration) -> Instant {
    if let Some(t) = from.checked_add(delay) {
        return t;
    }
    let mut step = delay;
    let mut t = from;
    while !step.is_zero() {
        step /= 2;
        if let Some(next) = t.checked_add(step) {
            t = next;
        }
    }
    t
}

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task; owners cancel explicitly,
/// usually from a scope disposer.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a task that is never cancelled keeps running until it completes"]
pub struct TaskHandle {
    id: TaskId,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task. Safe to call repeatedly, and from inside the task's
    /// own callback.
    pub fn cancel(&self) {
        let removed = CLOCK.with(|c| c.borrow_mut().tasks.remove(self.id).is_some());
        if removed {
            log::trace!("timer: cancelled {:?}", self.id);
        }
    }

    /// `false` once a one-shot task has fired or any task was cancelled.
    pub fn is_active(&self) -> bool {
        CLOCK.with(|c| c.borrow().tasks.contains_key(self.id))
    }
}

/// Holds at most one task. Installing a new task cancels the previous one.
#[derive(Debug, Default)]
pub struct TaskSlot(RefCell<Option<TaskHandle>>);

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, handle: TaskHandle) {
        if let Some(old) = self.0.borrow_mut().replace(handle) {
            old.cancel();
        }
    }

    pub fn cancel(&self) {
        if let Some(old) = self.0.borrow_mut().take() {
            old.cancel();
        }
    }

    /// Whether the held task is still scheduled.
    pub fn is_active(&self) -> bool {
        self.0.borrow().as_ref().is_some_and(TaskHandle::is_active)
    }
}

/// Current frame time.
pub fn now() -> Instant {
    CLOCK.with(|c| c.borrow().now)
}

/// Run `f` once, `delay` after the current frame time.
pub fn launch_after(delay: Duration, f: impl FnOnce() + 'static) -> TaskHandle {
    let id = CLOCK.with(|c| {
        c.borrow_mut()
            .insert(delay, None, Action::Once(Box::new(f)))
    });
    log::trace!("timer: {id:?} once after {delay:?}");
    TaskHandle { id }
}

/// Run `f` every `period`, first after one full period.
///
/// Periods shorter than a millisecond are clamped so a tick can never
/// reschedule itself at the same instant.
pub fn launch_every(period: Duration, f: impl FnMut() + 'static) -> TaskHandle {
    let period = period.max(MIN_PERIOD);
    let id = CLOCK.with(|c| {
        c.borrow_mut()
            .insert(period, Some(period), Action::Every(Box::new(f)))
    });
    log::trace!("timer: {id:?} every {period:?}");
    TaskHandle { id }
}

/// Advance the clock to `target`, running every task that falls due on the
/// way. Returns the number of callbacks run.
///
/// A `target` earlier than the current frame time runs nothing.
pub fn advance_to(target: Instant) -> usize {
    let mut ran = 0;
    loop {
        let step = CLOCK.with(|c| {
            let mut c = c.borrow_mut();
            let id = c.next_due(target)?;
            let seq = c.seq();
            let task = c.tasks.get_mut(id)?;
            let deadline = task.deadline;
            let action = task.action.take()?;
            if let Some(period) = task.period {
                task.deadline = deadline_after(deadline, period);
                task.seq = seq;
            } else {
                c.tasks.remove(id);
            }
            if deadline > c.now {
                c.now = deadline;
            }
            Some((id, action))
        });

        let Some((id, action)) = step else { break };
        ran += 1;

        match action {
            Action::Once(f) => f(),
            Action::Every(mut f) => {
                f();
                // Put the callback back unless the task was cancelled meanwhile.
                CLOCK.with(|c| {
                    if let Some(task) = c.borrow_mut().tasks.get_mut(id) {
                        task.action = Some(Action::Every(f));
                    }
                });
            }
        }
    }

    CLOCK.with(|c| {
        let mut c = c.borrow_mut();
        if target > c.now {
            c.now = target;
        }
    });
    ran
}

/// Advance the clock by `d` from the current frame time.
pub fn advance_by(d: Duration) -> usize {
    advance_to(deadline_after(now(), d))
}

/// Deadline of the earliest pending task, for hosts that sleep between
/// frames.
pub fn next_deadline() -> Option<Instant> {
    CLOCK.with(|c| {
        c.borrow()
            .tasks
            .values()
            .filter(|t| t.action.is_some())
            .map(|t| t.deadline)
            .min()
    })
}

/// Number of scheduled tasks (one-shot and repeating).
pub fn pending() -> usize {
    CLOCK.with(|c| c.borrow().tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |tag: &'static str| {
                let log = log.clone();
                Box::new(move || log.borrow_mut().push(tag)) as Box<dyn Fn()>
            }
        };
        (log, make)
    }

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let (log, make) = recorder();
        let cb = make("a");
        let h = launch_after(Duration::from_millis(120), move || cb());

        assert_eq!(advance_by(Duration::from_millis(119)), 0);
        assert!(h.is_active());
        assert_eq!(advance_by(Duration::from_millis(1)), 1);
        assert!(!h.is_active());
        advance_by(Duration::from_millis(500));
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn repeating_runs_missed_ticks_in_order() {
        let (log, make) = recorder();
        let cb = make("tick");
        let h = launch_every(Duration::from_millis(80), move || cb());

        // One late frame covering three periods.
        assert_eq!(advance_by(Duration::from_millis(250)), 3);
        assert_eq!(log.borrow().len(), 3);
        h.cancel();
        assert_eq!(pending(), 0);
    }

    #[test]
    fn ties_run_in_schedule_order() {
        let (log, make) = recorder();
        let (a, b) = (make("a"), make("b"));
        let _h1 = launch_after(Duration::from_millis(10), move || a());
        let _h2 = launch_after(Duration::from_millis(10), move || b());
        advance_by(Duration::from_millis(10));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn repeating_task_can_cancel_itself() {
        let count = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<TaskHandle>>> = Rc::new(RefCell::new(None));
        let h = launch_every(Duration::from_millis(10), {
            let count = count.clone();
            let slot = slot.clone();
            move || {
                *count.borrow_mut() += 1;
                if *count.borrow() == 2 {
                    if let Some(h) = slot.borrow().as_ref() {
                        h.cancel();
                    }
                }
            }
        });
        *slot.borrow_mut() = Some(h);

        advance_by(Duration::from_millis(100));
        assert_eq!(*count.borrow(), 2);
        assert_eq!(pending(), 0);
    }

    #[test]
    fn clock_reads_deadline_inside_callbacks() {
        let start = now();
        let seen = Rc::new(RefCell::new(None));
        let _h = launch_after(Duration::from_millis(30), {
            let seen = seen.clone();
            move || *seen.borrow_mut() = Some(now())
        });
        advance_by(Duration::from_millis(100));
        assert_eq!(*seen.borrow(), Some(start + Duration::from_millis(30)));
        assert_eq!(now(), start + Duration::from_millis(100));
    }

    #[test]
    fn slot_keeps_a_single_task() {
        let (log, make) = recorder();
        let slot = TaskSlot::new();
        let (a, b) = (make("a"), make("b"));
        slot.replace(launch_every(Duration::from_millis(10), move || a()));
        slot.replace(launch_every(Duration::from_millis(10), move || b()));
        assert_eq!(pending(), 1);

        advance_by(Duration::from_millis(20));
        assert_eq!(*log.borrow(), vec!["b", "b"]);

        slot.cancel();
        assert!(!slot.is_active());
        assert_eq!(pending(), 0);
    }

    #[test]
    fn nested_schedule_is_relative_to_firing_time() {
        let (log, make) = recorder();
        let inner = Rc::new(make("inner"));
        let _h = launch_after(Duration::from_millis(50), {
            let inner = inner.clone();
            move || {
                let inner = inner.clone();
                let _ = launch_after(Duration::from_millis(50), move || inner());
            }
        });
        // Both the outer (t=50) and the inner (t=100) fit in one advance.
        advance_by(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["inner"]);
        assert_eq!(next_deadline(), None);
    }

    #[test]
    fn huge_delay_parks_the_task_instead_of_overflowing() {
        let (log, make) = recorder();
        let cb = make("never");
        let h = launch_after(Duration::MAX, move || cb());

        let parked = next_deadline().expect("task is scheduled");
        assert!(parked > now());
        advance_by(Duration::from_secs(3600));
        assert!(h.is_active());
        assert!(log.borrow().is_empty());
        h.cancel();
    }
}
