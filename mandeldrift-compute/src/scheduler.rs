//! Tick scheduling.
//!
//! The renderer never calls a platform animation API directly; it asks a
//! [`Scheduler`] for the next tick. Browsers use `requestAnimationFrame`
//! (see `web::RafScheduler`); tests and headless hosts step a
//! [`ManualScheduler`] by hand.

use crate::frame_buffer::FrameSink;
use crate::renderer::RendererState;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Receives the tick timestamp in milliseconds.
pub type TickCallback = Box<dyn FnOnce(f64)>;

pub trait Scheduler {
    fn request_next_tick(&self, callback: TickCallback);
}

/// Runs queued callbacks on demand with a fixed frame interval.
pub struct ManualScheduler {
    queue: RefCell<VecDeque<TickCallback>>,
    now_ms: Cell<f64>,
    interval_ms: f64,
}

impl ManualScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            now_ms: Cell::new(0.0),
            interval_ms,
        }
    }

    /// 60Hz cadence.
    pub fn display_rate() -> Self {
        Self::new(1000.0 / 60.0)
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire the oldest queued callback. Returns false if nothing was queued.
    pub fn step(&self) -> bool {
        let Some(callback) = self.queue.borrow_mut().pop_front() else {
            return false;
        };
        let now = self.now_ms.get() + self.interval_ms;
        self.now_ms.set(now);
        callback(now);
        true
    }

    /// Step up to `ticks` times; returns how many callbacks ran.
    pub fn run(&self, ticks: usize) -> usize {
        (0..ticks).take_while(|_| self.step()).count()
    }
}

impl Scheduler for ManualScheduler {
    fn request_next_tick(&self, callback: TickCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Stops a loop started by [`drive`].
#[derive(Clone, Debug)]
pub struct AnimationHandle {
    running: Rc<Cell<bool>>,
}

impl AnimationHandle {
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Tick `state` on every opportunity `scheduler` offers until the returned
/// handle is stopped.
pub fn drive<S, K>(
    state: Rc<RefCell<RendererState>>,
    scheduler: Rc<S>,
    sink: Rc<RefCell<K>>,
) -> AnimationHandle
where
    S: Scheduler + 'static,
    K: FrameSink + 'static,
{
    let running = Rc::new(Cell::new(true));
    schedule_tick(state, scheduler, sink, Rc::clone(&running));
    AnimationHandle { running }
}

fn schedule_tick<S, K>(
    state: Rc<RefCell<RendererState>>,
    scheduler: Rc<S>,
    sink: Rc<RefCell<K>>,
    running: Rc<Cell<bool>>,
) where
    S: Scheduler + 'static,
    K: FrameSink + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_next_tick(Box::new(move |time_ms| {
        if !running.get() {
            return;
        }
        state.borrow_mut().tick(time_ms, &mut *sink.borrow_mut());
        schedule_tick(state, next, sink, running);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_buffer::NullSink;
    use mandeldrift_core::BackgroundConfig;

    fn state() -> Rc<RefCell<RendererState>> {
        let mut state = RendererState::new(BackgroundConfig::default()).unwrap();
        state.resize(64, 48);
        Rc::new(RefCell::new(state))
    }

    #[test]
    fn manual_scheduler_runs_callbacks_in_order() {
        let scheduler = ManualScheduler::new(10.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in 0..3 {
            let seen = Rc::clone(&seen);
            scheduler.request_next_tick(Box::new(move |t| seen.borrow_mut().push((id, t))));
        }
        assert_eq!(scheduler.run(5), 3);
        assert_eq!(*seen.borrow(), vec![(0, 10.0), (1, 20.0), (2, 30.0)]);
        assert!(!scheduler.step());
    }

    #[test]
    fn drive_keeps_requesting_ticks() {
        let scheduler = Rc::new(ManualScheduler::display_rate());
        let state = state();
        let handle = drive(
            Rc::clone(&state),
            Rc::clone(&scheduler),
            Rc::new(RefCell::new(NullSink)),
        );

        assert_eq!(scheduler.run(12), 12);
        assert_eq!(scheduler.pending(), 1);
        assert!(handle.is_running());
        assert_eq!(state.borrow().stats().tick, 12);
        assert_eq!(state.borrow().stats().frames_completed, 3);
    }

    #[test]
    fn stopped_loop_ticks_no_more() {
        let scheduler = Rc::new(ManualScheduler::display_rate());
        let state = state();
        let handle = drive(
            Rc::clone(&state),
            Rc::clone(&scheduler),
            Rc::new(RefCell::new(NullSink)),
        );

        scheduler.run(3);
        handle.stop();
        scheduler.run(10);

        assert_eq!(state.borrow().stats().tick, 3);
        assert_eq!(scheduler.pending(), 0);
    }
}
