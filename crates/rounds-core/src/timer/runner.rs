//! Countdown task driving a [`TimerEngine`] in real time.
//!
//! The runner owns at most one tokio task per timer. Pausing cancels that
//! task; the engine keeps its counters, so starting again resumes exactly
//! where the countdown stopped. Events are fanned out over a broadcast
//! channel and cue events are handed to the [`CuePlayer`].
//!
//! Events are published while the engine lock is held, and every command
//! that cancels the task bumps a generation counter the task checks under
//! that lock. A task that was already waiting on the lock when it got
//! aborted therefore cannot tick or publish after the command's events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::cue::CuePlayer;
use super::engine::{TimerEngine, TimerState, Timings};
use crate::events::Event;

const EVENT_CAPACITY: usize = 256;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct TimerRunner {
    engine: Arc<Mutex<TimerEngine>>,
    events: broadcast::Sender<Event>,
    player: Arc<dyn CuePlayer>,
    tick_interval: Duration,
    task: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl TimerRunner {
    pub fn new(engine: TimerEngine, player: Arc<dyn CuePlayer>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
            player,
            tick_interval: DEFAULT_TICK_INTERVAL,
            task: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Length of one countdown second. Only useful for tests and demos.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Event {
        self.engine().snapshot()
    }

    pub fn state(&self) -> TimerState {
        self.engine().state()
    }

    /// Read the engine under the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&TimerEngine) -> R) -> R {
        f(&*self.engine())
    }

    /// Whether a countdown task is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Vec<Event> {
        self.cancel_task();
        let (events, running) = {
            let mut engine = self.engine();
            let events = engine.start();
            self.publish(&events);
            (events, engine.state() == TimerState::Running)
        };
        if running {
            self.spawn_countdown();
        }
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.cancel_task();
        self.apply(TimerEngine::pause)
    }

    /// Pause when running, resume when paused.
    pub fn toggle(&mut self) -> Vec<Event> {
        match self.state() {
            TimerState::Running => self.pause(),
            _ => self.start(),
        }
    }

    /// Cancel the countdown task, leaving the engine untouched.
    pub fn stop(&mut self) {
        self.cancel_task();
    }

    pub fn skip(&mut self) -> Vec<Event> {
        // The next phase gets a full first second.
        self.cancel_task();
        let (events, running) = {
            let mut engine = self.engine();
            let events = engine.skip();
            self.publish(&events);
            (events, engine.state() == TimerState::Running)
        };
        if running {
            self.spawn_countdown();
        }
        events
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.cancel_task();
        self.apply(TimerEngine::reset)
    }

    pub fn set_timings(&mut self, timings: Timings) -> Vec<Event> {
        self.cancel_task();
        self.apply(|engine| engine.set_timings(timings))
    }

    /// Wait until the countdown task ends (finished, paused or stopped).
    pub async fn wait_finished(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!("countdown task failed: {e}");
                }
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn engine(&self) -> MutexGuard<'_, TimerEngine> {
        lock(&self.engine)
    }

    fn publish(&self, events: &[Event]) {
        dispatch(events, &self.events, self.player.as_ref());
    }

    /// Run a command on the engine and publish its events under the lock.
    fn apply(&self, command: impl FnOnce(&mut TimerEngine) -> Vec<Event>) -> Vec<Event> {
        let mut engine = self.engine();
        let events = command(&mut *engine);
        self.publish(&events);
        events
    }

    fn cancel_task(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_countdown(&mut self) {
        let engine = Arc::clone(&self.engine);
        let tx = self.events.clone();
        let player = Arc::clone(&self.player);
        let period = self.tick_interval;
        let generation = Arc::clone(&self.generation);
        let current = generation.load(Ordering::SeqCst);

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let running = {
                    let mut engine = lock(&engine);
                    if generation.load(Ordering::SeqCst) != current {
                        break;
                    }
                    let events = engine.tick();
                    dispatch(&events, &tx, player.as_ref());
                    engine.state() == TimerState::Running
                };
                if !running {
                    tracing::debug!("countdown task exiting");
                    break;
                }
            }
        }));
    }
}

impl Drop for TimerRunner {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

fn lock(engine: &Mutex<TimerEngine>) -> MutexGuard<'_, TimerEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

fn dispatch(events: &[Event], tx: &broadcast::Sender<Event>, player: &dyn CuePlayer) {
    for event in events {
        if let Some(cue) = event.cue() {
            player.play(cue);
        }
        tracing::trace!(?event, "timer event");
        // No subscribers is fine.
        let _ = tx.send(event.clone());
    }
}
