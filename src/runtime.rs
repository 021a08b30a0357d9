use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::session::SessionController;

/// Unified event type consumed by the game loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MixEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Err(Timeout) if nothing arrived in time.
    fn recv_timeout(&self, timeout: Duration) -> Result<MixEvent, RecvTimeoutError>;
}

/// Production event source; a background thread forwards crossterm events.
pub struct CrosstermEventSource {
    rx: Receiver<MixEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // key release/repeat kinds are only reported on some platforms
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(MixEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(MixEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    debug!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<MixEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-backed source for headless tests
pub struct TestEventSource {
    rx: Receiver<MixEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<MixEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<MixEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Replays a fixed list of events and never blocks. Once empty it reports
/// timeouts, which the runner turns into ticks.
#[derive(Default)]
pub struct ScriptedEventSource {
    events: RefCell<VecDeque<MixEvent>>,
}

impl ScriptedEventSource {
    pub fn new<I: IntoIterator<Item = MixEvent>>(events: I) -> Self {
        Self {
            events: RefCell::new(events.into_iter().collect()),
        }
    }

    pub fn push(&self, ev: MixEvent) {
        self.events.borrow_mut().push_back(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSource for ScriptedEventSource {
    fn recv_timeout(&self, _timeout: Duration) -> Result<MixEvent, RecvTimeoutError> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or(RecvTimeoutError::Timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the game one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    pub fn event_source(&self) -> &E {
        &self.event_source
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> MixEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => MixEvent::Tick,
        }
    }

    /// Step once and let the session catch up with its round clock.
    ///
    /// The round timer follows the session's clock, not the number of ticks,
    /// so a slow frame never loses or duplicates seconds.
    pub fn step_session<C: Clock>(&self, session: &mut SessionController<C>) -> MixEvent {
        let ev = self.step();
        let ticks = session.pump();
        if ticks > 0 {
            trace!(ticks, time_left = session.state().time_left, "round clock advanced");
        }
        ev
    }
}
