use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the screen ticks the timer when no key arrives.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Unified event type consumed by the screen loop
#[derive(Clone, Debug)]
pub enum ScreenEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<ScreenEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a helper thread
pub struct CrosstermEventSource {
    rx: Receiver<ScreenEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => ScreenEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => ScreenEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ScreenEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for tests
#[cfg(test)]
pub struct ChannelEventSource {
    rx: Receiver<ScreenEvent>,
}

#[cfg(test)]
impl ChannelEventSource {
    pub fn new(rx: Receiver<ScreenEvent>) -> Self {
        Self { rx }
    }
}

#[cfg(test)]
impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ScreenEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the screen one event or tick at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, interval: Duration) -> Self {
        Self {
            event_source,
            interval,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> ScreenEvent {
        match self.event_source.recv_timeout(self.interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => ScreenEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));
        assert!(matches!(runner.step(), ScreenEvent::Tick));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(ScreenEvent::Resize).unwrap();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(10));
        assert!(matches!(runner.step(), ScreenEvent::Resize));
    }
}
