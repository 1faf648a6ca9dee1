//! Runs a synchronizer against wall time and a media host.

use crate::{PlaybackEffect, PlaybackEvent, PlaybackSynchronizer};
use std::time::Duration;
use storyboard_error::{PlaybackError, PlaybackErrorKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Whatever presents playback: an audio element and an image view.
///
/// Hosts report audio progress back through the handle, echoing the
/// [`LoadTicket`](crate::LoadTicket) of the load they refer to.
pub trait MediaHost: Send + 'static {
    /// Carry out one effect.
    fn apply(&mut self, effect: PlaybackEffect, handle: &PlaybackHandle);
}

/// Sends inputs to a running driver.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    sender: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackHandle {
    /// Queue an input.
    #[track_caller]
    pub fn send(&self, event: PlaybackEvent) -> Result<(), PlaybackError> {
        self.sender
            .send(event)
            .map_err(|_| PlaybackError::new(PlaybackErrorKind::SessionClosed))
    }

    /// User play/pause gesture.
    pub fn toggle_play(&self) -> Result<(), PlaybackError> {
        self.send(PlaybackEvent::TogglePlay)
    }

    /// Jump forward.
    pub fn next(&self) -> Result<(), PlaybackError> {
        self.send(PlaybackEvent::Next)
    }

    /// Jump back.
    pub fn previous(&self) -> Result<(), PlaybackError> {
        self.send(PlaybackEvent::Previous)
    }

    /// Stop audio and end the session. Closing twice is harmless.
    pub fn close(&self) -> Result<(), PlaybackError> {
        match self.send(PlaybackEvent::Close) {
            Err(e) if e.kind == PlaybackErrorKind::SessionClosed => Ok(()),
            other => other,
        }
    }
}

/// Tokio task owning one playback session.
///
/// The driver is the only owner of the session's audio: it starts the
/// session on spawn and exits after `Close`, handing the host back.
/// Dropping every [`PlaybackHandle`] closes the session as well.
pub struct PlaybackDriver<H> {
    synchronizer: PlaybackSynchronizer,
    host: H,
    events: mpsc::UnboundedReceiver<PlaybackEvent>,
    sender: mpsc::WeakUnboundedSender<PlaybackEvent>,
}

impl<H: MediaHost> PlaybackDriver<H> {
    /// Create a driver and the handle that feeds it.
    pub fn new(synchronizer: PlaybackSynchronizer, host: H) -> (Self, PlaybackHandle) {
        let (sender, events) = mpsc::unbounded_channel();
        let driver = Self {
            synchronizer,
            host,
            events,
            sender: sender.downgrade(),
        };
        (driver, PlaybackHandle { sender })
    }

    /// Start playback on a new task.
    pub fn spawn(synchronizer: PlaybackSynchronizer, host: H) -> (PlaybackHandle, JoinHandle<H>) {
        let (driver, handle) = Self::new(synchronizer, host);
        (handle, tokio::spawn(driver.run()))
    }

    /// Run until the session is closed.
    #[instrument(skip(self), name = "playback_driver")]
    pub async fn run(mut self) -> H {
        let origin = Instant::now();
        let effects = self
            .synchronizer
            .handle(PlaybackEvent::Start, elapsed_ms(origin));
        self.dispatch(effects);

        loop {
            let due = self.synchronizer.advance_to(elapsed_ms(origin));
            self.dispatch(due);
            if self.synchronizer.is_closed() {
                break;
            }

            let deadline = self.synchronizer.next_deadline();
            let wake = origin + Duration::from_millis(deadline.unwrap_or(0));
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else {
                        debug!("All playback handles dropped");
                        let effects = self
                            .synchronizer
                            .handle(PlaybackEvent::Close, elapsed_ms(origin));
                        self.dispatch(effects);
                        break;
                    };
                    let effects = self.synchronizer.handle(event, elapsed_ms(origin));
                    self.dispatch(effects);
                }
                _ = tokio::time::sleep_until(wake), if deadline.is_some() => {}
            }
        }
        debug!("Playback driver stopped");
        self.host
    }

    fn dispatch(&mut self, effects: Vec<PlaybackEffect>) {
        if effects.is_empty() {
            return;
        }
        // With no handles left the host gets one whose sends report a
        // closed session.
        let handle = match self.sender.upgrade() {
            Some(sender) => PlaybackHandle { sender },
            None => PlaybackHandle {
                sender: mpsc::unbounded_channel().0,
            },
        };
        for effect in effects {
            self.host.apply(effect, &handle);
        }
    }
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}
