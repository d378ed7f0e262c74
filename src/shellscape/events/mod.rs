use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, error, info, warn};

/// Enum representing the types of terminal events for Shellscape.
#[derive(Clone, PartialEq, Debug)]
pub enum ShellscapeTerminalEvents {
    /// Redraw interval elapsed.
    Tick,
    /// Key press.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
}

/// Background task forwarding crossterm input and ticks into the shellscape channel.
#[derive(Debug)]
pub struct ShellscapeEvents {
    handler: JoinHandle<()>,
}

impl ShellscapeEvents {
    /// Spawns the reader task; a `Tick` is sent every `tick_rate` milliseconds.
    pub fn new(tick_rate: u64, sender: UnboundedSender<ShellscapeTerminalEvents>) -> Self {
        let tick_rate = tokio::time::Duration::from_millis(tick_rate);

        let handler = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            info!(
                "Shellscape terminal events handler started with tick rate of {} ms",
                tick_rate.as_millis()
            );

            loop {
                let tick_delay = tick.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = sender.closed() => {
                        warn!("Shellscape terminal events handler detected that the sender channel is closed. Exiting loop.");

                        break;
                    }
                    _ = tick_delay => {
                        if let Err(err) = sender.send(ShellscapeTerminalEvents::Tick) {
                            error!("Failed to send Tick event to Shellscape terminal event receiver: {}", err);
                        }
                    }
                    Some(Ok(event)) = crossterm_event => {
                        if let Some(event) = Self::convert(event) {
                            if let Err(err) = sender.send(event) {
                                error!("Failed to forward terminal event to Shellscape receiver: {}", err);
                            }
                        }
                    }
                }
            }
        });

        Self { handler }
    }

    /// Keeps key presses and resizes; releases, repeats, mouse and focus events are dropped.
    fn convert(event: CrosstermEvent) -> Option<ShellscapeTerminalEvents> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                debug!("Key event {:?} forwarded", key);

                Some(ShellscapeTerminalEvents::Key(key))
            }
            CrosstermEvent::Resize(width, height) => {
                Some(ShellscapeTerminalEvents::Resize(width, height))
            }
            _ => None,
        }
    }

    pub fn abort(&self) {
        self.handler.abort();
    }
}
