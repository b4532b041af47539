//! Event handling for the TUI
//!
//! Terminal events are polled on a blocking task and forwarded over a
//! channel. Image decoders push their results into the same channel, so the
//! main loop sees every state change as one ordered stream.

use crossterm::event::{
    self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::wizard::{ImageInfo, ViewKind};

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Periodic tick for status expiry and spinners
    Tick,
    /// Keyboard event
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// An image header finished decoding
    ImageDecoded {
        view: ViewKind,
        generation: u64,
        result: Result<ImageInfo, String>,
    },
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

/// Minimum interval between drag events (16ms = ~60fps)
const DRAG_THROTTLE_MS: u64 = 16;

impl EventHandler {
    /// Create a new event handler with the given tick rate in milliseconds
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (tx, rx) = mpsc::unbounded_channel();
        let poll_tx = tx.clone();

        // crossterm polling blocks, keep it off the async thread
        tokio::task::spawn_blocking(move || {
            let mut last_drag_time = Instant::now();
            let drag_throttle = Duration::from_millis(DRAG_THROTTLE_MS);

            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        // Release and repeat events are reported on some platforms
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(CrosstermEvent::Mouse(mouse)) => {
                            // Throttle drag events to prevent lag
                            if matches!(mouse.kind, MouseEventKind::Drag(_)) {
                                let now = Instant::now();
                                if now.duration_since(last_drag_time) < drag_throttle {
                                    continue;
                                }
                                last_drag_time = now;
                            }
                            Event::Mouse(mouse)
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                } else {
                    Event::Tick
                };
                if poll_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    /// Sender for producers outside the poll loop (image decoders)
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event
    pub async fn next(&mut self) -> anyhow::Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Event channel closed"))
    }
}

/// Read the dimensions of an image without decoding its pixels
pub fn decode_image(path: &Path) -> Result<ImageInfo, String> {
    image::image_dimensions(path)
        .map(|(width, height)| ImageInfo {
            source: path.to_path_buf(),
            width,
            height,
        })
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

/// Decode on the blocking pool and report back through `tx`
pub fn spawn_decode(
    tx: mpsc::UnboundedSender<Event>,
    view: ViewKind,
    generation: u64,
    path: std::path::PathBuf,
) {
    tokio::task::spawn_blocking(move || {
        let result = decode_image(&path);
        // Receiver gone means the app is shutting down
        let _ = tx.send(Event::ImageDecoded {
            view,
            generation,
            result,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reports_missing_file() {
        let err = decode_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.contains("not/here.png"));
    }

    #[test]
    fn test_decode_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paw.png");
        image::RgbImage::new(40, 30).save(&path).unwrap();

        let info = decode_image(&path).unwrap();
        assert_eq!((info.width, info.height), (40, 30));
        assert_eq!(info.source, path);
    }
}
