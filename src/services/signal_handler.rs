//! Terminal resize notifications
//!
//! On Unix a dedicated thread waits for SIGWINCH. Elsewhere, or when the
//! handler cannot be registered, a thread polls the terminal size instead.
//! Either way each notification is a `try_send` into a capacity-1 channel, so
//! a burst of resizes before the next redraw collapses into one marker.

use crate::services::terminal_modes::terminal_size;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(unix)]
use signal_hook::consts::signal::SIGWINCH;
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// How often the fallback listener compares terminal sizes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Capacity-1 channel carrying resize markers.
pub fn resize_channel() -> (Sender<()>, Receiver<()>) {
    bounded(1)
}

/// Queue a resize marker unless one is already pending.
pub fn notify_resize(tx: &Sender<()>) {
    let _ = tx.try_send(());
}

enum Source {
    #[cfg(unix)]
    Signal(signal_hook::iterator::Handle),
    Polling(Arc<AtomicBool>),
}

/// Owns the listener thread; dropping it stops and joins the thread.
pub struct ResizeListener {
    source: Source,
    thread: Option<JoinHandle<()>>,
}

impl ResizeListener {
    /// Listen for resizes with the best mechanism available on this platform.
    pub fn start(tx: Sender<()>) -> io::Result<Self> {
        #[cfg(unix)]
        {
            match Self::signal(tx.clone()) {
                Ok(listener) => return Ok(listener),
                Err(e) => {
                    tracing::warn!("SIGWINCH unavailable, polling terminal size: {}", e);
                }
            }
        }
        Self::polling(tx, POLL_INTERVAL, terminal_size)
    }

    #[cfg(unix)]
    fn signal(tx: Sender<()>) -> io::Result<Self> {
        let mut signals = Signals::new([SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("pm-resize".into())
            .spawn(move || {
                for _ in signals.forever() {
                    notify_resize(&tx);
                }
            })?;
        tracing::debug!("Listening for SIGWINCH");
        Ok(Self {
            source: Source::Signal(handle),
            thread: Some(thread),
        })
    }

    /// Compare `size()` every `interval` and notify when it changes.
    pub fn polling<F>(tx: Sender<()>, interval: Duration, size: F) -> io::Result<Self>
    where
        F: Fn() -> (u16, u16) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let thread = thread::Builder::new()
            .name("pm-resize-poll".into())
            .spawn(move || {
                let mut last = size();
                while !thread_stop.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    let current = size();
                    if current != last {
                        last = current;
                        notify_resize(&tx);
                    }
                }
            })?;
        tracing::debug!("Polling terminal size every {:?}", interval);
        Ok(Self {
            source: Source::Polling(stop),
            thread: Some(thread),
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        match &self.source {
            #[cfg(unix)]
            Source::Signal(handle) => handle.close(),
            Source::Polling(stop) => stop.store(true, Ordering::Relaxed),
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU16;

    #[test]
    fn test_burst_collapses_to_one_marker() {
        let (tx, rx) = resize_channel();
        notify_resize(&tx);
        notify_resize(&tx);
        notify_resize(&tx);
        assert_eq!(rx.len(), 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_polling_notices_size_change() {
        let (tx, rx) = resize_channel();
        let cols = Arc::new(AtomicU16::new(80));
        let reported = cols.clone();
        let listener = ResizeListener::polling(tx, Duration::from_millis(5), move || {
            (reported.load(Ordering::SeqCst), 24)
        })
        .unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        cols.store(120, Ordering::SeqCst);
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        drop(listener);
    }

    #[test]
    fn test_drop_stops_polling_thread() {
        let (tx, rx) = resize_channel();
        let listener =
            ResizeListener::polling(tx, Duration::from_millis(1), || (80, 24)).unwrap();
        drop(listener);
        // the thread owned the only sender
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(1)),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected)
        ));
    }
}
