//! Background battery polling.
//!
//! Moves a begun `BatteryReader` into a dedicated thread, which takes one
//! status snapshot per interval and publishes the newest one through a
//! bounded channel. The reader is only ever touched by that thread.
//!
//! Each `Monitor` owns exactly one thread, shut down and joined on drop.
use battmon_traits::clock::Clock;
use battmon_traits::{Adc, Calibrator};
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::reader::BatteryReader;
use crate::status::BatteryStatus;

/// Longest single sleep between shutdown checks.
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

pub struct Monitor {
    rx: xch::Receiver<BatteryStatus>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Monitor {
    pub fn spawn<A, K, C>(mut reader: BatteryReader<A, K>, interval: Duration, clock: C) -> Self
    where
        A: Adc + Send + 'static,
        K: Calibrator + Send + 'static,
        K::Chars: Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded(1);
        // Lets the producer discard a stale snapshot instead of blocking on a full slot
        let stale_rx = rx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("monitor thread received shutdown signal");
                    break;
                }

                match reader.status() {
                    Ok(status) => {
                        if let Err(xch::TrySendError::Full(status)) = tx.try_send(status) {
                            let _ = stale_rx.try_recv();
                            let _ = tx.try_send(status);
                        }
                        last_ok_clone.store(clock.ms_since(epoch), Ordering::Relaxed);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "battery read failed");
                    }
                }

                sleep_unless_shutdown(&clock, interval, &shutdown_clone);
            }
            tracing::trace!("monitor thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Newest snapshot published since the last call, if any.
    pub fn latest(&self) -> Option<BatteryStatus> {
        self.rx.try_iter().last()
    }

    /// Block up to `timeout` for the next snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BatteryStatus> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Milliseconds between `now_ms` (relative to the monitor epoch) and the last good read.
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// `stalled_for` measured against a real monotonic clock.
    pub fn stalled_for_now(&self) -> u64 {
        let now_ms = {
            let dur = Instant::now().saturating_duration_since(self.epoch);
            dur.as_millis().min(u128::from(u64::MAX)) as u64
        };
        self.stalled_for(now_ms)
    }
}

fn sleep_unless_shutdown<C: Clock>(clock: &C, total: Duration, shutdown: &AtomicBool) {
    let mut left = total;
    while !left.is_zero() {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        let step = left.min(SHUTDOWN_POLL);
        clock.sleep(step);
        left -= step;
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits after the batch in flight (a few ms) or within one
        // shutdown poll if it is sleeping.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("monitor thread joined");
                }
                Err(e) => {
                    tracing::warn!(?e, "monitor thread panicked during shutdown");
                }
            }
        }
    }
}
