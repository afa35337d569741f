//! Upload progress accounting and the per-upload state machine.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// State of one upload session.
///
/// Transitions: Idle → RequestingAuth → Uploading(0..=100) →
/// {Succeeded | Failed | Cancelled}. Once the authorization is obtained the
/// session always passes through Uploading; the three final states are
/// terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    RequestingAuth,
    Uploading(u8),
    Succeeded(String),
    Failed(String),
    Cancelled,
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Succeeded(_) | UploadState::Failed(_) | UploadState::Cancelled
        )
    }

    /// Current progress percentage, when in or past the transfer phase.
    pub fn progress(&self) -> Option<u8> {
        match self {
            UploadState::Uploading(pct) => Some(*pct),
            UploadState::Succeeded(_) => Some(100),
            _ => None,
        }
    }
}

/// Byte counter producing monotonically non-decreasing percentages in [0,100].
///
/// `record` is called from the streaming body as chunks are handed to the
/// transport; it reports a percentage only when it increased, so observers
/// never see progress move backwards.
#[derive(Debug)]
pub struct ProgressMeter {
    total_bytes: u64,
    sent: AtomicU64,
    last_pct: AtomicU8,
}

impl ProgressMeter {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            sent: AtomicU64::new(0),
            last_pct: AtomicU8::new(0),
        }
    }

    /// Account for newly sent bytes. Returns the updated percentage when it
    /// increased, None otherwise.
    pub fn record(&self, bytes: u64) -> Option<u8> {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let pct = if self.total_bytes == 0 {
            100
        } else {
            ((sent.saturating_mul(100)) / self.total_bytes).min(100) as u8
        };

        let mut prev = self.last_pct.load(Ordering::Relaxed);
        loop {
            if pct <= prev {
                return None;
            }
            match self.last_pct.compare_exchange_weak(
                prev,
                pct,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Some(pct),
                Err(current) => prev = current,
            }
        }
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.last_pct.load(Ordering::Relaxed)
    }

    /// Total bytes accounted for so far.
    pub fn bytes_sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotone_and_reaches_100() {
        let meter = ProgressMeter::new(1000);
        let mut reported = Vec::new();

        for _ in 0..10 {
            if let Some(pct) = meter.record(100) {
                reported.push(pct);
            }
        }

        assert!(reported.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*reported.last().unwrap(), 100);
        assert!(reported.iter().all(|&p| p <= 100));
    }

    #[test]
    fn progress_never_exceeds_100_on_overcount() {
        let meter = ProgressMeter::new(100);
        meter.record(100);
        // A transport retry or boundary bytes must not push past 100.
        assert_eq!(meter.record(50), None);
        assert_eq!(meter.percent(), 100);
    }

    #[test]
    fn empty_file_reports_100_immediately() {
        let meter = ProgressMeter::new(0);
        assert_eq!(meter.record(0), Some(100));
    }

    #[test]
    fn sub_percent_chunks_do_not_report() {
        let meter = ProgressMeter::new(1000);
        assert_eq!(meter.record(5), None);
        assert_eq!(meter.record(5), Some(1));
        assert_eq!(meter.percent(), 1);
    }

    #[test]
    fn terminal_states() {
        assert!(!UploadState::Idle.is_terminal());
        assert!(!UploadState::RequestingAuth.is_terminal());
        assert!(!UploadState::Uploading(50).is_terminal());
        assert!(UploadState::Succeeded("url".to_string()).is_terminal());
        assert!(UploadState::Failed("reason".to_string()).is_terminal());
        assert!(UploadState::Cancelled.is_terminal());
    }

    #[test]
    fn state_progress_accessor() {
        assert_eq!(UploadState::Uploading(42).progress(), Some(42));
        assert_eq!(UploadState::Succeeded("url".to_string()).progress(), Some(100));
        assert_eq!(UploadState::Idle.progress(), None);
        assert_eq!(UploadState::Cancelled.progress(), None);
    }
}
