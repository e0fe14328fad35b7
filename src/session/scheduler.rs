//! Rate-limited resampling with a latest-wins request slot.

use std::time::Duration;

use crate::schema::PlaneTransform;

/// Everything a slice call needs besides the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRequest {
    pub transform: PlaneTransform,
    pub width: usize,
    pub height: usize,
}

/// Throttles slice requests to at most one per interval.
///
/// Only the most recent request is kept; older ones are dropped when
/// superseded. Since slicing is a pure function of its request, dropping is
/// always safe. Time is passed in explicitly as a monotonic timestamp
/// (elapsed time since any fixed origin), so any loop can drive it: a
/// native timer, a browser animation frame, a test.
#[derive(Debug, Clone)]
pub struct ResampleScheduler {
    interval: Duration,
    pending: Option<SliceRequest>,
    last_run: Option<Duration>,
    superseded: u64,
}

impl ResampleScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            last_run: None,
            superseded: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Queue a request, replacing any pending one.
    pub fn request(&mut self, request: SliceRequest) {
        if self.pending.replace(request).is_some() {
            self.superseded += 1;
            log::trace!("Resample request superseded ({} total)", self.superseded);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Earliest timestamp at which the pending request may run.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending?;
        Some(self.last_run.map_or(Duration::ZERO, |last| last + self.interval))
    }

    /// Take the pending request if the interval since the last run elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<SliceRequest> {
        let ready = match self.last_run {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        };
        if !ready {
            return None;
        }

        let request = self.pending.take()?;
        self.last_run = Some(now);
        Some(request)
    }

    /// Number of requests dropped in favor of a newer one.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

/// Convert a millisecond clock reading (e.g. `performance.now()`) into a
/// scheduler timestamp. Negative or NaN readings map to zero; readings too
/// large for a [`Duration`] saturate.
pub fn timestamp_from_millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn request_at(z: f32) -> SliceRequest {
        SliceRequest {
            transform: PlaneTransform::from_translation(Vec3::new(0.0, 0.0, z)),
            width: 8,
            height: 8,
        }
    }

    #[test]
    fn test_first_request_runs_immediately() {
        let mut scheduler = ResampleScheduler::new(Duration::from_millis(50));
        let now = Duration::from_secs(3);

        assert_eq!(scheduler.poll(now), None);
        scheduler.request(request_at(0.1));
        assert_eq!(scheduler.poll(now), Some(request_at(0.1)));
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_requests_within_interval_wait() {
        let mut scheduler = ResampleScheduler::new(Duration::from_millis(50));
        let start = Duration::from_secs(3);

        scheduler.request(request_at(0.0));
        assert!(scheduler.poll(start).is_some());

        scheduler.request(request_at(0.1));
        assert_eq!(scheduler.poll(start + Duration::from_millis(20)), None);
        assert!(scheduler.has_pending());
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(50))
        );

        let later = start + Duration::from_millis(50);
        assert_eq!(scheduler.poll(later), Some(request_at(0.1)));
    }

    #[test]
    fn test_latest_request_wins() {
        let mut scheduler = ResampleScheduler::new(Duration::from_millis(50));
        let start = Duration::from_secs(3);
        scheduler.request(request_at(0.0));
        scheduler.poll(start);

        for i in 1..=5 {
            scheduler.request(request_at(i as f32 * 0.1));
        }

        let later = start + Duration::from_millis(60);
        assert_eq!(scheduler.poll(later), Some(request_at(0.5)));
        assert_eq!(scheduler.superseded(), 4);
        assert_eq!(scheduler.poll(later + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_zero_interval_never_throttles() {
        let mut scheduler = ResampleScheduler::new(Duration::ZERO);
        let now = Duration::from_secs(3);

        for i in 0..3 {
            scheduler.request(request_at(i as f32));
            assert_eq!(scheduler.poll(now), Some(request_at(i as f32)));
        }
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut scheduler = ResampleScheduler::new(Duration::from_millis(50));
        scheduler.request(request_at(0.0));
        scheduler.cancel();
        assert_eq!(scheduler.next_deadline(), None);
        assert_eq!(scheduler.poll(Duration::from_secs(3)), None);
    }

    #[test]
    fn test_timestamp_from_millis_saturates() {
        assert_eq!(timestamp_from_millis(1500.0), Duration::from_millis(1500));
        assert_eq!(timestamp_from_millis(-3.0), Duration::ZERO);
        assert_eq!(timestamp_from_millis(f64::NAN), Duration::ZERO);
        assert_eq!(timestamp_from_millis(f64::INFINITY), Duration::MAX);
        assert_eq!(timestamp_from_millis(f64::MAX), Duration::MAX);
    }
}
