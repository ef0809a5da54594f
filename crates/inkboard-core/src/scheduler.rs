//! Redraw coalescing.
//!
//! Mutations never paint directly. They file a request here and the host
//! polls once per animation frame (or when [`FrameScheduler::next_deadline`]
//! passes), getting at most one [`FrameRequest`] back.

use crate::input::Instant;
use crate::shapes::ShapeId;
use std::time::Duration;

/// Minimum spacing between incremental stroke draws (about 120 per second).
pub const STROKE_THROTTLE: Duration = Duration::from_millis(8);

/// Delay applied to debounced redraws such as bursts of erase hits.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(16);

/// What the host should paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Repaint the whole scene.
    Full,
    /// Paint only the segments of stroke `id` from point index `from` on.
    StrokeTail { id: ShapeId, from: usize },
}

#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    full_pending: bool,
    debounce_deadline: Option<Instant>,
    tail: Option<(ShapeId, usize)>,
    last_tail_draw: Option<Instant>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a full frame. Returns `true` only when no full frame was
    /// pending, i.e. when the host must schedule one.
    pub fn request_full(&mut self) -> bool {
        if self.full_pending {
            false
        } else {
            self.full_pending = true;
            true
        }
    }

    /// Ask for a full frame [`DEBOUNCE_DELAY`] after the latest call.
    pub fn request_debounced(&mut self, now: Instant) {
        self.debounce_deadline = Some(now + DEBOUNCE_DELAY);
    }

    /// Ask for an incremental draw of stroke `id` starting at point index
    /// `from`. Requests for the same stroke coalesce to the earliest index.
    /// Returns `true` when nothing incremental was pending.
    pub fn request_segment(&mut self, id: ShapeId, from: usize) -> bool {
        match &mut self.tail {
            Some((pending_id, pending_from)) if *pending_id == id => {
                *pending_from = (*pending_from).min(from);
                false
            }
            tail => {
                let was_empty = tail.is_none();
                *tail = Some((id, from));
                was_empty
            }
        }
    }

    /// Take the request that is due at `now`, if any.
    ///
    /// A pending full frame wins over (and discards) a pending stroke tail.
    /// Stroke tails are held back until [`STROKE_THROTTLE`] has passed since
    /// the previous one.
    pub fn poll(&mut self, now: Instant) -> Option<FrameRequest> {
        if let Some(deadline) = self.debounce_deadline {
            if now >= deadline {
                self.debounce_deadline = None;
                self.full_pending = true;
            }
        }

        if self.full_pending {
            self.full_pending = false;
            self.tail = None;
            return Some(FrameRequest::Full);
        }

        let (id, from) = self.tail?;
        let throttled = self
            .last_tail_draw
            .is_some_and(|last| now.saturating_duration_since(last) < STROKE_THROTTLE);
        if throttled {
            return None;
        }
        self.tail = None;
        self.last_tail_draw = Some(now);
        Some(FrameRequest::StrokeTail { id, from })
    }

    /// Earliest instant at which [`FrameScheduler::poll`] could return a
    /// request that is not due yet.
    pub fn next_deadline(&self) -> Option<Instant> {
        let tail_due = self
            .tail
            .map(|_| self.last_tail_draw.map_or_else(Instant::now, |t| t + STROKE_THROTTLE));
        match (self.debounce_deadline, tail_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.full_pending && self.debounce_deadline.is_none() && self.tail.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_requests_coalesce() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.request_full());
        assert!(!scheduler.request_full());
        let now = Instant::now();
        assert_eq!(scheduler.poll(now), Some(FrameRequest::Full));
        assert_eq!(scheduler.poll(now), None);
        assert!(scheduler.is_idle());
        assert!(scheduler.request_full());
    }

    #[test]
    fn test_debounce_rearms() {
        let mut scheduler = FrameScheduler::new();
        let t0 = Instant::now();
        scheduler.request_debounced(t0);
        scheduler.request_debounced(t0 + Duration::from_millis(10));
        assert_eq!(scheduler.poll(t0 + Duration::from_millis(20)), None);
        assert_eq!(
            scheduler.poll(t0 + Duration::from_millis(26)),
            Some(FrameRequest::Full)
        );
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_stroke_tail_throttled_and_coalesced() {
        let mut scheduler = FrameScheduler::new();
        let id = ShapeId::new_v4();
        let t0 = Instant::now();

        assert!(scheduler.request_segment(id, 1));
        assert_eq!(scheduler.poll(t0), Some(FrameRequest::StrokeTail { id, from: 1 }));

        let t1 = t0 + Duration::from_millis(2);
        assert!(scheduler.request_segment(id, 2));
        assert!(!scheduler.request_segment(id, 3));
        assert_eq!(scheduler.poll(t1), None);

        let t2 = t0 + Duration::from_millis(9);
        assert_eq!(scheduler.poll(t2), Some(FrameRequest::StrokeTail { id, from: 2 }));
    }

    #[test]
    fn test_full_subsumes_tail() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();
        scheduler.request_segment(ShapeId::new_v4(), 4);
        scheduler.request_full();
        assert_eq!(scheduler.poll(now), Some(FrameRequest::Full));
        assert_eq!(scheduler.poll(now), None);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_next_deadline() {
        let mut scheduler = FrameScheduler::new();
        assert_eq!(scheduler.next_deadline(), None);
        let t0 = Instant::now();
        scheduler.request_debounced(t0);
        assert_eq!(scheduler.next_deadline(), Some(t0 + DEBOUNCE_DELAY));
    }
}
