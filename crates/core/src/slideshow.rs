//! Gallery slideshow state.
//!
//! The slideshow is driven by an external clock: callers pass the current
//! [`Instant`] to [`Slideshow::poll`] and the index advances once for every
//! full [`SLIDE_INTERVAL`] elapsed since the last advance. Manual navigation
//! moves the index without touching the cadence.

use std::time::{Duration, Instant};

/// Time each image stays on screen.
pub const SLIDE_INTERVAL: Duration = Duration::from_secs(5);

/// Current position in a rotating set of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slideshow {
    index: usize,
    len: usize,
    last_tick: Instant,
}

impl Slideshow {
    /// Start a slideshow over `len` images at index 0.
    #[must_use]
    pub const fn new(len: usize, now: Instant) -> Self {
        Self {
            index: 0,
            len,
            last_tick: now,
        }
    }

    /// Index of the image currently shown.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of images.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the timer rotates at all. A single image stays put.
    #[must_use]
    pub const fn is_rotating(&self) -> bool {
        self.len > 1
    }

    /// Advance for every full interval elapsed since the last tick and
    /// return the resulting index.
    pub fn poll(&mut self, now: Instant) -> usize {
        if !self.is_rotating() {
            self.last_tick = now;
            return self.index;
        }

        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = elapsed.as_millis() / SLIDE_INTERVAL.as_millis();
        if ticks > 0 {
            let steps = usize::try_from(ticks % self.len as u128).unwrap_or(0);
            self.index = (self.index + steps) % self.len;
            let consumed = SLIDE_INTERVAL.saturating_mul(u32::try_from(ticks).unwrap_or(u32::MAX));
            self.last_tick += consumed;
        }
        self.index
    }

    /// Show the next image, wrapping to the first.
    pub const fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Show the previous image, wrapping to the last.
    pub const fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`. Out-of-range values are ignored.
    pub const fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    /// Swap in a new image set: back to the first image, timer restarted.
    pub const fn replace_images(&mut self, len: usize, now: Instant) {
        self.len = len;
        self.index = 0;
        self.last_tick = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_every_interval_and_wraps() {
        let start = Instant::now();
        let mut show = Slideshow::new(3, start);
        assert_eq!(show.poll(start), 0);
        assert_eq!(show.poll(start + SLIDE_INTERVAL), 1);
        assert_eq!(show.poll(start + SLIDE_INTERVAL * 2), 2);
        assert_eq!(show.poll(start + SLIDE_INTERVAL * 3), 0);
    }

    #[test]
    fn partial_interval_does_not_advance() {
        let start = Instant::now();
        let mut show = Slideshow::new(3, start);
        assert_eq!(show.poll(start + Duration::from_millis(4_999)), 0);
        assert_eq!(show.poll(start + Duration::from_millis(5_000)), 1);
    }

    #[test]
    fn catches_up_after_missed_ticks() {
        let start = Instant::now();
        let mut show = Slideshow::new(3, start);
        assert_eq!(show.poll(start + SLIDE_INTERVAL * 4), 1);
        assert_eq!(show.poll(start + SLIDE_INTERVAL * 5), 2);
    }

    #[test]
    fn single_image_never_rotates() {
        let start = Instant::now();
        let mut show = Slideshow::new(1, start);
        assert!(!show.is_rotating());
        assert_eq!(show.poll(start + SLIDE_INTERVAL * 10), 0);
    }

    #[test]
    fn manual_navigation_keeps_cadence() {
        let start = Instant::now();
        let mut show = Slideshow::new(4, start);
        show.prev();
        assert_eq!(show.index(), 3);
        show.next();
        assert_eq!(show.index(), 0);
        show.select(2);
        assert_eq!(show.index(), 2);
        show.select(9);
        assert_eq!(show.index(), 2);
        assert_eq!(show.poll(start + SLIDE_INTERVAL), 3);
    }

    #[test]
    fn replacing_images_resets() {
        let start = Instant::now();
        let mut show = Slideshow::new(3, start);
        show.poll(start + SLIDE_INTERVAL * 2);
        let later = start + SLIDE_INTERVAL * 2 + Duration::from_secs(3);
        show.replace_images(5, later);
        assert_eq!(show.index(), 0);
        assert_eq!(show.len(), 5);
        assert_eq!(show.poll(later + Duration::from_secs(4)), 0);
        assert_eq!(show.poll(later + SLIDE_INTERVAL), 1);
    }

    #[test]
    fn empty_slideshow_stays_put() {
        let start = Instant::now();
        let mut show = Slideshow::new(0, start);
        assert!(show.is_empty());
        show.next();
        show.prev();
        assert_eq!(show.poll(start + SLIDE_INTERVAL), 0);
    }
}
