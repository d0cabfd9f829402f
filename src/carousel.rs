//! A [`Sequencer`] bound one-to-one to its [`RepeatingTimer`].
//!
//! Rules:
//! - The timer is armed exactly when the sequencer is playing.
//! - Any change to the slide count, enablement, playback or interval cancels
//!   the schedule and, if playback survives, starts a fresh one from `now`.
//! - Manual navigation leaves the schedule alone; the next automatic advance
//!   keeps its original phase.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::CarouselOptions;
use crate::error::SequencerError;
use crate::sequencer::{Sequencer, SlideChange};
use crate::timer::RepeatingTimer;

#[derive(Debug, Clone)]
pub struct Carousel {
    name: String,
    pause_on_hover: bool,
    sequencer: Sequencer,
    timer: RepeatingTimer,
}

impl Carousel {
    pub fn new(options: &CarouselOptions, now: Instant) -> Self {
        let mut carousel = Self {
            name: options.name.clone(),
            pause_on_hover: options.pause_on_hover,
            sequencer: Sequencer::new(options.slide_count, options.auto_play),
            timer: RepeatingTimer::new(options.interval),
        };
        carousel.rearm(now);
        carousel
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.sequencer.position()
    }

    pub fn slide_count(&self) -> usize {
        self.sequencer.slide_count()
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// When the next automatic advance is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn timer(&self) -> &RepeatingTimer {
        &self.timer
    }

    pub fn next(&mut self) -> Option<SlideChange> {
        self.sequencer.next()
    }

    pub fn prev(&mut self) -> Option<SlideChange> {
        self.sequencer.prev()
    }

    pub fn jump_to(&mut self, index: usize) -> Result<Option<SlideChange>, SequencerError> {
        self.sequencer.jump_to(index)
    }

    pub fn toggle_play(&mut self, now: Instant) -> bool {
        self.sequencer.toggle_play();
        self.rearm(now);
        self.sequencer.is_playing()
    }

    pub fn set_slide_count(&mut self, slide_count: usize, now: Instant) -> Option<SlideChange> {
        if slide_count == self.sequencer.slide_count() {
            return None;
        }
        let change = self.sequencer.set_slide_count(slide_count);
        self.rearm(now);
        change
    }

    pub fn set_auto_play_enabled(&mut self, enabled: bool, now: Instant) {
        if enabled == self.sequencer.auto_play_enabled() {
            return;
        }
        self.sequencer.set_auto_play_enabled(enabled);
        self.rearm(now);
    }

    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.timer.set_interval(interval);
        self.rearm(now);
    }

    /// Suspend auto-play (pointer entered). Ignored unless the carousel was
    /// configured with `pause-on-hover`.
    pub fn hold(&mut self, now: Instant) {
        if !self.pause_on_hover {
            trace!(carousel = %self.name, "hold ignored; pause-on-hover disabled");
            return;
        }
        self.sequencer.hold();
        self.rearm(now);
    }

    pub fn release(&mut self, now: Instant) {
        if !self.pause_on_hover || !self.sequencer.is_held() {
            return;
        }
        self.sequencer.release();
        self.rearm(now);
    }

    /// Apply every automatic advance due at `now`.
    pub fn on_tick(&mut self, now: Instant) -> Vec<SlideChange> {
        let fires = self.timer.poll(now);
        (0..fires).filter_map(|_| self.sequencer.tick()).collect()
    }

    fn rearm(&mut self, now: Instant) {
        if self.sequencer.is_playing() {
            self.timer.arm(now);
        } else {
            self.timer.disarm();
        }
        debug!(
            carousel = %self.name,
            playing = self.sequencer.is_playing(),
            slides = self.sequencer.slide_count(),
            generation = self.timer.generation(),
            "carousel schedule updated"
        );
    }
}

/// Positions observed over `ticks` simulated intervals, starting with the
/// initial position.
pub fn simulate(options: &CarouselOptions, ticks: usize) -> Vec<usize> {
    let start = Instant::now();
    let mut carousel = Carousel::new(options, start);
    let mut observed = Vec::with_capacity(ticks + 1);
    observed.push(carousel.position());
    for k in 1..=ticks {
        let at = u32::try_from(k)
            .ok()
            .and_then(|k| carousel.timer().interval().checked_mul(k))
            .and_then(|offset| start.checked_add(offset));
        let Some(at) = at else {
            break;
        };
        carousel.on_tick(at);
        observed.push(carousel.position());
    }
    observed
}
