//! Cyclic position and playback state over a finite sequence of slides.
//!
//! The sequencer never looks at slide content; it only owns an index and a
//! playing/paused flag. Time is someone else's problem: see
//! [`crate::carousel::Carousel`] for the timer-bound variant.

use crate::error::SequencerError;

/// Whether auto-play may run for the given inputs.
///
/// Playback needs auto-play to be enabled, at least two slides to cycle
/// through, and a standing request to play.
#[must_use]
pub const fn compute_playing(auto_play_enabled: bool, slide_count: usize, requested: bool) -> bool {
    auto_play_enabled && slide_count > 1 && requested
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// `next` / `prev` from the owner.
    Manual,
    /// Direct `jump_to`.
    Jump,
    /// Automatic advance from the timer.
    Tick,
    /// Position fell out of range after the slide count shrank.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
    pub cause: ChangeCause,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    slide_count: usize,
    position: usize,
    auto_play_enabled: bool,
    held: bool,
    requested: bool,
    playing: bool,
}

impl Sequencer {
    /// Create a sequencer at position 0. Playback starts immediately when the
    /// inputs allow it.
    pub fn new(slide_count: usize, auto_play_enabled: bool) -> Self {
        Self {
            slide_count,
            position: 0,
            auto_play_enabled,
            held: false,
            requested: true,
            playing: compute_playing(auto_play_enabled, slide_count, true),
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub const fn auto_play_enabled(&self) -> bool {
        self.auto_play_enabled
    }

    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    pub fn next(&mut self) -> Option<SlideChange> {
        self.step_forward(ChangeCause::Manual)
    }

    pub fn prev(&mut self) -> Option<SlideChange> {
        if self.slide_count == 0 {
            return None;
        }
        let to = (self.position + self.slide_count - 1) % self.slide_count;
        self.goto(to, ChangeCause::Manual)
    }

    /// Advance on behalf of the timer. Identical to [`Self::next`] apart
    /// from the reported cause.
    pub fn tick(&mut self) -> Option<SlideChange> {
        self.step_forward(ChangeCause::Tick)
    }

    /// Move straight to `index`.
    ///
    /// # Errors
    /// Returns [`SequencerError::IndexOutOfRange`] when `index >= slide_count`;
    /// the position is left untouched.
    pub fn jump_to(&mut self, index: usize) -> Result<Option<SlideChange>, SequencerError> {
        if index >= self.slide_count {
            return Err(SequencerError::IndexOutOfRange {
                index,
                slide_count: self.slide_count,
            });
        }
        Ok(self.goto(index, ChangeCause::Jump))
    }

    /// Flip between playing and paused. Never plays with fewer than two
    /// slides or while auto-play is disabled.
    pub fn toggle_play(&mut self) -> bool {
        self.requested = self.slide_count > 1 && !self.playing;
        self.recompute();
        self.playing
    }

    /// Replace the slide count. Playback is re-requested and recomputed, and
    /// an out-of-range position snaps back to 0. Same count is a no-op.
    pub fn set_slide_count(&mut self, slide_count: usize) -> Option<SlideChange> {
        if slide_count == self.slide_count {
            return None;
        }
        self.slide_count = slide_count;
        self.requested = true;
        self.recompute();
        self.clamp_position()
    }

    pub fn set_auto_play_enabled(&mut self, enabled: bool) {
        if enabled == self.auto_play_enabled {
            return;
        }
        self.auto_play_enabled = enabled;
        self.requested = true;
        self.recompute();
    }

    /// Suspend auto-play until [`Self::release`]. Holding counts as disabling
    /// auto-play for the playing computation.
    pub fn hold(&mut self) {
        self.held = true;
        self.recompute();
    }

    pub fn release(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        self.requested = true;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.playing = compute_playing(
            self.auto_play_enabled && !self.held,
            self.slide_count,
            self.requested,
        );
    }

    fn clamp_position(&mut self) -> Option<SlideChange> {
        if self.position != 0 && self.position >= self.slide_count {
            return self.goto(0, ChangeCause::Reset);
        }
        None
    }

    fn step_forward(&mut self, cause: ChangeCause) -> Option<SlideChange> {
        if self.slide_count == 0 {
            return None;
        }
        let to = (self.position + 1) % self.slide_count;
        self.goto(to, cause)
    }

    fn goto(&mut self, to: usize, cause: ChangeCause) -> Option<SlideChange> {
        if self.position == to {
            return None;
        }
        let ch = SlideChange {
            from: self.position,
            to,
            cause,
        };
        self.position = to;
        Some(ch)
    }
}
