pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod sequencer;
pub mod timer;
pub mod tasks {
    pub mod autoplay;
}

pub use carousel::{Carousel, simulate};
pub use error::SequencerError;
pub use sequencer::{ChangeCause, Sequencer, SlideChange, compute_playing};
