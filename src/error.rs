use thiserror::Error;

/// Library error type for sequencer operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    /// `jump_to` was asked for a slide that does not exist.
    #[error("slide index {index} out of range for {slide_count} slides")]
    IndexOutOfRange { index: usize, slide_count: usize },

    /// A command named a carousel that is not configured.
    #[error("unknown carousel: {0}")]
    UnknownCarousel(String),

    /// A command line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
