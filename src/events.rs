use std::str::FromStr;
use std::time::Duration;

use crate::error::SequencerError;
use crate::sequencer::ChangeCause;
use crate::timer::MAX_INTERVAL;

/// Owner-side request for a running carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Prev,
    JumpTo(usize),
    TogglePlay,
    SetSlideCount(usize),
    SetAutoPlay(bool),
    SetInterval(Duration),
    Hold,
    Release,
}

/// Emitted whenever a carousel lands on a new slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideShown {
    pub carousel: String,
    pub index: usize,
    pub cause: ChangeCause,
}

/// One stdin line: `<carousel> <command> [arg]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressedCommand {
    pub carousel: String,
    pub command: CarouselCommand,
}

impl FromStr for AddressedCommand {
    type Err = SequencerError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || SequencerError::InvalidCommand(line.trim().to_string());
        let mut words = line.split_whitespace();
        let carousel = words.next().ok_or_else(invalid)?.to_string();
        let verb = words.next().ok_or_else(invalid)?;
        let arg = words.next();
        if words.next().is_some() {
            return Err(invalid());
        }

        let command = match (verb, arg) {
            ("next", None) => CarouselCommand::Next,
            ("prev", None) => CarouselCommand::Prev,
            ("toggle", None) => CarouselCommand::TogglePlay,
            ("enable", None) => CarouselCommand::SetAutoPlay(true),
            ("disable", None) => CarouselCommand::SetAutoPlay(false),
            ("hold", None) => CarouselCommand::Hold,
            ("release", None) => CarouselCommand::Release,
            ("jump", Some(n)) => CarouselCommand::JumpTo(n.parse().map_err(|_| invalid())?),
            ("count", Some(n)) => {
                CarouselCommand::SetSlideCount(n.parse().map_err(|_| invalid())?)
            }
            ("interval", Some(d)) => {
                let interval = humantime::parse_duration(d).map_err(|_| invalid())?;
                if interval.is_zero() || interval > MAX_INTERVAL {
                    return Err(invalid());
                }
                CarouselCommand::SetInterval(interval)
            }
            _ => return Err(invalid()),
        };
        Ok(Self { carousel, command })
    }
}
