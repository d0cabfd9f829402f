use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::carousel::Carousel;
use crate::config::CarouselOptions;
use crate::events::{CarouselCommand, SlideShown};
use crate::sequencer::SlideChange;

/// Drives one carousel until cancelled.
///
/// Rules:
/// - Commands are applied in arrival order; each runs to completion before the
///   next timer wake-up is considered.
/// - The task sleeps until the carousel's armed deadline. A wake-up scheduled
///   for a generation the carousel has since replaced is discarded.
/// - Every position change is forwarded to `shown`. A closed `shown` channel
///   is tolerated; the carousel keeps running.
/// - The task ends when `cancel` fires or the command channel closes.
pub async fn run(
    options: CarouselOptions,
    mut commands: Receiver<CarouselCommand>,
    shown: Sender<SlideShown>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut carousel = Carousel::new(&options, now());
    let mut viewer = Viewer::new(shown, options.name.clone());
    info!(
        carousel = %options.name,
        slides = carousel.slide_count(),
        interval = %humantime::format_duration(options.interval),
        playing = carousel.is_playing(),
        "carousel started"
    );

    loop {
        let armed = carousel
            .deadline()
            .map(|deadline| (Instant::from_std(deadline), carousel.timer().generation()));

        select! {
            _ = cancel.cancelled() => break,

            maybe_cmd = commands.recv() => {
                let Some(cmd) = maybe_cmd else {
                    debug!(carousel = %options.name, "command channel closed");
                    break;
                };
                let change = apply(&mut carousel, cmd, now());
                if let Some(change) = change {
                    viewer.show(change).await;
                }
            }

            _ = async {
                match armed {
                    Some((deadline, _)) => sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => {
                let Some((_, generation)) = armed else { continue };
                if generation != carousel.timer().generation() {
                    continue;
                }
                for change in carousel.on_tick(now()) {
                    viewer.show(change).await;
                }
            }
        }
    }

    info!(carousel = %options.name, position = carousel.position(), "carousel stopped");
    Ok(())
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

fn apply(
    carousel: &mut Carousel,
    cmd: CarouselCommand,
    now: std::time::Instant,
) -> Option<SlideChange> {
    debug!(carousel = %carousel.name(), command = ?cmd, "carousel command");
    match cmd {
        CarouselCommand::Next => carousel.next(),
        CarouselCommand::Prev => carousel.prev(),
        CarouselCommand::JumpTo(index) => match carousel.jump_to(index) {
            Ok(change) => change,
            Err(err) => {
                warn!(carousel = %carousel.name(), "{err}");
                None
            }
        },
        CarouselCommand::TogglePlay => {
            let playing = carousel.toggle_play(now);
            info!(carousel = %carousel.name(), playing, "playback toggled");
            None
        }
        CarouselCommand::SetSlideCount(n) => carousel.set_slide_count(n, now),
        CarouselCommand::SetAutoPlay(enabled) => {
            carousel.set_auto_play_enabled(enabled, now);
            None
        }
        CarouselCommand::SetInterval(interval) => {
            carousel.set_interval(interval, now);
            None
        }
        CarouselCommand::Hold => {
            carousel.hold(now);
            None
        }
        CarouselCommand::Release => {
            carousel.release(now);
            None
        }
    }
}

/// Outbound side of the task; remembers whether anyone is still listening.
struct Viewer {
    tx: Option<Sender<SlideShown>>,
    carousel: String,
}

impl Viewer {
    fn new(tx: Sender<SlideShown>, carousel: String) -> Self {
        Self {
            tx: Some(tx),
            carousel,
        }
    }

    async fn show(&mut self, change: SlideChange) {
        info!(
            carousel = %self.carousel,
            from = change.from,
            index = change.to,
            cause = ?change.cause,
            "slide shown"
        );
        let Some(tx) = self.tx.as_ref() else {
            return;
        };
        let event = SlideShown {
            carousel: self.carousel.clone(),
            index: change.to,
            cause: change.cause,
        };
        if tx.send(event).await.is_err() {
            debug!(carousel = %self.carousel, "viewer channel closed");
            self.tx = None;
        }
    }
}
