//! Async driver: one tokio task per live carousel.
//!
//! The task owns the [`Carousel`], applies [`CarouselInput`]s from a channel,
//! fires autoplay on a tokio interval, ends transitions after the configured
//! duration and publishes a [`CarouselSnapshot`] after every change. It stops
//! when its token is cancelled, when every input sender is gone, or when the
//! [`CarouselHandle`] is dropped.

use super::engine::{Carousel, Direction};
use super::gesture::PointerEvent;
use crate::input::Key;
use std::future;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval_at, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const INPUT_BUFFER: usize = 32;

/// User input forwarded to a running carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    Previous,
    Next,
    /// Dot click.
    GoTo(usize),
    Pointer { event: PointerEvent, width: f64 },
    Key { key: Key, focused: bool },
    HoverEnter,
    HoverLeave,
    TogglePause,
}

/// Published state of a running carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselSnapshot {
    pub index: usize,
    pub position: usize,
    pub count: usize,
    pub transitioning: bool,
    pub autoplay_running: bool,
    pub html: String,
}

impl CarouselSnapshot {
    fn of<T>(carousel: &Carousel<T>) -> Self {
        Self {
            index: carousel.index(),
            position: carousel.position(),
            count: carousel.count(),
            transitioning: carousel.is_transitioning(),
            autoplay_running: carousel.autoplay().is_running(),
            html: carousel.render().into_string(),
        }
    }
}

/// Owner-side handle. Dropping it stops the driver.
#[derive(Debug)]
pub struct CarouselHandle {
    input: mpsc::Sender<CarouselInput>,
    snapshot: watch::Receiver<CarouselSnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CarouselHandle {
    pub fn sender(&self) -> mpsc::Sender<CarouselInput> {
        self.input.clone()
    }

    /// Send one input. Returns false once the driver has stopped.
    pub async fn send(&self, input: CarouselInput) -> bool {
        self.input.send(input).await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the driver and its timers.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    /// Stop the driver and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a driver for `carousel`. The driver's token is a child of `parent`,
/// so cancelling the page also stops the carousel.
pub fn spawn<T: Send + 'static>(
    carousel: Carousel<T>,
    transition: Duration,
    parent: &CancellationToken,
) -> CarouselHandle {
    let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(CarouselSnapshot::of(&carousel));
    let cancel = parent.child_token();
    let task = tokio::spawn(run(
        carousel,
        transition,
        input_rx,
        snapshot_tx,
        cancel.clone(),
    ));
    CarouselHandle {
        input: input_tx,
        snapshot: snapshot_rx,
        cancel,
        task: Some(task),
    }
}

async fn run<T>(
    mut carousel: Carousel<T>,
    transition: Duration,
    mut inputs: mpsc::Receiver<CarouselInput>,
    snapshots: watch::Sender<CarouselSnapshot>,
    cancel: CancellationToken,
) {
    let period = carousel.autoplay().interval();
    let mut clock = period.map(|p| {
        let mut interval = interval_at(Instant::now() + p, p);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    let mut transition_end: Option<Instant> = None;

    loop {
        let was_running = carousel.autoplay().is_running();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            input = inputs.recv() => match input {
                Some(input) => apply(&mut carousel, input),
                None => break,
            },
            _ = until(transition_end) => {
                transition_end = None;
                carousel.on_transition_end();
            }
            _ = next_tick(&mut clock), if was_running => {
                if let Some(p) = period {
                    carousel.tick(p);
                }
            }
        }

        if !was_running && carousel.autoplay().is_running() {
            if let Some(clock) = clock.as_mut() {
                clock.reset();
            }
        }
        if carousel.is_transitioning() && transition_end.is_none() {
            transition_end = Some(Instant::now() + transition);
        }
        snapshots.send_replace(CarouselSnapshot::of(&carousel));
    }

    carousel.dispose();
    debug!(index = carousel.index(), "carousel driver stopped");
}

fn apply<T>(carousel: &mut Carousel<T>, input: CarouselInput) {
    match input {
        CarouselInput::Previous => {
            carousel.advance(Direction::Previous);
        }
        CarouselInput::Next => {
            carousel.advance(Direction::Next);
        }
        CarouselInput::GoTo(i) => {
            carousel.go_to(i as isize, false);
        }
        CarouselInput::Pointer { event, width } => carousel.pointer(event, width),
        CarouselInput::Key { key, focused } => {
            carousel.key(key, focused);
        }
        CarouselInput::HoverEnter => carousel.hover_enter(),
        CarouselInput::HoverLeave => carousel.hover_leave(),
        CarouselInput::TogglePause => {
            carousel.toggle_pause();
        }
    }
}

async fn next_tick(clock: &mut Option<Interval>) {
    match clock {
        Some(clock) => {
            clock.tick().await;
        }
        None => future::pending().await,
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
