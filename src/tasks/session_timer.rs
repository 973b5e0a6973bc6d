//! Session timer background task
//!
//! One task owns the [`SessionTimer`] and its one-second wake-up source.
//! Operations reach it as commands over a channel, so ticks and user
//! operations never interleave. The interval only exists while the timer is
//! running and is dropped as soon as it stops or the task ends.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    services::{SessionRecord, SessionRecorder},
    state::{Completion, Mode, SessionTimer, TimerOptions, TimerSnapshot},
};

/// Cadence of the countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Operations accepted by the timer task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    ResetAll,
    SetDuration(u32),
    SetMode(Mode),
}

/// Result of a command: whether it was applied and the state afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub accepted: bool,
    pub snapshot: TimerSnapshot,
}

/// Notifications broadcast to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { mode: Mode, remaining_seconds: u32 },
    Paused { mode: Mode, remaining_seconds: u32 },
    Reset { mode: Mode, full: bool },
    ModeChanged { mode: Mode, seconds: u32 },
    DurationChanged { mode: Mode, seconds: u32 },
    IntervalCompleted {
        mode: Mode,
        duration_seconds: u32,
        cycles_completed: u32,
    },
    BreakOver { next_mode: Mode },
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Reset { .. } => "reset",
            TimerEvent::ModeChanged { .. } => "mode_changed",
            TimerEvent::DurationChanged { .. } => "duration_changed",
            TimerEvent::IntervalCompleted { .. } => "interval_completed",
            TimerEvent::BreakOver { .. } => "break_over",
        }
    }
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("session timer task is not running")]
    Closed,
}

struct Request {
    command: TimerCommand,
    reply: oneshot::Sender<CommandOutcome>,
}

/// Cloneable handle to a running session timer task.
///
/// The task stops once every handle has been dropped.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<TimerSnapshot>,
    events: broadcast::Sender<TimerEvent>,
    options: TimerOptions,
}

impl TimerHandle {
    /// Spawn the timer task on the current tokio runtime
    pub fn spawn(options: TimerOptions, recorder: Arc<dyn SessionRecorder>) -> Self {
        let timer = SessionTimer::new(options);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        let task = TimerTask {
            timer,
            recorder,
            snapshots: snapshot_tx,
            events: events_tx.clone(),
        };
        tokio::spawn(task.run(commands_rx));

        Self {
            commands: commands_tx,
            snapshots: snapshot_rx,
            events: events_tx,
            options,
        }
    }

    pub fn options(&self) -> TimerOptions {
        self.options
    }

    /// Latest published state
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn start(&self) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::Pause).await
    }

    pub async fn reset(&self) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::Reset).await
    }

    pub async fn reset_all(&self) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::ResetAll).await
    }

    pub async fn set_duration(&self, seconds: u32) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::SetDuration(seconds)).await
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<CommandOutcome, TimerError> {
        self.send(TimerCommand::SetMode(mode)).await
    }

    pub async fn send(&self, command: TimerCommand) -> Result<CommandOutcome, TimerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .await
            .map_err(|_| TimerError::Closed)?;
        response.await.map_err(|_| TimerError::Closed)
    }
}

struct TimerTask {
    timer: SessionTimer,
    recorder: Arc<dyn SessionRecorder>,
    snapshots: watch::Sender<TimerSnapshot>,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerTask {
    async fn run(mut self, mut commands: mpsc::Receiver<Request>) {
        info!(
            "Starting session timer task ({:?} profile, {} mode, {}s)",
            self.timer.options().profile,
            self.timer.mode(),
            self.timer.configured_duration()
        );

        let mut ticker: Option<Interval> = None;

        loop {
            tokio::select! {
                request = commands.recv() => match request {
                    Some(Request { command, reply }) => {
                        let outcome = self.apply(command);
                        self.sync_ticker(&mut ticker);
                        if reply.send(outcome).is_err() {
                            debug!("Caller went away before {:?} completed", command);
                        }
                    }
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    self.on_tick();
                    self.sync_ticker(&mut ticker);
                }
            }
        }

        info!("Session timer task stopped");
    }

    fn apply(&mut self, command: TimerCommand) -> CommandOutcome {
        let accepted = match command {
            TimerCommand::Start => self.timer.start(),
            TimerCommand::Pause => self.timer.pause(),
            TimerCommand::Reset => self.timer.reset(),
            TimerCommand::ResetAll => self.timer.reset_all(),
            TimerCommand::SetDuration(seconds) => self.timer.set_duration(seconds),
            TimerCommand::SetMode(mode) => self.timer.set_mode(mode),
        };

        if accepted {
            info!("Applied {:?}", command);
            let mode = self.timer.mode();
            let remaining_seconds = self.timer.remaining();
            self.emit(match command {
                TimerCommand::Start => TimerEvent::Started { mode, remaining_seconds },
                TimerCommand::Pause => TimerEvent::Paused { mode, remaining_seconds },
                TimerCommand::Reset => TimerEvent::Reset { mode, full: false },
                TimerCommand::ResetAll => TimerEvent::Reset { mode, full: true },
                TimerCommand::SetDuration(seconds) => TimerEvent::DurationChanged { mode, seconds },
                TimerCommand::SetMode(mode) => TimerEvent::ModeChanged {
                    mode,
                    seconds: self.timer.configured_duration(),
                },
            });
        } else {
            debug!("Rejected {:?} in {:?} phase", command, self.timer.phase());
        }

        let snapshot = self.publish();
        CommandOutcome { accepted, snapshot }
    }

    fn on_tick(&mut self) {
        if let Some(completion) = self.timer.tick() {
            self.complete(completion);
        }
        self.publish();
    }

    fn complete(&self, completion: Completion) {
        info!(
            "{} interval of {}s completed",
            completion.mode, completion.duration_seconds
        );
        self.emit(TimerEvent::IntervalCompleted {
            mode: completion.mode,
            duration_seconds: completion.duration_seconds,
            cycles_completed: self.timer.cycles_completed(),
        });

        if let Some(kind) = completion.record {
            self.spawn_record(SessionRecord::today(kind, completion.duration_seconds));
        }

        if completion.is_break_over() {
            info!("Break over, back to {}", self.timer.mode());
            self.emit(TimerEvent::BreakOver {
                next_mode: self.timer.mode(),
            });
        }
    }

    /// Store the record without holding up the countdown
    fn spawn_record(&self, record: SessionRecord) {
        let recorder = Arc::clone(&self.recorder);
        tokio::spawn(async move {
            if let Err(e) = recorder.record(record).await {
                warn!("Failed to record completed interval: {}", e);
            }
        });
    }

    /// Create or drop the wake-up source so it exists only while running
    fn sync_ticker(&self, ticker: &mut Option<Interval>) {
        match (self.timer.is_running(), ticker.is_some()) {
            (true, false) => {
                debug!("Arming countdown interval");
                *ticker = Some(countdown_interval());
            }
            (false, true) => {
                debug!("Cancelling countdown interval");
                *ticker = None;
            }
            _ => {}
        }
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = self.timer.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

fn countdown_interval() -> Interval {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
