use std::time::Duration;

use common::GameLog;

pub const MIN_SPEED: f32 = 0.2;
pub const MAX_SPEED: f32 = 3.0;
const MIN_STEP_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// What a single elapsed advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next round and rearmed the timer.
    Stepped,
    /// Moved to a round that has a meeting; playback is paused and the
    /// caller should surface the meeting overlay.
    MeetingReached,
    /// Already at the last round; playback is paused without moving.
    Finished,
}

/// Owns the current position in the loaded log and the autoplay timer.
///
/// The timer is a single cancelable deadline driven by the event loop's
/// delta time: at most one advance is ever armed, and every play/pause/seek
/// cancels before it optionally rearms.
pub struct PlaybackController {
    log: GameLog,
    current_round_idx: usize,
    state: PlaybackState,
    speed: f32,
    pending: Option<Duration>,
}

impl PlaybackController {
    pub fn new(log: GameLog) -> Self {
        Self {
            log,
            current_round_idx: 0,
            state: PlaybackState::Idle,
            speed: 1.0,
            pending: None,
        }
    }

    /// Atomically replaces the document and resets playback. Speed is a
    /// viewer preference and survives the reload.
    pub fn load(&mut self, log: GameLog) {
        self.cancel();
        self.log = log;
        self.current_round_idx = 0;
        self.state = PlaybackState::Idle;
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_round_idx(&self) -> usize {
        self.current_round_idx
    }

    pub fn current_round_number(&self) -> u32 {
        self.log.round_number(self.current_round_idx)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Seconds-per-round setting, clamped. Does not touch an advance that
    /// is already armed; only future scheduling sees the new value.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Delay before the next scheduled advance, floored at 200ms.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis((self.speed * 1000.0) as u64).max(MIN_STEP_DELAY)
    }

    pub fn play(&mut self) {
        if self.log.total_rounds() == 0 || self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        self.arm();
    }

    pub fn pause(&mut self) {
        self.cancel();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek: always pauses first, then clamps into `[0, total-1]`.
    pub fn go_to(&mut self, idx: i64) {
        self.pause();
        let last = self.log.total_rounds().saturating_sub(1) as i64;
        self.current_round_idx = idx.clamp(0, last) as usize;
    }

    pub fn step_back(&mut self, n: i64) {
        self.go_to(self.current_round_idx as i64 - n);
    }

    pub fn step_forward(&mut self, n: i64) {
        self.go_to(self.current_round_idx as i64 + n);
    }

    /// Whether an advance is currently armed. Never more than one.
    pub fn has_pending_advance(&self) -> bool {
        self.pending.is_some()
    }

    /// Drives the armed advance from the event loop. Returns the outcome
    /// when the deadline elapsed this frame. The whole round transition
    /// (index move, pause decision, rearm) completes before this returns,
    /// so two advances can never be in flight.
    pub fn update(&mut self, dt: Duration) -> Option<Advance> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let remaining = self.pending?;
        match remaining.checked_sub(dt) {
            Some(left) if !left.is_zero() => {
                self.pending = Some(left);
                None
            }
            _ => {
                self.pending = None;
                Some(self.tick())
            }
        }
    }

    /// One elapsed advance. Exposed for deterministic tests; `update` is
    /// the normal entry point.
    pub fn tick(&mut self) -> Advance {
        let last = self.log.total_rounds().saturating_sub(1);
        if self.current_round_idx >= last {
            self.pause();
            return Advance::Finished;
        }
        self.current_round_idx += 1;

        // First matching meeting wins; the overlay lists all of them.
        let round_number = self.current_round_number();
        if self.log.meetings_for(round_number).next().is_some() {
            self.pause();
            return Advance::MeetingReached;
        }
        self.arm();
        Advance::Stepped
    }

    // Cancel-then-schedule, the single-flight invariant.
    fn arm(&mut self) {
        self.cancel();
        self.pending = Some(self.step_delay());
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
