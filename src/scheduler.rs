// ============================================================================
// REDRAW SCHEDULER
// ============================================================================

use log::trace;

/// Identity of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Armed { token: TimerToken, due_ms: u64 },
}

/// What happened when a timer wake-up was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The token no longer matches the armed timer; nothing to do.
    Stale,
    /// A redraw is due. `next_due_ms` is set when the timer re-armed itself.
    Redraw { next_due_ms: Option<u64> },
}

/// Once-per-second redraw timer for interactive mode.
///
/// A two-state machine, `Idle` and `Armed`. It owns no thread or OS timer:
/// the host asks for the deadline, sleeps until then and hands the token back
/// through [`fire`](Self::fire). Every arm gets a fresh token, so a wake-up
/// that belongs to a cancelled or superseded timer is recognised as stale and
/// dropped.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    interval_ms: u64,
    state: TimerState,
    next_token: u64,
}

impl RedrawScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            state: TimerState::Idle,
            next_token: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    /// Token and due time of the armed timer, if any.
    pub fn deadline(&self) -> Option<(TimerToken, u64)> {
        match self.state {
            TimerState::Armed { token, due_ms } => Some((token, due_ms)),
            TimerState::Idle => None,
        }
    }

    /// Token of the armed timer if it is due at `now_ms`.
    pub fn due(&self, now_ms: u64) -> Option<TimerToken> {
        self.deadline()
            .filter(|&(_, due_ms)| due_ms <= now_ms)
            .map(|(token, _)| token)
    }

    /// Delay from `now_ms` to the next exact interval boundary, in `(0, interval]`.
    pub fn delay_to_next_tick(&self, now_ms: u64) -> u64 {
        self.interval_ms - (now_ms % self.interval_ms)
    }

    /// Cancel whatever is pending, then arm for an immediate fire iff `eligible`.
    ///
    /// Safe to call any number of times; the resulting state depends only on
    /// `eligible`.
    pub fn reconcile(&mut self, eligible: bool, now_ms: u64) -> TimerState {
        self.cancel();
        if eligible {
            self.arm(now_ms);
        }
        self.state
    }

    /// Drop the pending timer, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        if was_armed {
            trace!("redraw timer cancelled");
        }
        self.state = TimerState::Idle;
        was_armed
    }

    /// Deliver a wake-up for `token`.
    pub fn fire(&mut self, token: TimerToken, now_ms: u64, eligible: bool) -> FireOutcome {
        match self.state {
            TimerState::Armed { token: armed, .. } if armed == token => {}
            _ => {
                trace!("ignoring stale timer {:?}", token);
                return FireOutcome::Stale;
            }
        }

        self.state = TimerState::Idle;
        let next_due_ms = eligible.then(|| {
            let due_ms = now_ms + self.delay_to_next_tick(now_ms);
            self.arm(due_ms);
            due_ms
        });
        FireOutcome::Redraw { next_due_ms }
    }

    fn arm(&mut self, due_ms: u64) {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        trace!("redraw timer {:?} armed for {}", token, due_ms);
        self.state = TimerState::Armed { token, due_ms };
    }
}
