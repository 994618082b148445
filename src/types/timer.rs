use crate::types::round::{RoundSpec, Side};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Standard,
    FreeDebate,
}

/// Notifications produced by the engine on each tick. Consumed by the
/// presentation layer within the same event-loop turn, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Remaining time crossed exactly 60, 30 or 15 seconds.
    ReachedThreshold(u32),
    /// One event per second while remaining time is in [1, 10].
    LastTenTick(u32),
    /// A free-debate side ran its budget down to zero.
    SideFinished(Side),
    /// The round is over: standard countdown at zero, or both free-debate
    /// sides at zero.
    RoundFinished,
    /// Raised after every tick so subscribers refresh their view models.
    StateChanged,
}

/// Immutable view of the engine for the presentation adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub remaining: u32,
    pub running: bool,
    pub affirmative_remaining: u32,
    pub negative_remaining: u32,
    pub affirmative_running: bool,
    pub negative_running: bool,
    /// Full duration of the current round (0 if none is set).
    pub round_duration: u32,
}

impl TimerSnapshot {
    pub fn is_ticking(&self) -> bool {
        match self.mode {
            TimerMode::Standard => self.running,
            TimerMode::FreeDebate => self.affirmative_running || self.negative_running,
        }
    }

    /// The side whose counter is currently being consumed, if any.
    pub fn active_side(&self) -> Option<Side> {
        match self.mode {
            TimerMode::Standard => None,
            TimerMode::FreeDebate if self.affirmative_running => Some(Side::Affirmative),
            TimerMode::FreeDebate if self.negative_running => Some(Side::Negative),
            TimerMode::FreeDebate => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self.mode {
            TimerMode::Standard => self.remaining == 0,
            TimerMode::FreeDebate => {
                self.affirmative_remaining == 0 && self.negative_remaining == 0
            }
        }
    }
}

/// Per-counter notification bookkeeping: each threshold fires once, last-ten
/// ticks de-duplicate against the previous value so a doubled tick for the
/// same second cannot fire twice. In free debate each side carries its own
/// flags, so both sides get the full escalation sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AlertFlags {
    notified_60: bool,
    notified_30: bool,
    notified_15: bool,
    last_single_digit_tick: Option<u32>,
}

impl AlertFlags {
    fn push_events(&mut self, remaining: u32, events: &mut Vec<TimerEvent>) {
        match remaining {
            60 if !self.notified_60 => {
                self.notified_60 = true;
                events.push(TimerEvent::ReachedThreshold(60));
            }
            30 if !self.notified_30 => {
                self.notified_30 = true;
                events.push(TimerEvent::ReachedThreshold(30));
            }
            15 if !self.notified_15 => {
                self.notified_15 = true;
                events.push(TimerEvent::ReachedThreshold(15));
            }
            _ => {}
        }
        if (1..=10).contains(&remaining) && self.last_single_digit_tick != Some(remaining) {
            self.last_single_digit_tick = Some(remaining);
            events.push(TimerEvent::LastTenTick(remaining));
        }
    }
}

/// Countdown state machine for one round at a time.
///
/// Standard rounds run a single counter through
/// `Idle -> Running <-> Paused -> Finished`; free-debate rounds run two
/// per-side counters of which at most one may be running at any instant.
/// All operations are synchronous; `tick` is driven by an external
/// once-per-second clock while the engine is ticking.
pub struct TimerEngine {
    mode: TimerMode,
    round: Option<RoundSpec>,
    remaining: u32,
    running: bool,
    affirmative_remaining: u32,
    negative_remaining: u32,
    affirmative_running: bool,
    negative_running: bool,
    alerts: AlertFlags,
    affirmative_alerts: AlertFlags,
    negative_alerts: AlertFlags,
}

impl TimerEngine {
    pub fn new() -> Self {
        TimerEngine {
            mode: TimerMode::Standard,
            round: None,
            remaining: 0,
            running: false,
            affirmative_remaining: 0,
            negative_remaining: 0,
            affirmative_running: false,
            negative_running: false,
            alerts: AlertFlags::default(),
            affirmative_alerts: AlertFlags::default(),
            negative_alerts: AlertFlags::default(),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// True while any counter is being consumed. Callers wanting stricter
    /// `set_round` semantics can guard on this; the engine itself stays
    /// overridable.
    pub fn is_round_active(&self) -> bool {
        self.snapshot().is_ticking()
    }

    /// Establish a round, overwriting any prior one unconditionally.
    /// Standard rounds get the full duration; free-debate rounds split it in
    /// half per side. All running and notification flags are cleared.
    pub fn set_round(&mut self, spec: RoundSpec) {
        info!(kind = %spec.kind, duration = spec.duration_seconds, "round set");
        self.mode = if spec.is_free_debate() {
            TimerMode::FreeDebate
        } else {
            TimerMode::Standard
        };
        self.running = false;
        self.affirmative_running = false;
        self.negative_running = false;
        match self.mode {
            TimerMode::Standard => {
                self.remaining = spec.duration_seconds;
                self.affirmative_remaining = 0;
                self.negative_remaining = 0;
            }
            TimerMode::FreeDebate => {
                let half = spec.half_duration();
                self.remaining = 0;
                self.affirmative_remaining = half;
                self.negative_remaining = half;
            }
        }
        self.clear_notification_flags();
        self.round = Some(spec);
    }

    /// Begin ticking a standard round. Fails without mutating anything in
    /// free-debate mode or once the countdown is at zero.
    pub fn start(&mut self) -> bool {
        if self.mode != TimerMode::Standard {
            warn!("start() ignored: free-debate rounds use the per-side toggles");
            return false;
        }
        if self.remaining == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Stop ticking a standard round, preserving the remaining time.
    pub fn pause(&mut self) -> bool {
        if self.mode != TimerMode::Standard {
            warn!("pause() ignored: free-debate rounds use the per-side toggles");
            return false;
        }
        self.running = false;
        true
    }

    pub fn resume(&mut self) -> bool {
        self.start()
    }

    /// Flip the affirmative counter. Activating it forces the negative
    /// counter off first: the two sides never run simultaneously.
    pub fn toggle_affirmative(&mut self) -> bool {
        if self.mode != TimerMode::FreeDebate {
            warn!("affirmative toggle ignored outside free debate");
            return false;
        }
        if self.affirmative_running {
            info!("affirmative timer paused");
            self.affirmative_running = false;
            return true;
        }
        if self.affirmative_remaining == 0 {
            warn!("affirmative side has no time left");
            return false;
        }
        if self.negative_running {
            info!("negative timer stopped, switching to affirmative");
            self.negative_running = false;
        }
        self.affirmative_running = true;
        true
    }

    /// Flip the negative counter, forcing the affirmative counter off on
    /// activation.
    pub fn toggle_negative(&mut self) -> bool {
        if self.mode != TimerMode::FreeDebate {
            warn!("negative toggle ignored outside free debate");
            return false;
        }
        if self.negative_running {
            info!("negative timer paused");
            self.negative_running = false;
            return true;
        }
        if self.negative_remaining == 0 {
            warn!("negative side has no time left");
            return false;
        }
        if self.affirmative_running {
            info!("affirmative timer stopped, switching to negative");
            self.affirmative_running = false;
        }
        self.negative_running = true;
        true
    }

    /// Stop ticking and restore the remaining time, either to `duration` or
    /// to the current round's original duration. Notification flags reset so
    /// the thresholds fire again on the next run.
    pub fn reset(&mut self, duration: Option<u32>) {
        info!("timer reset");
        self.running = false;
        self.affirmative_running = false;
        self.negative_running = false;
        match self.mode {
            TimerMode::FreeDebate => {
                let half = match duration {
                    Some(d) => d / 2,
                    None => self.round.as_ref().map(RoundSpec::half_duration).unwrap_or(0),
                };
                self.affirmative_remaining = half;
                self.negative_remaining = half;
            }
            TimerMode::Standard => {
                self.remaining = match duration {
                    Some(d) => d,
                    None => self
                        .round
                        .as_ref()
                        .map(|r| r.duration_seconds)
                        .unwrap_or(0),
                };
            }
        }
        self.clear_notification_flags();
    }

    /// Moderator-forced early termination: stop everything and zero the
    /// counters. Always succeeds.
    pub fn terminate(&mut self) {
        info!("round terminated");
        self.reset(Some(0));
    }

    /// Advance the clock by one second. Decrements whichever counter is
    /// running, floored at zero, and reports what happened. A trailing
    /// `StateChanged` accompanies every effective tick.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        match self.mode {
            TimerMode::Standard => {
                if !self.running || self.remaining == 0 {
                    return events;
                }
                self.remaining -= 1;
                self.alerts.push_events(self.remaining, &mut events);
                if self.remaining == 0 {
                    info!("standard countdown finished");
                    self.running = false;
                    events.push(TimerEvent::RoundFinished);
                }
            }
            TimerMode::FreeDebate => {
                if self.affirmative_running && self.affirmative_remaining > 0 {
                    self.affirmative_remaining -= 1;
                    self.affirmative_alerts
                        .push_events(self.affirmative_remaining, &mut events);
                    if self.affirmative_remaining == 0 {
                        info!("affirmative side finished");
                        self.affirmative_running = false;
                        events.push(TimerEvent::SideFinished(Side::Affirmative));
                    }
                } else if self.negative_running && self.negative_remaining > 0 {
                    self.negative_remaining -= 1;
                    self.negative_alerts
                        .push_events(self.negative_remaining, &mut events);
                    if self.negative_remaining == 0 {
                        info!("negative side finished");
                        self.negative_running = false;
                        events.push(TimerEvent::SideFinished(Side::Negative));
                    }
                } else {
                    return events;
                }
                // The round only ends once both sides have independently
                // reached zero, however the budget was consumed.
                if self.affirmative_remaining == 0 && self.negative_remaining == 0 {
                    info!("free debate finished");
                    self.affirmative_running = false;
                    self.negative_running = false;
                    events.push(TimerEvent::RoundFinished);
                }
            }
        }
        events.push(TimerEvent::StateChanged);
        events
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            remaining: self.remaining,
            running: self.running,
            affirmative_remaining: self.affirmative_remaining,
            negative_remaining: self.negative_remaining,
            affirmative_running: self.affirmative_running,
            negative_running: self.negative_running,
            round_duration: self
                .round
                .as_ref()
                .map(|r| r.duration_seconds)
                .unwrap_or(0),
        }
    }

    fn clear_notification_flags(&mut self) {
        self.alerts = AlertFlags::default();
        self.affirmative_alerts = AlertFlags::default();
        self.negative_alerts = AlertFlags::default();
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::round::FREE_DEBATE_KIND;

    fn standard_round(duration: u32) -> RoundSpec {
        RoundSpec {
            side: Side::Affirmative,
            speaker: "一辩".to_string(),
            kind: "陈词".to_string(),
            duration_seconds: duration,
        }
    }

    fn free_debate_round(duration: u32) -> RoundSpec {
        RoundSpec {
            side: Side::Both,
            speaker: "全体".to_string(),
            kind: FREE_DEBATE_KIND.to_string(),
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_set_round_standard() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(180));
        let snap = engine.snapshot();
        assert_eq!(snap.mode, TimerMode::Standard);
        assert_eq!(snap.remaining, 180);
        assert!(!snap.running);
        assert_eq!(snap.round_duration, 180);
    }

    #[test]
    fn test_set_round_free_debate_splits_in_half() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(300));
        let snap = engine.snapshot();
        assert_eq!(snap.mode, TimerMode::FreeDebate);
        assert_eq!(snap.affirmative_remaining, 150);
        assert_eq!(snap.negative_remaining, 150);
        assert!(!snap.affirmative_running);
        assert!(!snap.negative_running);
    }

    #[test]
    fn test_start_pause_resume() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(10));
        assert!(engine.start());
        assert!(engine.snapshot().running);
        assert!(engine.pause());
        assert!(!engine.snapshot().running);
        assert_eq!(engine.snapshot().remaining, 10);
        assert!(engine.resume());
        assert!(engine.snapshot().running);
    }

    #[test]
    fn test_start_fails_at_zero_or_wrong_mode() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(5));
        engine.terminate();
        assert!(!engine.start());

        engine.set_round(free_debate_round(10));
        assert!(!engine.start());
        assert!(!engine.pause());
    }

    #[test]
    fn test_toggles_rejected_in_standard_mode() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(60));
        assert!(!engine.toggle_affirmative());
        assert!(!engine.toggle_negative());
    }

    #[test]
    fn test_mutual_exclusion_over_toggle_sequences() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(100));
        let toggles: [fn(&mut TimerEngine) -> bool; 6] = [
            TimerEngine::toggle_affirmative,
            TimerEngine::toggle_negative,
            TimerEngine::toggle_negative,
            TimerEngine::toggle_affirmative,
            TimerEngine::toggle_affirmative,
            TimerEngine::toggle_negative,
        ];
        for toggle in toggles {
            toggle(&mut engine);
            let snap = engine.snapshot();
            assert!(
                !(snap.affirmative_running && snap.negative_running),
                "both sides running after a toggle"
            );
        }
    }

    #[test]
    fn test_toggle_switches_active_side() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(100));
        assert!(engine.toggle_affirmative());
        assert_eq!(engine.snapshot().active_side(), Some(Side::Affirmative));
        assert!(engine.toggle_negative());
        let snap = engine.snapshot();
        assert_eq!(snap.active_side(), Some(Side::Negative));
        assert!(!snap.affirmative_running);
    }

    #[test]
    fn test_toggle_fails_when_side_exhausted() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(2));
        engine.toggle_affirmative();
        engine.tick();
        assert_eq!(engine.snapshot().affirmative_remaining, 0);
        assert!(!engine.toggle_affirmative());
        // The other side still has budget and can start.
        assert!(engine.toggle_negative());
    }

    #[test]
    fn test_monotonic_countdown_floored_at_zero() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(3));
        engine.start();
        let mut last = 3;
        for _ in 0..10 {
            engine.tick();
            let now = engine.snapshot().remaining;
            assert!(now <= last);
            last = now;
        }
        assert_eq!(engine.snapshot().remaining, 0);
    }

    #[test]
    fn test_standard_round_finished() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(5));
        engine.start();
        let mut finished = 0;
        for _ in 0..5 {
            for event in engine.tick() {
                if event == TimerEvent::RoundFinished {
                    finished += 1;
                }
            }
        }
        let snap = engine.snapshot();
        assert_eq!(snap.remaining, 0);
        assert!(!snap.running);
        assert_eq!(finished, 1);
        // Further ticks are no-ops and fire nothing.
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn test_free_debate_round_finished() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(10));
        assert_eq!(engine.snapshot().affirmative_remaining, 5);

        engine.toggle_affirmative();
        let mut events = Vec::new();
        for _ in 0..5 {
            events.extend(engine.tick());
        }
        assert!(events.contains(&TimerEvent::SideFinished(Side::Affirmative)));
        assert!(!events.contains(&TimerEvent::RoundFinished));
        assert_eq!(engine.snapshot().affirmative_remaining, 0);
        assert!(!engine.snapshot().affirmative_running);

        engine.toggle_negative();
        let mut events = Vec::new();
        for _ in 0..5 {
            events.extend(engine.tick());
        }
        assert!(events.contains(&TimerEvent::SideFinished(Side::Negative)));
        assert!(events.contains(&TimerEvent::RoundFinished));
        assert!(engine.snapshot().is_finished());
    }

    #[test]
    fn test_threshold_fires_exactly_once() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(65));
        engine.start();
        let mut thresholds = Vec::new();
        let mut last_ten = Vec::new();
        for _ in 0..65 {
            for event in engine.tick() {
                match event {
                    TimerEvent::ReachedThreshold(n) => thresholds.push(n),
                    TimerEvent::LastTenTick(n) => last_ten.push(n),
                    _ => {}
                }
            }
        }
        assert_eq!(thresholds, vec![60, 30, 15]);
        assert_eq!(last_ten, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_free_debate_last_ten_fires_for_each_side() {
        let mut engine = TimerEngine::new();
        // 11 s per side: every tick lands in the last-ten window.
        engine.set_round(free_debate_round(22));
        engine.toggle_affirmative();
        assert!(engine.tick().contains(&TimerEvent::LastTenTick(10)));
        // The negative side enters the window at the same value; its tick
        // must still fire.
        engine.toggle_negative();
        assert!(engine.tick().contains(&TimerEvent::LastTenTick(10)));
    }

    #[test]
    fn test_free_debate_thresholds_fire_for_each_side() {
        let mut engine = TimerEngine::new();
        // 61 s per side, so each side's first tick crosses 60.
        engine.set_round(free_debate_round(122));
        engine.toggle_affirmative();
        assert!(engine.tick().contains(&TimerEvent::ReachedThreshold(60)));
        engine.toggle_negative();
        assert!(engine.tick().contains(&TimerEvent::ReachedThreshold(60)));
    }

    #[test]
    fn test_thresholds_refire_after_reset() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(61));
        engine.start();
        // 61 -> 60 crosses the threshold on the first tick.
        assert!(engine.tick().contains(&TimerEvent::ReachedThreshold(60)));
        engine.reset(None);
        engine.start();
        assert!(engine.tick().contains(&TimerEvent::ReachedThreshold(60)));
    }

    #[test]
    fn test_state_changed_follows_every_tick() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(3));
        engine.start();
        for _ in 0..3 {
            assert_eq!(engine.tick().last(), Some(&TimerEvent::StateChanged));
        }
    }

    #[test]
    fn test_reset_matches_fresh_set_round() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(90));
        engine.start();
        for _ in 0..40 {
            engine.tick();
        }
        engine.pause();
        engine.reset(None);

        let mut fresh = TimerEngine::new();
        fresh.set_round(standard_round(90));
        assert_eq!(engine.snapshot(), fresh.snapshot());
    }

    #[test]
    fn test_reset_free_debate_matches_fresh_set_round() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(60));
        engine.toggle_affirmative();
        for _ in 0..7 {
            engine.tick();
        }
        engine.toggle_negative();
        for _ in 0..3 {
            engine.tick();
        }
        engine.reset(None);

        let mut fresh = TimerEngine::new();
        fresh.set_round(free_debate_round(60));
        assert_eq!(engine.snapshot(), fresh.snapshot());
    }

    #[test]
    fn test_reset_with_explicit_duration() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(120));
        engine.reset(Some(45));
        assert_eq!(engine.snapshot().remaining, 45);

        engine.set_round(free_debate_round(120));
        engine.reset(Some(50));
        let snap = engine.snapshot();
        assert_eq!(snap.affirmative_remaining, 25);
        assert_eq!(snap.negative_remaining, 25);
    }

    #[test]
    fn test_terminate_zeroes_everything() {
        let mut engine = TimerEngine::new();
        engine.set_round(free_debate_round(100));
        engine.toggle_negative();
        engine.tick();
        engine.terminate();
        let snap = engine.snapshot();
        assert_eq!(snap.affirmative_remaining, 0);
        assert_eq!(snap.negative_remaining, 0);
        assert!(!snap.is_ticking());
    }

    #[test]
    fn test_set_round_overwrites_running_round() {
        let mut engine = TimerEngine::new();
        engine.set_round(standard_round(120));
        engine.start();
        engine.tick();
        assert!(engine.is_round_active());
        engine.set_round(free_debate_round(60));
        let snap = engine.snapshot();
        assert_eq!(snap.mode, TimerMode::FreeDebate);
        assert!(!snap.is_ticking());
        assert_eq!(snap.affirmative_remaining, 30);
    }
}
