use crate::types::round::Side;
use crate::types::timer::{TimerEvent, TimerSnapshot};
use std::time::{Duration, Instant};

// Tunable presentation parameters: how many blink repeats each urgency level
// gets, and how long one on/off phase lasts.
const REPEATS_AT_60: u32 = 1;
const REPEATS_AT_30: u32 = 2;
const REPEATS_AT_15: u32 = 3;
const REPEATS_LAST_TEN: u32 = 1;
const BLINK_PHASE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashTarget {
    Standard,
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashColor {
    Notice,
    Urgent,
}

/// A single flash instruction derived from one timer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSpec {
    pub target: FlashTarget,
    pub repeats: u32,
    pub color: FlashColor,
}

/// Convert a timer event into a flash instruction. The target follows the
/// counter that produced the event: the single countdown in standard mode,
/// the active side in free debate.
pub fn flash_spec(event: &TimerEvent, snapshot: &TimerSnapshot) -> Option<FlashSpec> {
    let target = match snapshot.active_side() {
        Some(Side::Affirmative) => FlashTarget::Affirmative,
        Some(Side::Negative) => FlashTarget::Negative,
        _ => FlashTarget::Standard,
    };
    match event {
        TimerEvent::ReachedThreshold(60) => Some(FlashSpec {
            target,
            repeats: REPEATS_AT_60,
            color: FlashColor::Notice,
        }),
        TimerEvent::ReachedThreshold(30) => Some(FlashSpec {
            target,
            repeats: REPEATS_AT_30,
            color: FlashColor::Notice,
        }),
        TimerEvent::ReachedThreshold(_) => Some(FlashSpec {
            target,
            repeats: REPEATS_AT_15,
            color: FlashColor::Urgent,
        }),
        TimerEvent::LastTenTick(_) => Some(FlashSpec {
            target,
            repeats: REPEATS_LAST_TEN,
            color: FlashColor::Urgent,
        }),
        _ => None,
    }
}

struct ActiveFlash {
    spec: FlashSpec,
    started: Instant,
}

/// Owns the blink phase for the two surfaces. Triggering while a flash is in
/// progress replaces it, so a stream of last-ten events reads as one
/// continuous blink instead of stacking.
pub struct FlashState {
    active: Option<ActiveFlash>,
}

impl FlashState {
    pub fn new() -> Self {
        FlashState { active: None }
    }

    pub fn trigger(&mut self, spec: FlashSpec, now: Instant) {
        self.active = Some(ActiveFlash { spec, started: now });
    }

    /// Whether `target` should currently be drawn highlighted, and with what
    /// color. Expired flashes are dropped on query.
    pub fn lit(&mut self, target: FlashTarget, now: Instant) -> Option<FlashColor> {
        let flash = self.active.as_ref()?;
        let total = BLINK_PHASE * (flash.spec.repeats * 2);
        let elapsed = now.duration_since(flash.started);
        if elapsed >= total {
            self.active = None;
            return None;
        }
        if flash.spec.target != target {
            return None;
        }
        // On during even phases, off during odd ones.
        let phase = (elapsed.as_millis() / BLINK_PHASE.as_millis()) as u32;
        if phase % 2 == 0 {
            Some(flash.spec.color)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for FlashState {
    fn default() -> Self {
        Self::new()
    }
}
