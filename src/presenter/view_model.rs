use crate::types::round::{RoundSpec, Side};
use crate::types::sequencer::RoundSequencer;
use crate::types::timer::{TimerMode, TimerSnapshot};

/// Countdown styling threshold: at or below this many seconds the time text
/// switches to the warning treatment.
pub const WARNING_SECONDS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLevel {
    Normal,
    Warning,
}

/// Zero-padded "MM:SS". Floor division, so 61 is "01:01" and 0 is "00:00".
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Completed share of the countdown in [0, 1]. `total` is floored to 1 so an
/// empty round cannot divide by zero.
pub fn progress_fraction(elapsed: u32, total: u32) -> f32 {
    let total = total.max(1);
    (elapsed.min(total) as f32) / (total as f32)
}

pub fn warning_level(remaining: u32) -> WarningLevel {
    if remaining <= WARNING_SECONDS {
        WarningLevel::Warning
    } else {
        WarningLevel::Normal
    }
}

/// One countdown as the surfaces draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownView {
    pub time_text: String,
    pub progress: f32,
    pub warning: WarningLevel,
    pub running: bool,
}

fn countdown_view(remaining: u32, total: u32, running: bool) -> CountdownView {
    CountdownView {
        time_text: format_mmss(remaining),
        progress: progress_fraction(total.saturating_sub(remaining), total),
        warning: warning_level(remaining),
        running,
    }
}

/// Everything the moderator surface renders. Always fully populated; the
/// control panel never reaches into engine or sequencer state directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlViewModel {
    pub round_lines: Vec<String>,
    pub selected: Option<usize>,
    pub current_round_text: String,
    pub duration_text: String,
    pub mode: TimerMode,
    pub ticking: bool,
    pub standard: CountdownView,
    pub affirmative: CountdownView,
    pub negative: CountdownView,
}

/// What the active-round view on the display board shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoundView {
    pub title: String,
    pub speaker_line: String,
    pub free_debate: bool,
    pub standard: CountdownView,
    pub affirmative: CountdownView,
    pub negative: CountdownView,
}

/// One roster row: speaking role, name, and whether this debater is the one
/// currently on the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct DebaterLine {
    pub role: &'static str,
    pub name: String,
    pub active: bool,
}

/// Everything the audience surface renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayViewModel {
    pub topic: String,
    pub affirmative_school: String,
    pub affirmative_viewpoint: String,
    pub negative_school: String,
    pub negative_viewpoint: String,
    pub affirmative_debaters: Vec<DebaterLine>,
    pub negative_debaters: Vec<DebaterLine>,
    /// None while previewing, Some while a round is on the clock.
    pub active: Option<ActiveRoundView>,
    pub preview_line: String,
    pub next_round_line: String,
}

/// Header strings supplied by the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebateHeader {
    pub topic: String,
    pub affirmative_school: String,
    pub affirmative_viewpoint: String,
    pub negative_school: String,
    pub negative_viewpoint: String,
    pub affirmative_debaters: [String; 4],
    pub negative_debaters: [String; 4],
}

/// Speaking roles in roster order; round specs carry the same strings in
/// their `speaker` field.
const DEBATER_ROLES: [&str; 4] = ["一辩", "二辩", "三辩", "四辩"];

fn roster_lines(
    names: &[String; 4],
    side: Side,
    active_round: Option<&RoundSpec>,
) -> Vec<DebaterLine> {
    DEBATER_ROLES
        .iter()
        .zip(names)
        .map(|(&role, name)| DebaterLine {
            role,
            name: name.clone(),
            active: active_round.is_some_and(|r| r.side == side && r.speaker == role),
        })
        .collect()
}

/// Wall-clock line for the display footer.
pub fn clock_line(now: chrono::DateTime<chrono::Local>) -> String {
    format!("北京时间：{}", now.format("%H:%M:%S"))
}

pub fn round_list_line(index: usize, round: &RoundSpec) -> String {
    format!(
        "{}. [{}] {} - {} ({}秒)",
        index + 1,
        round.side.label(),
        round.speaker,
        round.kind,
        round.duration_seconds
    )
}

fn round_summary(round: &RoundSpec) -> String {
    format!("{} {} - {}", round.side.label(), round.speaker, round.kind)
}

fn duration_line(round: &RoundSpec) -> String {
    format!(
        "时长: {}分{}秒",
        round.duration_seconds / 60,
        round.duration_seconds % 60
    )
}

pub fn build_control_view(
    snapshot: &TimerSnapshot,
    sequencer: &RoundSequencer,
) -> ControlViewModel {
    let (current_round_text, duration_text) = match sequencer.current() {
        Some(round) => (round_summary(round), duration_line(round)),
        None => ("未选择环节".to_string(), "时长: 0分0秒".to_string()),
    };
    let half = snapshot.round_duration / 2;
    ControlViewModel {
        round_lines: sequencer
            .rounds()
            .iter()
            .enumerate()
            .map(|(i, r)| round_list_line(i, r))
            .collect(),
        selected: sequencer.current_index(),
        current_round_text,
        duration_text,
        mode: snapshot.mode,
        ticking: snapshot.is_ticking(),
        standard: countdown_view(snapshot.remaining, snapshot.round_duration, snapshot.running),
        affirmative: countdown_view(
            snapshot.affirmative_remaining,
            half,
            snapshot.affirmative_running,
        ),
        negative: countdown_view(snapshot.negative_remaining, half, snapshot.negative_running),
    }
}

/// `previewing` carries the round index the display should advertise instead
/// of an active countdown (round terminated or finished, or nothing started
/// yet).
pub fn build_display_view(
    header: &DebateHeader,
    snapshot: &TimerSnapshot,
    sequencer: &RoundSequencer,
    previewing: Option<usize>,
) -> DisplayViewModel {
    let preview_round = previewing.and_then(|i| sequencer.rounds().get(i));
    let preview_line = match preview_round {
        Some(round) => format!(
            "下一环节: {} | {} {} | {}",
            round.kind,
            round.side.label(),
            round.speaker,
            format_mmss(round.duration_seconds)
        ),
        None => "下一环节: 准备中...".to_string(),
    };

    // The highlight on the roster follows the active round, never a preview.
    let active_round = if previewing.is_none() {
        sequencer.current()
    } else {
        None
    };

    let active = active_round.map(|round| {
        let half = snapshot.round_duration / 2;
        ActiveRoundView {
            title: round.kind.clone(),
            speaker_line: format!("{} {}", round.side.label(), round.speaker),
            free_debate: snapshot.mode == TimerMode::FreeDebate,
            standard: countdown_view(snapshot.remaining, snapshot.round_duration, snapshot.running),
            affirmative: countdown_view(
                snapshot.affirmative_remaining,
                half,
                snapshot.affirmative_running,
            ),
            negative: countdown_view(snapshot.negative_remaining, half, snapshot.negative_running),
        }
    });

    let next_round_line = match sequencer.peek_next() {
        Some(next) => format!("{}{} - {}", next.side.label(), next.speaker, next.kind),
        None => "辩论结束".to_string(),
    };

    DisplayViewModel {
        topic: header.topic.clone(),
        affirmative_school: header.affirmative_school.clone(),
        affirmative_viewpoint: header.affirmative_viewpoint.clone(),
        negative_school: header.negative_school.clone(),
        negative_viewpoint: header.negative_viewpoint.clone(),
        affirmative_debaters: roster_lines(
            &header.affirmative_debaters,
            Side::Affirmative,
            active_round,
        ),
        negative_debaters: roster_lines(&header.negative_debaters, Side::Negative, active_round),
        active,
        preview_line,
        next_round_line,
    }
}
