use crate::ops::audio::Notifier;
use crate::presenter::flash::{FlashState, flash_spec};
use crate::presenter::view_model::{DebateHeader, build_control_view, build_display_view};
use crate::types::config::DebateConfig;
use crate::types::round::Side;
use crate::types::sequencer::RoundSequencer;
use crate::types::timer::{TimerEngine, TimerEvent, TimerMode};
use crate::ui::control_panel::{ControlCommand, control_panel};
use crate::ui::display_board::display_board;
use eframe::egui;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::error;

/// Owns the core state and both surfaces. All mutation happens here, inside
/// a single `update` turn: drive the clock, dispatch the resulting events,
/// apply moderator commands, then hand read-only view models to the two
/// windows.
pub struct DebateApp {
    engine: TimerEngine,
    sequencer: RoundSequencer,
    header: DebateHeader,
    /// Some(index) while the display board previews a round; None while the
    /// current round is on the clock.
    previewing: Option<usize>,
    status: String,
    flash: FlashState,
    notifier: Notifier,
    last_tick: Option<Instant>,
}

impl DebateApp {
    pub fn new(notifier: Notifier) -> Self {
        DebateApp {
            engine: TimerEngine::new(),
            sequencer: RoundSequencer::new(),
            header: DebateHeader::default(),
            previewing: None,
            status: "就绪".to_string(),
            flash: FlashState::new(),
            notifier,
            last_tick: None,
        }
    }

    pub fn load_config(&mut self, path: &Path) {
        match DebateConfig::from_file(path) {
            Ok(config) => {
                let (affirmative_debaters, negative_debaters) = config.rosters();
                self.header = DebateHeader {
                    topic: config.topic.clone(),
                    affirmative_school: config.affirmative.school.clone(),
                    affirmative_viewpoint: config.affirmative.viewpoint.clone(),
                    negative_school: config.negative.school.clone(),
                    negative_viewpoint: config.negative.viewpoint.clone(),
                    affirmative_debaters,
                    negative_debaters,
                };
                self.sequencer.load(config.round_specs());
                self.engine = TimerEngine::new();
                let _ = self.sequencer.select(0);
                self.previewing = Some(0);
                self.status = "配置已加载".to_string();
            }
            Err(e) => {
                error!("failed to load config from {}: {e}", path.display());
                self.status = format!("配置加载失败: {e}");
            }
        }
    }

    // One engine tick per elapsed second while a counter is running.
    fn drive_clock(&mut self, now: Instant) {
        if !self.engine.is_round_active() {
            self.last_tick = None;
            return;
        }
        let last = *self.last_tick.get_or_insert(now);
        if now.duration_since(last) >= Duration::from_secs(1) {
            self.last_tick = Some(now);
            let events = self.engine.tick();
            self.handle_events(&events, now);
        }
    }

    fn handle_events(&mut self, events: &[TimerEvent], now: Instant) {
        let snapshot = self.engine.snapshot();
        for event in events {
            match event {
                TimerEvent::ReachedThreshold(_) | TimerEvent::LastTenTick(_) => {
                    if let Some(spec) = flash_spec(event, &snapshot) {
                        self.flash.trigger(spec, now);
                    }
                    self.notifier.play_notification();
                }
                TimerEvent::SideFinished(side) => {
                    self.notifier.play_timeover();
                    self.status = match side {
                        Side::Affirmative => "正方发言时间已用完".to_string(),
                        Side::Negative => "反方发言时间已用完".to_string(),
                        Side::Both => "发言时间已用完".to_string(),
                    };
                }
                TimerEvent::RoundFinished => {
                    self.notifier.play_timeover();
                    self.status = "环节计时结束".to_string();
                    // Natural finish moves the selection on to the next round
                    // and drops the display back to preview. After the last
                    // round there is nothing left to preview.
                    self.previewing = if self.sequencer.advance() {
                        self.sequencer.current_index()
                    } else {
                        None
                    };
                }
                TimerEvent::StateChanged => {}
            }
        }
    }

    fn apply(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::LoadConfig(path) => self.load_config(&path),
            ControlCommand::SelectRound(index) => {
                if self.engine.is_round_active() {
                    self.status = "环节进行中，无法切换".to_string();
                    return;
                }
                match self.sequencer.select(index) {
                    Ok(()) => {
                        self.previewing = Some(index);
                        self.status = format!("已选择第{}个环节", index + 1);
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }
            ControlCommand::StartRound => match self.sequencer.current_index() {
                Some(index) => self.start_round(index),
                None => self.status = "请先选择一个环节".to_string(),
            },
            ControlCommand::PrevRound => {
                if self.sequencer.retreat() {
                    self.engine.terminate();
                    if let Some(index) = self.sequencer.current_index() {
                        self.start_round(index);
                    }
                } else {
                    self.status = "已经是第一个环节".to_string();
                }
            }
            ControlCommand::NextRound => {
                if self.sequencer.advance() {
                    self.engine.terminate();
                    if let Some(index) = self.sequencer.current_index() {
                        self.start_round(index);
                    }
                } else {
                    self.status = "已经是最后一个环节".to_string();
                }
            }
            ControlCommand::ToggleTimer => {
                if self.engine.snapshot().running {
                    self.engine.pause();
                    self.status = "计时已暂停".to_string();
                } else if self.engine.start() {
                    self.status = "计时进行中".to_string();
                } else {
                    self.status = "无法开始计时".to_string();
                }
            }
            ControlCommand::ToggleAffirmative => {
                if !self.engine.toggle_affirmative() {
                    let snap = self.engine.snapshot();
                    self.status = if snap.mode == TimerMode::FreeDebate
                        && snap.affirmative_remaining == 0
                    {
                        "正方发言时间已用完".to_string()
                    } else {
                        "当前环节不支持正反方计时".to_string()
                    };
                }
            }
            ControlCommand::ToggleNegative => {
                if !self.engine.toggle_negative() {
                    let snap = self.engine.snapshot();
                    self.status = if snap.mode == TimerMode::FreeDebate
                        && snap.negative_remaining == 0
                    {
                        "反方发言时间已用完".to_string()
                    } else {
                        "当前环节不支持正反方计时".to_string()
                    };
                }
            }
            ControlCommand::ResetTimer => {
                self.engine.reset(None);
                self.status = "计时已重置".to_string();
            }
            ControlCommand::TerminateRound => {
                self.previewing = self.sequencer.terminate_and_advance(&mut self.engine);
                self.status = "回合已终止".to_string();
            }
        }
    }

    fn start_round(&mut self, index: usize) {
        match self.sequencer.start_round(index, &mut self.engine) {
            Ok(_) => {
                self.previewing = None;
                self.status = format!("已开始第{}个环节", index + 1);
            }
            Err(e) => self.status = e.to_string(),
        }
    }
}

impl eframe::App for DebateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drive_clock(now);

        let snapshot = self.engine.snapshot();
        let control_view = build_control_view(&snapshot, &self.sequencer);
        let display_view =
            build_display_view(&self.header, &snapshot, &self.sequencer, self.previewing);

        let mut commands = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            commands = control_panel(ui, &control_view, &self.status);
        });

        let board_title = if self.header.topic.is_empty() {
            "辩论背景看板".to_string()
        } else {
            format!("辩论背景看板 - {}", self.header.topic)
        };
        let flash = &mut self.flash;
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("display_board"),
            egui::ViewportBuilder::default()
                .with_title(board_title)
                .with_inner_size([1280.0, 720.0]),
            |ctx, _class| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    display_board(ui, &display_view, flash, now);
                });
            },
        );

        for command in commands {
            self.apply(command);
        }

        // Repaint fast while something is counting down or flashing, once a
        // second otherwise so the wall clock on the board keeps moving.
        let delay = if self.engine.is_round_active() || self.flash.is_active() {
            Duration::from_millis(100)
        } else {
            Duration::from_secs(1)
        };
        ctx.request_repaint_after(delay);
    }
}
