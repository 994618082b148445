use crate::presenter::view_model::{ControlViewModel, WarningLevel};
use crate::types::timer::TimerMode;
use eframe::egui;
use std::path::PathBuf;

/// Moderator intents raised by the control surface, applied by the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    LoadConfig(PathBuf),
    SelectRound(usize),
    StartRound,
    PrevRound,
    NextRound,
    ToggleTimer,
    ToggleAffirmative,
    ToggleNegative,
    ResetTimer,
    TerminateRound,
}

fn time_color(warning: WarningLevel) -> egui::Color32 {
    match warning {
        WarningLevel::Warning => egui::Color32::from_rgb(196, 43, 28),
        WarningLevel::Normal => egui::Color32::from_rgb(50, 49, 48),
    }
}

pub fn control_panel(
    ui: &mut egui::Ui,
    view: &ControlViewModel,
    status: &str,
) -> Vec<ControlCommand> {
    let mut commands = Vec::new();
    let loaded = !view.round_lines.is_empty();

    ui.heading("辩论赛控制系统");
    ui.separator();

    if ui.button("加载配置文件").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            commands.push(ControlCommand::LoadConfig(path));
        }
    }

    ui.separator();
    ui.label("辩论流程");
    egui::ScrollArea::vertical()
        .max_height(240.0)
        .show(ui, |ui| {
            for (i, line) in view.round_lines.iter().enumerate() {
                let selected = view.selected == Some(i);
                if ui.selectable_label(selected, line).clicked() && !selected {
                    commands.push(ControlCommand::SelectRound(i));
                }
            }
            if !loaded {
                ui.label("未加载配置文件");
            }
        });

    ui.separator();
    ui.strong(&view.current_round_text);
    ui.label(&view.duration_text);

    ui.add_enabled_ui(loaded, |ui| {
        ui.horizontal(|ui| {
            if ui.button("上一环节").clicked() {
                commands.push(ControlCommand::PrevRound);
            }
            if ui.button("下一环节").clicked() {
                commands.push(ControlCommand::NextRound);
            }
        });
        if ui.button("开始当前环节").clicked() {
            commands.push(ControlCommand::StartRound);
        }

        ui.separator();
        match view.mode {
            TimerMode::Standard => {
                ui.label(
                    egui::RichText::new(&view.standard.time_text)
                        .size(28.0)
                        .strong()
                        .color(time_color(view.standard.warning)),
                );
                ui.horizontal(|ui| {
                    let toggle_text = if view.standard.running {
                        "暂停计时"
                    } else {
                        "开始计时"
                    };
                    if ui.button(toggle_text).clicked() {
                        commands.push(ControlCommand::ToggleTimer);
                    }
                    if ui.button("重置计时").clicked() {
                        commands.push(ControlCommand::ResetTimer);
                    }
                });
            }
            TimerMode::FreeDebate => {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&view.affirmative.time_text)
                            .size(22.0)
                            .strong()
                            .color(time_color(view.affirmative.warning)),
                    );
                    let aff_text = if view.affirmative.running {
                        "暂停正方"
                    } else {
                        "正方计时"
                    };
                    if ui.button(aff_text).clicked() {
                        commands.push(ControlCommand::ToggleAffirmative);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&view.negative.time_text)
                            .size(22.0)
                            .strong()
                            .color(time_color(view.negative.warning)),
                    );
                    let neg_text = if view.negative.running {
                        "暂停反方"
                    } else {
                        "反方计时"
                    };
                    if ui.button(neg_text).clicked() {
                        commands.push(ControlCommand::ToggleNegative);
                    }
                });
                if ui.button("重置计时").clicked() {
                    commands.push(ControlCommand::ResetTimer);
                }
            }
        }

        if ui.button("结束回合").clicked() {
            commands.push(ControlCommand::TerminateRound);
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("辩论状态:");
        ui.colored_label(egui::Color32::from_rgb(16, 124, 16), status);
    });

    commands
}
