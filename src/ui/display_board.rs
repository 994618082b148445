use crate::presenter::flash::{FlashColor, FlashState, FlashTarget};
use crate::presenter::view_model::{
    CountdownView, DebaterLine, DisplayViewModel, WarningLevel, clock_line,
};
use eframe::egui;
use std::time::Instant;

const AFFIRMATIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 120, 212);
const NEGATIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(209, 52, 56);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(50, 49, 48);
const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(196, 43, 28);
const NOTICE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 140, 0);
const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 215, 0);

fn countdown_color(
    view: &CountdownView,
    target: FlashTarget,
    flash: &mut FlashState,
    now: Instant,
) -> egui::Color32 {
    match flash.lit(target, now) {
        Some(FlashColor::Urgent) => WARNING_COLOR,
        Some(FlashColor::Notice) => NOTICE_COLOR,
        None => match view.warning {
            WarningLevel::Warning => WARNING_COLOR,
            WarningLevel::Normal => TEXT_COLOR,
        },
    }
}

fn countdown_block(
    ui: &mut egui::Ui,
    title: Option<&str>,
    view: &CountdownView,
    color: egui::Color32,
    accent: egui::Color32,
) {
    ui.vertical_centered(|ui| {
        if let Some(title) = title {
            ui.label(egui::RichText::new(title).size(20.0).strong().color(accent));
        }
        ui.label(egui::RichText::new(&view.time_text).size(56.0).strong().color(color));
        ui.add(
            egui::ProgressBar::new(view.progress)
                .desired_width(220.0)
                .fill(accent),
        );
    });
}

fn roster_block(ui: &mut egui::Ui, debaters: &[DebaterLine], accent: egui::Color32) {
    ui.label(egui::RichText::new("辩手阵容").size(16.0).strong().color(accent));
    for line in debaters {
        let text = format!("{} {}", line.role, line.name);
        if line.active {
            ui.label(
                egui::RichText::new(text)
                    .strong()
                    .color(egui::Color32::BLACK)
                    .background_color(HIGHLIGHT_COLOR),
            );
        } else {
            ui.label(text);
        }
    }
}

/// Audience-facing surface. Render-only: everything it shows comes from the
/// view model, the flash state and the clock.
pub fn display_board(
    ui: &mut egui::Ui,
    view: &DisplayViewModel,
    flash: &mut FlashState,
    now: Instant,
) {
    ui.vertical_centered(|ui| {
        ui.heading(egui::RichText::new(&view.topic).size(30.0).strong());
    });
    ui.separator();

    match &view.active {
        Some(round) => {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&round.title).size(24.0).strong());
                ui.label(egui::RichText::new(&round.speaker_line).size(18.0));
            });
            if round.free_debate {
                ui.columns(2, |columns| {
                    let aff_color = countdown_color(
                        &round.affirmative,
                        FlashTarget::Affirmative,
                        flash,
                        now,
                    );
                    countdown_block(
                        &mut columns[0],
                        Some("正方"),
                        &round.affirmative,
                        aff_color,
                        AFFIRMATIVE_COLOR,
                    );
                    let neg_color =
                        countdown_color(&round.negative, FlashTarget::Negative, flash, now);
                    countdown_block(
                        &mut columns[1],
                        Some("反方"),
                        &round.negative,
                        neg_color,
                        NEGATIVE_COLOR,
                    );
                });
            } else {
                let color = countdown_color(&round.standard, FlashTarget::Standard, flash, now);
                countdown_block(ui, None, &round.standard, color, AFFIRMATIVE_COLOR);
            }
        }
        None => {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(&view.preview_line).size(22.0).strong());
            });
        }
    }

    ui.separator();
    ui.columns(2, |columns| {
        columns[0].vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("正方")
                    .size(28.0)
                    .strong()
                    .color(AFFIRMATIVE_COLOR),
            );
            ui.label(egui::RichText::new(&view.affirmative_school).color(AFFIRMATIVE_COLOR));
            ui.label(&view.affirmative_viewpoint);
            ui.add_space(6.0);
            roster_block(ui, &view.affirmative_debaters, AFFIRMATIVE_COLOR);
        });
        columns[1].vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("反方")
                    .size(28.0)
                    .strong()
                    .color(NEGATIVE_COLOR),
            );
            ui.label(egui::RichText::new(&view.negative_school).color(NEGATIVE_COLOR));
            ui.label(&view.negative_viewpoint);
            ui.add_space(6.0);
            roster_block(ui, &view.negative_debaters, NEGATIVE_COLOR);
        });
    });

    ui.separator();
    ui.vertical_centered(|ui| {
        ui.label("下一环节");
        ui.strong(&view.next_round_line);
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(clock_line(chrono::Local::now()))
                .size(22.0)
                .color(TEXT_COLOR),
        );
    });
}
