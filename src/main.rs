mod ops;
mod presenter;
mod types;
mod ui;

use crate::ops::audio::Notifier;
use crate::ui::app::DebateApp;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut app = DebateApp::new(Notifier::new());

    // Optional config path on the command line skips the file dialog.
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        info!("loading config from {}", path.display());
        app.load_config(&path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("辩论控制面板")
            .with_inner_size([900.0, 650.0]),
        ..Default::default()
    };
    eframe::run_native(
        "辩论赛计时系统",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )?;
    Ok(())
}
