//! GUI module
//!
//! egui-based graphical user interface.

mod app;

use crate::config::Config;
use anyhow::Result;

/// Run the GUI application
pub fn run(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("hangar"),
        ..Default::default()
    };

    eframe::run_native(
        "hangar",
        options,
        Box::new(|cc| match app::HangarApp::new(cc, config) {
            Ok(app) => Ok(Box::new(app)),
            Err(err) => Err(err.into()),
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
}
