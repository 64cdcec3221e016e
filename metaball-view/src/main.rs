//! Application entry point for the metaball viewer.
//!
//! This binary sets up eframe/egui and delegates all interactive
//! logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use metaball_core::config::Config;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// This function configures [`eframe::NativeOptions`] with default
/// settings and launches the main window titled `"Metaballs"`.
/// All UI state and rendering are handled by [`Viewer`].
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("starting metaball viewer");

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Metaballs",
        options,
        Box::new(|_cc| {
            // Check the construction-time invariants before handing the
            // configuration to the viewer.
            let cfg = Config::default().validated()?;
            Ok(Box::new(Viewer::with_config(cfg)))
        }),
    )
}
