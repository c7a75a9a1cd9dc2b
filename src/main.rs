use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use openstick::config::JoystickOptions;
use openstick::plugins::{GamepadPlugin, KeyboardPlugin, PointerPlugin};
use openstick::ui::JoystickDemo;
use openstick::JoystickProps;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const GAMEPAD_DEADZONE: f32 = 0.05;

fn main() -> Result<()> {
    setup()?;

    let options = JoystickOptions::load_or_default()?;
    info!("Loaded joystick options: {:?}", options);

    let mut props = JoystickProps::from_options(options)
        .with_plugin(PointerPlugin::new())
        .with_plugin(KeyboardPlugin::default());

    match GamepadPlugin::gilrs(GAMEPAD_DEADZONE) {
        Ok(plugin) => props = props.with_plugin(plugin),
        Err(e) => warn!("Gamepad input unavailable: {}", e),
    }

    let demo = JoystickDemo::new(props)?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("OpenStick")
        .with_inner_size([480.0, 620.0]);

    eframe::run_native(
        "OpenStick",
        native_options,
        Box::new(move |_cc| Ok(Box::new(demo))),
    )
    .map_err(|e| eyre!("Failed to run demo: {}", e))?;

    info!("Demo closed");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
