use lunchwheel::config;
use lunchwheel::gui::app::AppModel;
use lunchwheel::gui::wheel::{Motion, Wheel};
use lunchwheel::sys::runtime::Services;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    if std::env::args().any(|a| a == "--write-config") {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_or_default();
    let palette = config.wheel.palette.clone();
    let motion = Motion::random(&mut rand::thread_rng(), config.spin);
    let wheel = Wheel::new(palette, motion);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    let services = Services::start(tx)?;

    let app = RelmApp::new("org.lunchwheel.Lunchwheel");

    app.run::<AppModel>((wheel, config, services, rx));
    Ok(())
}
