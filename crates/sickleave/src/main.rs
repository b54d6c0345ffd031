use relm4::prelude::*;
use sickleave::config;
use sickleave::gui::app::AppModel;
use sickleave::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.sickleave.Gauge");

    app.run::<AppModel>((config, rx));
}
