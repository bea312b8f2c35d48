use std::path::Path;

use orbit_view::{options::Options, Viewer};

const USAGE: &str = "Usage: orbit-view <model.gltf | model.glb | URL> [options.toml]";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(model) = args.next() else {
        log::error!("{USAGE}");
        std::process::exit(1);
    };

    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::model_viewer(),
    };

    let result = Viewer::builder()
        .with_path(model)
        .with_options(options)
        .build()
        .run();
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
