use std::path::Path;
use std::{env, process};

mod color;
mod config;
mod library;
mod player;
mod runtime;
mod status;
mod stop;
mod surface;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional argument: the data root holding the tracks/ and utils/
    // document directories. Defaults to the working directory.
    let data_root = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let status = runtime::run(Path::new(&data_root));
    process::exit(status.code());
}
