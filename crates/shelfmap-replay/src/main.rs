//! Headless replay host: runs a recorded input script against a board and
//! prints the resulting board as JSON.

mod script;

use script::{ReplayError, Script};
use std::path::Path;
use std::process::ExitCode;

fn replay(path: &Path) -> Result<String, ReplayError> {
    let replay = Script::load(path)?.run();
    log::info!("Replay emitted {} event(s)", replay.events.len());
    Ok(replay.board.to_json()?)
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: shelfmap-replay <script.json>");
        return ExitCode::from(2);
    };

    log::info!("Replaying {}", path);
    match replay(Path::new(&path)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
