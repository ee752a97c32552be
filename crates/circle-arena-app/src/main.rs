//! Main application entry point.

use circle_arena_app::Script;
use circle_arena_core::{Arena, ArenaConfig, ShortcutRegistry};
use std::io::Read;
use std::process::ExitCode;

const USAGE: &str = "usage: circle-arena [--config <file>] [--shortcuts] [script]";

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Circle Arena");

    let mut config_path = None;
    let mut script_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            },
            "--shortcuts" => {
                ShortcutRegistry::print_all();
                return ExitCode::SUCCESS;
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ if script_path.is_none() => script_path = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
        }
    }

    let config = match config_path {
        Some(path) => match ArenaConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ArenaConfig::default(),
    };

    let script = match script_path {
        Some(path) => Script::load(&path),
        None => {
            let mut source = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut source) {
                log::error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
            Script::parse(&source)
        }
    };
    let script = match script {
        Ok(script) => script,
        Err(e) => {
            log::error!("Failed to read script: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut arena = Arena::new(&config);
    script.run(&mut arena);
    log::info!(
        "Ran {} steps: {} shapes, {} history events",
        script.steps().len(),
        arena.shapes().count(),
        arena.history().len()
    );

    match serde_json::to_string_pretty(&arena.snapshot()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}
