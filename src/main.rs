use hostlist_report::cli::{CliArgs, ResponseKind};
use hostlist_report::storage::{HostStorage, StorageFormat};
use hostlist_report::{HostResponses, Presentable, RenderOptions, config, render_report, ui};
use log::debug;
use serde::de::DeserializeOwned;
use std::io::{self, Read};

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    let opts = match config::build_render_options(&args) {
        Ok(o) => o,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    let input = match read_input(&args) {
        Ok(text) => text,
        Err(e) => {
            ui::print_error(&e);
            std::process::exit(1);
        }
    };

    let result = match args.kind {
        ResponseKind::Generic => print_report::<serde_json::Value>(&input, &opts),
        ResponseKind::Scan => print_report::<HostStorage>(&input, &opts),
        ResponseKind::Format => print_report::<StorageFormat>(&input, &opts),
    };

    if let Err(e) = result {
        ui::print_error(&e);
        std::process::exit(1);
    }
}

/// Read the response batch from --input or stdin
fn read_input(args: &CliArgs) -> Result<String, String> {
    match args.input {
        Some(ref path) => {
            debug!("Reading responses from {:?}", path);
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
        }
        None => {
            debug!("Reading responses from stdin");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|e| format!("Failed to read stdin: {}", e))?;
            Ok(text)
        }
    }
}

/// Parse, group and print one batch of responses
fn print_report<P: Presentable + DeserializeOwned>(input: &str, opts: &RenderOptions) -> Result<(), String> {
    let batch: HostResponses<P> =
        serde_json::from_str(input).map_err(|e| format!("Failed to parse responses: {}", e))?;
    let results = batch.collect().map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_report(&results, &mut out, opts).map_err(|e| e.to_string())
}
