//! Converter binary
//!
//! Usage: `kpp2json [INPUT_DIR] [OUTPUT_ROOT]`, defaulting to `kpp` and the
//! current directory.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    kpp2json::init();

    let mut args = std::env::args().skip(1);
    let input_dir = PathBuf::from(args.next().unwrap_or_else(|| "kpp".to_string()));
    let output_root = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    match kpp2json::convert::convert_directory(&input_dir, &output_root) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
