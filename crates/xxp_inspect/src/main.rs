use std::process::ExitCode;

use clap::Parser;
use xxp::{Endian, Value};

use crate::args::InspectArgs;
use crate::input::InspectError;

mod args;
mod input;

fn main() -> ExitCode {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "INFO");
    }
    pretty_env_logger::init();

    let args = InspectArgs::parse();

    match inspect(&args) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads the input and decodes it as described by the args
fn inspect(args: &InspectArgs) -> Result<Value, InspectError> {
    let mut bytes = input::read_input(args.input.as_deref())?;
    if args.hex {
        bytes = input::from_hex_text(&bytes)?;
    }

    let order = Endian::from(args.order);
    log::info!("decoding {} bytes as {} ({} endian)", bytes.len(), args.shape, order);

    let value = xxp::decode_with(&bytes, order, &args.shape, args.config())?;
    Ok(value)
}
