//! Simple command that prints one or '-n count' sortable IDs, or random IDs of '-l length'

use std::{env, io, io::Write, process::ExitCode};

struct Options {
    count: usize,
    length: Option<usize>,
}

fn main() -> io::Result<ExitCode> {
    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!(
                    "Usage: {} [-n count] [-l length]",
                    program.as_deref().unwrap_or("id62")
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count {
        let result = match opts.length {
            Some(length) => id62::create_id(length),
            None => id62::create_sortable_id().map(String::from),
        };
        match result {
            Ok(id) => writeln!(buf, "{}", id)?,
            Err(err) => {
                buf.flush()?;
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut count = None;
    let mut length = None;
    while let Some(arg) = args.next() {
        let (name, slot) = match arg.as_str() {
            "-n" => ('n', &mut count),
            "-l" => ('l', &mut length),
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        };
        if slot.is_some() {
            return Err(format!("option '{}' given more than once", name));
        }
        let Some(value_arg) = args.next() else {
            return Err(format!("argument to option '{}' missing", name));
        };
        let Ok(value) = value_arg.parse() else {
            return Err(format!("invalid argument to option '{}': '{}'", name, value_arg));
        };
        slot.replace(value);
    }
    Ok(Options {
        count: count.unwrap_or(1),
        length,
    })
}
