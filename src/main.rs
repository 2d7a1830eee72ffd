//! mdtree CLI - print the document tree of a markup file as pseudo-XML

use std::io::{self, Read, Write};
use std::process::ExitCode;

fn main() -> io::Result<ExitCode> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    // Simple usage: read from stdin or file
    let input = if args.len() > 1 && args[1] != "-" {
        std::fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    match mdtree::parse(&input) {
        Ok(document) => {
            io::stdout().write_all(mdtree::to_pseudo_xml(&document).as_bytes())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("mdtree: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
