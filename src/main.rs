extern crate clap;
extern crate dirs;
extern crate evalrus_list;
extern crate rustyline;

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::process;

use clap::{App, Arg};

use rustyline::error::ReadlineError;
use rustyline::Editor;

use tracing::Level;

use evalrus_list::repl::ReadEvalPrint;
use evalrus_list::RuntimeError;

/// Read a file into a String
fn load_file(filename: &str) -> Result<String, io::Error> {
    let mut contents = String::new();

    File::open(filename)?.read_to_string(&mut contents)?;

    Ok(contents)
}

/// Read and evaluate an entire file, one line at a time
fn read_file(filename: &str) -> Result<(), RuntimeError> {
    let contents = load_file(&filename)?;

    let rep = ReadEvalPrint::new();
    for line in contents.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        rep.run(line)?;
    }

    Ok(())
}

/// Read a line at a time, evaluating each against the current list
fn read_print_loop() -> Result<(), RuntimeError> {
    // establish a repl input history file path
    let history_file = match dirs::home_dir() {
        Some(mut path) => {
            path.push(".evalrus_list_history");
            path.to_str().map(String::from)
        }
        None => None,
    };

    // () means no completion support
    let mut reader = Editor::<()>::new();

    // Try to load the repl history file
    if let Some(ref path) = history_file {
        if let Err(err) = reader.load_history(&path) {
            eprintln!("Could not read history: {}", err);
        }
    }

    let rep = ReadEvalPrint::new();

    // repl
    loop {
        let readline = reader.readline("> ");

        match readline {
            // valid input
            Ok(line) => {
                reader.add_history_entry(&line);
                rep.run(&line)?;
            }

            // some kind of program termination condition
            Err(e) => {
                if let Some(ref path) = history_file {
                    reader.save_history(&path).unwrap_or_else(|err| {
                        eprintln!("could not save input history in {}: {}", path, err);
                    });
                }

                // EOF is fine
                if let ReadlineError::Eof = e {
                    return Ok(());
                } else {
                    return Err(RuntimeError::from(e));
                }
            }
        }
    }
}

fn main() {
    // parse command line arguments, an optional filename and verbosity
    let matches = App::new("Eval-R-Us List")
        .about("Manipulate a list value through its suffixes")
        .arg(
            Arg::with_name("filename")
                .help("Optional filename to read in")
                .index(1),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Trace suffix calls and dump restoration"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") {
        Level::TRACE
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Some(filename) = matches.value_of("filename") {
        // if a filename was specified, evaluate it line by line
        read_file(filename).unwrap_or_else(|err| {
            eprintln!("Terminated: {}", err);
            process::exit(1);
        });
    } else {
        // otherwise begin a repl
        read_print_loop().unwrap_or_else(|err| {
            eprintln!("Terminated: {}", err);
            process::exit(1);
        });
    }
}
