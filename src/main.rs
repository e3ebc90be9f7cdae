use std::{env, fs, io, process};

use ember_lang::error::EmberError;
use ember_lang::Ember;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: ember <script>");
        process::exit(64);
    }

    let source = fs::read_to_string(&args[1]).unwrap_or_else(|err| {
        eprintln!("Can't read file '{}': {err}", args[1]);
        process::exit(64);
    });

    let mut ember = Ember::new(io::stdout());

    match ember.run(&source) {
        Ok(()) => process::exit(0),
        Err(err @ (EmberError::Lex(_) | EmberError::Parse(_) | EmberError::Resolve(_))) => {
            eprintln!("{err}");
            process::exit(65);
        }
        Err(err @ EmberError::Runtime(_)) => {
            eprintln!("{err}");
            process::exit(70);
        }
    }
}
