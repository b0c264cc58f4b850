//! Read the extended `.cfg1` surface form from stdin and print the
//! desugared `.cfg` grammar.

use std::io::{self, Read};
use std::process;

use yaga::extended::desugar;

fn main() {
    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("reading from stdin: {err}");
        process::exit(exitcode::IOERR);
    }

    match desugar(&input) {
        Ok(grammar) => print!("{grammar}"),
        Err(err) => {
            eprintln!("{err}");
            process::exit(exitcode::DATAERR);
        }
    }
}
