//! Read a `.cfg` grammar from stdin and print the equivalent grammar with
//! left recursion eliminated.

use std::io;
use std::process;

use anyhow::Context;

use yaga::grammar::Grammar;
use yaga::rewrite::remove_left_recursion;

fn run() -> anyhow::Result<()> {
    let grammar = Grammar::read(io::stdin().lock()).context("reading grammar from stdin")?;
    print!("{}", remove_left_recursion(&grammar));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(exitcode::IOERR);
    }
}
