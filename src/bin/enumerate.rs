//! Read a `.cfg` grammar from stdin and print the yield of every fully
//! developed parse tree whose leaf count stays within the given cap.
//!
//! Termination is only guaranteed when the grammar and cap admit finitely
//! many qualifying derivations.

use std::io;
use std::process;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;

use yaga::grammar::Grammar;
use yaga::symbol::Symbol;
use yaga::tree::Derivations;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Largest leaf count a printed derivation may have
    cap: usize,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let grammar = Grammar::read(io::stdin().lock()).context("reading grammar from stdin")?;

    for tree in Derivations::new(&grammar, cli.cap)? {
        let tree = tree?;
        println!("{}", tree.leaves().map(Symbol::as_str).join(" "));
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{err:#}");
        process::exit(exitcode::IOERR);
    }
}
