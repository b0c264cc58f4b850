//! Read a `.cfg` grammar from stdin and print, per nonterminal, the prefix
//! trie of its alternatives, the shape left-factoring would split on.

use std::io;
use std::process;

use anyhow::Context;

use yaga::factor::prefix_trees;
use yaga::grammar::Grammar;

fn run() -> anyhow::Result<()> {
    let grammar = Grammar::read(io::stdin().lock()).context("reading grammar from stdin")?;

    for (nonterminal, tree) in prefix_trees(&grammar) {
        println!("NONTERMINAL: {nonterminal}");
        print!("{tree}");
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(exitcode::IOERR);
    }
}
