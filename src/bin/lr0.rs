//! Read a `.cfg` grammar from stdin and print its augmented form, the
//! initial closure, and the LR(0) canonical collection.

use std::io;
use std::process;

use anyhow::Context;

use yaga::collection::{augment, canonical_collection};
use yaga::grammar::Grammar;
use yaga::item::{Item, ItemSet};

fn run() -> anyhow::Result<()> {
    let grammar = Grammar::read(io::stdin().lock()).context("reading grammar from stdin")?;
    print!("{grammar}");

    let augmented = augment(&grammar)?;
    print!("{augmented}");

    let initial = ItemSet::from_iter([Item::new(0, 0)]).closure(&augmented)?;
    println!("initial closure: {}", initial.display(&augmented));
    println!();

    for (index, set) in canonical_collection(&augmented)?.iter().enumerate() {
        println!("I{index}: {}", set.display(&augmented));
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(exitcode::IOERR);
    }
}
