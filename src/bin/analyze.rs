//! Read a `.cfg` grammar from stdin and print it back together with its
//! FIRST, FOLLOW and PREDICT sets and any predict-predict conflict.

use std::io;
use std::process;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use prettytable::{row, Table};

use yaga::first::FirstSets;
use yaga::follow::{FollowScope, FollowSets};
use yaga::grammar::Grammar;
use yaga::predict::PredictSets;
use yaga::symbol::{Symbol, SymbolSet};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Accumulate FOLLOW entries for terminals too (the trailer-style
    /// definition); the default tracks nonterminals only
    #[arg(short, long)]
    all_symbols: bool,
}

fn members(set: &SymbolSet) -> String {
    set.iter().map(Symbol::to_string).join(" ")
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let grammar = Grammar::read(io::stdin().lock()).context("reading grammar from stdin")?;
    print!("{grammar}");

    let scope = if cli.all_symbols {
        FollowScope::AllSymbols
    } else {
        FollowScope::Nonterminals
    };
    let firsts = FirstSets::compute(&grammar);
    let follows = FollowSets::compute(&grammar, &firsts, scope);
    let predicts = PredictSets::compute(&grammar, &firsts, &follows);

    let mut table = Table::new();
    table.add_row(row!["symbol", "FIRST"]);
    for (sym, set) in firsts.iter() {
        table.add_row(row![sym, members(set)]);
    }
    table.printstd();

    let mut table = Table::new();
    table.add_row(row!["symbol", "FOLLOW"]);
    for (sym, set) in follows.iter() {
        table.add_row(row![sym, members(set)]);
    }
    table.printstd();

    let mut table = Table::new();
    table.add_row(row!["production", "PREDICT"]);
    for (id, set) in predicts.iter() {
        let production = grammar.get(id)?;
        table.add_row(row![production, members(set)]);
    }
    table.printstd();

    match predicts.conflict(&grammar) {
        Some((left, right)) => {
            println!("predict-predict conflict:");
            println!("  {}", grammar.get(left)?);
            println!("  {}", grammar.get(right)?);
        }
        None => println!("no predict-predict conflict"),
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
