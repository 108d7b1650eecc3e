use crate::{ObjectStore, Result};
use clap::{Arg, ArgAction, Command};
use std::io::Write;

pub fn get_ls_tree_command() -> Command {
    Command::new("ls-tree")
        .about("List the entries of a tree object")
        .arg(
            Arg::new("name-only")
                .long("name-only")
                .action(ArgAction::SetTrue)
                .help("List only entry names"),
        )
        .arg(
            Arg::new("tree")
                .required(true)
                .help("Full 40-character tree address"),
        )
        .arg_required_else_help(true)
}

pub fn ls_tree<W: Write>(
    store: &ObjectStore,
    address: &str,
    name_only: bool,
    out: &mut W,
) -> Result<()> {
    let entries = store.read_tree(address)?;

    for entry in &entries {
        if name_only {
            writeln!(out, "{}", entry.name)?;
        } else {
            writeln!(
                out,
                "{:0>6} {} {}\t{}",
                entry.mode,
                entry.kind(),
                entry.id,
                entry.name
            )?;
        }
    }

    Ok(())
}
