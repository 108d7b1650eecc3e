use crate::{ObjectKind, ObjectStore, Result, parse_tree_entries};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::io::Write;

pub fn get_cat_file_command() -> Command {
    Command::new("cat-file")
        .about("Show the content, kind or size of a stored object")
        .arg(
            Arg::new("pretty")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Pretty-print the object's content"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Show the object's kind"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Show the object's payload size"),
        )
        .group(
            ArgGroup::new("mode")
                .args(["pretty", "type", "size"])
                .required(true),
        )
        .arg(
            Arg::new("object")
                .required(true)
                .help("Full 40-character object address"),
        )
        .arg_required_else_help(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    Pretty,
    Kind,
    Size,
}

impl CatFileMode {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        if matches.get_flag("type") {
            Self::Kind
        } else if matches.get_flag("size") {
            Self::Size
        } else {
            Self::Pretty
        }
    }
}

pub fn cat_file<W: Write>(
    store: &ObjectStore,
    mode: CatFileMode,
    address: &str,
    out: &mut W,
) -> Result<()> {
    let object = store.get(address)?;

    match mode {
        CatFileMode::Kind => writeln!(out, "{}", object.kind)?,
        CatFileMode::Size => writeln!(out, "{}", object.size())?,
        CatFileMode::Pretty if object.kind == ObjectKind::Tree => {
            for entry in parse_tree_entries(&object.payload)? {
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
        CatFileMode::Pretty => out.write_all(&object.payload)?,
    }

    Ok(())
}
