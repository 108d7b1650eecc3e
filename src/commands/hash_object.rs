use crate::{ObjectKind, ObjectStore, Result, StoreConfig, hash_object as compute_address};
use clap::{Arg, ArgAction, Command};
use std::{fs, io::Write, path::Path};

pub fn get_hash_object_command() -> Command {
    Command::new("hash-object")
        .about("Compute an object address, optionally storing the object")
        .arg(
            Arg::new("write")
                .short('w')
                .action(ArgAction::SetTrue)
                .help("Write the object into the store"),
        )
        .arg(
            Arg::new("kind")
                .short('t')
                .value_parser(["blob", "tree", "commit", "tag"])
                .default_value("blob")
                .help("Kind of object to create"),
        )
        .arg(Arg::new("file").required(true).help("File to read content from"))
        .arg_required_else_help(true)
}

pub fn hash_object<W: Write>(
    config: &StoreConfig,
    kind: ObjectKind,
    file: &Path,
    write: bool,
    out: &mut W,
) -> Result<()> {
    let content = fs::read(file)?;

    let id = if write {
        ObjectStore::open(config.clone())?.put(kind, &content)?
    } else {
        compute_address(kind, &content)
    };

    writeln!(out, "{}", id)?;
    Ok(())
}
