use crate::{ObjectStore, Result, StoreConfig};
use clap::Command;
use std::{fs, io::Write};

pub fn get_init_command() -> Command {
    Command::new("init").about("Create an empty object store")
}

pub fn init<W: Write>(config: &StoreConfig, out: &mut W) -> Result<()> {
    let store = ObjectStore::init(config.clone())?;

    let head = store.root().join("HEAD");
    if !head.exists() {
        fs::write(&head, "ref: refs/heads/master\n")?;
    }

    writeln!(out, "Initialized git directory")?;
    Ok(())
}
