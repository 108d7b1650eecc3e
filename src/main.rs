use clap::ArgMatches;
use colored::Colorize;
use mygit::cli;
use mygit::commands::{CatFileMode, cat_file, hash_object, init, ls_tree};
use mygit::{ObjectKind, ObjectStore, Result, StoreConfig};
use std::{io, path::Path, process};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = StoreConfig::new(required(matches, "git-dir"));
    let mut out = io::stdout().lock();

    match matches.subcommand() {
        Some(("init", _sub_matches)) => init(&config, &mut out),
        Some(("cat-file", sub_matches)) => {
            let store = ObjectStore::open(config)?;
            let mode = CatFileMode::from_matches(sub_matches);
            let address = required(sub_matches, "object");
            cat_file(&store, mode, address, &mut out)
        }
        Some(("hash-object", sub_matches)) => {
            let kind: ObjectKind = required(sub_matches, "kind").parse()?;
            let file = Path::new(required(sub_matches, "file"));
            let write = sub_matches.get_flag("write");
            hash_object(&config, kind, file, write, &mut out)
        }
        Some(("ls-tree", sub_matches)) => {
            let store = ObjectStore::open(config)?;
            let address = required(sub_matches, "tree");
            ls_tree(&store, address, sub_matches.get_flag("name-only"), &mut out)
        }
        _ => unreachable!("Unknown subcommand!"),
    }
}

// Only for arguments clap marks required or gives a default value.
fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .expect("argument is required or defaulted by clap")
}
