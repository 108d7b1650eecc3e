use crate::commands::{
    get_cat_file_command, get_hash_object_command, get_init_command, get_ls_tree_command,
};
use clap::{Arg, Command};

pub fn cli() -> Command {
    Command::new("mygit")
        .about("A minimal content-addressable object store in the git loose-object format")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .allow_external_subcommands(false)
        .arg(
            Arg::new("git-dir")
                .long("git-dir")
                .global(true)
                .default_value(".git")
                .help("Path to the store root"),
        )
        .subcommand(get_init_command())
        .subcommand(get_cat_file_command())
        .subcommand(get_hash_object_command())
        .subcommand(get_ls_tree_command())
}
