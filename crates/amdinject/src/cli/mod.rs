// cli/mod.rs — command-line subcommands

pub mod commands;
