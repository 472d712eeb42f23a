use clap::{Arg, Command};

pub const PACK_CMD: &str = "pack";

pub fn create_pack_cli() -> Command {
    Command::new(PACK_CMD)
        .about("Write a text file with one nucleotide sequence per line to a directory archive.")
        .arg(Arg::new("input").required(true))
        .arg(Arg::new("output").required(true))
}
