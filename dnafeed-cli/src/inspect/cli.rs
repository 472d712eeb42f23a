use clap::{Arg, Command};

pub const INSPECT_CMD: &str = "inspect";

pub fn create_inspect_cli() -> Command {
    Command::new(INSPECT_CMD)
        .about("List the archives found under a folder and the number of sequences in each.")
        .arg(Arg::new("root").required(true))
}
