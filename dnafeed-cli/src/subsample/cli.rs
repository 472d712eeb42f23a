use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const SUBSAMPLE_CMD: &str = "subsample";
pub const DEFAULT_REPETITIONS: usize = 1;

pub fn create_subsample_cli() -> Command {
    Command::new(SUBSAMPLE_CMD)
        .about("Draw groups of distinct sequence windows from every archive under a folder.")
        .arg(Arg::new("root").required(true))
        .arg(
            arg!(--length <length> "Window length")
                .required(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--group <group> "Distinct sequences per group")
                .required(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--repetitions <repetitions> "Groups per archive")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--seed <seed> "Random seed")
                .required(true)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--augment)
                .help("Place windows at random offsets instead of at the sequence start")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--balance)
                .help("Only draw from the first min(archive length) sequences of each archive")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--output <output> "Output JSON file, stdout if omitted"))
}
