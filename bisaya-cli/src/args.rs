use clap::{crate_version, ArgEnum, Parser};

#[derive(Clone, Parser)]
#[clap(name = "bisaya")]
#[clap(bin_name = "bisaya")]
#[clap(version = crate_version!())]
pub struct BisayaArgs {
    /// Path to a Bisaya++ source file.
    pub source: String,

    #[clap(long, arg_enum, default_value = "auto")]
    pub colors: Colors,

    /// Enable a verbose logging format, showing one span per pipeline
    /// stage. Repeat for more detail.
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

#[derive(Clone, Copy, ArgEnum)]
pub enum Colors {
    /// Determine whether to colorize diagnostics automatically.
    Auto,
    /// Always colorize diagnostics.
    Always,
    /// Never colorize diagnostics.
    Never,
}
