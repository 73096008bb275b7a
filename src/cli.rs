use clap::Parser;

/// Shows the time as binary-coded decimal on a Scroll pHAT HD
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Path of the configuration file, defaults are used if omitted
    #[clap(long, short)]
    pub config: Option<camino::Utf8PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, clap::Subcommand)]
pub enum Command {
    /// Show the time until interrupted
    Run,

    /// Load and check the configuration, then exit
    VerifyConfig,
}
