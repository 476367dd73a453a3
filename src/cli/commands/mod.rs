//! CLI argument definitions and dispatch.
//!
//! The enrichment itself lives in `enrich`; this module only parses flags
//! and builds the runtime.

mod enrich;

use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use enrich::cmd_enrich;

/// Add missing DOIs to your BibTeX files.
///
/// For all entries of the input file with a missing DOI, queries Crossref
/// with the title, authors and year for the highest scoring reference and
/// picks its DOI. Flags any case where the title differs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input BibTeX file
    #[arg(short, long, value_name = "INPUT.bib")]
    pub input: PathBuf,

    /// Output BibTeX file
    #[arg(short, long, value_name = "OUTPUT.bib")]
    pub output: PathBuf,

    /// Config file (default: OS config dir, doizer/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum sustained Crossref requests per second
    #[arg(long)]
    pub rate: Option<u32>,

    /// Maximum burst of back-to-back Crossref requests
    #[arg(long)]
    pub burst: Option<u32>,

    /// Contact email sent to Crossref (or set DOIZER_MAILTO env var)
    #[arg(long, env = "DOIZER_MAILTO")]
    pub mailto: Option<String>,
}

/// Run the enrichment described by the parsed arguments.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    cmd_enrich(&rt, cli)
}
