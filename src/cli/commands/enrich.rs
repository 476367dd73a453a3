//! DOI enrichment command.

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::enrichment::EnrichmentService;
use crate::{bibliography, error};

use super::Cli;

/// Read the input file, resolve missing DOIs, write the output file.
///
/// Per-record failures are logged and never fail the command; only setup
/// problems (config, reading, parsing, writing) do.
pub fn cmd_enrich(rt: &Runtime, cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    let mut bib = bibliography::read_file(&cli.input)?;
    info!("Read {} entries from {:?}", bib.records.len(), cli.input);

    let service = EnrichmentService::from_config(&config)?;

    let report = rt.block_on(async {
        let cancel = CancellationToken::new();

        // Ctrl-C cancels pending lookups; finished records are still written
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling pending lookups");
                    cancel.cancel();
                }
            })
        };

        let report = service.run(&cancel, &mut bib.records).await;
        interrupt.abort();
        report
    });

    report.log();

    bibliography::write_file(&cli.output, &bib)?;
    info!("Wrote {:?}", cli.output);

    Ok(())
}

/// Load the config file and apply command-line overrides
fn load_config(cli: &Cli) -> error::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };

    if let Some(rate) = cli.rate {
        config.limiter.rate_per_second = rate;
    }
    if let Some(burst) = cli.burst {
        config.limiter.burst = burst;
    }
    if let Some(mailto) = &cli.mailto {
        config.crossref.mailto = Some(mailto.clone());
    }

    config.validate()?;
    Ok(config)
}
