use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varner_app::{run_session, Cli, Session};
use varner_catalog::{seasonal, Catalog};
use varner_order::OrderForm;
use varner_store::{load_catalog, Config, ExportKind};

fn main() -> Result<()> {
    // stdout belongs to the session; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "varner_app=info,varner_order=info,varner_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config_dir)
        .with_context(|| format!("Failed to load config from {}", cli.config_dir.display()))?;

    let catalog = match cli.catalog_path(&config) {
        Some(path) => load_catalog(&path).with_context(|| format!("Bad catalog {}", path.display()))?,
        None => Catalog::load(seasonal::fall_2025())?,
    };
    let defaults = config.order.to_context()?;
    let form = OrderForm::open(&catalog, defaults)?;
    info!("Order form ready: {} lines", catalog.len());

    let mut session = Session::new(form, config.export.clone());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", config.export.title)?;
    writeln!(out, "type `help` for commands")?;

    match &cli.script {
        Some(path) => {
            let script = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            run_session(&mut session, BufReader::new(script), &mut out)?;
        }
        None => run_session(&mut session, io::stdin().lock(), &mut out)?,
    }

    if let Some(path) = &cli.csv {
        let saved = session.export(ExportKind::Csv, path.clone())?;
        writeln!(out, "saved {}", saved.display())?;
    }
    if let Some(path) = &cli.summary {
        let saved = session.export(ExportKind::Summary, path.clone())?;
        writeln!(out, "saved {}", saved.display())?;
    }

    Ok(())
}
