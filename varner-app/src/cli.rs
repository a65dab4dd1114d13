use clap::Parser;
use std::path::PathBuf;
use varner_store::Config;

#[derive(Parser, Debug)]
#[clap(name = "varner", about = "Wholesale order entry with live totals")]
pub struct Cli {
    #[clap(long, default_value = "config", help = "Directory holding default/RUN_MODE/local config files")]
    pub config_dir: PathBuf,

    #[clap(long, help = "TOML or JSON catalog file; overrides catalog.path")]
    pub catalog: Option<PathBuf>,

    #[clap(long, help = "Read session commands from a file instead of stdin")]
    pub script: Option<PathBuf>,

    #[clap(long, value_name = "PATH", help = "Write the order CSV when the session ends")]
    pub csv: Option<Option<PathBuf>>,

    #[clap(long, value_name = "PATH", help = "Write the printable summary when the session ends")]
    pub summary: Option<Option<PathBuf>>,
}

impl Cli {
    /// Command line wins over configuration; `None` means the built-in catalog.
    pub fn catalog_path(&self, config: &Config) -> Option<PathBuf> {
        self.catalog
            .clone()
            .or_else(|| config.catalog.path.as_ref().map(PathBuf::from))
    }
}
