use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigLoadOption;

use super::SubCommand;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Command {
    /// Config file path
    #[arg(long, global = true, display_order = 1000)]
    pub config_file: Option<PathBuf>,

    /// Also write logs to this file (JSON)
    #[arg(long, global = true, display_order = 1000)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: SubCommand,
}

impl Command {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn config_load_option(&self) -> ConfigLoadOption {
        let Some(path) = &self.config_file else {
            return ConfigLoadOption::Default;
        };

        match path.try_exists() {
            Ok(true) => ConfigLoadOption::Path(path.clone()),
            Ok(false) => {
                log::warn!("Config file not found: {:?}", path);

                ConfigLoadOption::Default
            }
            Err(err) => {
                log::warn!("Failed to check config file exists: {}", err);

                ConfigLoadOption::Default
            }
        }
    }
}
