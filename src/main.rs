use ingress_migrate::{
    cmd::Command,
    config::Config,
    error::Result,
    logging::Logger,
};

fn main() -> Result<()> {
    let command = Command::init();

    Logger::init(command.log_file.as_deref())?;

    let config = Config::load(command.config_load_option())?;

    command.subcommand.run(config)
}
