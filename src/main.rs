use clap::Parser;

use qrlinker::config::{Cli, Command, StaticConfig};
use qrlinker::errors::QrLinkerError;
use qrlinker::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match StaticConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let code = match run(cli.command(), &config).await {
        Ok(()) => 0,
        Err(e) => {
            match e.downcast_ref::<QrLinkerError>() {
                Some(err) => eprintln!("{}", err.format_colored()),
                None => eprintln!("{:#}", e),
            }
            1
        }
    };
    std::process::exit(code);
}

async fn run(command: Command, config: &StaticConfig) -> anyhow::Result<()> {
    match command {
        #[cfg(feature = "server")]
        Command::Serve => {
            let _guard = init_logging(&config.logging)?;
            qrlinker::runtime::modes::run_server(config).await
        }
        #[cfg(feature = "cli")]
        other => {
            // CLI 只输出警告以上，避免干扰命令输出
            let mut logging = config.logging.clone();
            logging.level = "warn".to_string();
            let _guard = init_logging(&logging)?;
            qrlinker::runtime::modes::run_cli(config, other).await
        }
        #[allow(unreachable_patterns)]
        _ => anyhow::bail!("This command is not enabled in this build"),
    }
}

fn exit_with(err: &QrLinkerError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}
