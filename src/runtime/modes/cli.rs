//! CLI mode
//!
//! - `resolve`：在终端走一遍跳转流程（含倒计时），Ctrl+C 放弃
//! - `token`：为 owner 签发会话令牌
//! - `config generate`：输出示例配置

use std::sync::Arc;

use anyhow::{Result, bail};
use colored::Colorize;
use tokio::sync::watch;

use crate::analytics::{LogSink, ScanMetadata, ScanRecorder};
use crate::api::jwt::SessionVerifier;
use crate::config::{Command, ConfigAction, StaticConfig};
use crate::presentation::{Navigator, PresentationState, RedirectSession};
use crate::resolver::Resolver;
use crate::runtime::lifetime;
use crate::storage::ShortLinkStore;

/// 终端中“跳转”即打印目标地址
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: &str) {
        println!("{} {}", "->".green().bold(), destination.cyan());
    }
}

pub async fn run_cli(config: &StaticConfig, command: Command) -> Result<()> {
    match command {
        Command::Resolve {
            short_code,
            no_track,
        } => resolve(config, &short_code, no_track).await,
        Command::Token { owner, ttl_minutes } => {
            if config.auth.jwt_secret.is_empty() {
                bail!("auth.jwt_secret must be configured to mint tokens");
            }
            let verifier = SessionVerifier::from_config(&config.auth)?;
            let token = match ttl_minutes {
                Some(minutes) => verifier.issue_with_ttl(&owner, minutes)?,
                None => verifier.issue(&owner)?,
            };
            println!("{}", token);
            Ok(())
        }
        Command::Config {
            action: ConfigAction::Generate { output_path },
        } => {
            let sample = StaticConfig::generate_sample_config();
            match output_path {
                Some(path) => {
                    StaticConfig::default().save_to_file(&path)?;
                    println!("{} Sample config written to {}", "✓".green(), path);
                }
                None => print!("{}", sample),
            }
            Ok(())
        }
        Command::Serve => bail!("serve is not a CLI command"),
    }
}

async fn resolve(config: &StaticConfig, short_code: &str, no_track: bool) -> Result<()> {
    let startup = lifetime::startup::prepare_startup(config).await?;

    let (resolver, recorder) = if no_track {
        let recorder = ScanRecorder::new(Arc::new(LogSink));
        let store: Arc<dyn ShortLinkStore> = startup.storage.clone();
        let resolver = Resolver::new(store, recorder.clone(), config.redirect.countdown_seconds);
        (resolver, recorder)
    } else {
        (startup.resolver, startup.recorder)
    };

    let user_agent = format!("qrlinker-cli/{}", env!("CARGO_PKG_VERSION"));
    let visit = resolver.visit(ScanMetadata::new(Some(user_agent), None));
    let resolution = visit.resolve(short_code).await;

    let mut session = RedirectSession::start(resolution, Arc::new(TerminalNavigator));
    let mut rx = session.subscribe();
    let initial = rx.borrow_and_update().clone();
    print_state(&initial);

    let outcome = match initial {
        PresentationState::Redirecting { .. } => follow_countdown(&mut session, &mut rx).await,
        PresentationState::Error { reason } => Err(anyhow::anyhow!(reason)),
        _ => Ok(()),
    };

    lifetime::shutdown::drain_recorder(&recorder).await;
    outcome
}

async fn follow_countdown(
    session: &mut RedirectSession,
    rx: &mut watch::Receiver<PresentationState>,
) -> Result<()> {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                print_state(&rx.borrow_and_update());
            }
            _ = session.finished() => return Ok(()),
            _ = tokio::signal::ctrl_c() => {
                session.teardown();
                println!("{}", "Redirect cancelled".yellow());
                return Ok(());
            }
        }
    }
}

fn print_state(state: &PresentationState) {
    match state {
        PresentationState::Loading => println!("Loading..."),
        PresentationState::Error { reason } => {
            eprintln!("{} {}", "QR Code Error:".red().bold(), reason)
        }
        PresentationState::Redirecting {
            destination,
            countdown,
        } => println!("Redirecting to {} in {}s", destination.cyan(), countdown),
        PresentationState::Displaying {
            content_type,
            content,
        } => {
            println!("{} {}", "Content type:".bold(), content_type);
            println!("{}", content);
        }
    }
}
