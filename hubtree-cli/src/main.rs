//! Line-oriented terminal browser for a hub catalog.

mod command;
mod config;
mod error;
mod paths;
mod render;

use std::fs;
use std::fs::File;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use hubtree_lib::CatalogClient;
use hubtree_lib::ExpansionController;
use hubtree_lib::SelectionEmitter;
use hubtree_lib::ToggleOutcome;
use hubtree_lib::auth::StaticTokenProvider;
use hubtree_lib::error::TreeError;
use hubtree_lib::model::NodeId;
use simplelog::Config as LogConfig;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;

use crate::command::Command;
use crate::config::Config;
use crate::error::CliError;
use crate::render::Screen;

fn init_logging() -> Result<(), CliError> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(LevelFilter::Debug, LogConfig::default(), File::create(path)?)?;
    Ok(())
}

fn build_client(config: &Config) -> CatalogClient {
    let mut builder = CatalogClient::builder()
        .url(config.url.clone())
        .token_provider(StaticTokenProvider::new(config.token.clone()));
    if let Some(prefix) = &config.api_prefix {
        builder = builder.api_prefix(prefix.clone());
    }
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder.build()
}

/// Starts a command on its own task so the prompt stays live while fetches
/// run. Rows are redrawn from store events.
fn spawn_command(
    browser: &Arc<ExpansionController>,
    rows: &[NodeId],
    command: Command,
) -> Result<(), CliError> {
    let row = |n: usize| rows.get(n).copied().ok_or(CliError::NoSuchRow(n));
    let browser = browser.clone();
    match command {
        Command::Toggle(n) => {
            let id = row(n)?;
            tokio::spawn(async move { report(browser.toggle(id).await) });
        }
        Command::Collapse(n) => {
            let id = row(n)?;
            tokio::spawn(async move { report(browser.collapse(id).await) });
        }
        Command::RetryRoots => {
            tokio::spawn(async move {
                browser.retry_roots().await;
            });
        }
        Command::Redraw | Command::Quit => {}
    }
    Ok(())
}

fn report(result: Result<ToggleOutcome, TreeError>) {
    match result {
        Ok(outcome) => {
            if let Some(line) = render::outcome(&outcome) {
                println!("{}", line);
            }
        }
        Err(e) => eprintln!("{}", e),
    }
}

fn draw(browser: &ExpansionController) -> Result<Screen, CliError> {
    let screen = browser.with_store(render::render);
    print!("\n{}> ", screen.text);
    std::io::stdout().flush()?;
    Ok(screen)
}

async fn run() -> Result<(), CliError> {
    let config = Config::from_env()?;
    log::info!("browsing {}", config.url);

    let emitter = SelectionEmitter::with_handler(|version| {
        println!("selected {}", version.label());
        println!("viewer urn: {}", version.viewer_urn());
    });
    let browser = Arc::new(
        ExpansionController::open(Arc::new(build_client(&config)), emitter).await,
    );

    let mut events = browser.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = draw(&browser)?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = spawn_command(&browser, &screen.rows, command) {
                            eprintln!("{}", e);
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            event = events.recv() => match event {
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }
        screen = draw(&browser)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {}", e);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hubtree_lib::DataSource;
    use hubtree_lib::error::ApiError;
    use hubtree_lib::model::FolderEntry;
    use hubtree_lib::model::FolderSummary;
    use hubtree_lib::model::HubSummary;
    use hubtree_lib::model::NamedAttributes;
    use hubtree_lib::model::NodeState;
    use hubtree_lib::model::ProjectSummary;
    use hubtree_lib::model::VersionSummary;

    use super::*;

    /// One hub whose projects never arrive.
    struct Stalled;

    #[async_trait]
    impl DataSource for Stalled {
        async fn fetch_hubs(&self) -> Result<Vec<HubSummary>, ApiError> {
            Ok(vec![HubSummary {
                id: "H1".to_string(),
                attributes: NamedAttributes {
                    name: "Acme".to_string(),
                },
            }])
        }

        async fn fetch_projects(&self, _hub_id: &str) -> Result<Vec<ProjectSummary>, ApiError> {
            std::future::pending().await
        }

        async fn fetch_top_folders(
            &self,
            _hub_id: &str,
            _project_id: &str,
        ) -> Result<Vec<FolderSummary>, ApiError> {
            Ok(vec![])
        }

        async fn fetch_folder_contents(
            &self,
            _hub_id: &str,
            _project_id: &str,
            _folder_id: &str,
        ) -> Result<Vec<FolderEntry>, ApiError> {
            Ok(vec![])
        }

        async fn fetch_versions(
            &self,
            _hub_id: &str,
            _project_id: &str,
            _item_id: &str,
        ) -> Result<Vec<VersionSummary>, ApiError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_commands_return_while_fetch_runs() {
        let browser =
            Arc::new(ExpansionController::open(Arc::new(Stalled), SelectionEmitter::new()).await);
        let mut events = browser.subscribe();
        let rows = browser.with_store(render::render).rows;

        spawn_command(&browser, &rows, Command::Toggle(0)).unwrap();
        events.recv().await.unwrap();

        let screen = browser.with_store(render::render);
        assert!(screen.text.contains("  0 ~ Acme"), "{}", screen.text);
        assert_eq!(browser.node(rows[0]).unwrap().state, NodeState::Loading);

        spawn_command(&browser, &screen.rows, Command::Collapse(0)).unwrap();
        assert!(matches!(
            spawn_command(&browser, &screen.rows, Command::Toggle(5)),
            Err(CliError::NoSuchRow(5))
        ));
    }
}
