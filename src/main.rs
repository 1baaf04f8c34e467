//! nsctl - Main entry point

use clap::Parser;
use log::{debug, info};

use nsctl::{
    run_auth_command, run_config_command, Cli, Command, Console, ContextManager, ContextStore,
    CredentialSource, CtlError, HttpAuthClient, SessionOrchestrator,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting nsctl v{}", env!("CARGO_PKG_VERSION"));

    let code = run(cli).await;
    std::process::exit(code);
}

async fn run(cli: Cli) -> i32 {
    let mut console = Console::stdio();

    let store = match &cli.config_dir {
        Some(dir) => ContextStore::with_dir(dir.clone()),
        None => ContextStore::new(),
    };
    debug!("Using config directory {}", store.config_dir().display());

    let mut manager = match ContextManager::load(store, cli.context.clone()) {
        Ok(manager) => manager,
        Err(e) => {
            console.eprintln(format!("error: {}", e));
            return 1;
        }
    };

    match &cli.command {
        Command::Config { action } => {
            run_config_command(&mut manager, action, cli.output, &mut console)
        }
        Command::Auth { action } => {
            let Some(name) = manager.current_context_name() else {
                console.eprintln(
                    "error: no current context. Use 'nsctl config use-context <name>' to select one.",
                );
                return 1;
            };
            let (Some(ctx), Some(session_dir)) =
                (manager.current_context(), manager.session_dir())
            else {
                console.eprintln(format!("error: {}", CtlError::NotFound(name.to_string())));
                return 1;
            };
            debug!("Authenticating against context '{}' ({})", ctx.name, ctx.api);

            let client = HttpAuthClient::new(&ctx.api);
            let credentials = CredentialSource::for_context(ctx, cli.batch);
            let mut session = SessionOrchestrator::new(client, session_dir, credentials);
            run_auth_command(&mut session, action, cli.output, &mut console).await
        }
    }
}
