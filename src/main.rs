//! KBOeL Client - Digital Library Catalog
//!
//! Command-line entry point over the session core: sign in/out, show the
//! current session, and evaluate route access.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kboel_client::{
    api::auth::AuthClient,
    config::AppConfig,
    session::guard::Decision,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("kboel_client={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("KBOeL client v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config);
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("login") => {
            let (username, password) = match (args.get(1), args.get(2)) {
                (Some(u), Some(p)) => (u.as_str(), p.as_str()),
                _ => anyhow::bail!("Usage: kboel-client login <username> <password>"),
            };
            let auth = AuthClient::new(&state.config.api, state.store.clone());
            auth.login(username, password).await?;
            println!("Signed in as {}", username);
        }
        Some("register") => {
            let (full_name, username, password) = match (args.get(1), args.get(2), args.get(3)) {
                (Some(f), Some(u), Some(p)) => (f.as_str(), u.as_str(), p.as_str()),
                _ => anyhow::bail!("Usage: kboel-client register <full-name> <username> <password>"),
            };
            let auth = AuthClient::new(&state.config.api, state.store.clone());
            auth.register(full_name, username, password).await?;
            println!("Account registered; sign in with `kboel-client login`");
        }
        Some("logout") => {
            let auth = AuthClient::new(&state.config.api, state.store.clone());
            auth.logout()?;
            println!("Signed out");
        }
        Some("whoami") => match state.inspector.current_session() {
            Some(session) => {
                println!("{} [{}]", session.subject, session.roles.join(", "))
            }
            None => println!("Not signed in"),
        },
        Some("guard") => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Usage: kboel-client guard <path>"))?;
            match state.check_route(path) {
                Decision::Render => println!("{}: render", path),
                decision => {
                    let target = state.routes.redirect_target(decision).unwrap_or("/");
                    println!("{}: redirect to {}", path, target);
                }
            }
        }
        _ => {
            eprintln!("Usage: kboel-client <login|register|logout|whoami|guard> [args]");
            std::process::exit(2);
        }
    }

    Ok(())
}
