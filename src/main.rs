use std::env;

use admitly::cli;
use admitly::logging::init_tracing;
use admitly::router::build_router;
use admitly::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if let Some(command) = args.get(1) {
        return run_command(command, &args[2..]).await;
    }

    let _guard = init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations").run(&state.db).await?;

    let app = build_router(state);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Admitly API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_command(command: &str, args: &[String]) -> anyhow::Result<()> {
    match command {
        "create-admin" | "create-counsellor" => {
            let (Some(email), Some(password)) = (args.first(), args.get(1)) else {
                anyhow::bail!("usage: admitly {command} <email> <password>");
            };

            let state = init_app_state().await;
            sqlx::migrate!("./migrations").run(&state.db).await?;

            if command == "create-admin" {
                cli::create_admin(&state.db, email, password).await
            } else {
                cli::create_counsellor(&state.db, email, password).await
            }
        }
        other => anyhow::bail!("unknown command: {other}"),
    }
}
