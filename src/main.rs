use accounts_api::{app, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let state = AppState::init().await?;
    let addr = state.config.bind_addr();
    let router = app::build_app(state);

    app::serve(router, &addr).await
}
