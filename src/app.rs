use tracing::info;

use crate::infrastructure::bootstrap::build_state;
use crate::infrastructure::config::Settings;

pub async fn run() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let settings = Settings::load().map_err(|err| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let state = build_state(&settings);

    let server = crate::interfaces::http::start_server(state, &settings.host, settings.port)?;
    info!(
        host = %settings.host,
        port = settings.port,
        provider = ?settings.llm.provider,
        model = %settings.llm.model,
        "Ticket analysis backend listening"
    );

    server.await
}
