use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use intake::config::AppConfig;
use intake::handlers;
use intake::services::forms::FormStore;
use intake::services::messaging::log::LogMessagingProvider;
use intake::services::messaging::twilio::TwilioSmsProvider;
use intake::services::messaging::MessagingProvider;
use intake::services::registry::SchedulerRegistry;
use intake::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let catalog = config.load_catalog()?;
    tracing::info!(slots = catalog.slots().len(), "appointment catalog loaded");

    let messaging: Box<dyn MessagingProvider> = if config.twilio_configured() {
        tracing::info!(from = %config.twilio_phone_number, "sending confirmation texts through Twilio");
        Box::new(TwilioSmsProvider::new(
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        ))
    } else {
        tracing::warn!("Twilio not configured, confirmation texts will only be logged");
        Box::new(LogMessagingProvider)
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        messaging,
        registry: SchedulerRegistry::new(),
        forms: FormStore::new(chrono::Duration::minutes(config.form_ttl_minutes)),
        catalog,
    });

    let sweeper = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match sweeper.forms.sweep_expired(Utc::now().naive_utc()) {
                Ok(expired) if expired.is_empty() => {}
                Ok(expired) => {
                    for id in &expired {
                        let _ = sweeper.registry.forget(*id);
                    }
                    tracing::info!(count = expired.len(), "expired idle forms");
                }
                Err(e) => tracing::error!(error = %e, "form sweep failed"),
            }
        }
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
