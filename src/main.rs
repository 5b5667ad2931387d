//! TrialTrack - Clinical Trial Participant API
//! Mission: Token-gated participant tracking with live enrollment metrics

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trialtrack_backend::{
    app::{build_router, AppState},
    auth::{CredentialStore, TokenService},
    config::{Config, DEFAULT_JWT_SECRET},
    participants::{
        models::{Gender, ParticipantCreate, ParticipantStatus},
        MemoryStore, ParticipantRepository, ParticipantStore, SqliteStore,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_tracing();

    if config.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("JWT_SECRET not set, using the development default");
    }

    let store: Arc<dyn ParticipantStore> = match &config.database_path {
        Some(path) => {
            let store = SqliteStore::new(path).context("Failed to open participant database")?;
            info!("Participant database initialized at: {}", path);
            Arc::new(store)
        }
        None => {
            info!("Using in-memory participant store");
            Arc::new(MemoryStore::new())
        }
    };

    let repository = Arc::new(ParticipantRepository::new(store, config.strict_updates));
    if config.strict_updates {
        info!("Strict update validation enabled");
    }

    if config.seed_sample_data {
        seed_sample_data(&repository)?;
    }

    let state = AppState {
        repository,
        credentials: Arc::new(CredentialStore::seeded()),
        tokens: Arc::new(TokenService::new(
            config.jwt_secret.clone(),
            config.token_ttl_minutes,
        )),
    };

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Seed the two demo participants when the store is empty.
fn seed_sample_data(repository: &ParticipantRepository) -> Result<()> {
    if !repository.list().map_err(anyhow::Error::new)?.is_empty() {
        return Ok(());
    }

    let samples = [
        ParticipantCreate {
            subject_id: "P001".to_string(),
            study_group: "treatment".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 15)
                .context("invalid sample date")?,
            status: ParticipantStatus::Active,
            age: 45,
            gender: Gender::M,
        },
        ParticipantCreate {
            subject_id: "P002".to_string(),
            study_group: "control".to_string(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 16)
                .context("invalid sample date")?,
            status: ParticipantStatus::Active,
            age: 52,
            gender: Gender::F,
        },
    ];

    for sample in samples {
        repository
            .create(sample)
            .map_err(anyhow::Error::new)
            .context("Failed to seed sample participant")?;
    }

    info!("Sample data created");
    Ok(())
}
