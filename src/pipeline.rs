/// Client onboarding workflow shared by the HTTP handlers and tests.
///
/// 1. Validate the submitted attributes
/// 2. Extract the feature vector
/// 3. Score it (falls back locally, never fails)
/// 4. Derive the offer and message
/// 5. Persist the record
use crate::errors::{AppError, ResultExt};
use crate::features;
use crate::models::{ClientDraft, ClientRecord, NewClient};
use crate::offers::{self, Locale};
use crate::scoring_client::ScoringClient;
use crate::store::ClientStore;
use crate::validation::validate_client;
use uuid::Uuid;

/// Onboarding orchestrator over an explicitly supplied store.
pub struct OnboardingPipeline<S> {
    store: S,
    scorer: ScoringClient,
    locale: Locale,
}

impl<S: ClientStore> OnboardingPipeline<S> {
    pub fn new(store: S, scorer: ScoringClient) -> Self {
        Self {
            store,
            scorer,
            locale: Locale::default(),
        }
    }

    /// Sets the locale used for messages when a request does not ask for one.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Onboard a client using the pipeline's default locale.
    pub async fn onboard(&self, payload: NewClient) -> Result<ClientRecord, AppError> {
        self.onboard_with_locale(payload, self.locale).await
    }

    /// Onboard a client, rendering the offer message in `locale`.
    ///
    /// Fails with `ValidationError` before any outbound call, or with
    /// `StorageError` if the record cannot be persisted.
    pub async fn onboard_with_locale(
        &self,
        payload: NewClient,
        locale: Locale,
    ) -> Result<ClientRecord, AppError> {
        let input = validate_client(&payload)?;

        let features = features::extract(&input);
        let score = self.scorer.score(&features).await;
        let offer = offers::derive_offer_localized(score.score, &input.name, locale);

        tracing::debug!(
            "Client '{}' scored {} ({}), tier {}",
            input.name,
            score.score,
            score.source.as_str(),
            offer.tier
        );

        let name = input.name.clone();
        let record = self
            .store
            .create(ClientDraft {
                input,
                score,
                offer,
            })
            .await
            .with_context(|| format!("persisting client '{}'", name))?;

        tracing::info!(
            "✓ Client onboarded: {} (tier {}, score {})",
            record.id,
            record.offer.tier,
            record.score
        );

        Ok(record)
    }

    /// All clients, most recently created first.
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, AppError> {
        self.store.list_all().await.context("listing clients")
    }

    pub async fn find_client(&self, id: Uuid) -> Result<ClientRecord, AppError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("client {} not found", id)))
    }
}
