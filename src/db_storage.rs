use crate::errors::{AppError, ResultExt};
use crate::models::{ClientDraft, ClientRecord, ClientRow};
use crate::store::ClientStore;
use sqlx::PgPool;
use uuid::Uuid;

const CLIENT_COLUMNS: &str = "id, name, age, income, loans, score, score_source, \
     offer_tier, offer_label, message, created_at";

/// Newest first. `created_at` is the transaction start time, so concurrent
/// inserts can share it; `seq` breaks the tie in insertion order.
const LIST_ORDER: &str = "created_at DESC, seq DESC";

/// PostgreSQL-backed client store.
///
/// Identity and creation time come from column defaults, so each insert is a
/// single atomic statement.
#[derive(Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn list_query() -> String {
    format!(
        "SELECT {} FROM clients ORDER BY {}",
        CLIENT_COLUMNS, LIST_ORDER
    )
}

fn into_record(row: ClientRow) -> Result<ClientRecord, AppError> {
    let id = row.id;
    ClientRecord::try_from(row)
        .map_err(|e| AppError::StorageError(format!("corrupt client row {}: {}", id, e)))
}

impl ClientStore for PgClientStore {
    async fn create(&self, draft: ClientDraft) -> Result<ClientRecord, AppError> {
        let query = format!(
            r#"
            INSERT INTO clients
                (name, age, income, loans, score, score_source, offer_tier, offer_label, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CLIENT_COLUMNS
        );

        let row: ClientRow = sqlx::query_as(&query)
            .bind(&draft.input.name)
            .bind(i64::from(draft.input.age))
            .bind(i64::from(draft.input.income))
            .bind(i64::from(draft.input.loans))
            .bind(draft.score.score.value())
            .bind(draft.score.source.as_str())
            .bind(draft.offer.tier.as_str())
            .bind(&draft.offer.label)
            .bind(&draft.offer.message)
            .fetch_one(&self.pool)
            .await
            .context("inserting client record")?;

        into_record(row)
    }

    async fn list_all(&self) -> Result<Vec<ClientRecord>, AppError> {
        let query = list_query();

        let rows: Vec<ClientRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .context("listing client records")?;

        rows.into_iter().map(into_record).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<ClientRecord>, AppError> {
        let query = format!("SELECT {} FROM clients WHERE id = $1", CLIENT_COLUMNS);

        let row: Option<ClientRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading client {}", id))?;

        row.map(into_record).transpose()
    }
}
