use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_CLIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    age BIGINT NOT NULL CHECK (age > 0),
    income BIGINT NOT NULL CHECK (income >= 0),
    loans BIGINT NOT NULL CHECK (loans >= 0),
    score DOUBLE PRECISION NOT NULL CHECK (score >= 0 AND score <= 1),
    score_source TEXT NOT NULL,
    offer_tier TEXT NOT NULL,
    offer_label TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    seq BIGSERIAL NOT NULL
)
"#;

// Tables created before `seq` existed.
const ADD_SEQ_COLUMN: &str =
    "ALTER TABLE clients ADD COLUMN IF NOT EXISTS seq BIGSERIAL NOT NULL";

const CREATE_CREATED_AT_INDEX: &str = "CREATE INDEX IF NOT EXISTS clients_created_at_seq_idx \
     ON clients (created_at DESC, seq DESC)";

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        Self::ensure_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
        sqlx::query(CREATE_CLIENTS_TABLE).execute(pool).await?;
        sqlx::query(ADD_SEQ_COLUMN).execute(pool).await?;
        sqlx::query(CREATE_CREATED_AT_INDEX).execute(pool).await?;
        tracing::debug!("clients table ready");
        Ok(())
    }
}
