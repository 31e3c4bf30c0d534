use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============ Request Models ============

/// Raw onboarding payload as submitted by the presentation layer.
///
/// Every field is optional and loosely typed so that missing or malformed values
/// surface as validation errors instead of body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub name: Option<Value>,
    pub age: Option<Value>,
    pub income: Option<Value>,
    pub loans: Option<Value>,
}

/// Validated client attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInput {
    /// Client's display name, trimmed and non-empty.
    pub name: String,
    /// Age in years, at least 1.
    pub age: u32,
    /// Income in thousands.
    pub income: u32,
    /// Number of loans currently held.
    pub loans: u32,
}

/// Query parameters accepted by the onboarding endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardParams {
    /// Message locale override (e.g. "en", "fr").
    pub lang: Option<String>,
}

// ============ Scoring Models ============

/// Numeric features in the order the scoring service expects: age, income, loans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; 3]);

impl FeatureVector {
    pub fn new(age: f64, income: f64, loans: f64) -> Self {
        Self([age, income, loans])
    }

    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }
}

/// Repayment probability in `[0, 1]`.
///
/// NaN, infinities and out-of-range values cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Score::new(value).ok_or_else(|| format!("score {} is outside [0, 1]", value))
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Where a record's score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Returned by the external scoring service.
    Service,
    /// Substituted because the scoring service failed.
    Fallback,
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Service => "service",
            ScoreSource::Fallback => "fallback",
        }
    }
}

impl FromStr for ScoreSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(ScoreSource::Service),
            "fallback" => Ok(ScoreSource::Fallback),
            other => Err(format!("unknown score source '{}'", other)),
        }
    }
}

/// A score together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub score: Score,
    pub source: ScoreSource,
}

// ============ Offer Models ============

/// Discrete offer classification, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferTier {
    Review,
    Extension,
    Premium,
}

impl OfferTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferTier::Review => "review",
            OfferTier::Extension => "extension",
            OfferTier::Premium => "premium",
        }
    }
}

impl fmt::Display for OfferTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(OfferTier::Review),
            "extension" => Ok(OfferTier::Extension),
            "premium" => Ok(OfferTier::Premium),
            other => Err(format!("unknown offer tier '{}'", other)),
        }
    }
}

/// Offer derived from a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub tier: OfferTier,
    /// Human-readable offer name.
    pub label: String,
    /// Message addressed to the client.
    pub message: String,
}

// ============ Record Models ============

/// Everything the pipeline assembles before the store assigns identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub input: ClientInput,
    pub score: ScoreResult,
    pub offer: Offer,
}

/// A persisted client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Identity assigned by the store.
    pub id: Uuid,
    #[serde(flatten)]
    pub input: ClientInput,
    pub score: Score,
    pub score_source: ScoreSource,
    pub offer: Offer,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `clients` table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub income: i64,
    pub loans: i64,
    pub score: f64,
    pub score_source: String,
    pub offer_tier: String,
    pub offer_label: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for ClientRecord {
    type Error = String;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let to_u32 = |field: &str, value: i64| {
            u32::try_from(value).map_err(|_| format!("column {} out of range: {}", field, value))
        };

        Ok(ClientRecord {
            id: row.id,
            input: ClientInput {
                name: row.name,
                age: to_u32("age", row.age)?,
                income: to_u32("income", row.income)?,
                loans: to_u32("loans", row.loans)?,
            },
            score: Score::try_from(row.score)?,
            score_source: row.score_source.parse()?,
            offer: Offer {
                tier: row.offer_tier.parse()?,
                label: row.offer_label,
                message: row.message,
            },
            created_at: row.created_at,
        })
    }
}
