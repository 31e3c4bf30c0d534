//! Score-to-offer rules.
//!
//! Tiers are checked in order and the first match wins. Both thresholds are
//! exclusive, so a score sitting exactly on a boundary falls to the lower tier.

use crate::models::{Offer, OfferTier, Score};
use std::fmt;
use std::str::FromStr;

/// Scores strictly above this earn the premium offer.
pub const PREMIUM_THRESHOLD: f64 = 0.8;
/// Scores strictly above this (and not premium) earn the extension offer.
pub const EXTENSION_THRESHOLD: f64 = 0.5;

/// Language of offer labels and messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts bare language codes and region-tagged ones (`fr-CA`, `en_GB`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            _ => Err(format!("unsupported locale '{}'", s)),
        }
    }
}

/// Classify a score into its offer tier.
pub fn tier_for(score: Score) -> OfferTier {
    let value = score.value();
    if value > PREMIUM_THRESHOLD {
        OfferTier::Premium
    } else if value > EXTENSION_THRESHOLD {
        OfferTier::Extension
    } else {
        OfferTier::Review
    }
}

/// Derive the offer for `name` using English templates.
pub fn derive_offer(score: Score, name: &str) -> Offer {
    derive_offer_localized(score, name, Locale::default())
}

/// Derive the offer for `name` in the given locale.
pub fn derive_offer_localized(score: Score, name: &str, locale: Locale) -> Offer {
    let tier = tier_for(score);
    let (label, message) = render(tier, name, locale);

    Offer {
        tier,
        label: label.to_string(),
        message,
    }
}

fn render(tier: OfferTier, name: &str, locale: Locale) -> (&'static str, String) {
    match (locale, tier) {
        (Locale::En, OfferTier::Premium) => (
            "Interest rate discount",
            format!(
                "Congratulations {}! Your excellent credit rating qualifies you for a discounted interest rate.",
                name
            ),
        ),
        (Locale::En, OfferTier::Extension) => (
            "Repayment period extension",
            format!(
                "{}, you qualify for extended repayment terms on your loans.",
                name
            ),
        ),
        (Locale::En, OfferTier::Review) => (
            "Manual account review",
            format!(
                "{}, a manual review of your account has been requested. Our team will contact you to schedule it.",
                name
            ),
        ),
        (Locale::Fr, OfferTier::Premium) => (
            "Réduction du taux d'intérêt",
            format!(
                "Félicitations {} ! Votre excellente notation vous donne droit à un taux d'intérêt réduit.",
                name
            ),
        ),
        (Locale::Fr, OfferTier::Extension) => (
            "Prolongation de la durée de remboursement",
            format!(
                "{}, vous êtes éligible à une prolongation de la durée de remboursement de vos prêts.",
                name
            ),
        ),
        (Locale::Fr, OfferTier::Review) => (
            "Examen manuel du dossier",
            format!(
                "{}, un examen manuel de votre dossier a été demandé. Notre équipe vous contactera pour le planifier.",
                name
            ),
        ),
    }
}
