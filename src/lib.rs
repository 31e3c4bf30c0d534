//! Client Onboarding API Library
//!
//! Records bank clients and, for each new client, computes a repayment score
//! through an external scoring service and derives a matching offer and message.
//!
//! # Modules
//!
//! - `integrations`: External service and storage namespace.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: PostgreSQL client store.
//! - `errors`: Error handling types.
//! - `features`: Feature vector extraction.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `offers`: Score-to-offer rules and message templates.
//! - `pipeline`: Onboarding orchestration.
//! - `routes`: Router construction and middleware.
//! - `scoring_client`: External scoring service client with fallback.
//! - `store`: Client store trait and in-memory store.
//! - `validation`: Payload validation.

pub mod integrations;

pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod features;
pub mod handlers;
pub mod models;
pub mod offers;
pub mod pipeline;
pub mod routes;
pub mod scoring_client;
pub mod store;
pub mod validation;
