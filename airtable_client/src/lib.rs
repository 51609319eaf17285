// Airtable API transport - the reqwest-backed side of the connectivity probe

pub mod client;
pub mod error;

pub use client::{AirtableClient, AirtableClientConfig};
pub use error::AirtableError;
