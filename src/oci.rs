//! Oracle Cloud Infrastructure implementation of [`crate::compute::ComputeApi`].
//!
//! Requests are signed with the tenancy's API key and sent to the regional
//! Core Services endpoint. Wire bodies live in `models` and are produced from
//! domain values in `mapping`; nothing outside this module sees them.

#[path = "oci/signer.rs"]
mod signer;

#[path = "oci/models.rs"]
mod models;

#[path = "oci/mapping.rs"]
mod mapping;

#[path = "oci/client.rs"]
mod client;


pub use client::{regional_endpoint, OciClient};
pub use signer::{ContentHeaders, RequestSigner, SignedHeaders};
