//! Greenhouse - personal plant-care tracking
//!
//! The core is the plant registry: an in-memory collection where every
//! mutation lands optimistically, persists as a whole, and rolls back to
//! its pre-mutation snapshot if persistence fails. Around it sit the
//! storage backends, the species search client, and the proxy daemon
//! that keeps the plant-database API key off client devices.
//!
//! ## Layout
//!
//! - [`registry`] - optimistic mutations with rollback (the core)
//! - [`model`] - plant records, species summaries, care updates
//! - [`store`] - persistence seam: JSON file and in-memory backends
//! - [`species`] - search client with payload normalization
//! - [`server`] - the `greenhouse-proxy` HTTP daemon
//! - [`sprites`] - the avatar catalog
//! - [`config`] - proxy daemon configuration

pub mod config;
pub mod model;
pub mod registry;
pub mod server;
pub mod species;
pub mod sprites;
pub mod store;

pub use model::{CareUpdate, Plant, SpeciesSummary};
pub use registry::{PlantRegistry, RegistryError};
pub use species::{SpeciesClient, SpeciesError};
pub use store::{FileStore, MemoryStore, PlantStore, StoreError};
