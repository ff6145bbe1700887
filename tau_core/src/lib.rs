//! `tau_core` — Hadronic tau reconstruction from charged tracks.
//!
//! # Module layout
//! - [`kinematics`] — Four-vectors, Δφ and ΔR
//! - [`types`]      — Track, TauCandidate, Event records
//! - [`config`]     — Clustering thresholds and their validation
//! - [`grid`]       — η–φ bucket index for neighbour lookup
//! - [`clusterer`]  — Seed selection, cone clustering, leading-track veto
//! - [`pipeline`]   — Per-event orchestration, batch processing
//! - [`metrics`]    — Efficiency, fake rate, prong multiplicity

pub mod clusterer;
pub mod config;
pub mod grid;
pub mod kinematics;
pub mod metrics;
pub mod pipeline;
pub mod types;

pub use clusterer::{ClusterOutput, SeedOutcome, TauClusterer, MAX_PRONGS};
pub use config::{ClustererConfig, ConfigError, NeighborSearch};
pub use kinematics::LorentzVector;
pub use metrics::{ReconstructionMetrics, TruthTau};
pub use pipeline::{EventOutput, Pipeline, PipelineConfig};
pub use types::{Event, TauCandidate, Track, TrackId};
