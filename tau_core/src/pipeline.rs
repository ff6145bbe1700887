//! Pipeline orchestrator: tau reconstruction over a stream of events.
//!
//! # Processing steps per event
//! 1. Select seeds from the event's track collection
//! 2. Cluster each seed (veto, core merge, isolation sum)
//! 3. Publish the accepted candidates in [`EventOutput::taus`]
//! 4. Collect per-seed decisions for debugging
//!
//! Events share no state, so a batch of events can be processed in parallel;
//! outputs always come back in event order.

use crate::{
    clusterer::{SeedOutcome, TauClusterer},
    config::ClustererConfig,
    types::{Event, TauCandidate, TrackId},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the reconstruction pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Seed and cone thresholds
    pub clusterer: ClustererConfig,
    /// Record the outcome of every seed in [`EventDebugData`]
    pub collect_debug: bool,
    /// Process batches of events on the rayon thread pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clusterer: ClustererConfig::default(),
            collect_debug: true,
            parallel: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Per-seed decisions of one event.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventDebugData {
    pub outcomes: Vec<(TrackId, SeedOutcome)>,
}

/// Outputs of one event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventOutput {
    /// Event number the output belongs to
    pub event: u64,
    /// Reconstructed tau candidates, in seed order
    pub taus: Vec<TauCandidate>,
    /// Debug data (populated only when `collect_debug` is true)
    pub debug: EventDebugData,
    pub n_seeds: usize,
    pub n_vetoed: usize,
    pub n_too_many_prongs: usize,
    /// Wall-clock time of processing
    pub total_time_us: u64,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs the tau clusterer event by event.
pub struct Pipeline {
    pub config: PipelineConfig,
    clusterer: TauClusterer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let clusterer = TauClusterer::new(config.clusterer.clone());
        Self { config, clusterer }
    }

    /// Reconstruct one event.
    pub fn process_event(&self, event: &Event) -> EventOutput {
        let start = Instant::now();
        let out = self.clusterer.cluster_with_outcomes(&event.tracks);

        let n_seeds = out.n_seeds();
        let n_vetoed = out.n_vetoed();
        let n_too_many_prongs = out.n_too_many_prongs();
        let debug = if self.config.collect_debug {
            EventDebugData {
                outcomes: out.outcomes,
            }
        } else {
            EventDebugData::default()
        };
        let total_time_us = start.elapsed().as_micros() as u64;

        debug!(
            event = event.number,
            tracks = event.tracks.len(),
            seeds = n_seeds,
            taus = out.candidates.len(),
            vetoed = n_vetoed,
            "event reconstructed"
        );

        EventOutput {
            event: event.number,
            taus: out.candidates,
            debug,
            n_seeds,
            n_vetoed,
            n_too_many_prongs,
            total_time_us,
        }
    }

    /// Reconstruct a batch of events; output order matches input order.
    pub fn process_events(&self, events: &[Event]) -> Vec<EventOutput> {
        if self.config.parallel {
            events.par_iter().map(|e| self.process_event(e)).collect()
        } else {
            events.iter().map(|e| self.process_event(e)).collect()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Track;

    fn make_event(number: u64, tracks: &[(f64, f64, f64, i32)]) -> Event {
        Event {
            number,
            tracks: tracks
                .iter()
                .enumerate()
                .map(|(i, &(pt, eta, phi, q))| {
                    Track::from_pt_eta_phi_m(i as u64, pt, eta, phi, 0.13957, q)
                })
                .collect(),
        }
    }

    #[test]
    fn counts_seed_outcomes() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let event = make_event(
            3,
            &[
                (10.0, 0.0, 0.0, 1),
                (15.0, 0.1, 0.0, -1),
                (7.0, -1.5, 2.0, 1),
                (2.0, 0.0, 1.0, 1),
            ],
        );
        let out = pipeline.process_event(&event);
        assert_eq!(out.event, 3);
        assert_eq!(out.n_seeds, 3);
        assert_eq!(out.n_vetoed, 1);
        assert_eq!(out.n_too_many_prongs, 0);
        assert_eq!(out.taus.len(), 2);
        assert_eq!(out.debug.outcomes.len(), 3);
    }

    #[test]
    fn debug_collection_can_be_disabled() {
        let pipeline = Pipeline::new(PipelineConfig {
            collect_debug: false,
            ..Default::default()
        });
        let out = pipeline.process_event(&make_event(0, &[(10.0, 0.0, 0.0, 1)]));
        assert_eq!(out.taus.len(), 1);
        assert_eq!(out.n_seeds, 1);
        assert!(out.debug.outcomes.is_empty());
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let events: Vec<Event> = (0..32)
            .map(|n| {
                let shift = n as f64 * 0.1;
                make_event(
                    n,
                    &[
                        (12.0 + shift, 0.2, shift, 1),
                        (3.0, 0.3, shift + 0.05, -1),
                        (8.0, -0.4, shift - 2.0, 1),
                        (1.0, -0.4, shift - 1.6, -1),
                    ],
                )
            })
            .collect();
        let par = Pipeline::new(PipelineConfig::default()).process_events(&events);
        let seq = Pipeline::new(PipelineConfig {
            parallel: false,
            ..Default::default()
        })
        .process_events(&events);
        assert_eq!(par.len(), events.len());
        for (p, s) in par.iter().zip(&seq) {
            assert_eq!(p.event, s.event);
            assert_eq!(p.taus, s.taus);
        }
        assert!(par.iter().enumerate().all(|(i, o)| o.event == i as u64));
    }
}
