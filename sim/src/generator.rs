//! Event generator.
//!
//! Produces per-event charged-track collections with:
//! - Hadronic taus decaying to 1 or 3 charged pions (total charge ±1)
//! - QCD-like jets: one leading track plus softer collimated tracks
//! - Poisson-distributed soft activity uniform in η–φ
//!
//! Track order within an event is shuffled and track ids are renumbered to
//! the final positions, so `TrackId(i)` is always `tracks[i]`.

use crate::scenarios::{Scenario, SoftActivity, SourceKind, SourceSpec};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use tau_core::{kinematics::delta_phi, Event, LorentzVector, Track, TrackId, TruthTau};
use tracing::debug;

/// Charged pion mass (GeV), assigned to every generated track.
pub const PION_MASS: f64 = 0.13957;

/// One generated event with its generator-level taus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedEvent {
    pub event: Event,
    pub truth: Vec<TruthTau>,
}

/// Generates events for a [`Scenario`].
pub struct EventGenerator {
    pub scenario: Scenario,
    rng: ChaCha8Rng,
    next_event: u64,
}

impl EventGenerator {
    pub fn new(scenario: Scenario) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(scenario.seed);
        Self {
            scenario,
            rng,
            next_event: 0,
        }
    }

    /// Generate the next `n` events.
    pub fn generate(&mut self, n: usize) -> Vec<GeneratedEvent> {
        (0..n).map(|_| self.generate_event()).collect()
    }

    /// Generate one event.
    pub fn generate_event(&mut self) -> GeneratedEvent {
        let mut tracks: Vec<Track> = Vec::new();
        let mut truth = Vec::new();

        let sources = self.scenario.sources.clone();
        for spec in &sources {
            for _ in 0..spec.multiplicity {
                match &spec.kind {
                    SourceKind::Tau {
                        three_prong_fraction,
                        collimation,
                    } => {
                        let tau = self.tau_decay(
                            spec,
                            *three_prong_fraction,
                            *collimation,
                            &mut tracks,
                        );
                        truth.push(tau);
                    }
                    SourceKind::Jet {
                        min_tracks,
                        max_tracks,
                        spread,
                    } => self.jet(spec, *min_tracks, *max_tracks, *spread, &mut tracks),
                }
            }
        }
        let soft = self.scenario.soft.clone();
        self.soft_activity(&soft, &mut tracks);

        tracks.shuffle(&mut self.rng);
        for (i, track) in tracks.iter_mut().enumerate() {
            track.id = TrackId(i as u64);
        }

        let number = self.next_event;
        self.next_event += 1;
        debug!(
            event = number,
            tracks = tracks.len(),
            taus = truth.len(),
            "event generated"
        );

        GeneratedEvent {
            event: Event { number, tracks },
            truth,
        }
    }

    // -----------------------------------------------------------------------
    // Sources
    // -----------------------------------------------------------------------

    fn axis(&mut self, spec: &SourceSpec) -> (f64, f64, f64) {
        let pt = self.rng.gen_range(spec.pt_min..=spec.pt_max);
        let eta = self.rng.gen_range(-spec.max_eta..=spec.max_eta);
        let phi = self.rng.gen_range(-PI..PI);
        (pt, eta, phi)
    }

    /// Direction uniformly inside a disc of `radius` around (eta, phi).
    fn smear_direction(&mut self, eta: f64, phi: f64, radius: f64) -> (f64, f64) {
        let r = radius * self.rng.gen::<f64>().sqrt();
        let theta = self.rng.gen::<f64>() * TAU;
        (eta + r * theta.cos(), delta_phi(phi + r * theta.sin(), 0.0))
    }

    fn random_charge(&mut self) -> i32 {
        if self.rng.gen_bool(0.5) {
            1
        } else {
            -1
        }
    }

    fn tau_decay(
        &mut self,
        spec: &SourceSpec,
        three_prong_fraction: f64,
        collimation: f64,
        tracks: &mut Vec<Track>,
    ) -> TruthTau {
        let (pt, eta, phi) = self.axis(spec);
        let charge = self.random_charge();

        let prongs: Vec<(f64, f64, f64, i32)> = if self.rng.gen_bool(three_prong_fraction) {
            let mut fractions = [0.0; 3];
            for f in &mut fractions {
                *f = self.rng.gen_range(0.2..1.0);
            }
            let norm: f64 = fractions.iter().sum();
            let mut charges = [charge, charge, -charge];
            charges.shuffle(&mut self.rng);
            (0..3)
                .map(|i| {
                    let (e, p) = self.smear_direction(eta, phi, collimation);
                    (pt * fractions[i] / norm, e, p, charges[i])
                })
                .collect()
        } else {
            vec![(pt, eta, phi, charge)]
        };

        let mut visible = LorentzVector::default();
        for &(ppt, peta, pphi, q) in &prongs {
            let track = Track::from_pt_eta_phi_m(0, ppt, peta, pphi, PION_MASS, q);
            visible += track.momentum;
            tracks.push(track);
        }

        TruthTau {
            eta: visible.eta(),
            phi: visible.phi(),
            visible_pt: visible.pt(),
            n_prongs: prongs.len() as u32,
            charge,
        }
    }

    fn jet(
        &mut self,
        spec: &SourceSpec,
        min_tracks: u32,
        max_tracks: u32,
        spread: f64,
        tracks: &mut Vec<Track>,
    ) {
        let (lead_pt, eta, phi) = self.axis(spec);
        let n = self.rng.gen_range(min_tracks.max(1)..=max_tracks.max(min_tracks).max(1));
        let q = self.random_charge();
        tracks.push(Track::from_pt_eta_phi_m(0, lead_pt, eta, phi, PION_MASS, q));
        for _ in 1..n {
            let pt = lead_pt * self.rng.gen_range(0.05..0.65);
            let (e, p) = self.smear_direction(eta, phi, spread);
            let q = self.random_charge();
            tracks.push(Track::from_pt_eta_phi_m(0, pt, e, p, PION_MASS, q));
        }
    }

    fn soft_activity(&mut self, soft: &SoftActivity, tracks: &mut Vec<Track>) {
        let n = self.poisson(soft.mean_tracks);
        for _ in 0..n {
            let pt = self.rng.gen_range(soft.pt_min..=soft.pt_max);
            let eta = self.rng.gen_range(-soft.max_eta..=soft.max_eta);
            let phi = self.rng.gen_range(-PI..PI);
            let q = self.random_charge();
            tracks.push(Track::from_pt_eta_phi_m(0, pt, eta, phi, PION_MASS, q));
        }
    }

    /// Poisson sample by multiplying uniforms until the product drops below
    /// e^{-λ}.
    fn poisson(&mut self, lambda: f64) -> usize {
        if lambda <= 0.0 {
            return 0;
        }
        let cap = (4.0 * lambda) as usize + 50;
        let threshold = (-lambda).exp();
        let mut n = 0usize;
        let mut prod = self.rng.gen::<f64>();
        while prod > threshold && n < cap {
            prod *= self.rng.gen::<f64>();
            n += 1;
        }
        n
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
