//! Fundamental types used across the entire workspace.

use crate::kinematics::LorentzVector;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identifier types
// ---------------------------------------------------------------------------

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trk{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Track (input)
// ---------------------------------------------------------------------------

/// A reconstructed charged-particle track.
///
/// Within one event a track's identity is its position in the input
/// collection; `id` is carried for bookkeeping and display only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// Four-momentum at the point of closest approach (GeV)
    pub momentum: LorentzVector,
    /// Electric charge in units of e
    pub charge: i32,
}

impl Track {
    pub fn new(id: TrackId, momentum: LorentzVector, charge: i32) -> Self {
        Self {
            id,
            momentum,
            charge,
        }
    }

    pub fn from_pt_eta_phi_m(
        id: u64,
        pt: f64,
        eta: f64,
        phi: f64,
        mass: f64,
        charge: i32,
    ) -> Self {
        Self::new(
            TrackId(id),
            LorentzVector::from_pt_eta_phi_m(pt, eta, phi, mass),
            charge,
        )
    }

    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    pub fn eta(&self) -> f64 {
        self.momentum.eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }
}

// ---------------------------------------------------------------------------
// TauCandidate (output)
// ---------------------------------------------------------------------------

/// A reconstructed hadronic tau candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TauCandidate {
    /// Track that seeded this candidate
    pub seed: TrackId,
    /// Visible four-momentum: seed plus core-cone tracks
    pub momentum: LorentzVector,
    /// Summed charge of seed plus core-cone tracks
    pub charge: i32,
    /// Charged-track multiplicity (1..=5)
    pub n_prongs: u32,
    /// Reserved: always 0, no photon input is clustered
    pub n_photons: u32,
    /// Reserved: always 0, no neutral-hadron input is clustered
    pub n_neutral_hadrons: u32,
    /// Scalar pT sum of tracks in the isolation annulus (GeV)
    pub isolation: f64,
}

impl TauCandidate {
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    pub fn eta(&self) -> f64 {
        self.momentum.eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }

    pub fn mass(&self) -> f64 {
        self.momentum.mass()
    }
}

impl fmt::Display for TauCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tau(seed={}, pT={:.2}, eta={:.3}, phi={:.3}, m={:.3}, q={:+}, prongs={}, iso={:.2})",
            self.seed,
            self.pt(),
            self.eta(),
            self.phi(),
            self.mass(),
            self.charge,
            self.n_prongs,
            self.isolation
        )
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// The track collection of one collision event.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Event {
    pub number: u64,
    pub tracks: Vec<Track>,
}
