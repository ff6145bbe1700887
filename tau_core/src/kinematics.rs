//! Relativistic kinematics: four-vectors and angular separations.
//!
//! # Conventions
//! - Four-vectors are stored in cartesian form `(px, py, pz, E)` (GeV).
//! - Pseudorapidity η = asinh(pz / pT); azimuth φ = atan2(py, px) ∈ [−π, π].
//! - ΔR = sqrt(Δη² + Δφ²) with Δφ wrapped to [−π, π).
//!
//! Non-finite components are never special-cased: they flow through every
//! accessor and comparison the same way IEEE arithmetic carries them.

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::ops::{Add, AddAssign};

/// Cartesian four-momentum storage: [px, py, pz, E]
pub type FourVec = Vector4<f64>;

/// A Lorentz four-momentum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LorentzVector(pub FourVec);

impl LorentzVector {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self(FourVec::new(px, py, pz, e))
    }

    /// Build from collider coordinates (pT, η, φ, m).
    ///
    /// A negative mass is treated as space-like: E = sqrt(max(p² − m², 0)).
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        let e = if mass >= 0.0 {
            (p2 + mass * mass).sqrt()
        } else {
            (p2 - mass * mass).max(0.0).sqrt()
        };
        Self::new(px, py, pz, e)
    }

    pub fn px(&self) -> f64 {
        self.0[0]
    }

    pub fn py(&self) -> f64 {
        self.0[1]
    }

    pub fn pz(&self) -> f64 {
        self.0[2]
    }

    pub fn e(&self) -> f64 {
        self.0[3]
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px().hypot(self.py())
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        (self.px() * self.px() + self.py() * self.py() + self.pz() * self.pz()).sqrt()
    }

    /// Azimuthal angle; 0 for a vector along the beam axis.
    pub fn phi(&self) -> f64 {
        if self.px() == 0.0 && self.py() == 0.0 {
            0.0
        } else {
            self.py().atan2(self.px())
        }
    }

    /// Pseudorapidity; ±∞ along the beam axis, 0 for a null three-momentum.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            if self.pz() == 0.0 {
                0.0
            } else {
                f64::INFINITY.copysign(self.pz())
            }
        } else {
            (self.pz() / pt).asinh()
        }
    }

    /// Invariant mass; negative for space-like vectors.
    pub fn mass(&self) -> f64 {
        let m2 = self.e() * self.e() - self.p() * self.p();
        if m2 < 0.0 {
            -(-m2).sqrt()
        } else {
            m2.sqrt()
        }
    }

    /// Angular separation ΔR to `other`.
    pub fn delta_r(&self, other: &LorentzVector) -> f64 {
        delta_r(self.eta(), self.phi(), other.eta(), other.phi())
    }
}

impl Default for LorentzVector {
    fn default() -> Self {
        Self(FourVec::zeros())
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: LorentzVector) -> LorentzVector {
        LorentzVector(self.0 + rhs.0)
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, rhs: LorentzVector) {
        self.0 += rhs.0;
    }
}

/// φ₁ − φ₂ wrapped to [−π, π).
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let d = phi1 - phi2;
    // In-range differences are returned untouched so that small separations
    // are exact.
    if (-PI..PI).contains(&d) {
        d
    } else {
        (d + PI).rem_euclid(TAU) - PI
    }
}

/// ΔR between two (η, φ) directions.
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    (deta * deta + dphi * dphi).sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
