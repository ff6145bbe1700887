//! η–φ bucket index used to shortlist fragments around a seed.
//!
//! # Cell geometry
//! Cells are `radius` wide in η and `2π / n_phi ≥ radius` wide in φ, with
//! the φ axis wrapping. Any track within ΔR < `radius` of a query point
//! therefore lies in the query cell or one of its 8 neighbours.
//!
//! Tracks whose η or φ is not finite are kept in a separate list that every
//! query returns, so the shortlist is always a superset of the cone.

use crate::types::Track;
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

/// A uniform η–φ grid over track indices.
pub struct EtaPhiGrid {
    cell_size: f64,
    n_phi: i64,
    /// Maps cell key (i_eta, i_phi) to a list of track indices.
    cells: HashMap<(i64, i64), Vec<usize>>,
    /// Tracks with non-finite direction
    unbinned: Vec<usize>,
    /// False when `radius` cannot define a grid; queries then return nothing.
    usable: bool,
}

impl EtaPhiGrid {
    pub fn new(radius: f64) -> Self {
        let usable = radius.is_finite() && radius > 0.0;
        let n_phi = if usable {
            ((TAU / radius).floor() as i64).max(1)
        } else {
            1
        };
        Self {
            cell_size: radius,
            n_phi,
            cells: HashMap::new(),
            unbinned: Vec::new(),
            usable,
        }
    }

    /// Index every track of an event.
    pub fn build(radius: f64, tracks: &[Track]) -> Self {
        let mut grid = Self::new(radius);
        for (idx, track) in tracks.iter().enumerate() {
            grid.insert(idx, track.eta(), track.phi());
        }
        grid
    }

    fn phi_cell_width(&self) -> f64 {
        TAU / self.n_phi as f64
    }

    fn cell_of(&self, eta: f64, phi: f64) -> Option<(i64, i64)> {
        if !eta.is_finite() || !phi.is_finite() {
            return None;
        }
        let ie = (eta / self.cell_size).floor() as i64;
        let ip = ((phi + PI) / self.phi_cell_width()).floor() as i64;
        Some((ie, ip.rem_euclid(self.n_phi)))
    }

    /// Insert a track index at direction (η, φ).
    pub fn insert(&mut self, idx: usize, eta: f64, phi: f64) {
        match self.cell_of(eta, phi) {
            Some(key) if self.usable => self.cells.entry(key).or_default().push(idx),
            _ => self.unbinned.push(idx),
        }
    }

    /// Track indices in the 3×3 cells around (η, φ), in ascending index
    /// order without duplicates.
    ///
    /// Returns `None` when the grid cannot answer (unusable radius or a
    /// non-finite query direction); callers then scan the full collection.
    pub fn query_nearby(&self, eta: f64, phi: f64) -> Option<Vec<usize>> {
        if !self.usable {
            return None;
        }
        let (ie, ip) = self.cell_of(eta, phi)?;

        let mut results = self.unbinned.clone();
        for de in -1..=1_i64 {
            for dp in -1..=1_i64 {
                let key = (
                    ie.saturating_add(de),
                    (ip + dp).rem_euclid(self.n_phi),
                );
                if let Some(indices) = self.cells.get(&key) {
                    results.extend_from_slice(indices);
                }
            }
        }
        // Fewer than 3 φ cells makes neighbours alias each other.
        results.sort_unstable();
        results.dedup();
        Some(results)
    }

    /// Number of tracks held in φ-η cells (excludes unbinned tracks).
    pub fn binned_len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
