//! Table of rings measured by hand with the ring-picking tool.
//!
//! A ring is identified by its order and kind, and picking the same ring
//! again replaces the earlier reading. The table is kept sorted by order.
//! It is stored as a JSON array of [`MeasurementSample`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::params::{FitResult, MeasurementSample, RingKind, RingRecord};
use crate::recovery::{recover_radius, MIN_SAMPLES};
use crate::units::Length;

/// Which rings were handed to the regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingSelection {
    Dark,
    Bright,
    Mixed,
}

impl fmt::Display for RingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingSelection::Dark => write!(f, "dark rings"),
            RingSelection::Bright => write!(f, "bright rings"),
            RingSelection::Mixed => write!(f, "mixed rings"),
        }
    }
}

/// Measured rings, at most one per (order, kind), sorted by order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MeasurementSample>", into = "Vec<MeasurementSample>")]
pub struct MeasurementTable {
    samples: Vec<MeasurementSample>,
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, order: u32, kind: RingKind) -> std::result::Result<usize, usize> {
        self.samples
            .binary_search_by(|s| (s.order, s.kind).cmp(&(order, kind)))
    }

    /// Insert `sample`, replacing any reading of the same ring.
    ///
    /// Returns the replaced sample.
    pub fn upsert(&mut self, sample: MeasurementSample) -> Option<MeasurementSample> {
        match self.position(sample.order, sample.kind) {
            Ok(index) => Some(std::mem::replace(&mut self.samples[index], sample)),
            Err(index) => {
                self.samples.insert(index, sample);
                None
            }
        }
    }

    /// Record a ring picked from an enumerated ring set
    pub fn record_ring(&mut self, ring: &RingRecord) -> Option<MeasurementSample> {
        self.upsert(MeasurementSample::from(ring))
    }

    pub fn remove(&mut self, order: u32, kind: RingKind) -> Option<MeasurementSample> {
        self.position(order, kind)
            .ok()
            .map(|index| self.samples.remove(index))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in ascending order, dark before bright within an order
    pub fn iter(&self) -> impl Iterator<Item = &MeasurementSample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[MeasurementSample] {
        &self.samples
    }

    fn of_kind(&self, kind: RingKind) -> Vec<MeasurementSample> {
        self.samples.iter().filter(|s| s.kind == kind).copied().collect()
    }

    /// Choose the rings used for the radius fit.
    ///
    /// Dark rings are used alone when there are at least three and no fewer
    /// than the bright ones. Otherwise bright rings are used alone when
    /// there are at least three. Otherwise every ring is used, each at its
    /// own effective order.
    pub fn select_for_regression(&self) -> (RingSelection, Vec<MeasurementSample>) {
        let dark = self.of_kind(RingKind::Dark);
        let bright = self.of_kind(RingKind::Bright);

        if dark.len() >= MIN_SAMPLES && dark.len() >= bright.len() {
            (RingSelection::Dark, dark)
        } else if bright.len() >= MIN_SAMPLES {
            (RingSelection::Bright, bright)
        } else {
            (RingSelection::Mixed, self.samples.clone())
        }
    }

    /// Select rings and fit the radius.
    pub fn recover(&self, wavelength: Length) -> Result<(RingSelection, FitResult)> {
        let (selection, samples) = self.select_for_regression();
        log::info!("Fitting {} {}", samples.len(), selection);
        let fit = recover_radius(&samples, wavelength)?;
        Ok((selection, fit))
    }

    /// Save as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> std::result::Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl From<Vec<MeasurementSample>> for MeasurementTable {
    fn from(samples: Vec<MeasurementSample>) -> Self {
        samples.into_iter().collect()
    }
}

impl From<MeasurementTable> for Vec<MeasurementSample> {
    fn from(table: MeasurementTable) -> Self {
        table.samples
    }
}

impl FromIterator<MeasurementSample> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = MeasurementSample>>(iter: I) -> Self {
        let mut table = MeasurementTable::new();
        for sample in iter {
            table.upsert(sample);
        }
        table
    }
}
