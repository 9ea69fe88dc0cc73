use std::collections::BTreeSet;
use std::path::Path;

use csv::WriterBuilder;

use crate::data::ParticleMap;
use crate::error::CellError;

/// Collects species-count snapshots at whole minutes and writes them as CSV.
///
/// The written table has one row per species. The first column, `Time`, holds the
/// species id and every further column holds the counts recorded at one minute,
/// with the minute as column header.
#[derive(Debug, Clone, Default)]
pub struct CountsRecorder {
    snapshots: Vec<(u64, ParticleMap)>,
}

impl CountsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of the particle map as the snapshot for `minute`.
    ///
    /// Recording the same minute twice replaces the earlier snapshot.
    pub fn record(&mut self, minute: u64, pmap: &ParticleMap) {
        match self.snapshots.iter_mut().find(|(m, _)| *m == minute) {
            Some((_, snapshot)) => *snapshot = pmap.clone(),
            None => self.snapshots.push((minute, pmap.clone())),
        }
    }

    pub fn minutes(&self) -> Vec<u64> {
        self.snapshots.iter().map(|(m, _)| *m).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Write all snapshots to `path`, one column per minute.
    ///
    /// Species that appear only in later snapshots are reported as zero in the
    /// earlier columns.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), CellError> {
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;

        let species: BTreeSet<&str> = self
            .snapshots
            .iter()
            .flat_map(|(_, pmap)| pmap.species())
            .collect();

        let mut header = Vec::with_capacity(self.snapshots.len() + 1);
        header.push("Time".to_string());
        header.extend(self.snapshots.iter().map(|(m, _)| m.to_string()));
        writer.write_record(&header)?;

        for id in species {
            let mut row = Vec::with_capacity(self.snapshots.len() + 1);
            row.push(id.to_string());
            row.extend(
                self.snapshots
                    .iter()
                    .map(|(_, pmap)| pmap.count(id).to_string()),
            );
            writer.write_record(&row)?;
        }
        writer.flush()?;
        log::debug!(
            "wrote {} count snapshots to {}",
            self.snapshots.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Write a single snapshot of the particle map taken at `minute`
pub fn write_snapshot(
    path: impl AsRef<Path>,
    pmap: &ParticleMap,
    minute: u64,
) -> Result<(), CellError> {
    let mut recorder = CountsRecorder::new();
    recorder.record(minute, pmap);
    recorder.write_csv(path)
}
