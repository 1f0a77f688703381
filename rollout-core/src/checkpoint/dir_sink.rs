use super::{ExtraData, Snapshot, SnapshotMeta, SnapshotSink};
use crate::SaveParams;
use anyhow::Result;
use chrono::Local;
use log::info;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

/// Writes snapshots into subdirectories of a base directory.
///
/// * numbered snapshots: `(dir)/itr_(epoch)/(component)/`
/// * extra data: `(dir)/extra_data/(component)/`, removed before each write
///
/// Each snapshot directory has a `snapshot.yaml` holding [`SnapshotMeta`].
pub struct DirSnapshotSink {
    dir: PathBuf,
}

impl DirSnapshotSink {
    /// Constructs a sink writing under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory of the numbered snapshot of `epoch`.
    pub fn itr_dir(&self, epoch: i64) -> PathBuf {
        self.dir.join(format!("itr_{}", epoch))
    }

    /// Returns the directory of the extra data.
    pub fn extra_data_dir(&self) -> PathBuf {
        self.dir.join("extra_data")
    }

    /// Loads the metadata of a snapshot directory.
    pub fn load_meta(path: impl AsRef<Path>) -> Result<SnapshotMeta> {
        let file = File::open(path.as_ref().join("snapshot.yaml"))?;
        let rdr = std::io::BufReader::new(file);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    fn write(
        dir: &Path,
        epoch: i64,
        components: Vec<(&'static str, &dyn SaveParams)>,
    ) -> Result<()> {
        fs::create_dir_all(dir)?;
        for (name, c) in components.iter() {
            c.save_params(&dir.join(name))?;
        }

        let meta = SnapshotMeta {
            epoch,
            components: components.iter().map(|(name, _)| name.to_string()).collect(),
            created_at: Local::now().to_rfc3339(),
        };
        let mut file = File::create(dir.join("snapshot.yaml"))?;
        file.write_all(serde_yaml::to_string(&meta)?.as_bytes())?;
        Ok(())
    }
}

impl SnapshotSink for DirSnapshotSink {
    fn save_itr_params(&mut self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.itr_dir(snapshot.epoch);
        Self::write(&dir, snapshot.epoch, snapshot.components())?;
        info!("Saved snapshot of epoch {} in {:?}", snapshot.epoch, &dir);
        Ok(())
    }

    fn save_extra_data(&mut self, data: &ExtraData) -> Result<()> {
        let dir = self.extra_data_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Self::write(&dir, data.epoch, data.components())?;
        info!("Saved extra data of epoch {} in {:?}", data.epoch, &dir);
        Ok(())
    }
}
