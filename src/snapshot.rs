use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    algo::tabular::{Hashable, QTable},
    error::Result,
};

/// Learned values for every slot of a cohort, the unit of persistence between runs
///
/// Persisted as YAML: a mapping from slot index to that slot's `{ state, action, value }`
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "S: Serialize, A: Serialize",
        deserialize = "S: Hashable + Deserialize<'de>, A: Hashable + Deserialize<'de>"
    )
)]
pub struct Snapshot<S, A> {
    slots: BTreeMap<usize, QTable<S, A>>,
}

impl<S, A> Default for Snapshot<S, A> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<S: Hashable, A: Hashable> PartialEq for Snapshot<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<S, A> Snapshot<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, slot: usize) -> Option<&QTable<S, A>> {
        self.slots.get(&slot)
    }

    /// Replace the values stored for a slot
    pub fn insert(&mut self, slot: usize, q: QTable<S, A>) {
        self.slots.insert(slot, q);
    }

    /// Number of slots with stored values
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &QTable<S, A>)> {
        self.slots.iter().map(|(&slot, q)| (slot, q))
    }
}

impl<S, A> Snapshot<S, A>
where
    S: Hashable + Serialize + DeserializeOwned,
    A: Hashable + Serialize + DeserializeOwned,
{
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// **Errors** if `yaml` is not a well-formed snapshot, nothing is defaulted
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Write the snapshot to `path`, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_yaml::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!("saved {} slot(s) to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot: Self = serde_yaml::from_reader(BufReader::new(File::open(path)?))?;
        info!("loaded {} slot(s) from {}", snapshot.len(), path.display());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> Snapshot<(usize, usize), String> {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            0,
            QTable::from_iter([
                (((1, 2), String::from("up")), -0.125),
                (((1, 3), String::from("left")), 1.0 / 3.0),
            ]),
        );
        snapshot.insert(1, QTable::new());
        snapshot
    }

    #[test]
    fn yaml_is_keyed_by_slot() {
        let yaml = sample().to_yaml().unwrap();
        let value: BTreeMap<usize, serde_yaml::Value> = serde_yaml::from_str(&yaml).unwrap();
        let slot = &value[&0];
        assert!(slot.is_sequence(), "Slot 0 holds a list of entries: {yaml}");
        assert_eq!(slot.as_sequence().unwrap().len(), 2);
        assert!(value[&1].as_sequence().unwrap().is_empty());
    }

    #[test]
    fn values_survive_a_file_round_trip_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        let snapshot = sample();

        snapshot.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap();

        assert_eq!(loaded, snapshot);
        assert_eq!(
            loaded.slot(0).unwrap().get(&((1, 3), String::from("left"))),
            1.0 / 3.0
        );
    }

    #[test]
    fn corrupt_snapshots_fail_loudly() {
        let result = Snapshot::<u32, u32>::from_yaml("0: not a list\n");
        assert!(matches!(result, Err(Error::Yaml(_))));

        let missing = Snapshot::<u32, u32>::load("/nonexistent/snapshot.yaml");
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
