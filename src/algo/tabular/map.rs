use std::{
    collections::{hash_map, HashMap},
    fmt,
    marker::PhantomData,
};

use serde::{
    de::{SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::Hashable;

/// A mapping from `(state, action)` pairs to real values where missing pairs read as `0.0`
///
/// Reads never insert. Only [`add`](StateActionMap::add) and [`insert`](StateActionMap::insert)
/// create entries, so the map holds exactly the pairs that have been written.
///
/// Serializes as a sequence of `{ state, action, value }` entries rather than a map with joined
/// string keys, so distinct pairs can never collide once persisted.
#[derive(Debug, Clone)]
pub struct StateActionMap<S, A> {
    values: HashMap<(S, A), f64>,
}

/// Learned action values, `Q(s, a)`
pub type QTable<S, A> = StateActionMap<S, A>;

impl<S, A> Default for StateActionMap<S, A> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<S: Hashable, A: Hashable> StateActionMap<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for a pair, `0.0` if it has never been written
    pub fn get(&self, key: &(S, A)) -> f64 {
        self.values.get(key).copied().unwrap_or_default()
    }

    /// Overwrite the value for a pair
    pub fn insert(&mut self, key: (S, A), value: f64) {
        self.values.insert(key, value);
    }

    /// Add `amount` to the value for a pair, creating it from `0.0` if absent
    pub fn add(&mut self, key: &(S, A), amount: f64) {
        match self.values.get_mut(key) {
            Some(value) => *value += amount,
            None => {
                self.values.insert(key.clone(), amount);
            }
        }
    }

    /// Multiply the value for a pair by `factor`, absent pairs stay at `0.0`
    pub fn scale(&mut self, key: &(S, A), factor: f64) {
        if let Some(value) = self.values.get_mut(key) {
            *value *= factor;
        }
    }

    pub fn contains(&self, key: &(S, A)) -> bool {
        self.values.contains_key(key)
    }
}

impl<S, A> StateActionMap<S, A> {
    /// Number of pairs that have been written
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, (S, A), f64> {
        self.values.iter()
    }
}

impl<S: Hashable, A: Hashable> PartialEq for StateActionMap<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<S: Hashable, A: Hashable> FromIterator<((S, A), f64)> for StateActionMap<S, A> {
    fn from_iter<T: IntoIterator<Item = ((S, A), f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a, S, A> IntoIterator for &'a StateActionMap<S, A> {
    type Item = (&'a (S, A), &'a f64);
    type IntoIter = hash_map::Iter<'a, (S, A), f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// One persisted pair, borrowed for serialization
#[derive(Serialize)]
struct EntryRef<'a, S, A> {
    state: &'a S,
    action: &'a A,
    value: f64,
}

/// One persisted pair, owned after deserialization
#[derive(Deserialize)]
struct Entry<S, A> {
    state: S,
    action: A,
    value: f64,
}

impl<S: Serialize, A: Serialize> Serialize for StateActionMap<S, A> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        serializer.collect_seq(self.values.iter().map(|((state, action), &value)| EntryRef {
            state,
            action,
            value,
        }))
    }
}

struct EntriesVisitor<S, A>(PhantomData<(S, A)>);

impl<'de, S, A> Visitor<'de> for EntriesVisitor<S, A>
where
    S: Hashable + Deserialize<'de>,
    A: Hashable + Deserialize<'de>,
{
    type Value = StateActionMap<S, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of { state, action, value } entries")
    }

    fn visit_seq<V: SeqAccess<'de>>(self, mut seq: V) -> Result<Self::Value, V::Error> {
        let mut values = HashMap::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(Entry {
            state,
            action,
            value,
        }) = seq.next_element::<Entry<S, A>>()?
        {
            values.insert((state, action), value);
        }
        Ok(StateActionMap { values })
    }
}

impl<'de, S, A> Deserialize<'de> for StateActionMap<S, A>
where
    S: Hashable + Deserialize<'de>,
    A: Hashable + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_pairs_read_as_zero_without_inserting() {
        let map = QTable::<u32, u32>::new();
        assert_eq!(map.get(&(3, 1)), 0.0);
        assert!(map.is_empty(), "Reading does not insert");
    }

    #[test]
    fn add_and_scale() {
        let mut map = QTable::<u32, u32>::new();
        map.add(&(0, 1), 2.0);
        map.add(&(0, 1), 0.5);
        map.scale(&(0, 1), 2.0);
        map.scale(&(9, 9), 2.0);
        assert_eq!(map.get(&(0, 1)), 5.0);
        assert!(!map.contains(&(9, 9)), "Scaling an absent pair does not insert");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn separator_lookalikes_stay_distinct() {
        let mut map = QTable::<String, String>::new();
        map.insert(("a | b".into(), "c".into()), 1.0);
        map.insert(("a".into(), "b | c".into()), 2.0);

        let yaml = serde_yaml::to_string(&map).unwrap();
        let back: QTable<String, String> = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back.get(&("a | b".into(), "c".into())), 1.0);
        assert_eq!(back.get(&("a".into(), "b | c".into())), 2.0);
    }

    #[test]
    fn malformed_entries_fail_to_load() {
        let yaml = "- state: 1\n  action: 0\n";
        let result = serde_yaml::from_str::<QTable<u32, u32>>(yaml);
        assert!(result.is_err(), "Entry without a value is rejected");
    }
}
