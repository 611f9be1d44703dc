mod map;
mod sarsa;
mod value_table;

pub use map::{QTable, StateActionMap};
pub use sarsa::{SarsaAgent, SarsaConfig};
pub use value_table::{Selection, ValueTable};

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Clone + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Clone + Eq + std::hash::Hash {}
