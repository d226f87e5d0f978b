//! Syllable space enumeration
//!
//! The space is the Cartesian product initials × finals × tones. Two knobs
//! shape it before it reaches the network:
//! - [`Legality`] drops pairs known not to occur in Mandarin. Skipping it
//!   only costs extra not-found responses.
//! - [`AccessOrder`] decides the request order. Shuffling spreads requests
//!   across the remote directory layout instead of walking it in sequence.

use crate::pinyin::{PhoneticTables, Syllable, TONES};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Which (initial, final) pairs to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Legality {
    /// Every pair in the tables
    #[default]
    All,
    /// Only pairs accepted by [`is_valid_combination`]
    Valid,
}

impl Legality {
    pub fn permits(self, initial: &str, final_: &str) -> bool {
        match self {
            Legality::All => true,
            Legality::Valid => is_valid_combination(initial, final_),
        }
    }
}

/// Order in which enumerated syllables are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessOrder {
    #[default]
    Sequential,
    Shuffled,
}

impl AccessOrder {
    pub fn apply<T>(self, items: &mut [T]) {
        if self == AccessOrder::Shuffled {
            items.shuffle(&mut rand::thread_rng());
        }
    }
}

/// Whether `(initial, final)` can form a real syllable.
///
/// Assumes both parts come from the standard tables.
pub fn is_valid_combination(initial: &str, final_: &str) -> bool {
    match initial {
        "j" | "q" | "x" => final_.starts_with('i') || final_.starts_with('v'),
        "zh" | "ch" | "sh" => {
            !final_.starts_with('i')
                && !final_.starts_with('v')
                && !matches!(final_, "ueng" | "er" | "o")
        }
        _ => true,
    }
}

/// Enumerate every syllable the tables describe, tones 1-4 for each pair
pub fn enumerate(tables: &PhoneticTables, legality: Legality) -> Vec<Syllable> {
    let mut syllables =
        Vec::with_capacity(tables.initials().len() * tables.finals().len() * TONES.len());

    for initial in tables.initials() {
        for final_ in tables.finals() {
            if !legality.permits(initial, final_) {
                continue;
            }
            for tone in TONES {
                syllables.push(Syllable::new(initial.as_str(), final_.as_str(), tone));
            }
        }
    }

    tracing::debug!(
        count = syllables.len(),
        ?legality,
        "Enumerated syllable space"
    );

    syllables
}
