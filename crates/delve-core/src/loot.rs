//! Loot tables and pickup yields.
//!
//! A destroyed container draws exactly one [`PickupKind`] from a
//! [`LootTable`]. Tables are validated when built, so a draw can never fail.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::PickupKind;
use crate::error::ConfigError;

/// How far the weight sum may drift from exactly one.
pub const WEIGHT_TOLERANCE: f32 = 1e-4;

/// One weighted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item dropped when this entry is drawn.
    pub kind: PickupKind,
    /// Probability of this entry.
    pub weight: f32,
}

impl LootEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(kind: PickupKind, weight: f32) -> Self {
        Self { kind, weight }
    }
}

/// Validated weighted table of pickup kinds.
///
/// Serialized as a plain list of entries; deserializing runs the same
/// validation as [`LootTable::new`].
///
/// # Example
///
/// ```
/// use delve_core::entity::PickupKind;
/// use delve_core::loot::{LootEntry, LootTable};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let table = LootTable::new(vec![
///     LootEntry::new(PickupKind::Currency, 0.5),
///     LootEntry::new(PickupKind::Ammunition, 0.5),
/// ])
/// .unwrap();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let kind = table.draw(&mut rng);
/// assert!(matches!(kind, PickupKind::Currency | PickupKind::Ammunition));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LootEntry>", into = "Vec<LootEntry>")]
pub struct LootTable {
    entries: Vec<LootEntry>,
    /// Running weight totals, one per entry.
    cumulative: Vec<f32>,
}

impl LootTable {
    /// Builds a table after checking that it is non-empty, that every weight
    /// is finite and non-negative, and that the weights sum to one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] that applies.
    pub fn new(entries: Vec<LootEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyLootTable);
        }
        if let Some(bad) = entries
            .iter()
            .find(|entry| !entry.weight.is_finite() || entry.weight < 0.0)
        {
            return Err(ConfigError::InvalidLootWeight {
                kind: bad.kind,
                weight: bad.weight,
            });
        }

        let sum: f32 = entries.iter().map(|entry| entry.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::LootWeightSum { sum });
        }

        Ok(Self::from_validated(entries))
    }

    fn from_validated(entries: Vec<LootEntry>) -> Self {
        let cumulative = entries
            .iter()
            .scan(0.0_f32, |total, entry| {
                *total += entry.weight;
                Some(*total)
            })
            .collect();
        Self {
            entries,
            cumulative,
        }
    }

    /// Draws one pickup kind.
    ///
    /// Rolls a uniform value in `[0, total)` and picks the first entry whose
    /// running total exceeds it, so zero-weight entries are never chosen.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> PickupKind {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let roll = rng.gen::<f32>() * total;
        let index = self
            .cumulative
            .partition_point(|&running| running <= roll)
            .min(self.entries.len() - 1);
        self.entries[index].kind
    }

    /// Returns the entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[LootEntry] {
        &self.entries
    }

    /// Total weight assigned to `kind`.
    #[must_use]
    pub fn weight_of(&self, kind: PickupKind) -> f32 {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.weight)
            .sum()
    }
}

impl Default for LootTable {
    /// Arrows 60%, coin 30%, health bottle 10%.
    fn default() -> Self {
        Self::from_validated(vec![
            LootEntry::new(PickupKind::Ammunition, 0.6),
            LootEntry::new(PickupKind::Currency, 0.3),
            LootEntry::new(PickupKind::HealConsumable, 0.1),
        ])
    }
}

impl TryFrom<Vec<LootEntry>> for LootTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<LootEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<LootTable> for Vec<LootEntry> {
    fn from(table: LootTable) -> Self {
        table.entries
    }
}

/// Amount granted by collecting one pickup of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupYields {
    /// Arrows per arrow bundle.
    pub ammunition: u32,
    /// Coins per coin.
    pub currency: u32,
    /// Bottles per bottle.
    pub heal_consumables: u32,
    /// Keys per key.
    pub keys: u32,
}

impl PickupYields {
    /// Yield for `kind`.
    #[must_use]
    pub const fn amount(&self, kind: PickupKind) -> u32 {
        match kind {
            PickupKind::Ammunition => self.ammunition,
            PickupKind::Currency => self.currency,
            PickupKind::HealConsumable => self.heal_consumables,
            PickupKind::Key => self.keys,
        }
    }
}

impl Default for PickupYields {
    fn default() -> Self {
        Self {
            ammunition: 5,
            currency: 1,
            heal_consumables: 1,
            keys: 1,
        }
    }
}
