//! Merchant trading and door unlocking.
//!
//! Both are player-initiated and share the player's interaction cooldown. A
//! trade either debits exactly the cost and credits exactly the effect, or
//! changes nothing; the same holds for spending a key on a door.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::player::Player;

/// What buying an offer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeEffect {
    /// Adds arrows.
    Ammunition(u32),
    /// Adds health bottles.
    HealConsumable(u32),
    /// Leaves the dialogue; never charged.
    Exit,
}

/// One entry in a merchant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Menu text.
    pub label: String,
    /// Price in coins.
    pub cost: u32,
    /// What the player receives.
    pub effect: TradeEffect,
}

impl TradeOffer {
    /// Creates a purchasable offer.
    #[must_use]
    pub fn new(label: impl Into<String>, cost: u32, effect: TradeEffect) -> Self {
        Self {
            label: label.into(),
            cost,
            effect,
        }
    }

    /// Creates the free entry that closes the dialogue.
    #[must_use]
    pub fn exit(label: impl Into<String>) -> Self {
        Self::new(label, 0, TradeEffect::Exit)
    }

    /// Returns `true` for the closing entry.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self.effect, TradeEffect::Exit)
    }
}

/// The stock menu every merchant carries unless configured otherwise.
#[must_use]
pub fn default_offers() -> Vec<TradeOffer> {
    vec![
        TradeOffer::new("Arrows (5)", 3, TradeEffect::Ammunition(5)),
        TradeOffer::new("Health bottle", 5, TradeEffect::HealConsumable(1)),
        TradeOffer::exit("Leave"),
    ]
}

/// Whether a merchant's dialogue is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MerchantState {
    /// Idle.
    #[default]
    Closed,
    /// Dialogue open.
    Open,
}

/// Cursor over a merchant's menu while a dialogue is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    /// Merchant the dialogue belongs to.
    pub merchant: EntityId,
    /// Highlighted menu index.
    pub cursor: usize,
}

impl DialogueState {
    /// Opens a dialogue with the cursor on the first entry.
    #[must_use]
    pub const fn new(merchant: EntityId) -> Self {
        Self {
            merchant,
            cursor: 0,
        }
    }

    /// Moves the cursor up, wrapping from the first entry to the last.
    pub fn cursor_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + len - 1) % len;
    }

    /// Moves the cursor down, wrapping from the last entry to the first.
    pub fn cursor_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }
}

/// Result of confirming a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    /// Coins were debited and the effect credited.
    Purchased {
        /// Coins spent.
        cost: u32,
        /// Effect applied.
        effect: TradeEffect,
    },
    /// Not enough coins; nothing changed.
    Rejected {
        /// Price asked.
        cost: u32,
        /// Coins the player had.
        currency: u32,
    },
    /// The exit entry was chosen.
    Exit,
}

/// Applies `offer` to `player` atomically.
///
/// # Example
///
/// ```
/// use delve_core::config::PlayerConfig;
/// use delve_core::interaction::{confirm_offer, TradeEffect, TradeOffer, TradeOutcome};
/// use delve_core::player::Player;
/// use glam::Vec2;
///
/// let mut player = Player::spawn(Vec2::ZERO, 64.0, &PlayerConfig::default());
/// player.currency = 2;
///
/// let offer = TradeOffer::new("Arrows (5)", 3, TradeEffect::Ammunition(5));
/// let outcome = confirm_offer(&offer, &mut player);
///
/// assert_eq!(outcome, TradeOutcome::Rejected { cost: 3, currency: 2 });
/// assert_eq!(player.currency, 2);
/// ```
pub fn confirm_offer(offer: &TradeOffer, player: &mut Player) -> TradeOutcome {
    if offer.is_exit() {
        return TradeOutcome::Exit;
    }
    let Some(remaining) = player.currency.checked_sub(offer.cost) else {
        return TradeOutcome::Rejected {
            cost: offer.cost,
            currency: player.currency,
        };
    };

    player.currency = remaining;
    match offer.effect {
        TradeEffect::Ammunition(amount) => {
            player.ammunition = player.ammunition.saturating_add(amount);
        }
        TradeEffect::HealConsumable(amount) => {
            player.heal_consumables = player.heal_consumables.saturating_add(amount);
        }
        TradeEffect::Exit => {}
    }

    TradeOutcome::Purchased {
        cost: offer.cost,
        effect: offer.effect,
    }
}

/// Result of trying a locked door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorOutcome {
    /// One key was spent; the door should be removed.
    Unlocked,
    /// No key; nothing changed.
    Locked,
}

/// Spends one key if the player has any.
pub fn unlock_door(player: &mut Player) -> DoorOutcome {
    match player.keys.checked_sub(1) {
        Some(remaining) => {
            player.keys = remaining;
            DoorOutcome::Unlocked
        }
        None => DoorOutcome::Locked,
    }
}
