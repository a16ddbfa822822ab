//! Cell contents and their gameplay effects
//!
//! Stateless catalog: every grid cell holds exactly one `Item`.

use serde::{Deserialize, Serialize};

use super::effects::EffectKind;

/// Content of one lane grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Item {
    #[default]
    Empty,
    Obstacle,
    Coin,
    /// Doubles coin value for a while
    ScoreGem,
    /// Speeds the camera up for a while
    SpeedGem,
    /// One-shot score award
    BonusGem,
    /// Swaps left/right for a while
    ReversedGem,
    /// Edge of the playable width; never a hazard, never a pickup
    Border,
}

/// What happens when the character enters a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    None,
    Lose,
    Coin,
    Gem(EffectKind),
}

impl Item {
    /// Interior items the slice generator draws from, in weight order
    pub const INTERIOR: [Item; 7] = [
        Item::Empty,
        Item::Obstacle,
        Item::Coin,
        Item::ScoreGem,
        Item::SpeedGem,
        Item::BonusGem,
        Item::ReversedGem,
    ];

    pub fn effect(self) -> ItemEffect {
        match self {
            Item::Empty | Item::Border => ItemEffect::None,
            Item::Obstacle => ItemEffect::Lose,
            Item::Coin => ItemEffect::Coin,
            Item::ScoreGem => ItemEffect::Gem(EffectKind::ScoreMultiplier),
            Item::SpeedGem => ItemEffect::Gem(EffectKind::SpeedMultiplier),
            Item::BonusGem => ItemEffect::Gem(EffectKind::BonusScore),
            Item::ReversedGem => ItemEffect::Gem(EffectKind::ReversedControls),
        }
    }

    /// Coins and gems
    pub fn is_pickup(self) -> bool {
        matches!(self.effect(), ItemEffect::Coin | ItemEffect::Gem(_))
    }

    pub fn is_gem(self) -> bool {
        matches!(self.effect(), ItemEffect::Gem(_))
    }

    /// Anything the character can run through without losing
    pub fn is_passable(self) -> bool {
        self != Item::Obstacle
    }
}
