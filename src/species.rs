//! Species numbers and stat data used by the setup.
//!
//! Numbers are the game's internal species indices (Hoenn species start at
//! 277), not National Dex numbers.

pub const TREECKO: u16 = 277;
pub const TORCHIC: u16 = 280;
pub const MUDKIP: u16 = 283;
pub const POOCHYENA: u16 = 286;
pub const ZIGZAGOON: u16 = 288;

/// Species the corrupted word may turn the starter into. Only the rival's
/// starter and the two route 101/103 encounters are seen by this point.
pub const GRAB_SPECIES: [u16; 3] = [TREECKO, POOCHYENA, ZIGZAGOON];

/// The starter whose box data gets corrupted.
pub const STARTER: u16 = MUDKIP;
pub const STARTER_LEVEL: u32 = 5;

/// Mudkip base stats in game order: HP, Atk, Def, Spd, SpAtk, SpDef.
pub const STARTER_BASE_STATS: [u32; 6] = [50, 70, 50, 40, 50, 50];
