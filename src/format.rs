//! Turn raw corruptions into display rows.

use serde::Serialize;

use crate::easy_chat::EasyChatCatalogue;
use crate::evaluate::{FrameDetails, RawCorruption};
use crate::species::{STARTER_BASE_STATS, STARTER_LEVEL};

pub const NATURE_COUNT: u32 = 25;

/// Nature names with their stat effect, indexed by `PID % 25`.
pub const NATURES: [&str; 25] = [
    "Hardy (Neutral)",
    "Lonely (Atk+/Def-)",
    "Brave (Atk+/Spd-)",
    "Adamant (Atk+/SpAtk-)",
    "Naughty (Atk+/SpDef-)",
    "Bold (Def+/Atk-)",
    "Docile (Neutral)",
    "Relaxed (Def+/Spd-)",
    "Impish (Def+/SpAtk-)",
    "Lax (Def+/SpDef-)",
    "Timid (Spd+/Atk-)",
    "Hasty (Spd+/Def-)",
    "Serious (Neutral)",
    "Jolly (Spd+/SpAtk-)",
    "Naive (Spd+/SpDef-)",
    "Modest (SpAtk+/Atk-)",
    "Mild (SpAtk+/Def-)",
    "Quiet (SpAtk+/Spd-)",
    "Bashful (Neutral)",
    "Rash (SpAtk+/SpDef-)",
    "Calm (SpDef+/Atk-)",
    "Gentle (SpDef+/Def-)",
    "Sassy (SpDef+/Spd-)",
    "Careful (SpDef+/SpAtk-)",
    "Quirky (Neutral)",
];

/// Stats in IV/game order. HP is index 0; the rest line up with nature
/// effect indices shifted by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Hp = 0,
    Attack = 1,
    Defense = 2,
    Speed = 3,
    SpAttack = 4,
    SpDefense = 5,
}

impl Stat {
    /// Game order, which is also the order of the 5-bit IV fields.
    pub const GAME_ORDER: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::Speed,
        Stat::SpAttack,
        Stat::SpDefense,
    ];

    /// Order used in the stat line: hp/atk/def/spAtk/spDef/spd.
    pub const DISPLAY_ORDER: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpAttack,
        Stat::SpDefense,
        Stat::Speed,
    ];

    /// Bit offset of this stat's IV inside the packed IV word.
    pub fn iv_shift(self) -> u32 {
        self as u32 * 5
    }
}

/// A sorted, readable corruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub rng_frame: u32,
    pub word_corruption: &'static str,
    pub word_checksum_fix_first: &'static str,
    pub word_checksum_fix_second: &'static str,
    pub nature: &'static str,
    pub stats: String,
}

pub fn nature_index(identity: u32) -> u32 {
    identity % NATURE_COUNT
}

pub fn nature_label(identity: u32) -> &'static str {
    NATURES[nature_index(identity) as usize]
}

pub fn iv(traits: u32, stat: Stat) -> u32 {
    (traits >> stat.iv_shift()) & 0x1F
}

/// Level 5 stat for the starter with nature applied.
pub fn stat_value(traits: u32, nature: u32, stat: Stat) -> u32 {
    let base = STARTER_BASE_STATS[stat as usize];
    let scaled = (2 * base + iv(traits, stat)) * STARTER_LEVEL / 100;

    if stat == Stat::Hp {
        return scaled + STARTER_LEVEL + 10;
    }

    let value = scaled + 5;
    let raised = nature / 5;
    let lowered = nature % 5;
    if raised == lowered {
        return value;
    }

    let effect_index = stat as u32 - 1;
    if raised == effect_index {
        value * 110 / 100
    } else if lowered == effect_index {
        value * 90 / 100
    } else {
        value
    }
}

/// "hp/atk/def/spAtk/spDef/spd"
pub fn stat_line(traits: u32, identity: u32) -> String {
    let nature = nature_index(identity);
    Stat::DISPLAY_ORDER
        .iter()
        .map(|&s| stat_value(traits, nature, s).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn word_label(catalogue: &EasyChatCatalogue, index: u16) -> &'static str {
    catalogue
        .label(index)
        .unwrap_or_else(|| panic!("word index {:#06x} is not in the catalogue", index))
}

/// Build one display row.
pub fn display_row(catalogue: &EasyChatCatalogue, raw: &RawCorruption) -> DisplayRow {
    DisplayRow {
        rng_frame: raw.rng_frame,
        word_corruption: word_label(catalogue, raw.word_corruption),
        word_checksum_fix_first: word_label(catalogue, raw.word_checksum_fix_first),
        word_checksum_fix_second: word_label(catalogue, raw.word_checksum_fix_second),
        nature: nature_label(raw.identity),
        stats: stat_line(raw.traits, raw.identity),
    }
}

/// Sort by frame and format every corruption.
pub fn format_corruptions(catalogue: &EasyChatCatalogue, mut raw: Vec<RawCorruption>) -> Vec<DisplayRow> {
    raw.sort_by_key(|c| c.rng_frame);
    raw.iter().map(|c| display_row(catalogue, c)).collect()
}

/// Readable derivation of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub rng_frame: u32,
    pub identity: u32,
    pub traits: u32,
    pub order: String,
    pub key: u16,
    pub nature: &'static str,
    pub stats: String,
    pub passes_filter: bool,
    pub first_word_existing: Option<u16>,
    pub corruption: Option<DisplayRow>,
}

pub fn frame_report(catalogue: &EasyChatCatalogue, details: &FrameDetails) -> FrameReport {
    FrameReport {
        rng_frame: details.rng_frame,
        identity: details.identity,
        traits: details.traits,
        order: details.order.label(),
        key: details.key,
        nature: nature_label(details.identity),
        stats: stat_line(details.traits, details.identity),
        passes_filter: details.order.growth_is_third(),
        first_word_existing: details.first_word_existing,
        corruption: details.corruption.as_ref().map(|c| display_row(catalogue, c)),
    }
}

/// Status line for a finished search.
pub fn computed_message(count: usize) -> String {
    format!("Computed {} corruptions", count)
}
