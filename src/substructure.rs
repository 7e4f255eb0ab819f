//! Box data substructure ordering.
//!
//! A stored Pokémon carries four 12-byte substructures (Growth, Attacks,
//! EVs/Condition, Misc) whose order in memory is picked by `PID % 24`.

use std::fmt;

/// One of the four data blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Growth,
    Attacks,
    Evs,
    Misc,
}

impl Block {
    pub const ALL: [Block; 4] = [Block::Growth, Block::Attacks, Block::Evs, Block::Misc];

    /// Single-letter tag used in order labels.
    pub fn letter(&self) -> char {
        match self {
            Block::Growth => 'G',
            Block::Attacks => 'A',
            Block::Evs => 'E',
            Block::Misc => 'M',
        }
    }
}

/// Slot assigned to each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubstructureOrder {
    pub growth: u8,
    pub attacks: u8,
    pub evs: u8,
    pub misc: u8,
}

const fn order(growth: u8, attacks: u8, evs: u8, misc: u8) -> SubstructureOrder {
    SubstructureOrder { growth, attacks, evs, misc }
}

// Indexed by PID % 24. Grouped by the block in slot 0 (G, A, E, M), then by
// the block in slot 1, with both orders of the last pair.
//                          G  A  E  M
const ORDER_TABLE: [SubstructureOrder; 24] = [
    order(0, 1, 2, 3), // GAEM
    order(0, 1, 3, 2), // GAME
    order(0, 2, 1, 3), // GEAM
    order(0, 3, 1, 2), // GEMA
    order(0, 2, 3, 1), // GMAE
    order(0, 3, 2, 1), // GMEA
    order(1, 0, 2, 3), // AGEM
    order(1, 0, 3, 2), // AGME
    order(2, 0, 1, 3), // AEGM
    order(3, 0, 1, 2), // AEMG
    order(2, 0, 3, 1), // AMGE
    order(3, 0, 2, 1), // AMEG
    order(1, 2, 0, 3), // EGAM
    order(1, 3, 0, 2), // EGMA
    order(2, 1, 0, 3), // EAGM
    order(3, 1, 0, 2), // EAMG
    order(2, 3, 0, 1), // EMGA
    order(3, 2, 0, 1), // EMAG
    order(1, 2, 3, 0), // MGAE
    order(1, 3, 2, 0), // MGEA
    order(2, 1, 3, 0), // MAGE
    order(3, 1, 2, 0), // MAEG
    order(2, 3, 1, 0), // MEGA
    order(3, 2, 1, 0), // MEAG
];

impl SubstructureOrder {
    /// Resolve the order for a PID.
    pub fn from_identity(identity: u32) -> Self {
        ORDER_TABLE[(identity % 24) as usize]
    }

    pub fn slot_of(&self, block: Block) -> u8 {
        match block {
            Block::Growth => self.growth,
            Block::Attacks => self.attacks,
            Block::Evs => self.evs,
            Block::Misc => self.misc,
        }
    }

    /// Block stored in `slot` (0..=3).
    pub fn block_at(&self, slot: u8) -> Option<Block> {
        Block::ALL.into_iter().find(|&b| self.slot_of(b) == slot)
    }

    /// Growth sits third, which is what lets mail words reach the species field.
    pub fn growth_is_third(&self) -> bool {
        self.growth == 2
    }

    /// Four-letter label, slot 0 first (e.g. "AEGM").
    pub fn label(&self) -> String {
        let mut slots = [' '; 4];
        for block in Block::ALL {
            slots[self.slot_of(block) as usize] = block.letter();
        }
        slots.iter().collect()
    }
}

impl fmt::Display for SubstructureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
