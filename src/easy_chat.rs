//! Easy Chat word catalogue.
//!
//! Every Easy Chat word is a 16-bit index `(group << 9) | position`. For the
//! Pokémon group the position is the species number itself. Mail stores these
//! indices verbatim, so once mail words land inside box data they are read
//! back through the PID/OT XOR key.
//!
//! The bundled table lists what can be typed at the point in the game the
//! setup is done: all always-unlocked groups plus the species seen so far.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Bits reserved for the in-group position.
pub const GROUP_SHIFT: u32 = 9;

static EMERALD: LazyLock<EasyChatCatalogue> = LazyLock::new(|| {
    EasyChatCatalogue::parse(include_str!("data/easy_chat_emerald.txt"))
        .unwrap_or_else(|e| panic!("bundled easy chat table is malformed: {}", e))
});

/// Build a word index from group and position.
pub fn word_index(group: u16, position: u16) -> u16 {
    (group << GROUP_SHIFT) | position
}

/// One enterable word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EasyChatWord {
    pub index: u16,
    pub label: &'static str,
}

impl EasyChatWord {
    pub fn group(&self) -> u16 {
        self.index >> GROUP_SHIFT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueError {
    /// Word line before any `@ <group> <NAME>` header
    MissingGroup(usize),
    /// Header line that does not parse
    InvalidHeader(usize),
    /// Pokémon group line without a leading species number
    InvalidSpecies(usize),
    /// Group holds more positions than fit in 9 bits
    GroupOverflow { group: u16, line: usize },
    /// Same word index listed twice
    Duplicate { index: u16, line: usize },
}

impl fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogueError::MissingGroup(line) => write!(f, "line {}: word outside of a group", line),
            CatalogueError::InvalidHeader(line) => write!(f, "line {}: invalid group header", line),
            CatalogueError::InvalidSpecies(line) => write!(f, "line {}: invalid species entry", line),
            CatalogueError::GroupOverflow { group, line } => {
                write!(f, "line {}: group {} has too many words", line, group)
            }
            CatalogueError::Duplicate { index, line } => {
                write!(f, "line {}: duplicate word index {:#06x}", line, index)
            }
        }
    }
}

impl std::error::Error for CatalogueError {}

/// Ordered set of enterable words.
///
/// Iteration order is file order, which is the order the corruption search
/// walks the words in.
pub struct EasyChatCatalogue {
    words: Vec<EasyChatWord>,
    positions: HashMap<u16, usize>,
    present: Box<[u64; 1024]>,
}

impl EasyChatCatalogue {
    /// The catalogue shipped with the crate.
    pub fn emerald() -> &'static EasyChatCatalogue {
        &EMERALD
    }

    /// Parse the bundled text format.
    ///
    /// `@ <group> <NAME>` starts a group. Inside group 0 each line is
    /// `<species> <LABEL>`; in every other group the line is the label and
    /// the position counts up from zero.
    pub fn parse(text: &'static str) -> Result<Self, CatalogueError> {
        let mut words = Vec::new();
        let mut group: Option<u16> = None;
        let mut position: u16 = 0;

        for (n, raw) in text.lines().enumerate() {
            let line_no = n + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('@') {
                let id = header
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse::<u16>().ok())
                    .filter(|&g| g < (1 << (16 - GROUP_SHIFT)))
                    .ok_or(CatalogueError::InvalidHeader(line_no))?;
                group = Some(id);
                position = 0;
                continue;
            }

            let g = group.ok_or(CatalogueError::MissingGroup(line_no))?;
            let (pos, label) = if g == 0 {
                let (species, label) = line
                    .split_once(' ')
                    .ok_or(CatalogueError::InvalidSpecies(line_no))?;
                let species = species
                    .parse::<u16>()
                    .map_err(|_| CatalogueError::InvalidSpecies(line_no))?;
                (species, label.trim())
            } else {
                let pos = position;
                position += 1;
                (pos, line)
            };

            if pos >= (1 << GROUP_SHIFT) {
                return Err(CatalogueError::GroupOverflow { group: g, line: line_no });
            }

            words.push((line_no, EasyChatWord { index: word_index(g, pos), label }));
        }

        let mut positions = HashMap::with_capacity(words.len());
        let mut present = Box::new([0u64; 1024]);
        let mut ordered = Vec::with_capacity(words.len());
        for (line_no, word) in words {
            if positions.insert(word.index, ordered.len()).is_some() {
                return Err(CatalogueError::Duplicate { index: word.index, line: line_no });
            }
            present[(word.index >> 6) as usize] |= 1u64 << (word.index & 63);
            ordered.push(word);
        }

        Ok(Self {
            words: ordered,
            positions,
            present,
        })
    }

    pub fn words(&self) -> &[EasyChatWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `index` can be typed.
    #[inline]
    pub fn contains(&self, index: u16) -> bool {
        self.present[(index >> 6) as usize] & (1u64 << (index & 63)) != 0
    }

    pub fn get(&self, index: u16) -> Option<&EasyChatWord> {
        self.positions.get(&index).map(|&i| &self.words[i])
    }

    pub fn label(&self, index: u16) -> Option<&'static str> {
        self.get(index).map(|w| w.label)
    }
}

impl fmt::Debug for EasyChatCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasyChatCatalogue")
            .field("words", &self.words.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species;

    #[test]
    fn test_emerald_loads() {
        let catalogue = EasyChatCatalogue::emerald();
        assert_eq!(catalogue.len(), 901);
        assert!(!catalogue.is_empty());
    }

    #[test]
    fn test_known_words() {
        let catalogue = EasyChatCatalogue::emerald();
        assert_eq!(catalogue.label(0x0200), Some("I CHOOSE YOU"));
        assert_eq!(catalogue.label(0x021A), Some("EMERALD"));
        assert_eq!(catalogue.label(0x1C16), Some("SOON"));
        assert_eq!(catalogue.label(0x042D), Some("VITAL SPIRIT"));
        assert_eq!(catalogue.label(0x1A35), Some("LOOK"));
        assert_eq!(catalogue.label(species::MUDKIP), Some("MUDKIP"));
        assert_eq!(catalogue.label(0x0000), None);
    }

    #[test]
    fn test_seen_species_are_enterable() {
        let catalogue = EasyChatCatalogue::emerald();
        for sp in [species::TREECKO, species::MUDKIP, species::POOCHYENA, species::ZIGZAGOON] {
            assert!(catalogue.contains(sp));
            assert_eq!(catalogue.get(sp).map(|w| w.group()), Some(0));
        }
        assert!(!catalogue.contains(species::TORCHIC));
    }

    #[test]
    fn test_contains_agrees_with_get() {
        let catalogue = EasyChatCatalogue::emerald();
        for index in 0..=u16::MAX {
            assert_eq!(catalogue.contains(index), catalogue.get(index).is_some());
        }
    }

    #[test]
    fn test_locked_groups_absent() {
        let catalogue = EasyChatCatalogue::emerald();
        // Events (17) onwards are locked until later in the game
        assert!(catalogue.words().iter().all(|w| w.group() <= 16));
    }

    #[test]
    fn test_file_order_preserved() {
        let catalogue = EasyChatCatalogue::parse("@ 2 STATUS\nB\nA\n@ 0 POKEMON\n5 FIVE\n").unwrap();
        let indices: Vec<u16> = catalogue.words().iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0x0400, 0x0401, 0x0005]);
        assert_eq!(catalogue.label(0x0401), Some("A"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            EasyChatCatalogue::parse("WORD\n").unwrap_err(),
            CatalogueError::MissingGroup(1)
        );
        assert_eq!(
            EasyChatCatalogue::parse("@ x\n").unwrap_err(),
            CatalogueError::InvalidHeader(1)
        );
        assert_eq!(
            EasyChatCatalogue::parse("@ 200 TOO BIG\n").unwrap_err(),
            CatalogueError::InvalidHeader(1)
        );
        assert_eq!(
            EasyChatCatalogue::parse("@ 0 POKEMON\nMUDKIP\n").unwrap_err(),
            CatalogueError::InvalidSpecies(2)
        );
        assert_eq!(
            EasyChatCatalogue::parse("@ 0 POKEMON\n1 A\n1 B\n").unwrap_err(),
            CatalogueError::Duplicate { index: 1, line: 3 }
        );
        assert_eq!(
            EasyChatCatalogue::parse("@ 0 POKEMON\n512 A\n").unwrap_err(),
            CatalogueError::GroupOverflow { group: 0, line: 2 }
        );
    }
}
