//! Per-frame corruption search.
//!
//! For one RNG frame this derives the starter's PID and IVs, checks that the
//! Growth substructure lands in the third slot, and then looks for three Easy
//! Chat words whose write leaves the box data checksum untouched:
//!
//! - word 5 overwrites the species (normally Mudkip, 0x011B)
//! - word 1 overwrites bytes 4-5 of the second substructure
//! - word 7 overwrites the low half of experience (normally 0x0117)
//!
//! The checksum is a plain 16-bit sum of the decrypted halfwords, so the write
//! is invisible when the three deltas add up to zero.

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::trace;

use crate::easy_chat::EasyChatCatalogue;
use crate::lcg::{advance, Lcg};
use crate::species::GRAB_SPECIES;
use crate::substructure::{Block, SubstructureOrder};

/// Species halfword the corrupted word replaces (Mudkip).
pub const FIFTH_WORD_EXISTING: u16 = 0x011B;
/// Low half of experience at this point of the game.
pub const SEVENTH_WORD_EXISTING: u16 = 0x0117;
/// Move 3 when the Attacks block is second.
pub const ATTACKS_WORD_EXISTING: u16 = 0x00BD;
/// SpAtk/SpDef EVs when the EVs block is second.
pub const EVS_WORD_EXISTING: u16 = 0x0000;

const PROGRESS_INTERVAL: u32 = 1 << 16;

/// A frame where a checksum-preserving corruption exists.
///
/// Word fields hold the indices as typed into the mail, i.e. encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RawCorruption {
    pub rng_frame: u32,
    pub word_corruption: u16,
    pub word_checksum_fix_first: u16,
    pub word_checksum_fix_second: u16,
    pub identity: u32,
    pub traits: u32,
}

/// Everything derived for one frame, filter result included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDetails {
    pub rng_frame: u32,
    pub identity: u32,
    pub traits: u32,
    pub order: SubstructureOrder,
    pub key: u16,
    /// `None` when the frame fails the substructure filter.
    pub first_word_existing: Option<u16>,
    pub corruption: Option<RawCorruption>,
}

/// Lower 16 bits of PID XOR trainer ID.
pub fn encryption_key(identity: u32, trainer_id: u16) -> u16 {
    (identity ^ trainer_id as u32) as u16
}

/// Halfword the first mail word overwrites, given the block in slot 1.
///
/// Panics if Growth is in slot 1; callers only get here after the
/// Growth-third filter.
pub fn first_word_existing(order: &SubstructureOrder, traits: u32) -> u16 {
    match order.block_at(1) {
        Some(Block::Attacks) => ATTACKS_WORD_EXISTING,
        Some(Block::Evs) => EVS_WORD_EXISTING,
        // first 16 bits of the IV word
        Some(Block::Misc) => (traits & 0xFFFF) as u16,
        Some(Block::Growth) | None => {
            unreachable!("order {} has growth second after the growth-third filter", order)
        }
    }
}

/// Checksum change caused by writing the three decrypted words.
pub fn checksum_delta(word_corruption: u16, fix_first: u16, fix_second: u16, first_existing: u16) -> u16 {
    word_corruption
        .wrapping_sub(FIFTH_WORD_EXISTING)
        .wrapping_add(fix_first.wrapping_sub(first_existing))
        .wrapping_add(fix_second.wrapping_sub(SEVENTH_WORD_EXISTING))
}

/// PID from the next two outputs, low half first.
fn roll_identity(lcg: &mut Lcg) -> u32 {
    let low = lcg.next_u16() as u32;
    let high = lcg.next_u16() as u32;
    low | (high << 16)
}

/// IVs from the next two outputs, 15 bits each.
fn roll_traits(lcg: &mut Lcg) -> u32 {
    let low = lcg.next_u16() as u32 & 0x7FFF;
    let high = lcg.next_u16() as u32 & 0x7FFF;
    low | (high << 15)
}

/// Evaluates frames for a single trainer ID.
#[derive(Debug, Clone, Copy)]
pub struct FrameEvaluator<'c> {
    trainer_id: u16,
    catalogue: &'c EasyChatCatalogue,
    grab_species: &'c [u16],
}

impl FrameEvaluator<'static> {
    /// Evaluator over the bundled Emerald catalogue.
    pub fn new(trainer_id: u16) -> Self {
        Self::with_catalogue(trainer_id, EasyChatCatalogue::emerald(), &GRAB_SPECIES)
    }
}

impl<'c> FrameEvaluator<'c> {
    pub fn with_catalogue(
        trainer_id: u16,
        catalogue: &'c EasyChatCatalogue,
        grab_species: &'c [u16],
    ) -> Self {
        Self {
            trainer_id,
            catalogue,
            grab_species,
        }
    }

    pub fn trainer_id(&self) -> u16 {
        self.trainer_id
    }

    /// Evaluate `rng_frame` whose generator state is `state`.
    pub fn evaluate(&self, rng_frame: u32, state: u32) -> Option<RawCorruption> {
        let mut lcg = Lcg::new(state);
        let identity = roll_identity(&mut lcg);

        let order = SubstructureOrder::from_identity(identity);
        if !order.growth_is_third() {
            return None;
        }

        let traits = roll_traits(&mut lcg);
        self.search_words(rng_frame, identity, traits, &order)
    }

    /// Full derivation for one frame, walking the generator from boot.
    pub fn inspect(&self, rng_frame: u32) -> FrameDetails {
        let state = crate::lcg::state_at_frame(rng_frame);
        let mut lcg = Lcg::new(state);
        let identity = roll_identity(&mut lcg);
        let traits = roll_traits(&mut lcg);
        let order = SubstructureOrder::from_identity(identity);

        let (first_word_existing, corruption) = if order.growth_is_third() {
            (
                Some(first_word_existing(&order, traits)),
                self.search_words(rng_frame, identity, traits, &order),
            )
        } else {
            (None, None)
        };

        FrameDetails {
            rng_frame,
            identity,
            traits,
            order,
            key: encryption_key(identity, self.trainer_id),
            first_word_existing,
            corruption,
        }
    }

    /// Evaluate every frame in `start..=end`, calling `on_match` per hit.
    ///
    /// The generator is walked from the boot seed up to `start` first.
    /// Returns the number of hits.
    pub fn scan<F>(&self, start: u32, end: u32, progress: Option<&ProgressBar>, mut on_match: F) -> u64
    where
        F: FnMut(RawCorruption),
    {
        if start > end {
            return 0;
        }

        let mut state = crate::lcg::state_at_frame(start);
        let mut hits = 0u64;
        let mut last_progress = start;

        for rng_frame in start..=end {
            if let Some(found) = self.evaluate(rng_frame, state) {
                trace!(rng_frame, identity = found.identity, "checksum-preserving corruption");
                on_match(found);
                hits += 1;
            }
            state = advance(state).0;

            if let Some(pb) = progress {
                if rng_frame - last_progress >= PROGRESS_INTERVAL {
                    pb.inc((rng_frame - last_progress) as u64);
                    last_progress = rng_frame;
                }
            }
        }

        if let Some(pb) = progress {
            pb.inc((end - last_progress) as u64 + 1);
        }

        hits
    }

    fn search_words(
        &self,
        rng_frame: u32,
        identity: u32,
        traits: u32,
        order: &SubstructureOrder,
    ) -> Option<RawCorruption> {
        let key = encryption_key(identity, self.trainer_id);
        let first_existing = first_word_existing(order, traits);

        let (w1, w2, w3) = self.find_checksum_fix(key, first_existing)?;
        Some(RawCorruption {
            rng_frame,
            word_corruption: w1 ^ key,
            word_checksum_fix_first: w2 ^ key,
            word_checksum_fix_second: w3 ^ key,
            identity,
            traits,
        })
    }

    /// First decrypted triple in catalogue order (w1, then w2, then w3) that
    /// cancels out, where w1 must decrypt to a grab species.
    ///
    /// For fixed w1 and w2 only one w3 value works, so the innermost loop is
    /// a membership test on its encrypted form.
    fn find_checksum_fix(&self, key: u16, first_existing: u16) -> Option<(u16, u16, u16)> {
        let words = self.catalogue.words();

        for w1 in words.iter().map(|w| w.index ^ key) {
            if !self.grab_species.contains(&w1) {
                continue;
            }

            let target = FIFTH_WORD_EXISTING
                .wrapping_add(first_existing)
                .wrapping_add(SEVENTH_WORD_EXISTING)
                .wrapping_sub(w1);

            for w2 in words.iter().map(|w| w.index ^ key) {
                let w3 = target.wrapping_sub(w2);
                if self.catalogue.contains(w3 ^ key) {
                    return Some((w1, w2, w3));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcg::state_at_frame;

    /// Literal nested search over the decrypted catalogue.
    fn nested_search(catalogue: &EasyChatCatalogue, key: u16, first: u16) -> Option<(u16, u16, u16)> {
        let decrypted: Vec<u16> = catalogue.words().iter().map(|w| w.index ^ key).collect();
        for &w1 in &decrypted {
            for &grab in GRAB_SPECIES.iter() {
                if w1 != grab {
                    continue;
                }
                for &w2 in &decrypted {
                    for &w3 in &decrypted {
                        if checksum_delta(w1, w2, w3, first) == 0 {
                            return Some((w1, w2, w3));
                        }
                    }
                }
            }
        }
        None
    }

    fn collect(evaluator: &FrameEvaluator<'_>, start: u32, end: u32) -> Vec<RawCorruption> {
        let mut out = Vec::new();
        evaluator.scan(start, end, None, |c| out.push(c));
        out
    }

    #[test]
    fn test_frame_zero_trainer_zero() {
        let evaluator = FrameEvaluator::new(0);
        let details = evaluator.inspect(0);

        assert_eq!(details.identity, 0xE97E_0000);
        assert_eq!(details.traits, 0x18D8_5271);
        assert_eq!(details.order.label(), "AEGM");
        assert_eq!(details.key, 0x0000);
        // EVs block second
        assert_eq!(details.first_word_existing, Some(0x0000));
        assert_eq!(details.corruption, None);
        assert_eq!(evaluator.evaluate(0, 0), None);
    }

    #[test]
    fn test_filtered_frame() {
        // AEMG: growth last
        let details = FrameEvaluator::new(0).inspect(2);
        assert_eq!(details.identity, 0x31B0_5271);
        assert_eq!(details.order.label(), "AEMG");
        assert_eq!(details.first_word_existing, None);
        assert_eq!(details.corruption, None);
    }

    #[test]
    fn test_known_hit() {
        let evaluator = FrameEvaluator::new(12345);
        let found = evaluator.evaluate(796, state_at_frame(796)).unwrap();
        assert_eq!(
            found,
            RawCorruption {
                rng_frame: 796,
                word_corruption: 0x1C16,
                word_checksum_fix_first: 0x042D,
                word_checksum_fix_second: 0x1A35,
                identity: 0xA5DE_2D3A,
                traits: 0x3183_1F47,
            }
        );

        let details = evaluator.inspect(796);
        assert_eq!(details.order.label(), "AMGE");
        assert_eq!(details.key, 0x1D03);
        // Misc second: low half of the IVs
        assert_eq!(details.first_word_existing, Some(0x1F47));
        assert_eq!(details.corruption, Some(found));
    }

    #[test]
    fn test_scan_trainer_12345() {
        let frames: Vec<u32> = collect(&FrameEvaluator::new(12345), 0, 20_000)
            .iter()
            .map(|c| c.rng_frame)
            .collect();
        assert_eq!(frames, vec![796, 2295, 5606, 10066]);
    }

    #[test]
    fn test_scan_trainer_zero() {
        let found = collect(&FrameEvaluator::new(0), 0, 20_000);
        let frames: Vec<u32> = found.iter().map(|c| c.rng_frame).collect();
        assert_eq!(frames, vec![5848, 7433, 11631, 18311]);

        // key 0x0720: the corruption word decrypts to Zigzagoon
        let hit = found[1];
        assert_eq!(hit.word_corruption, 0x0600);
        assert_eq!(hit.word_checksum_fix_first, 0x0120);
        assert_eq!(hit.word_checksum_fix_second, 0x1034);
    }

    #[test]
    fn test_scan_mid_range_start() {
        let frames: Vec<u32> = collect(&FrameEvaluator::new(12345), 5_000, 11_000)
            .iter()
            .map(|c| c.rng_frame)
            .collect();
        assert_eq!(frames, vec![5606, 10066]);
    }

    #[test]
    fn test_scan_empty_and_single() {
        let evaluator = FrameEvaluator::new(12345);
        assert!(collect(&evaluator, 10, 9).is_empty());
        assert_eq!(collect(&evaluator, 796, 796).len(), 1);
        assert!(collect(&evaluator, 797, 797).is_empty());
    }

    #[test]
    fn test_candidates_respect_filter_and_checksum() {
        let catalogue = EasyChatCatalogue::emerald();
        for tid in [0u16, 1, 12345, 54321, 0xFFFF] {
            for c in collect(&FrameEvaluator::new(tid), 0, 30_000) {
                let order = SubstructureOrder::from_identity(c.identity);
                assert!(order.growth_is_third(), "frame {}", c.rng_frame);

                let key = encryption_key(c.identity, tid);
                let first = first_word_existing(&order, c.traits);
                let w1 = c.word_corruption ^ key;
                assert!(GRAB_SPECIES.contains(&w1));
                assert_eq!(
                    checksum_delta(w1, c.word_checksum_fix_first ^ key, c.word_checksum_fix_second ^ key, first),
                    0
                );

                for word in [c.word_corruption, c.word_checksum_fix_first, c.word_checksum_fix_second] {
                    assert!(catalogue.contains(word));
                }
            }
        }
    }

    #[test]
    fn test_fast_search_matches_nested_loops() {
        let catalogue = EasyChatCatalogue::emerald();
        let evaluator = FrameEvaluator::new(0);
        // keys chosen so that a grab species shows up among the decrypted words
        let keys = [0x0000u16, 0x0720, 0x1D03, 0x212B, 0x0B0B, 0x0317];
        for key in keys {
            for first in [ATTACKS_WORD_EXISTING, EVS_WORD_EXISTING, 0x1F47, 0x6B96] {
                assert_eq!(
                    evaluator.find_checksum_fix(key, first),
                    nested_search(catalogue, key, first),
                    "key {:#06x} first {:#06x}",
                    key,
                    first
                );
            }
        }
    }

    #[test]
    fn test_first_word_existing_per_block() {
        let traits = 0xABCD_1234;
        // AMGE: misc second
        assert_eq!(first_word_existing(&SubstructureOrder::from_identity(10), traits), 0x1234);
        // EAGM: attacks second
        assert_eq!(first_word_existing(&SubstructureOrder::from_identity(14), traits), 0x00BD);
        // AEGM: evs second
        assert_eq!(first_word_existing(&SubstructureOrder::from_identity(8), traits), 0x0000);
    }

    #[test]
    #[should_panic]
    fn test_growth_second_is_contract_violation() {
        // AGEM
        first_word_existing(&SubstructureOrder::from_identity(6), 0);
    }

    #[test]
    fn test_checksum_delta_wraps() {
        assert_eq!(checksum_delta(FIFTH_WORD_EXISTING, 0, SEVENTH_WORD_EXISTING, 0), 0);
        assert_eq!(checksum_delta(0, 0, 0, 0), 0u16.wrapping_sub(0x011B + 0x0117));
    }

    #[test]
    fn test_encryption_key_truncates() {
        assert_eq!(encryption_key(0xA5DE_2D3A, 12345), 0x1D03);
        assert_eq!(encryption_key(0xFFFF_0000, 0xFFFF), 0xFFFF);
    }
}
