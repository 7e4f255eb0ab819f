//! Console rendering of a single frame.

use std::io::Write;

use anyhow::Result;

use crate::format::{FrameReport, Stat};

/// Write the human-readable derivation of one frame.
pub fn write_frame_report<W: Write>(w: &mut W, report: &FrameReport) -> Result<()> {
    writeln!(w, "RNG frame:  {}", report.rng_frame)?;
    writeln!(w, "PID:        {:08X}", report.identity)?;
    writeln!(w, "IVs:        {:08X}", report.traits)?;
    let ivs: Vec<String> = Stat::GAME_ORDER
        .iter()
        .map(|&s| crate::format::iv(report.traits, s).to_string())
        .collect();
    writeln!(w, "            {} (hp/atk/def/spd/spAtk/spDef)", ivs.join("/"))?;
    writeln!(w, "Nature:     {}", report.nature)?;
    writeln!(w, "Stats:      {}", report.stats)?;
    writeln!(w, "Order:      {}", report.order)?;
    writeln!(w, "Key:        {:04X}", report.key)?;

    if !report.passes_filter {
        writeln!(w, "Growth is not third, no corruption possible")?;
        return Ok(());
    }

    if let Some(existing) = report.first_word_existing {
        writeln!(w, "Slot 1:     {:04X}", existing)?;
    }

    match &report.corruption {
        Some(row) => {
            writeln!(w, "---")?;
            writeln!(w, "Corruption:     {}", row.word_corruption)?;
            writeln!(w, "Checksum fix 1: {}", row.word_checksum_fix_first)?;
            writeln!(w, "Checksum fix 2: {}", row.word_checksum_fix_second)?;
        }
        None => writeln!(w, "No checksum-preserving words")?,
    }

    Ok(())
}
