//! Table, JSON and CSV renderings of display rows.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::format::DisplayRow;

const TABLE_HEADER: [&str; 6] = [
    "RNG Frame",
    "Corruption",
    "Checksum Fix 1",
    "Checksum Fix 2",
    "Nature",
    "Stats (hp/atk/def/spAtk/spDef/spd)",
];

const CSV_HEADER: [&str; 6] = [
    "rng_frame",
    "word_corruption",
    "word_checksum_fix_first",
    "word_checksum_fix_second",
    "nature",
    "stats",
];

pub fn format_table(rows: &[DisplayRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(TABLE_HEADER.iter().map(|name| Cell::new(name).fg(Color::Cyan)));

    for row in rows {
        table.add_row(vec![
            Cell::new(row.rng_frame).fg(Color::Yellow),
            Cell::new(row.word_corruption),
            Cell::new(row.word_checksum_fix_first),
            Cell::new(row.word_checksum_fix_second),
            Cell::new(row.nature).fg(Color::Green),
            Cell::new(&row.stats),
        ]);
    }

    table.to_string()
}

pub fn format_json(rows: &[DisplayRow]) -> Result<String> {
    if rows.is_empty() {
        return Ok("[]".to_string());
    }
    Ok(serde_json::to_string_pretty(rows)?)
}

/// RFC 4180 compliant CSV formatting.
pub fn format_csv(rows: &[DisplayRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    output.push_str(&CSV_HEADER.join(","));
    output.push('\n');

    for row in rows {
        let fields = [
            row.rng_frame.to_string(),
            escape_csv_field(row.word_corruption),
            escape_csv_field(row.word_checksum_fix_first),
            escape_csv_field(row.word_checksum_fix_second),
            escape_csv_field(row.nature),
            escape_csv_field(&row.stats),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(rng_frame: u32, word: &'static str) -> DisplayRow {
        DisplayRow {
            rng_frame,
            word_corruption: word,
            word_checksum_fix_first: "VITAL SPIRIT",
            word_checksum_fix_second: "LOOK",
            nature: "Timid (Spd+/Atk-)",
            stats: "20/11/10/11/11/9".to_string(),
        }
    }

    #[test]
    fn format_table_with_data() {
        let table = format_table(&[make_row(796, "SOON")]);
        assert!(table.contains("RNG Frame"));
        assert!(table.contains("796"));
        assert!(table.contains("SOON"));
        assert!(table.contains("20/11/10/11/11/9"));
    }

    #[test]
    fn format_json_fields() {
        let json = format_json(&[make_row(796, "SOON")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["rng_frame"], 796);
        assert_eq!(value[0]["word_corruption"], "SOON");
        assert_eq!(value[0]["nature"], "Timid (Spd+/Atk-)");
    }

    #[test]
    fn format_csv_with_data() {
        let csv = format_csv(&[make_row(796, "SOON"), make_row(2295, "SADLY")]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("rng_frame,word_corruption,word_checksum_fix_first,word_checksum_fix_second,nature,stats")
        );
        assert_eq!(lines.next(), Some("796,SOON,VITAL SPIRIT,LOOK,Timid (Spd+/Atk-),20/11/10/11/11/9"));
        assert!(lines.next().unwrap().starts_with("2295,SADLY,"));
    }

    #[test]
    fn format_csv_quotes_labels() {
        let csv = format_csv(&[make_row(1, "OH, YEAH")]);
        assert!(csv.contains("\"OH, YEAH\""));
    }

    #[test]
    fn escape_csv_field_cases() {
        assert_eq!(escape_csv_field("hello"), "hello");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("x\ny"), "\"x\ny\"");
    }
}
