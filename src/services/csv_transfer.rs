//! CSV import/export of library cards.
//!
//! Two columns, `front,back`, RFC 4180 quoting. Only card text travels;
//! imported cards start with a fresh schedule.

use rusqlite::Connection;
use serde::Serialize;

use crate::db;
use crate::domain::{CardSides, Flashcard};
use crate::error::{AppError, AppResult};

pub const HEADER: [&str; 2] = ["front", "back"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    /// Rows missing a front or back
    pub skipped: usize,
}

pub fn export_csv(cards: &[Flashcard]) -> String {
    let mut out = String::new();
    write_row(&mut out, &HEADER);
    for card in cards {
        write_row(&mut out, &[card.front.as_str(), card.back.as_str()]);
    }
    out
}

fn write_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Split CSV text into records of raw fields
pub fn parse_csv(input: &str) -> AppResult<Vec<Vec<String>>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(AppError::BadRequest(format!(
            "unterminated quoted field starting on line {}",
            quote_line
        )));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

fn is_header(record: &[String]) -> bool {
    record.len() >= 2
        && record[0].trim().eq_ignore_ascii_case(HEADER[0])
        && record[1].trim().eq_ignore_ascii_case(HEADER[1])
}

/// Add every valid row of `input` to the library as a new card due at `now`
pub fn import_csv(conn: &Connection, library_id: i64, input: &str, now: i64) -> AppResult<ImportSummary> {
    let records = parse_csv(input)?;
    let mut summary = ImportSummary::default();

    let tx = conn.unchecked_transaction()?;
    let mut seen_content = false;
    for record in records {
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if !seen_content {
            seen_content = true;
            if is_header(&record) {
                continue;
            }
        }

        let sides = match record.as_slice() {
            [front, back, ..] => CardSides::parse(front, back),
            _ => None,
        };
        match sides {
            Some(sides) => {
                db::insert_card(&tx, &Flashcard::new(library_id, sides, now))?;
                summary.imported += 1;
            }
            None => summary.skipped += 1,
        }
    }
    tx.commit()?;

    tracing::info!(
        library_id,
        imported = summary.imported,
        skipped = summary.skipped,
        "Imported CSV"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardSides;
    use crate::testing::TestEnv;

    fn card(front: &str, back: &str) -> Flashcard {
        Flashcard::new(1, CardSides::parse(front, back).unwrap(), 0)
    }

    #[test]
    fn test_export_quotes_special_fields() {
        let cards = vec![card("plain", "text"), card("a, b", "say \"hi\""), card("two\nlines", "x")];
        assert_eq!(
            export_csv(&cards),
            "front,back\nplain,text\n\"a, b\",\"say \"\"hi\"\"\"\n\"two\nlines\",x\n"
        );
    }

    #[test]
    fn test_parse_quoted_and_crlf() {
        let records = parse_csv("front,back\r\n\"a, b\",\"say \"\"hi\"\"\"\r\n\"multi\nline\",y").unwrap();
        assert_eq!(
            records,
            vec![
                vec!["front", "back"],
                vec!["a, b", "say \"hi\""],
                vec!["multi\nline", "y"],
            ]
        );
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_csv("a,b\n\"open,c\n").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_parse_strips_bom() {
        let records = parse_csv("\u{feff}x,y").unwrap();
        assert_eq!(records, vec![vec!["x", "y"]]);
    }

    #[test]
    fn test_export_then_parse_preserves_text() {
        let cards = vec![card("q\"uote", "com,ma"), card("ok", "line\nbreak")];
        let records = parse_csv(&export_csv(&cards)).unwrap();
        assert_eq!(records[1], vec!["q\"uote", "com,ma"]);
        assert_eq!(records[2], vec!["ok", "line\nbreak"]);
    }

    #[test]
    fn test_import_counts_and_skips() {
        let env = TestEnv::new().unwrap();
        let lib = env.library("ana", "Spanish");

        let input = "Front,Back\nuno,one\n\ndos,\nsolo\ntres,three,extra\n";
        let summary = import_csv(&env.conn, lib, input, 500).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 2 });

        let cards = db::get_library_cards(&env.conn, lib).unwrap();
        let fronts: Vec<&str> = cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["uno", "tres"]);
        assert!(cards.iter().all(|c| c.review == crate::srs::initialize_state(500)));
    }

    #[test]
    fn test_import_without_header() {
        let env = TestEnv::new().unwrap();
        let lib = env.library("ana", "Spanish");
        let summary = import_csv(&env.conn, lib, "perro,dog\ngato,cat", 0).unwrap();
        assert_eq!(summary.imported, 2);
    }

    #[test]
    fn test_import_rejects_malformed_without_partial_write() {
        let env = TestEnv::new().unwrap();
        let lib = env.library("ana", "Spanish");
        assert!(import_csv(&env.conn, lib, "a,b\n\"broken", 0).is_err());
        assert!(db::get_library_cards(&env.conn, lib).unwrap().is_empty());
    }
}
