//! Record codec for the delimited flat-file format.
//!
//! One record is one line of comma-separated fields. A field that contains the
//! delimiter, the quote character or a line break is wrapped in quotes, and every
//! quote inside a wrapped field is doubled. This is a deliberately small format,
//! not a general RFC 4180 implementation.
//!
//! The law the rest of the crate relies on is `decode(&encode(fields)) == fields`.
//!
//! A field with an embedded line break spans several physical lines once encoded,
//! so file text must be cut into records with [`split_records`] rather than
//! [`str::lines`].

use crate::constants::{FIELD_DELIMITER, QUOTE};

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == FIELD_DELIMITER || c == QUOTE || c == '\n' || c == '\r')
}

/// Encodes an ordered sequence of fields as one record line (without a line terminator).
pub fn encode<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(FIELD_DELIMITER);
        }
        let field = field.as_ref();
        if needs_quoting(field) {
            line.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    line.push(QUOTE);
                }
                line.push(c);
            }
            line.push(QUOTE);
        } else {
            line.push_str(field);
        }
    }
    line
}

/// Decodes one record line into its fields.
///
/// A blank line decodes to a single empty field; callers skip blank lines before
/// decoding.
pub fn decode(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == QUOTE {
            if in_quotes && chars.peek() == Some(&QUOTE) {
                current.push(QUOTE);
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == FIELD_DELIMITER && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

/// Walks `text` with the encoder's quoting rules and calls `on_break` with the byte
/// offset of every `\n` that ends a record. Returns true if a quoted span is still
/// open at the end.
///
/// A quote opens a span only at the start of a field, which is the only place the
/// encoder puts one. A stray quote in the middle of a hand-edited field is plain
/// text here and cannot swallow the lines that follow it.
fn scan_records(text: &str, mut on_break: impl FnMut(usize)) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek().map(|&(_, next)| next) == Some(QUOTE) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match c {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            FIELD_DELIMITER => at_field_start = true,
            '\n' => {
                on_break(i);
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }
    in_quotes
}

/// Splits file text into logical records.
///
/// A `\n` ends a record only outside a quoted span. A `\r` directly before a
/// record-ending `\n` is dropped. A trailing line terminator does not produce an
/// empty final record.
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    scan_records(text, |end| {
        let record = &text[start..end];
        records.push(record.strip_suffix('\r').unwrap_or(record));
        start = end + 1;
    });
    if start < text.len() {
        let record = &text[start..];
        records.push(record.strip_suffix('\r').unwrap_or(record));
    }
    records
}

/// True if `record` ends inside a quoted span, as happens when a hand-edited row
/// opens a quote that is never closed.
pub fn has_open_quote(record: &str) -> bool {
    scan_records(record, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(fields: &[&str]) {
        let encoded = encode(fields);
        let decoded = decode(&encoded);
        assert_eq!(decoded, fields, "round trip failed via {encoded:?}");
    }

    #[test]
    fn test_encode_plain_fields_are_joined_without_quotes() {
        assert_eq!(encode(&["D1", "Ana Perez", "Cardiologia"]), "D1,Ana Perez,Cardiologia");
    }

    #[test]
    fn test_encode_has_no_trailing_delimiter() {
        assert_eq!(encode(&["a", ""]), "a,");
        assert_eq!(encode(&["a"]), "a");
    }

    #[test]
    fn test_encode_quotes_field_with_delimiter() {
        assert_eq!(encode(&["C1", "dolor, fiebre"]), "C1,\"dolor, fiebre\"");
    }

    #[test]
    fn test_encode_doubles_quotes_inside_wrapped_field() {
        assert_eq!(encode(&["say \"hi\""]), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_encode_quotes_field_with_newline() {
        assert_eq!(encode(&["line1\nline2"]), "\"line1\nline2\"");
    }

    #[test]
    fn test_decode_doubled_quote_is_literal() {
        assert_eq!(decode("\"a\"\"b\",c"), vec!["a\"b", "c"]);
    }

    #[test]
    fn test_decode_delimiter_inside_quotes_is_kept() {
        assert_eq!(decode("x,\"1,2\",y"), vec!["x", "1,2", "y"]);
    }

    #[test]
    fn test_decode_blank_line_is_single_empty_field() {
        assert_eq!(decode(""), vec![String::new()]);
    }

    #[test]
    fn test_decode_trailing_empty_fields_are_kept() {
        assert_eq!(decode("C1,2024-01-10T09:00,x,,"), vec!["C1", "2024-01-10T09:00", "x", "", ""]);
    }

    #[test]
    fn test_round_trip_awkward_fields() {
        round_trip(&["plain"]);
        round_trip(&["", "", ""]);
        round_trip(&["a,b", "c\"d", "e\nf"]);
        round_trip(&["\"", "\"\"", ","]);
        round_trip(&["\"quoted\"", "ends with quote\"", "\"starts"]);
        round_trip(&["crlf\r\ninside", "tab\tand spaces  "]);
        round_trip(&["ñandú, café", "日本語"]);
    }

    #[test]
    fn test_split_records_keeps_quoted_newline_in_one_record() {
        let text = "h1,h2\na,\"b\nc\"\nd,e\n";
        assert_eq!(split_records(text), vec!["h1,h2", "a,\"b\nc\"", "d,e"]);
    }

    #[test]
    fn test_split_records_strips_crlf() {
        assert_eq!(split_records("a,b\r\nc,d\r\n"), vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_split_records_without_trailing_newline() {
        assert_eq!(split_records("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_records_keeps_blank_lines() {
        assert_eq!(split_records("h\n\nx\n"), vec!["h", "", "x"]);
    }

    #[test]
    fn test_split_records_ignores_quote_inside_unquoted_field() {
        let text = "h\nops,O\"Brien,pw\nroot,Root,toor\n";
        assert_eq!(split_records(text), vec!["h", "ops,O\"Brien,pw", "root,Root,toor"]);
    }

    #[test]
    fn test_has_open_quote_detects_unterminated_span() {
        assert!(has_open_quote("ops,\"Brien,pw\nroot,Root,toor"));
        assert!(!has_open_quote("a,\"b\nc\",d"));
        assert!(!has_open_quote("a,\"say \"\"hi\"\"\",d"));
        assert!(!has_open_quote("O\"Brien"));
    }

    #[test]
    fn test_split_records_then_decode_round_trips_multiline_field() {
        let fields = ["C1", "2024-01-10T09:00", "first\nsecond, \"third\"", "", ""];
        let text = format!("header\n{}\n", encode(&fields));

        let records = split_records(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(decode(records[1]), fields);
    }
}
