//! CSV field reading and quoting.
//!
//! Both directions share one convention: a field wrapped in `"` may contain
//! commas, and `""` inside it is one literal quote.

use csv::{ReaderBuilder, StringRecord};

/// Reads one CSV line into a record.
///
/// Records may have any number of fields; callers treat a missing column
/// as an empty value. A blank line yields a record with no fields.
pub fn read_record(line: &str) -> csv::Result<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

/// Wraps `value` in quotes, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::{quote_field, read_record};

    fn fields(line: &str) -> Vec<String> {
        read_record(line).unwrap().iter().map(str::to_string).collect()
    }

    #[test]
    fn reads_plain_and_quoted_fields() {
        assert_eq!(
            fields(r#""001","Doe, Jane",2024-01-01,1"#),
            vec!["001", "Doe, Jane", "2024-01-01", "1"]
        );
        assert_eq!(fields("a,,c"), vec!["a", "", "c"]);
        assert_eq!(fields("a,"), vec!["a", ""]);
    }

    #[test]
    fn doubled_quote_is_literal() {
        assert_eq!(fields(r#""say ""hi""",x"#), vec![r#"say "hi""#, "x"]);
        assert_eq!(fields(r#""""""#), vec![r#"""#]);
    }

    #[test]
    fn short_record_leaves_missing_columns_absent() {
        let record = read_record("only").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get(3), None);
    }

    #[test]
    fn quoting_matches_reading() {
        for value in ["plain", "with,comma", r#"with "quotes""#, "", r#"""#] {
            let line = format!("{},tail", quote_field(value));
            assert_eq!(fields(&line), vec![value.to_string(), "tail".to_string()]);
        }
    }
}
