//! Delimited-text decoding with encoding detection.
//!
//! Turns a file into a header plus rows keyed by header name. No employee
//! logic here.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DecodeError, DecodeResult, FileError};

/// One data row: header name → cell value.
pub type Row = HashMap<String, String>;

/// Delimiter candidates for auto-detection, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// How the delimiter of a file is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Fixed(u8),
    Auto,
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Fixed(b',')
    }
}

/// Decoded content of one file
#[derive(Debug, Clone, Default)]
pub struct DecodedFile {
    /// Header row, empty for an empty file
    pub headers: Vec<String>,
    /// Data rows in file order
    pub rows: Vec<Row>,
    /// Detected encoding
    pub encoding: String,
    /// Delimiter actually used
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf-8-sig" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// UTF-8 input is decoded strictly: bytes that are not valid UTF-8 are a
/// decoding failure rather than being replaced.
pub fn decode_content(bytes: &[u8], encoding: &str) -> DecodeResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        _ => String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::Encoding(encoding.to_string())),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Find a quote the csv reader tolerates but strict CSV does not.
///
/// `raw` is the text of one record. A `"` is only allowed as the first byte
/// of a field, and a closing quote must be followed by a delimiter or a line
/// end.
fn misplaced_quote(raw: &[u8], delimiter: u8) -> Option<&'static str> {
    let mut bytes = raw.iter().copied().peekable();
    let mut field_start = true;
    let mut quoted = false;
    let mut closed = false;

    while let Some(b) = bytes.next() {
        if quoted {
            if b == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    quoted = false;
                    closed = true;
                }
            }
            continue;
        }

        let terminator = b == delimiter || b == b'\n' || b == b'\r';
        if closed && !terminator {
            return Some("extraneous or missing \" in quoted-field");
        }
        if b == b'"' {
            if !field_start {
                return Some("bare \" in non-quoted-field");
            }
            quoted = true;
        }
        closed = false;
        field_start = terminator;
    }

    None
}

/// Parse decoded text into a header and rows.
///
/// Every record must have as many fields as the header, and quotes must
/// follow strict CSV rules. A header repeated twice keeps the value of its
/// last column.
pub fn parse_content(content: &str, delimiter: u8) -> DecodeResult<(Vec<String>, Vec<Row>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(content.as_bytes());

    let raw = content.as_bytes();
    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut start = 0;
    let mut index = 0;

    loop {
        let more = reader.read_record(&mut record).map_err(|e| DecodeError::Malformed {
            record: index + 1,
            message: e.to_string(),
        })?;
        if !more {
            break;
        }

        let end = (reader.position().byte() as usize).min(raw.len());
        if let Some(message) = misplaced_quote(raw.get(start..end).unwrap_or_default(), delimiter) {
            return Err(DecodeError::Malformed {
                record: index + 1,
                message: message.to_string(),
            });
        }
        start = end;

        if index == 0 {
            headers = record.iter().map(str::to_string).collect();
        } else {
            let row: Row = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            rows.push(row);
        }
        index += 1;
    }

    Ok((headers, rows))
}

/// Decode raw bytes with encoding detection and the given delimiter policy.
pub fn decode_bytes(bytes: &[u8], delimiter: Delimiter) -> DecodeResult<DecodedFile> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;

    let delimiter = match delimiter {
        Delimiter::Fixed(d) => d,
        Delimiter::Auto => detect_delimiter(&content) as u8,
    };

    let (headers, rows) = parse_content(&content, delimiter)?;

    Ok(DecodedFile {
        headers,
        rows,
        encoding,
        delimiter: delimiter as char,
    })
}

/// Read the raw bytes of a file, mapping failures to `OpeningFile`.
pub fn open_file(path: impl AsRef<Path>) -> Result<Vec<u8>, FileError> {
    fs::read(path.as_ref()).map_err(|e| FileError::OpeningFile(e.to_string()))
}

/// Open and decode a file.
///
/// Open failures map to `OpeningFile`, anything after that to `ReadingFile`.
pub fn read_file(path: impl AsRef<Path>, delimiter: Delimiter) -> Result<DecodedFile, FileError> {
    let bytes = open_file(path)?;
    Ok(decode_bytes(&bytes, delimiter)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let (headers, rows) = parse_content("Name,Wage\nJohn,$10\nMary,$15", b',').unwrap();

        assert_eq!(headers, vec!["Name", "Wage"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "John");
        assert_eq!(rows[1]["Wage"], "$15");
    }

    #[test]
    fn test_quoted_values_keep_spaces() {
        let (_, rows) = parse_content("name,value\n\"Doe, John\", 12 \n", b',').unwrap();
        assert_eq!(rows[0]["name"], "Doe, John");
        assert_eq!(rows[0]["value"], " 12 ");
    }

    #[test]
    fn test_field_count_mismatch_is_error() {
        let err = parse_content("a,b\n1,2,3\n", b',').unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { record: 2, .. }));
    }

    #[test]
    fn test_empty_content() {
        let (headers, rows) = parse_content("", b',').unwrap();
        assert!(headers.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let (_, rows) = parse_content("id,id\n1,2\n", b',').unwrap();
        assert_eq!(rows[0]["id"], "2");
    }

    #[test]
    fn test_bare_quote_is_error() {
        let err = parse_content("Name,Email\nJo\"hn,doe@test.com\n", b',').unwrap_err();
        match err {
            DecodeError::Malformed { record, message } => {
                assert_eq!(record, 2);
                assert_eq!(message, "bare \" in non-quoted-field");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_text_after_closing_quote_is_error() {
        let err = parse_content("a,b\n\"x\"y,1\n", b',').unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { record: 2, .. }));
    }

    #[test]
    fn test_escaped_and_multiline_quotes() {
        let (_, rows) = parse_content("a,b\n\"say \"\"hi\"\"\",\"two\nlines\"\nplain,\"\"\n", b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], "say \"hi\"");
        assert_eq!(rows[0]["b"], "two\nlines");
        assert_eq!(rows[1]["b"], "");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_decode_bytes_auto() {
        let decoded = decode_bytes(b"name;age\nAlice;30\nBob;25", Delimiter::Auto).unwrap();
        assert_eq!(decoded.delimiter, ';');
        assert_eq!(decoded.headers, vec!["name", "age"]);
        assert_eq!(decoded.rows.len(), 2);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFID,Email\n1,a@b.com\n", Delimiter::default()).unwrap();
        assert_eq!(decoded.headers[0], "ID");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_read_file_missing() {
        let err = read_file("/definitely/not/here.csv", Delimiter::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OpeningFile);
    }

    #[test]
    fn test_read_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\n1\n").unwrap();

        let err = read_file(file.path(), Delimiter::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadingFile);
    }

    #[test]
    fn test_read_file_bare_quote() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Name,Email,Wage,Number\nJo\"hn,doe@test.com,10,1\n").unwrap();

        let err = read_file(file.path(), Delimiter::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadingFile);
    }
}
