use crate::core::types::Delimiter;
use tracing::debug;

/// Decode upload bytes for sniffing.
///
/// Invalid UTF-8 sequences are replaced and a leading BOM is dropped, so the
/// sniffer never fails on encoding.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Pick the field separator by counting candidate characters in the text.
///
/// Semicolon wins if it outnumbers commas, then tab if it outnumbers commas,
/// otherwise comma. Ties go to comma.
pub fn detect_delimiter(text: &str) -> Delimiter {
    let (mut semicolons, mut tabs, mut commas) = (0usize, 0usize, 0usize);
    for ch in text.chars() {
        match ch {
            ';' => semicolons += 1,
            '\t' => tabs += 1,
            ',' => commas += 1,
            _ => {}
        }
    }

    let delimiter = if semicolons > commas {
        Delimiter::Semicolon
    } else if tabs > commas {
        Delimiter::Tab
    } else {
        Delimiter::Comma
    };
    debug!(semicolons, tabs, commas, %delimiter, "sniffed delimiter");
    delimiter
}

/// Sniff straight from raw upload bytes
pub fn detect_delimiter_bytes(bytes: &[u8]) -> Delimiter {
    detect_delimiter(&decode_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), Delimiter::Comma);
    }

    #[test]
    fn test_detect_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2,5;3"), Delimiter::Semicolon);
    }

    #[test]
    fn test_detect_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), Delimiter::Tab);
    }

    #[test]
    fn test_semicolon_checked_before_tab() {
        // Both beat the comma count; semicolon is tested first.
        assert_eq!(detect_delimiter("a;b\tc\td"), Delimiter::Semicolon);
    }

    #[test]
    fn test_ties_resolve_to_comma() {
        assert_eq!(detect_delimiter("a;b,c"), Delimiter::Comma);
        assert_eq!(detect_delimiter("a\tb,c"), Delimiter::Comma);
        assert_eq!(detect_delimiter(""), Delimiter::Comma);
        assert_eq!(detect_delimiter("no separators here"), Delimiter::Comma);
    }

    #[test]
    fn test_comma_wins_when_not_outnumbered() {
        let samples = [
            "a,b;c\td",
            "x,y,z;;\t\t",
            "1,2,3,4;5;6\t7",
            "\"quoted; field\",b,c",
        ];
        for sample in samples {
            assert_eq!(detect_delimiter(sample), Delimiter::Comma, "{sample:?}");
        }
    }

    #[test]
    fn test_result_is_always_a_candidate() {
        let samples = ["", ";;;", "\t\t", ",", "abc", "a;b\tc,d;e\tf"];
        for sample in samples {
            let ch = detect_delimiter(sample).as_char();
            assert!([';', '\t', ','].contains(&ch));
        }
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let bytes = b"a;b;c\n\xff\xfe;2;3";
        assert_eq!(detect_delimiter_bytes(bytes), Delimiter::Semicolon);
    }

    #[test]
    fn test_bom_is_removed() {
        let bytes = b"\xEF\xBB\xBFid,name";
        assert_eq!(decode_lossy(bytes), "id,name");
    }
}
