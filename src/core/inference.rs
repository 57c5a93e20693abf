use crate::core::types::{parse_number, ColumnType};

/// Classify a column from its raw string values.
///
/// Empty values are treated as missing and ignored. If every remaining value
/// parses as an integer the column is INTEGER; if every one parses as a float
/// it is REAL; anything else, including a column with no values at all, is
/// TEXT.
pub fn infer_column_type<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen_any = false;
    let mut all_integer = true;

    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        seen_any = true;
        if all_integer && value.parse::<i64>().is_ok() {
            continue;
        }
        all_integer = false;
        if parse_number(value).is_none() {
            return ColumnType::Text;
        }
    }

    match (seen_any, all_integer) {
        (false, _) => ColumnType::Text,
        (true, true) => ColumnType::Integer,
        (true, false) => ColumnType::Real,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_column() {
        assert_eq!(infer_column_type(["1", "2", "3"]), ColumnType::Integer);
        assert_eq!(infer_column_type(["-7", "+2", "0"]), ColumnType::Integer);
    }

    #[test]
    fn test_real_column() {
        assert_eq!(infer_column_type(["1.5", "2", "3"]), ColumnType::Real);
        assert_eq!(infer_column_type(["1e3", "2"]), ColumnType::Real);
    }

    #[test]
    fn test_text_column() {
        assert_eq!(infer_column_type(["a", "2", "3"]), ColumnType::Text);
        assert_eq!(infer_column_type(["1.5", "2", "x"]), ColumnType::Text);
        // Decimal comma is not a number for the parser
        assert_eq!(infer_column_type(["1,5", "2"]), ColumnType::Text);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        assert_eq!(infer_column_type(["1", "", "3"]), ColumnType::Integer);
        assert_eq!(infer_column_type(["", "2.5"]), ColumnType::Real);
        assert_eq!(infer_column_type(["", ""]), ColumnType::Text);
        assert_eq!(infer_column_type(Vec::<&str>::new()), ColumnType::Text);
    }

    #[test]
    fn test_non_finite_spellings_are_text() {
        assert_eq!(infer_column_type(["Nan", "Inf"]), ColumnType::Text);
        assert_eq!(infer_column_type(["1.5", "infinity"]), ColumnType::Text);
        assert_eq!(infer_column_type(["2", "NaN"]), ColumnType::Text);
        assert_eq!(infer_column_type(["1e999"]), ColumnType::Text);
    }

    #[test]
    fn test_integer_overflow_falls_back_to_real() {
        assert_eq!(
            infer_column_type(["1", "99999999999999999999"]),
            ColumnType::Real
        );
    }
}
