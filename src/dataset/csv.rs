//! CSV dataset reading and writing.
//!
//! One example per line, no header: 13 comma-separated feature values and
//! the integer category code. Blank lines are ignored. `NaN` and infinite
//! values are rejected.

use crate::dataset::LabeledDataset;
use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::{FeatureVector, FEATURE_COUNT};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Fields per CSV row.
pub const FIELD_COUNT: usize = FEATURE_COUNT + 1;

/// Parse one CSV line. `line_no` is 1-based and only used in errors.
pub fn parse_row(line: &str, line_no: usize) -> Result<(FeatureVector, Category)> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::MalformedRow {
            line: line_no,
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let mut values = [0.0; FIELD_COUNT];
    for (column, (field, slot)) in fields.iter().zip(values.iter_mut()).enumerate() {
        *slot = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::InvalidNumber {
                line: line_no,
                column: column + 1,
                value: field.to_string(),
            })?;
    }

    let code = values[FEATURE_COUNT];
    if code.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&code) {
        return Err(Error::UnknownCategory(fields[FEATURE_COUNT].to_string()));
    }
    let label = Category::from_code(code as u8)?;

    let mut features = [0.0; FEATURE_COUNT];
    features.copy_from_slice(&values[..FEATURE_COUNT]);
    Ok((FeatureVector(features), label))
}

/// Format one example as a CSV line (without line terminator).
pub fn format_row(features: &FeatureVector, label: Category) -> String {
    let mut line = features
        .as_slice()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    line.push(',');
    line.push_str(&label.code().to_string());
    line
}

/// Read a dataset from any buffered reader.
///
/// With `limit`, reading stops after that many examples.
pub fn parse_dataset<R: BufRead>(reader: R, limit: Option<usize>) -> Result<LabeledDataset> {
    let mut dataset = LabeledDataset::new();
    for (i, line) in reader.lines().enumerate() {
        if limit.is_some_and(|n| dataset.len() >= n) {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (features, label) = parse_row(&line, i + 1)?;
        dataset.push(features, label);
    }
    Ok(dataset)
}

/// Read a dataset file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any row is malformed.
pub fn read_dataset(path: &Path, limit: Option<usize>) -> Result<LabeledDataset> {
    let file = File::open(path)?;
    let dataset = parse_dataset(BufReader::new(file), limit)?;
    log::info!("Read {} examples from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Write examples to any writer, one line each.
pub fn write_rows<W: Write>(mut writer: W, dataset: &LabeledDataset) -> Result<()> {
    for (features, label) in dataset.iter() {
        writeln!(writer, "{}", format_row(features, label))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a dataset file, replacing any existing file.
pub fn write_dataset(path: &Path, dataset: &LabeledDataset) -> Result<()> {
    let file = File::create(path)?;
    write_rows(BufWriter::new(file), dataset)?;
    log::info!("Wrote {} examples to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ROW: &str = "10,0.3,0.5,0.2,0,1.2,4,0,0.5,0.5,0,1,0.03333,2";

    #[test]
    fn test_parse_row() {
        let (features, label) = parse_row(ROW, 1).unwrap();
        assert_eq!(label, Category::List);
        assert_eq!(features.char_count(), 10.0);
        assert_eq!(features.height_ratio(), 1.2);
        assert_eq!(features.avg_image_area_ratio(), 0.03333);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_row("1,2,3", 7).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                line: 7,
                expected: 14,
                found: 3
            }
        ));
    }

    #[test]
    fn test_invalid_number() {
        let line = ROW.replacen("0.3", "abc", 1);
        let err = parse_row(&line, 3).unwrap_err();
        match err {
            Error::InvalidNumber {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let nan_row = "NaN,0,0,0,0,0,0,0,0,0,0,0,0,1";
        assert!(matches!(
            parse_row(nan_row, 4),
            Err(Error::InvalidNumber { line: 4, column: 1, .. })
        ));

        let inf_row = "1,0,0,0,0,inf,0,0,0,0,0,0,0,1";
        assert!(matches!(
            parse_row(inf_row, 2),
            Err(Error::InvalidNumber { line: 2, column: 6, .. })
        ));

        let text = format!("{}\n1,0,0,0,0,0,0,0,0,0,0,0,-infinity,0\n", ROW);
        let err = parse_dataset(Cursor::new(text), None).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { line: 2, column: 13, .. }));
    }

    #[test]
    fn test_bad_labels() {
        let base = &ROW[..ROW.rfind(',').unwrap()];
        for label in ["5", "-1", "1.5"] {
            let line = format!("{},{}", base, label);
            assert!(matches!(parse_row(&line, 1), Err(Error::UnknownCategory(_))), "{}", label);
        }
        assert!(parse_row(&format!("{},4.0", base), 1).is_ok());
    }

    #[test]
    fn test_blank_lines_and_limit() {
        let text = format!("{}\n\n{}\r\n{}\n", ROW, ROW, ROW);
        let all = parse_dataset(Cursor::new(text.clone()), None).unwrap();
        assert_eq!(all.len(), 3);
        let two = parse_dataset(Cursor::new(text), Some(2)).unwrap();
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn test_error_line_counts_blank_lines() {
        let text = format!("{}\n\n1,2\n", ROW);
        assert!(matches!(
            parse_dataset(Cursor::new(text), None),
            Err(Error::MalformedRow { line: 3, .. })
        ));
    }

    #[test]
    fn test_write_then_read() {
        let (features, label) = parse_row(ROW, 1).unwrap();
        let mut dataset = LabeledDataset::new();
        dataset.push(features, label);
        dataset.push(FeatureVector([0.1; FEATURE_COUNT]), Category::Image);

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &dataset).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with(ROW));

        let back = parse_dataset(Cursor::new(text), None).unwrap();
        assert_eq!(back, dataset);
    }
}
