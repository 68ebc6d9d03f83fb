//! Loading rows from JSON lines: one JSON object per line, blank lines ignored.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::info;

use crate::{Context, DataFrame, EngineErr, Result, Row};

/// Reads a JSON lines file into a dataframe.
///
/// # Errors
/// Fails on the first line that isn't a JSON object of supported values.
pub fn read_json_lines<P: AsRef<Path>>(context: &Context, path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let df = parse_json_lines(context, BufReader::new(file))?;

    info!(rows = df.count(); "loaded {}", path.display());
    Ok(df)
}

/// Parses JSON lines from any buffered reader.
pub fn parse_json_lines<R: BufRead>(context: &Context, reader: R) -> Result<DataFrame> {
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let number = i + 1;

        if line.trim().is_empty() {
            continue;
        }

        let json: serde_json::Value =
            serde_json::from_str(&line).map_err(|source| EngineErr::Json {
                line: number,
                source,
            })?;

        let serde_json::Value::Object(object) = json else {
            return Err(EngineErr::InvalidRecord {
                line: number,
                reason: "expected a json object".to_string(),
            });
        };

        let row = Row::try_from(object).map_err(|reason| EngineErr::InvalidRecord {
            line: number,
            reason,
        })?;

        rows.push(row);
    }

    Ok(DataFrame::from_rows(context, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, Value};

    #[test]
    fn parses_objects_skipping_blank_lines() {
        let context = Context::new(EngineConfig::default()).unwrap();
        let text = "{\"features\": [0.5, 1], \"label\": 1}\n\n{\"features\": [0, 0], \"label\": 0}\n";

        let df = parse_json_lines(&context, text.as_bytes()).unwrap();
        let rows = df.collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("features"), Some(&Value::Vector(vec![0.5, 1.])));
        assert_eq!(rows[1].get("label"), Some(&Value::Int(0)));
    }

    #[test]
    fn reports_the_offending_line() {
        let context = Context::new(EngineConfig::default()).unwrap();
        let text = "{\"label\": 1}\n[1, 2]\n";

        let res = parse_json_lines(&context, text.as_bytes());
        assert!(matches!(res, Err(EngineErr::InvalidRecord { line: 2, .. })));

        let res = parse_json_lines(&context, "{ oops".as_bytes());
        assert!(matches!(res, Err(EngineErr::Json { line: 1, .. })));
    }
}
