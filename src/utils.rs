//! Summary statistics and plain-text series I/O.
use crate::errors::HydroError;
use serde::Serialize;

/// Calculate the mean of a slice of f64 values.
///  - `numbers` is a reference to a slice of f64 values.
///  - Returns the mean of `numbers`.
///
/// # Examples
///
/// ```rust
/// let numbers = vec![1.0, 1.5, 2.0, 2.5, 3.0];
/// let mn = exphydro::utils::mean(&numbers);
/// assert_eq!(2.0, mn);
/// ```
pub fn mean(numbers: &[f64]) -> f64 {
    let sum: f64 = numbers.iter().sum();

    sum / numbers.len() as f64
}

/// Sum of squared deviations of `numbers` from `centre`.
pub fn sum_squares(numbers: &[f64], centre: f64) -> f64 {
    numbers.iter().map(|x| (x - centre) * (x - centre)).sum()
}

/// Read a numeric series from a text file.
///  - Values are separated by newlines, spaces or tabs, one value per line is typical.
///  - Blank lines are skipped.
///  - Returns [ParseError](../errors/enum.HydroError.html) on the first token that is not a number.
pub fn read_f64(path: &str) -> Result<Vec<f64>, HydroError> {
    let var = std::fs::File::open(path)?;
    parse_f64(var)
}

/// Read a numeric series from any reader, see [read_f64](fn.read_f64.html).
pub fn parse_f64<R: std::io::Read>(rdr: R) -> Result<Vec<f64>, HydroError> {
    let mut dat = Vec::new();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);
    for result in rdr.records() {
        let row = result?;
        for token in row.iter().flat_map(|x| x.split_whitespace()) {
            let val = token
                .parse::<f64>()
                .map_err(|_| HydroError::ParseError(token.to_string()))?;
            dat.push(val);
        }
    }
    Ok(dat)
}

/// Write records to csv file.
pub fn record<T: Serialize>(rec: &[T], path: &str) -> Result<(), HydroError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for i in rec {
        wtr.serialize(i)?;
    }
    wtr.flush()?;
    Ok(())
}
