//! Error type shared by every fallible operation in the crate.
/// Custom error type for the exphydro crate.
#[derive(Debug, Clone, PartialEq)]
pub enum HydroError {
    /// Error type from csv crate.
    CsvError,
    /// Error type from std::io.
    IoError,
    /// A token in an input file could not be read as a number.
    ParseError(String),
    /// A series that must hold at least one value is empty.
    EmptySeries,
    /// Two series that must be the same length are not.
    LengthMismatch {
        /// Length of the reference series.
        expected: usize,
        /// Length of the offending series.
        found: usize,
    },
    /// A forcing series holds a NaN value.
    MissingValue {
        /// Name of the forcing series.
        series: &'static str,
        /// Day index of the missing value.
        index: usize,
    },
    /// A parameter value was assigned outside of its bounds.
    OutOfBounds {
        /// Parameter name.
        name: &'static str,
        /// Assigned value.
        value: f64,
        /// Lower bound of the parameter.
        lower: f64,
        /// Upper bound of the parameter.
        upper: f64,
    },
    /// Parameter bounds are reversed, not finite, or too far apart to sample between.
    InvalidBounds {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
    /// Window end index lies before its start index.
    WindowOrder {
        /// First index of the window.
        start: usize,
        /// Last index of the window (inclusive).
        end: usize,
    },
    /// Window end index lies past the end of the series.
    WindowRange {
        /// Last index of the window (inclusive).
        end: usize,
        /// Length of the series.
        len: usize,
    },
    /// Observed and simulated windows select a different number of days.
    WindowMismatch {
        /// Length of the observed window.
        observed: usize,
        /// Length of the simulated window.
        simulated: usize,
    },
    /// Calibration was called without any parameter sets.
    EmptyPopulation,
    /// A distributed model was built without any pixels.
    NoPixels,
    /// Number of pixel parameter sets or weights does not match the number of pixel models.
    PixelMismatch {
        /// Number of pixel models.
        expected: usize,
        /// Number of pixel parameter sets or weights supplied.
        found: usize,
    },
}

impl std::error::Error for HydroError {}

impl std::fmt::Display for HydroError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HydroError::CsvError => write!(f, "Could not serialize/deserialize csv file."),
            HydroError::IoError => write!(f, "Could not read file from path provided."),
            HydroError::ParseError(token) => write!(f, "Could not read '{}' as a number.", token),
            HydroError::EmptySeries => write!(f, "Series must hold at least one value."),
            HydroError::LengthMismatch { expected, found } => write!(
                f,
                "Series length {} does not match expected length {}.",
                found, expected
            ),
            HydroError::MissingValue { series, index } => {
                write!(f, "Missing {} value on day {}.", series, index)
            }
            HydroError::OutOfBounds {
                name,
                value,
                lower,
                upper,
            } => write!(
                f,
                "Parameter {} = {} lies outside bounds [{}, {}].",
                name, value, lower, upper
            ),
            HydroError::InvalidBounds { lower, upper } => {
                write!(f, "Invalid parameter bounds [{}, {}].", lower, upper)
            }
            HydroError::WindowOrder { start, end } => {
                write!(f, "Window end {} comes before window start {}.", end, start)
            }
            HydroError::WindowRange { end, len } => write!(
                f,
                "Window end {} lies past the end of a series of length {}.",
                end, len
            ),
            HydroError::WindowMismatch {
                observed,
                simulated,
            } => write!(
                f,
                "Observed window of {} days does not match simulated window of {} days.",
                observed, simulated
            ),
            HydroError::EmptyPopulation => write!(f, "No parameter sets to calibrate."),
            HydroError::NoPixels => write!(f, "A distributed model needs at least one pixel."),
            HydroError::PixelMismatch { expected, found } => write!(
                f,
                "Expected {} pixels, found {}.",
                expected, found
            ),
        }
    }
}

impl From<csv::Error> for HydroError {
    fn from(_: csv::Error) -> Self {
        HydroError::CsvError
    }
}

impl From<std::io::Error> for HydroError {
    fn from(_: std::io::Error) -> Self {
        HydroError::IoError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: HydroError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err, HydroError::IoError);
    }

    #[test]
    fn display_names_the_window() {
        let err = HydroError::WindowMismatch {
            observed: 10,
            simulated: 9,
        };
        assert!(err.to_string().contains("10 days"));
        assert!(err.to_string().contains("9 days"));
    }
}
