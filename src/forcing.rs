//! Daily climate inputs shared by bucket models.
use crate::errors::HydroError;
use crate::utils;

/// Daily forcing series for one catchment or pixel.
///
/// All three series hold one value per day and have the same length.  Forcing is read-only once
/// built, wrap it in an `Arc` to share one copy between many models.
#[derive(Debug, Clone, PartialEq)]
pub struct Forcing {
    precipitation: Vec<f64>,
    temperature: Vec<f64>,
    pet: Vec<f64>,
}

impl Forcing {
    /// Build forcing from precipitation (mm/day), mean air temperature (deg C) and
    /// potential evapotranspiration (mm/day).
    ///
    /// Fails on empty series, series of unequal length, or NaN values.
    ///
    /// # Examples
    /// ```
    /// use exphydro::prelude::*;
    /// let forcing = Forcing::new(vec![0.0, 4.2], vec![5.0, -2.0], vec![3.0, 1.0])?;
    /// assert_eq!(forcing.len(), 2);
    /// # Ok::<(), HydroError>(())
    /// ```
    pub fn new(
        precipitation: Vec<f64>,
        temperature: Vec<f64>,
        pet: Vec<f64>,
    ) -> Result<Self, HydroError> {
        if precipitation.is_empty() {
            return Err(HydroError::EmptySeries);
        }
        for series in [&temperature, &pet].iter() {
            if series.len() != precipitation.len() {
                return Err(HydroError::LengthMismatch {
                    expected: precipitation.len(),
                    found: series.len(),
                });
            }
        }
        let named = [
            ("precipitation", &precipitation),
            ("temperature", &temperature),
            ("pet", &pet),
        ];
        for (series, values) in named.iter() {
            if let Some(index) = values.iter().position(|x| x.is_nan()) {
                return Err(HydroError::MissingValue {
                    series: *series,
                    index,
                });
            }
        }
        Ok(Forcing {
            precipitation,
            temperature,
            pet,
        })
    }

    /// Read forcing from three text files, one value per line.
    pub fn from_files(
        precipitation: &str,
        temperature: &str,
        pet: &str,
    ) -> Result<Self, HydroError> {
        Forcing::new(
            utils::read_f64(precipitation)?,
            utils::read_f64(temperature)?,
            utils::read_f64(pet)?,
        )
    }

    /// Precipitation (mm/day).
    pub fn precipitation(&self) -> &[f64] {
        &self.precipitation
    }

    /// Mean air temperature (deg C).
    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Potential evapotranspiration (mm/day).
    pub fn pet(&self) -> &[f64] {
        &self.pet
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.precipitation.len()
    }

    /// Always false, empty forcing is rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.precipitation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_forcing() {
        let forcing = Forcing::new(vec![1.0; 3], vec![2.0; 3], vec![3.0; 3]).unwrap();
        assert_eq!(forcing.len(), 3);
        assert_eq!(forcing.temperature(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn rejects_empty() {
        let err = Forcing::new(vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, HydroError::EmptySeries);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Forcing::new(vec![1.0; 3], vec![2.0; 3], vec![3.0; 2]).unwrap_err();
        assert_eq!(
            err,
            HydroError::LengthMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_nan() {
        let err = Forcing::new(vec![1.0; 3], vec![2.0, f64::NAN, 1.0], vec![3.0; 3]).unwrap_err();
        assert_eq!(
            err,
            HydroError::MissingValue {
                series: "temperature",
                index: 1
            }
        );
    }
}
