//! Deterministic unit conversion

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use log::{debug, error, trace};

/// A named group of units offered together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCategory
{   pub name: String
  , pub units: Vec<String>
}

impl UnitCategory
{   pub fn new(name: &str, units: &[&str]) -> Self
    {   UnitCategory
        {   name: name.to_string()
          , units: units.iter().map(|u| u.to_string()).collect()
        }
    }

    pub fn contains(&self, unit: &str) -> bool
    {   self.units.iter().any(|u| u.eq_ignore_ascii_case(unit.trim()))
    }
}

/// The seven categories offered in simple mode
pub fn default_categories() -> Vec<UnitCategory>
{   vec![
      UnitCategory::new("Length"
      , &["meters", "feet", "inches", "kilometers", "miles"])
    , UnitCategory::new("Weight"
      , &["grams", "kilograms", "pounds", "ounces"])
    , UnitCategory::new("Temperature"
      , &["celsius", "fahrenheit", "kelvin"])
    , UnitCategory::new("Volume"
      , &["liters", "milliliters", "gallons", "cups"])
    , UnitCategory::new("Speed"
      , &["meters per second", "kilometers per hour", "miles per hour"])
    , UnitCategory::new("Area"
      , &["square meters", "square feet", "acres", "hectares"])
    , UnitCategory::new("Time"
      , &["seconds", "minutes", "hours", "days"])
    ]
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion
{   pub value: f64
  , pub from_unit: String
  , pub converted: f64
  , pub to_unit: String
}

impl Conversion
{   /// Converted value rounded to four decimal places
    pub fn rounded(&self) -> f64
    {   (self.converted * 1e4).round() / 1e4
    }
}

impl fmt::Display for Conversion
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f,
          "{} {} is {:.4} {}",
          self.value, self.from_unit, self.converted, self.to_unit
        )
    }
}

/// Converts values between units of the same dimension
#[derive(Debug, Clone)]
pub struct UnitConverter
{   registry: Arc<crate::units::UnitRegistry>
  , categories: Arc<Vec<UnitCategory>>
}

impl Default for UnitConverter
{   fn default() -> Self
    {   UnitConverter::new(
          Arc::new(crate::units::UnitRegistry::with_defaults())
        , default_categories()
        )
    }
}

impl UnitConverter
{   pub fn new(
      registry: Arc<crate::units::UnitRegistry>
    , categories: Vec<UnitCategory>
    ) -> Self
    {   UnitConverter
        {   registry
          , categories: Arc::new(categories)
        }
    }

    pub fn registry(&self) -> &crate::units::UnitRegistry
    {   &self.registry
    }

    pub fn categories(&self) -> &[UnitCategory]
    {   &self.categories
    }

    /// Find a category by name, ignoring case
    pub fn category(&self, name: &str) -> Option<&UnitCategory>
    {   self.categories.iter()
          .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Convert `value` from one unit expression to another
    pub fn convert(
      &self
    , value: f64
    , from_unit: &str
    , to_unit: &str
    ) -> Result<Conversion, crate::error::Error>
    {   debug!("convert {} '{}' -> '{}'", value, from_unit, to_unit);

        let from = self.registry.parse(from_unit)?;
        let to = self.registry.parse(to_unit)?;

        if from.dimension != to.dimension
        {   error!(
              "Incompatible dimensions: {} vs {}",
              from.dimension, to.dimension
            );
            return Err(crate::error::Error::IncompatibleDimension
            {   from: from.expression
              , from_dimension: from.dimension
              , to: to.expression
              , to_dimension: to.dimension
            });
        }

        let base = from.to_base(value);
        let converted = to.from_base(base);
        trace!("base={} converted={}", base, converted);

        if value.is_finite() && !converted.is_finite()
        {   error!("Conversion overflowed: {} {}", value, from_unit);
            return Err(crate::error::Error::NumericOverflow(format!(
              "{} {} does not fit in {}",
              value, from.expression, to.expression
            )));
        }

        Ok(Conversion
        {   value
          , from_unit: from_unit.trim().to_string()
          , converted
          , to_unit: to_unit.trim().to_string()
        })
    }

    /// Convert, requiring both units to be listed in `category`
    pub fn convert_in_category(
      &self
    , category: &str
    , value: f64
    , from_unit: &str
    , to_unit: &str
    ) -> Result<Conversion, crate::error::Error>
    {   let cat = self.category(category)
          .ok_or_else(|| crate::error::Error::UnknownCategory(
            category.to_string()
          ))?;
        for unit in [from_unit, to_unit]
        {   if !cat.contains(unit)
            {   return Err(crate::error::Error::UnitNotInCategory
                {   unit: unit.to_string()
                  , category: cat.name.clone()
                });
            }
        }
        self.convert(value, from_unit, to_unit)
    }
}
