//! Unit registry and dimensional analysis
//!
//! Every unit is a scale factor (and, for temperatures, an offset)
//! against SI base units, tagged with a `Dimension`. Expressions such
//! as "square feet", "km/h" or "meters per second" are parsed into a
//! single `Unit` whose dimension is the product of its terms.

use std::collections::HashMap;
use std::fmt;
use log::{debug, error, trace};

/// Exponents over the base quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension
{   pub length: i8
  , pub mass: i8
  , pub time: i8
  , pub temperature: i8
}

impl Dimension
{   pub const DIMENSIONLESS: Dimension = Dimension::new(0, 0, 0, 0);
    pub const LENGTH: Dimension = Dimension::new(1, 0, 0, 0);
    pub const MASS: Dimension = Dimension::new(0, 1, 0, 0);
    pub const TIME: Dimension = Dimension::new(0, 0, 1, 0);
    pub const TEMPERATURE: Dimension = Dimension::new(0, 0, 0, 1);
    pub const AREA: Dimension = Dimension::new(2, 0, 0, 0);
    pub const VOLUME: Dimension = Dimension::new(3, 0, 0, 0);
    pub const SPEED: Dimension = Dimension::new(1, 0, -1, 0);

    pub const fn new(
      length: i8
    , mass: i8
    , time: i8
    , temperature: i8
    ) -> Self
    {   Dimension { length, mass, time, temperature }
    }

    /// Product of two dimensions; None if an exponent leaves i8
    pub fn mul(self, other: Dimension) -> Option<Dimension>
    {   Some(Dimension
        {   length: self.length.checked_add(other.length)?
          , mass: self.mass.checked_add(other.mass)?
          , time: self.time.checked_add(other.time)?
          , temperature: self.temperature
              .checked_add(other.temperature)?
        })
    }

    pub fn powi(self, n: i8) -> Option<Dimension>
    {   Some(Dimension
        {   length: self.length.checked_mul(n)?
          , mass: self.mass.checked_mul(n)?
          , time: self.time.checked_mul(n)?
          , temperature: self.temperature.checked_mul(n)?
        })
    }

    pub fn div(self, other: Dimension) -> Option<Dimension>
    {   self.mul(other.powi(-1)?)
    }
}

impl fmt::Display for Dimension
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let axes = [
          ("length", self.length)
        , ("mass", self.mass)
        , ("time", self.time)
        , ("temperature", self.temperature)
        ];
        let render = |name: &str, exp: i16| {
          if exp == 1
          {   format!("[{}]", name)
          } else
          {   format!("[{}] ** {}", name, exp)
          }
        };
        let num: Vec<String> = axes.iter()
          .filter(|(_, e)| *e > 0)
          .map(|(n, e)| render(n, i16::from(*e)))
          .collect();
        let den: Vec<String> = axes.iter()
          .filter(|(_, e)| *e < 0)
          .map(|(n, e)| render(n, -i16::from(*e)))
          .collect();

        match (num.is_empty(), den.is_empty())
        {   (true, true) => write!(f, "dimensionless")
          , (false, true) => write!(f, "{}", num.join(" * "))
          , (true, false) => write!(f, "1 / {}", den.join(" / "))
          , (false, false) => {
              write!(f, "{} / {}", num.join(" * "), den.join(" / "))
            }
        }
    }
}

/// A named unit known to the registry
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDefinition
{   /// Canonical name
    pub name: &'static str
  , /// Symbols, plurals and alternative spellings
    pub aliases: &'static [&'static str]
  , pub dimension: Dimension
  , /// Multiplier to SI base units
    pub factor: f64
  , /// Added after scaling; non-zero only for affine units
    pub offset: f64
}

impl UnitDefinition
{   pub const fn linear(
      name: &'static str
    , aliases: &'static [&'static str]
    , dimension: Dimension
    , factor: f64
    ) -> Self
    {   UnitDefinition { name, aliases, dimension, factor, offset: 0.0 }
    }

    pub const fn affine(
      name: &'static str
    , aliases: &'static [&'static str]
    , dimension: Dimension
    , factor: f64
    , offset: f64
    ) -> Self
    {   UnitDefinition { name, aliases, dimension, factor, offset }
    }

    pub fn is_offset(&self) -> bool
    {   self.offset != 0.0
    }
}

/// A parsed unit expression, ready for conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Unit
{   pub expression: String
  , pub dimension: Dimension
  , pub factor: f64
  , pub offset: f64
}

impl Unit
{   /// Magnitude in this unit -> magnitude in SI base units
    pub fn to_base(&self, value: f64) -> f64
    {   value * self.factor + self.offset
    }

    /// Magnitude in SI base units -> magnitude in this unit
    pub fn from_base(&self, base: f64) -> f64
    {   (base - self.offset) / self.factor
    }
}

const FAHRENHEIT_FACTOR: f64 = 5.0 / 9.0;

pub const DEFAULT_UNITS: &[UnitDefinition] = &[
  // Length (base: meter)
  UnitDefinition::linear("meter", &["m", "metre"], Dimension::LENGTH, 1.0)
, UnitDefinition::linear("centimeter", &["cm", "centimetre"], Dimension::LENGTH, 0.01)
, UnitDefinition::linear("millimeter", &["mm", "millimetre"], Dimension::LENGTH, 0.001)
, UnitDefinition::linear("kilometer", &["km", "kilometre"], Dimension::LENGTH, 1000.0)
, UnitDefinition::linear("inch", &["in"], Dimension::LENGTH, 0.0254)
, UnitDefinition::linear("foot", &["ft", "feet"], Dimension::LENGTH, 0.3048)
, UnitDefinition::linear("yard", &["yd"], Dimension::LENGTH, 0.9144)
, UnitDefinition::linear("mile", &["mi"], Dimension::LENGTH, 1609.344)
, UnitDefinition::linear("nautical mile", &["nmi", "nautical_mile"], Dimension::LENGTH, 1852.0)
  // Mass (base: kilogram)
, UnitDefinition::linear("gram", &["g", "gramme"], Dimension::MASS, 0.001)
, UnitDefinition::linear("milligram", &["mg"], Dimension::MASS, 1e-6)
, UnitDefinition::linear("kilogram", &["kg"], Dimension::MASS, 1.0)
, UnitDefinition::linear("tonne", &["t", "metric ton"], Dimension::MASS, 1000.0)
, UnitDefinition::linear("pound", &["lb", "lbs"], Dimension::MASS, 0.45359237)
, UnitDefinition::linear("ounce", &["oz"], Dimension::MASS, 0.028349523125)
  // Temperature (base: kelvin)
, UnitDefinition::linear("kelvin", &["k"], Dimension::TEMPERATURE, 1.0)
, UnitDefinition::affine("celsius", &["degc", "°c", "degree celsius", "degrees celsius"], Dimension::TEMPERATURE, 1.0, 273.15)
, UnitDefinition::affine("fahrenheit", &["degf", "°f", "degree fahrenheit", "degrees fahrenheit"], Dimension::TEMPERATURE, FAHRENHEIT_FACTOR, 459.67 * FAHRENHEIT_FACTOR)
, UnitDefinition::linear("rankine", &["degr", "°r"], Dimension::TEMPERATURE, FAHRENHEIT_FACTOR)
  // Volume (base: cubic meter)
, UnitDefinition::linear("liter", &["l", "litre"], Dimension::VOLUME, 1e-3)
, UnitDefinition::linear("milliliter", &["ml", "millilitre"], Dimension::VOLUME, 1e-6)
, UnitDefinition::linear("gallon", &["gal"], Dimension::VOLUME, 3.785411784e-3)
, UnitDefinition::linear("quart", &["qt"], Dimension::VOLUME, 9.46352946e-4)
, UnitDefinition::linear("pint", &["pt"], Dimension::VOLUME, 4.73176473e-4)
, UnitDefinition::linear("cup", &[], Dimension::VOLUME, 2.365882365e-4)
, UnitDefinition::linear("fluid ounce", &["fl oz", "floz", "fluid_ounce"], Dimension::VOLUME, 2.95735295625e-5)
  // Time (base: second)
, UnitDefinition::linear("second", &["s", "sec"], Dimension::TIME, 1.0)
, UnitDefinition::linear("minute", &["min"], Dimension::TIME, 60.0)
, UnitDefinition::linear("hour", &["h", "hr"], Dimension::TIME, 3600.0)
, UnitDefinition::linear("day", &["d"], Dimension::TIME, 86400.0)
, UnitDefinition::linear("week", &["wk"], Dimension::TIME, 604800.0)
  // Area (base: square meter)
, UnitDefinition::linear("acre", &["ac"], Dimension::AREA, 4046.8564224)
, UnitDefinition::linear("hectare", &["ha"], Dimension::AREA, 1e4)
  // Speed (base: meter per second)
, UnitDefinition::linear("knot", &["kn", "kt"], Dimension::SPEED, 1852.0 / 3600.0)
, UnitDefinition::linear("mph", &[], Dimension::SPEED, 0.44704)
, UnitDefinition::linear("kph", &["kmh"], Dimension::SPEED, 1.0 / 3.6)
];

fn is_per(token: &str) -> bool
{   token == "per" || token == "/"
}

/// Split "m^2", "m²" or "m³" into name and exponent
fn split_exponent(token: &str)
  -> Result<(&str, i8), crate::error::Error>
{   if let Some((name, exp)) = token.split_once('^')
    {   let exp: i8 = exp.parse()
          .ok()
          .filter(|exp| *exp != 0)
          .ok_or_else(|| crate::error::Error::InvalidUnit(
            token.to_string()
          ))?;
        return Ok((name, exp));
    }
    if let Some(name) = token.strip_suffix('²')
    {   return Ok((name, 2));
    }
    if let Some(name) = token.strip_suffix('³')
    {   return Ok((name, 3));
    }
    Ok((token, 1))
}

/// Registry of known units, looked up by name, alias or plural
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry
{   units: Vec<UnitDefinition>
  , index: HashMap<String, usize>
}

impl UnitRegistry
{   /// Create an empty registry
    pub fn new() -> Self
    {   UnitRegistry::default()
    }

    /// Create a registry holding the built-in units
    pub fn with_defaults() -> Self
    {   let mut registry = UnitRegistry::new();
        for def in DEFAULT_UNITS
        {   if let Err(e) = registry.define(def.clone())
            {   error!("Skipping built-in unit '{}': {}", def.name, e);
            }
        }
        debug!("Unit registry loaded with {} units", registry.len());
        registry
    }

    /// Add a unit; fails if its name or an alias is taken
    pub fn define(&mut self, def: UnitDefinition)
      -> Result<(), crate::error::Error>
    {   if !def.factor.is_finite() || def.factor == 0.0
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("unit '{}' has an unusable factor", def.name)
            ));
        }
        let keys: Vec<String> = std::iter::once(def.name)
          .chain(def.aliases.iter().copied())
          .map(|k| k.to_lowercase())
          .collect();
        if let Some(taken) = keys.iter()
          .find(|k| self.index.contains_key(k.as_str()))
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("unit name '{}' is already defined", taken)
            ));
        }

        let slot = self.units.len();
        for key in keys
        {   self.index.insert(key, slot);
        }
        self.units.push(def);
        Ok(())
    }

    pub fn len(&self) -> usize
    {   self.units.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.units.is_empty()
    }

    /// Look up a single unit name, falling back to singular forms
    pub fn lookup(&self, name: &str) -> Option<&UnitDefinition>
    {   let key = name.trim().to_lowercase();
        let found = self.index.get(&key)
          .or_else(|| {
            key.strip_suffix('s')
              .filter(|stem| stem.chars().count() >= 3)
              .and_then(|stem| self.index.get(stem))
          })
          .or_else(|| {
            key.strip_suffix("es")
              .filter(|stem| stem.chars().count() >= 3)
              .and_then(|stem| self.index.get(stem))
          });
        found.map(|&slot| &self.units[slot])
    }

    /// Resolve one term at the head of `tokens`
    /// Returns the unit, tokens consumed and trailing exponent.
    fn resolve_term(&self, tokens: &[&str])
      -> Result<(&UnitDefinition, usize, i8), crate::error::Error>
    {   if tokens.len() >= 2 && !is_per(tokens[1])
        {   let joined = format!("{} {}", tokens[0], tokens[1]);
            if let Ok((name, exp)) = split_exponent(&joined)
            {   if let Some(def) = self.lookup(name)
                {   return Ok((def, 2, exp));
                }
            }
        }

        let (name, exp) = split_exponent(tokens[0])?;
        self.lookup(name)
          .map(|def| (def, 1, exp))
          .ok_or_else(|| crate::error::Error::InvalidUnit(
            tokens[0].to_string()
          ))
    }

    /// Parse a unit expression into a single convertible unit
    pub fn parse(&self, expression: &str)
      -> Result<Unit, crate::error::Error>
    {   let trimmed = expression.trim();
        let normalized = trimmed.to_lowercase().replace('/', " / ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.is_empty()
        {   return Err(crate::error::Error::InvalidUnit(
              expression.to_string()
            ));
        }

        let overflow = || crate::error::Error::NumericOverflow(format!(
          "unit exponent out of range in '{}'", trimmed
        ));
        let mut terms: Vec<(&UnitDefinition, i8)> = Vec::new();
        let mut pending_power: i8 = 1;
        let mut denominator = false;
        let mut i = 0;

        while i < tokens.len()
        {   let token = tokens[i];
            if is_per(token)
            {   if terms.is_empty() || denominator || pending_power != 1
                {   return Err(crate::error::Error::InvalidUnit(
                      trimmed.to_string()
                    ));
                }
                denominator = true;
                i += 1;
                continue;
            }
            match token
            {   "square" | "sq" => {
                  pending_power = pending_power.checked_mul(2)
                    .ok_or_else(overflow)?;
                  i += 1;
                  continue;
                }
              , "cubic" | "cu" => {
                  pending_power = pending_power.checked_mul(3)
                    .ok_or_else(overflow)?;
                  i += 1;
                  continue;
                }
              , _ => {}
            }

            let (def, consumed, suffix_power)
              = self.resolve_term(&tokens[i..])?;
            let mut power = pending_power.checked_mul(suffix_power)
              .ok_or_else(overflow)?;
            if denominator
            {   power = power.checked_neg().ok_or_else(overflow)?;
            }
            trace!("Unit term '{}' ^ {}", def.name, power);
            terms.push((def, power));

            pending_power = 1;
            denominator = false;
            i += consumed;
        }

        if pending_power != 1 || denominator
        {   return Err(crate::error::Error::InvalidUnit(
              trimmed.to_string()
            ));
        }

        let compound = terms.len() > 1;
        if terms.iter().any(|(def, power)| {
          def.is_offset() && (compound || *power != 1)
        })
        {   return Err(crate::error::Error::OffsetUnitCalculus(
              trimmed.to_string()
            ));
        }

        let dimension = terms.iter()
          .try_fold(Dimension::DIMENSIONLESS, |acc, (def, power)| {
            acc.mul(def.dimension.powi(*power)?)
          })
          .ok_or_else(overflow)?;
        let factor: f64 = terms.iter()
          .map(|(def, power)| def.factor.powi(i32::from(*power)))
          .product();
        let offset = match terms.as_slice()
        {   [(def, 1)] => def.offset
          , _ => 0.0
        };

        Ok(Unit
        {   expression: trimmed.to_string()
          , dimension
          , factor
          , offset
        })
    }
}
