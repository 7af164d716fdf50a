use std::fmt;

/// Error type for unitconv operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{   /// Unit name not known to the registry
    InvalidUnit(String)
  , /// Units resolve to different physical dimensions
    IncompatibleDimension
    {   from: String
      , from_dimension: crate::units::Dimension
      , to: String
      , to_dimension: crate::units::Dimension
    }
  , /// Offset unit used with an exponent or inside a compound
    OffsetUnitCalculus(String)
  , /// Finite input produced a non-finite result
    NumericOverflow(String)
  , /// Category name not in the category table
    UnknownCategory(String)
  , /// Unit is valid but not offered by the chosen category
    UnitNotInCategory
    {   unit: String
      , category: String
    }
  , /// Query was empty or whitespace only
    EmptyInput
  , /// API key is missing for the AI path
    MissingApiKey(String)
  , /// Request never got a response (DNS, refused, timeout)
    Transport(String)
  , /// API answered with a non-success status
    Api
    {   status: u16
      , body: String
    }
  , /// Success status but the body lacks the expected fields
    MalformedResponse(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidUnit(unit) => {
              write!(f, "Unknown unit: '{}'", unit)
            }
          , Error::IncompatibleDimension {
              from, from_dimension, to, to_dimension
            } => {
              write!(f,
                "Cannot convert from '{}' ({}) to '{}' ({})",
                from, from_dimension, to, to_dimension
              )
            }
          , Error::OffsetUnitCalculus(expr) => {
              write!(f,
                "Offset unit cannot be powered or combined: '{}'",
                expr
              )
            }
          , Error::NumericOverflow(msg) => {
              write!(f, "Numeric overflow: {}", msg)
            }
          , Error::UnknownCategory(name) => {
              write!(f, "Unknown category: '{}'", name)
            }
          , Error::UnitNotInCategory { unit, category } => {
              write!(f,
                "Unit '{}' is not offered in category {}",
                unit, category
              )
            }
          , Error::EmptyInput => {
              write!(f, "Please enter a valid query.")
            }
          , Error::MissingApiKey(what) => {
              write!(f, "Missing API key for: {}", what)
            }
          , Error::Transport(msg) => {
              write!(f, "AI Error: transport failure: {}", msg)
            }
          , Error::Api { status, body } => {
              write!(f, "AI Error: HTTP {}: {}", status, body)
            }
          , Error::MalformedResponse(msg) => {
              write!(f, "AI Error: malformed response: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
