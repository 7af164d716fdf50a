//! Request types shared by the converter and the AI dispatcher

use serde::{Deserialize, Serialize};

/// Deterministic conversion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest
{   /// Magnitude in the source unit
    pub value: f64
  , /// Source unit expression
    pub from_unit: String
  , /// Target unit expression
    pub to_unit: String
  , /// Restrict both units to this category, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>
}

impl ConversionRequest
{   pub fn new(value: f64, from_unit: &str, to_unit: &str) -> Self
    {   ConversionRequest
        {   value
          , from_unit: from_unit.to_string()
          , to_unit: to_unit.to_string()
          , category: None
        }
    }

    pub fn in_category(mut self, category: &str) -> Self
    {   self.category = Some(category.to_string());
        self
    }
}

/// Free-text conversion query for the AI path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiQuery
{   pub text: String
}

impl AiQuery
{   pub fn new(text: impl Into<String>) -> Self
    {   AiQuery { text: text.into() }
    }

    /// True for empty or whitespace-only queries
    pub fn is_blank(&self) -> bool
    {   self.text.trim().is_empty()
    }

    /// The query wrapped in the fixed instruction template
    pub fn instruction(&self) -> String
    {   format!(
          "Please convert {}. Provide only the numerical result \
           with units, no additional text.",
          self.text
        )
    }
}
