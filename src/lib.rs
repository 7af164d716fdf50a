pub mod error;
pub mod config;
pub mod units;
pub mod converter;
pub mod providers;
pub mod request;
pub mod client;

pub use client::ConverterBackend;
pub use config::{ConverterConfig, GeminiConfig};
pub use converter::{Conversion, UnitCategory, UnitConverter};
pub use error::Error;
pub use request::{AiQuery, ConversionRequest};

/*

unitconv converts values between physical units two ways: directly,
through a dimension-aware unit registry (simple mode), or by handing a
natural-language query to a hosted text-generation model (advanced
mode). The two paths share nothing but the read-only category table.

unitconv/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Backend command interface and re-exports
│   ├── main.rs         # Command-line front end
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # API key, endpoint, timeout
│   ├── units.rs        # Dimensions, unit registry, expression parser
│   ├── converter.rs    # Deterministic conversion + categories
│   ├── request.rs      # Request types and instruction template
│   ├── client.rs       # Task-owning backend routing commands
│   └── providers/
│       ├── mod.rs
│       └── gemini.rs   # generateContent HTTP client
└── tests/

*/

/// UNITCONV BACKEND INTERFACE:

// ===== Convert =====

pub type ConvertReply = Result<Conversion, crate::error::Error>;
pub type ConvertReplySender
  = tokio::sync::mpsc::UnboundedSender<ConvertReply>;

pub struct ConvertArgs
{   pub request: ConversionRequest
  , pub reply: ConvertReplySender
}

// ===== AiConvert =====

pub type AiConvertReply = Result<String, crate::error::Error>;
pub type AiConvertReplySender
  = tokio::sync::mpsc::UnboundedSender<AiConvertReply>;

pub struct AiConvertArgs
{   pub query: AiQuery
  , pub reply: AiConvertReplySender
}

// ===== GetCategories =====

pub type GetCategoriesReply
  = Result<Vec<UnitCategory>, crate::error::Error>;
pub type GetCategoriesReplySender
  = tokio::sync::mpsc::UnboundedSender<GetCategoriesReply>;

pub struct GetCategoriesArgs
{   pub reply: GetCategoriesReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== ConverterHand (sender side) =====

pub struct ConverterHand
{   pub convert_tx
      : tokio::sync::mpsc::UnboundedSender<ConvertArgs>
  , pub ai_convert_tx
      : tokio::sync::mpsc::UnboundedSender<AiConvertArgs>
  , pub get_categories_tx
      : tokio::sync::mpsc::UnboundedSender<GetCategoriesArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== ConverterFoot (receiver side) =====

pub struct ConverterFoot
{   pub convert_rx
      : tokio::sync::mpsc::UnboundedReceiver<ConvertArgs>
  , pub ai_convert_rx
      : tokio::sync::mpsc::UnboundedReceiver<AiConvertArgs>
  , pub get_categories_rx
      : tokio::sync::mpsc::UnboundedReceiver<GetCategoriesArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}
