use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

// ===== Message Types =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content
{   #[serde(default)]
    pub parts: Vec<Part>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
}

impl GenerateContentRequest
{   /// One content entry holding one text part
    pub fn from_text(text: String) -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   parts: vec![Part { text: Some(text) }]
                , role: None
              }
            ]
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>
}

impl GenerateContentResponse
{   /// Text of the first part of the first candidate
    pub fn first_text(self) -> Result<String, crate::error::Error>
    {   let candidate = self.candidates.into_iter().next()
          .ok_or_else(|| crate::error::Error::MalformedResponse(
            "response contained no candidates".to_string()
          ))?;
        let content = candidate.content
          .ok_or_else(|| crate::error::Error::MalformedResponse(
            "first candidate has no content".to_string()
          ))?;
        let part = content.parts.into_iter().next()
          .ok_or_else(|| crate::error::Error::MalformedResponse(
            "first candidate has no parts".to_string()
          ))?;
        part.text
          .ok_or_else(|| crate::error::Error::MalformedResponse(
            "first part has no text".to_string()
          ))
    }
}

// ===== Gemini Client =====

/// Client for the generateContent endpoint
/// Cheap to share behind an Arc; every call builds its own request.
pub struct GeminiClient
{   http_client: reqwest::Client
  , api_key: String
  , api_base: String
  , model: String
  , timeout_secs: u64
}

impl GeminiClient
{   /// Build a client from configuration
    /// Fails without an API key or with an unusable config.
    pub fn new(config: &crate::config::GeminiConfig)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating GeminiClient for model: {}", config.model);
        config.validate()?;

        let api_key = config.api_key.clone()
          .filter(|k| !k.trim().is_empty())
          .ok_or_else(|| {
            error!("No Gemini API key configured");
            crate::error::Error::MissingApiKey(format!(
              "Gemini ({})", crate::config::ENV_API_KEY
            ))
          })?;

        let http_client = reqwest::Client::builder()
          .timeout(config.timeout())
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;

        Ok(GeminiClient
        {   http_client
          , api_key
          , api_base: config.api_base.trim_end_matches('/').to_string()
          , model: config.model.clone()
          , timeout_secs: config.timeout_secs
        })
    }

    /// Endpoint URL without the key parameter
    pub fn endpoint(&self) -> String
    {   format!(
          "{}/models/{}:generateContent",
          self.api_base, self.model
        )
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    /// Ask the model to perform a natural-language conversion
    pub async fn ai_convert(&self, query: &crate::request::AiQuery)
      -> Result<String, crate::error::Error>
    {   if query.is_blank()
        {   debug!("Rejecting blank query");
            return Err(crate::error::Error::EmptyInput);
        }
        self.generate(query.instruction()).await
    }

    /// Send one prompt and return the first candidate's text verbatim
    pub async fn generate(&self, prompt: String)
      -> Result<String, crate::error::Error>
    {   let endpoint = self.endpoint();
        debug!("Handling generate for: {}", self.model);

        let request = GenerateContentRequest::from_text(prompt);
        trace!("Gemini request: {:?}", request);

        let response = self.http_client
          .post(&endpoint)
          .query(&[("key", self.api_key.as_str())])
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            // the url carries the key
            let e = e.without_url();
            error!("HTTP error calling {}: {}", endpoint, e);
            if e.is_timeout()
            {   crate::error::Error::Transport(format!(
                  "request timed out after {}s", self.timeout_secs
                ))
            } else
            {   crate::error::Error::Transport(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("Gemini response status: {}", status);

        let body = response.text().await
          .map_err(|e| {
            let e = e.without_url();
            error!("Failed to read response body: {}", e);
            crate::error::Error::Transport(e.to_string())
          })?;

        if !status.is_success()
        {   error!("Gemini API error {}: {}", status, body);
            return Err(crate::error::Error::Api
            {   status: status.as_u16()
              , body
            });
        }

        let parsed: GenerateContentResponse
          = serde_json::from_str(&body).map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::MalformedResponse(e.to_string())
          })?;

        let text = parsed.first_text().map_err(|e| {
          error!("{}", e);
          e
        })?;
        debug!("Gemini returned {} bytes of text", text.len());
        Ok(text)
    }
}
