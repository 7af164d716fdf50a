use std::sync::Arc;
use tokio::sync::mpsc;
use log::{debug, error, info};
use crate::ConverterFoot;

/// State owned by the backend task
pub struct ConverterBackendState
{   pub converter: crate::converter::UnitConverter
  , /// Err holds the reason the AI path is unavailable
    pub gemini: Result<
        Arc<crate::providers::gemini::GeminiClient>,
        crate::error::Error
      >
}

impl ConverterBackendState
{   /// Create backend state; a missing API key only disables the AI path
    pub fn new(
      config: crate::config::ConverterConfig
    , converter: crate::converter::UnitConverter
    ) -> Self
    {   debug!("Initializing ConverterBackendState");
        let gemini
          = crate::providers::gemini::GeminiClient::new(&config.gemini)
              .map(Arc::new);
        if let Err(e) = &gemini
        {   info!("AI conversion unavailable: {}", e);
        }
        ConverterBackendState
        {   converter
          , gemini
        }
    }

    fn handle_convert(
      &self
    , request: crate::request::ConversionRequest
    ) -> crate::ConvertReply
    {   match &request.category
        {   Some(category) => self.converter.convert_in_category(
              category
            , request.value
            , &request.from_unit
            , &request.to_unit
            )
          , None => self.converter.convert(
              request.value
            , &request.from_unit
            , &request.to_unit
            )
        }
    }
}

/// Public API for the unitconv backend - owns the task
pub struct ConverterBackend
{   hand: crate::ConverterHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl ConverterBackend
{   /// Create and spawn a backend with the built-in unit registry
    /// Returns immediately - spawns background task
    pub fn new(config: crate::config::ConverterConfig) -> Self
    {   Self::with_converter(
          config
        , crate::converter::UnitConverter::default()
        )
    }

    /// Create and spawn a backend around an existing converter
    pub fn with_converter(
      config: crate::config::ConverterConfig
    , converter: crate::converter::UnitConverter
    ) -> Self
    {   debug!("Creating ConverterBackend with task ownership");

        let (convert_tx, convert_rx)
          = mpsc::unbounded_channel();
        let (ai_convert_tx, ai_convert_rx)
          = mpsc::unbounded_channel();
        let (get_categories_tx, get_categories_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::ConverterHand
        {   convert_tx
          , ai_convert_tx
          , get_categories_tx
          , kill_process_tx
        };

        let foot = crate::ConverterFoot
        {   convert_rx
          , ai_convert_rx
          , get_categories_rx
          , kill_process_rx
        };

        let state = ConverterBackendState::new(config, converter);
        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, state).await
        });

        ConverterBackend
        {   hand
          , _task_handle
        }
    }

    /// Queue a deterministic conversion - returns almost immediately
    pub async fn convert(
      &self
    , request: crate::request::ConversionRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::ConvertReply>,
        crate::error::Error
      >
    {   debug!(
          "convert queuing {} {} -> {}",
          request.value, request.from_unit, request.to_unit
        );
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::ConvertArgs
        {   request
          , reply: reply_tx
        };

        self.hand.convert_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Queue an AI conversion - returns almost immediately
    pub async fn ai_convert(
      &self
    , query: crate::request::AiQuery
    ) -> Result<
        mpsc::UnboundedReceiver<crate::AiConvertReply>,
        crate::error::Error
      >
    {   debug!("ai_convert queuing {} chars", query.text.len());
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::AiConvertArgs
        {   query
          , reply: reply_tx
        };

        self.hand.ai_convert_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Get the category table - returns almost immediately
    pub async fn get_categories(
      &self
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GetCategoriesReply>,
        crate::error::Error
      >
    {   debug!("get_categories queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GetCategoriesArgs
        {   reply: reply_tx
        };

        self.hand.get_categories_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down ConverterBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend exited without confirming shutdown");
            Err(crate::error::Error::Other(
              "Backend exited without confirming shutdown".to_string()
            ))
        }
    }
}

/// Main backend event loop
///
/// tokio::select! is only for fast queueing. Conversions are pure and
/// answered inline; each AI query runs in its own task so a slow or
/// failing request never holds up the loop or another request.
async fn run_backend_loop(
  foot: crate::ConverterFoot
, state: ConverterBackendState
)
{   debug!("Starting ConverterBackend event loop");
    let ConverterFoot
    {   mut convert_rx
      , mut ai_convert_rx
      , mut get_categories_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = convert_rx.recv() => {
          debug!("Received Convert");
          let result = state.handle_convert(cmd.request);
          let _ = cmd.reply.send(result);
        }
      , Some(cmd) = ai_convert_rx.recv() => {
          debug!("Received AiConvert");
          if cmd.query.is_blank()
          {   let _ = cmd.reply.send(
                Err(crate::error::Error::EmptyInput)
              );
              continue;
          }
          match &state.gemini
          {   Ok(client) => {
                let client = Arc::clone(client);
                tokio::spawn(async move {
                  let result = client.ai_convert(&cmd.query).await;
                  let _ = cmd.reply.send(result);
                });
              }
            , Err(e) => {
                let _ = cmd.reply.send(Err(e.clone()));
              }
          }
        }
      , Some(cmd) = get_categories_rx.recv() => {
          debug!("Received GetCategories");
          let _ = cmd.reply.send(
            Ok(state.converter.categories().to_vec())
          );
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("ConverterBackend shutting down");
          break;
        }
      , else => {
          debug!("All command channels closed");
          break;
        }
      }
    }
}
