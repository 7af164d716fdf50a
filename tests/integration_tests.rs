use std::time::Duration;

use mockito::{Matcher, Server};
use unitconv::{
  AiQuery, ConversionRequest, ConverterBackend, ConverterConfig, Error,
  GeminiConfig,
};

fn offline_config() -> ConverterConfig
{   ConverterConfig::default()
}

async fn recv<T>(mut rx: tokio::sync::mpsc::UnboundedReceiver<T>) -> T
{   tokio::time::timeout(Duration::from_secs(15), rx.recv())
      .await
      .expect("timed out waiting for reply")
      .expect("reply channel closed")
}

#[tokio::test]
async fn test_backend_initialization()
{   let backend = ConverterBackend::new(offline_config());
    assert!(backend.shutdown().await.is_ok());
}

#[tokio::test]
async fn test_backend_convert()
{   let backend = ConverterBackend::new(offline_config());

    let rx = backend
      .convert(ConversionRequest::new(100.0, "meters", "feet"))
      .await
      .unwrap();
    let conversion = recv(rx).await.unwrap();
    assert_eq!(conversion.to_string(), "100 meters is 328.0840 feet");

    let rx = backend
      .convert(ConversionRequest::new(1.0, "meters", "kilograms"))
      .await
      .unwrap();
    assert!(matches!(
      recv(rx).await,
      Err(Error::IncompatibleDimension { .. })
    ));

    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_backend_convert_in_category()
{   let backend = ConverterBackend::new(offline_config());

    let rx = backend
      .convert(
        ConversionRequest::new(0.0, "celsius", "fahrenheit")
          .in_category("Temperature")
      )
      .await
      .unwrap();
    assert_eq!(
      recv(rx).await.unwrap().to_string(),
      "0 celsius is 32.0000 fahrenheit"
    );

    let rx = backend
      .convert(
        ConversionRequest::new(1.0, "celsius", "feet")
          .in_category("Temperature")
      )
      .await
      .unwrap();
    assert!(matches!(
      recv(rx).await,
      Err(Error::UnitNotInCategory { .. })
    ));

    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_backend_get_categories()
{   let backend = ConverterBackend::new(offline_config());
    let rx = backend.get_categories().await.unwrap();
    let categories = recv(rx).await.unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[4].name, "Speed");
    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_ai_path_without_key_leaves_convert_working()
{   let backend = ConverterBackend::new(offline_config());

    let rx = backend
      .ai_convert(AiQuery::new("100 meters to feet"))
      .await
      .unwrap();
    assert!(matches!(recv(rx).await, Err(Error::MissingApiKey(_))));

    let rx = backend
      .convert(ConversionRequest::new(2.0, "hours", "minutes"))
      .await
      .unwrap();
    assert!((recv(rx).await.unwrap().converted - 120.0).abs() < 1e-9);

    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_blank_query_rejected_before_key_check()
{   let backend = ConverterBackend::new(offline_config());
    let rx = backend.ai_convert(AiQuery::new("  ")).await.unwrap();
    assert_eq!(recv(rx).await, Err(Error::EmptyInput));
    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_backend_ai_convert_with_stubbed_endpoint()
{   let mut server = Server::new_async().await;
    let mock = server
      .mock("POST", "/models/gemini-2.0-flash:generateContent")
      .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"328.08 feet"}]}}]}"#)
      .expect(2)
      .create_async()
      .await;

    let config = ConverterConfig
    {   gemini: GeminiConfig
        {   api_key: Some("test-key".to_string())
          , api_base: server.url()
          , ..GeminiConfig::default()
        }
    };
    let backend = ConverterBackend::new(config);

    // two in flight at once, each with its own reply channel
    let first = backend
      .ai_convert(AiQuery::new("100 meters to feet"))
      .await
      .unwrap();
    let second = backend
      .ai_convert(AiQuery::new("100 meters to feet"))
      .await
      .unwrap();

    assert_eq!(recv(first).await.unwrap(), "328.08 feet");
    assert_eq!(recv(second).await.unwrap(), "328.08 feet");
    mock.assert_async().await;

    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_backend_ai_api_error_is_reported()
{   let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/models/gemini-2.0-flash:generateContent")
      .match_query(Matcher::Any)
      .with_status(500)
      .with_body("upstream unavailable")
      .create_async()
      .await;

    let config = ConverterConfig
    {   gemini: GeminiConfig
        {   api_key: Some("test-key".to_string())
          , api_base: server.url()
          , ..GeminiConfig::default()
        }
    };
    let backend = ConverterBackend::new(config);
    let rx = backend
      .ai_convert(AiQuery::new("1 mile to km"))
      .await
      .unwrap();

    let err = recv(rx).await.unwrap_err();
    assert_eq!(
      err,
      Error::Api { status: 500, body: "upstream unavailable".to_string() }
    );
    assert_eq!(err.to_string(), "AI Error: HTTP 500: upstream unavailable");

    let _ = backend.shutdown().await;
}

#[tokio::test]
async fn test_dropped_backend_still_answers_queued_work()
{   let backend = ConverterBackend::new(offline_config());
    let rx = backend.get_categories().await.unwrap();
    drop(backend);
    let categories = recv(rx).await.unwrap();
    assert_eq!(categories.len(), 7);
}

#[test]
fn test_backend_from_sync_caller()
{   tokio_test::block_on(async {
      let backend = ConverterBackend::new(offline_config());
      let rx = backend
        .convert(ConversionRequest::new(1.0, "days", "hours"))
        .await
        .unwrap();
      let conversion = tokio_test::assert_ok!(recv(rx).await);
      assert_eq!(conversion.to_string(), "1 days is 24.0000 hours");
      tokio_test::assert_ok!(backend.shutdown().await);
    });
}
