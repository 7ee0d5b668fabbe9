//! HTTP transport: POST a JSON body, get a JSON document back

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use log::{debug, error, trace};

use crate::error::{Error, Result};

/// One request/response exchange with a provider endpoint.
/// Implementations must not retry; failures are terminal for the query.
#[async_trait]
pub trait Transport: Send + Sync
{   async fn post(
      &self
    , url: &str
    , headers: HeaderMap
    , body: Value
    ) -> Result<Value>;
}

/// Default transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct HttpTransport
{   http_client: reqwest::Client
}

impl HttpTransport
{   pub fn new() -> Self
    {   HttpTransport::default()
    }

    pub fn with_client(http_client: reqwest::Client) -> Self
    {   HttpTransport { http_client }
    }
}

#[async_trait]
impl Transport for HttpTransport
{   async fn post(
      &self
    , url: &str
    , headers: HeaderMap
    , body: Value
    ) -> Result<Value>
    {   let body = compact(body);
        debug!("POST {}", url);
        trace!("Request body: {}", body);

        let response = self.http_client
          .post(url)
          .headers(headers)
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            e
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        let text = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::Transport
          {   status: Some(status.as_u16())
            , body: e.to_string()
          }
        })?;

        if !status.is_success()
        {   error!("API error (status {}): {}", status, text);
            return Err(Error::Transport
            {   status: Some(status.as_u16())
              , body: text
            });
        }

        let envelope: Value = serde_json::from_str(&text).map_err(|e| {
          error!("Parse error: {}", e);
          e
        })?;
        Ok(envelope)
    }
}

/// Drop top-level fields whose value is null
pub fn compact(body: Value) -> Value
{   match body
    {   Value::Object(map) => Value::Object(
          map.into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect()
        )
      , other => other
    }
}

/// In-memory transport that records each call and answers from a script
#[cfg(test)]
pub(crate) mod testing
{   use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct Recorded
    {   pub url: String
      , pub headers: HeaderMap
      , pub body: Value
    }

    pub(crate) struct RecordingTransport
    {   reply: Result<Value>
      , calls: Mutex<Vec<Recorded>>
    }

    impl RecordingTransport
    {   pub(crate) fn replying(reply: Value) -> Arc<Self>
        {   Arc::new(RecordingTransport
            {   reply: Ok(reply)
              , calls: Mutex::new(Vec::new())
            })
        }

        pub(crate) fn failing(err: Error) -> Arc<Self>
        {   Arc::new(RecordingTransport
            {   reply: Err(err)
              , calls: Mutex::new(Vec::new())
            })
        }

        pub(crate) fn calls(&self) -> Vec<Recorded>
        {   self.calls.lock().unwrap().clone()
        }

        pub(crate) fn last(&self) -> Recorded
        {   self.calls().pop().expect("no request was sent")
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport
    {   async fn post(
          &self
        , url: &str
        , headers: HeaderMap
        , body: Value
        ) -> Result<Value>
        {   self.calls.lock().unwrap().push(Recorded
            {   url: url.to_string()
              , headers
              , body
            });
            self.reply.clone()
        }
    }
}
