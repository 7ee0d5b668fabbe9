//! The per-provider adapter contract and its chat-completion implementation

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use log::{debug, error};

use crate::config::{PropertyStore, ProviderConfig, ProviderSettings};
use crate::error::{Error, Result};
use crate::extract::ResponseExtractor;
use crate::headers::HeaderBuilder;
use crate::message::{FormattedMessages, MessageFormatter, PromptInput};
use crate::providers::ProviderProfile;
use crate::request::RequestEnvelope;
use crate::transport::Transport;

/// Lifecycle of one adapter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterState
{   #[default]
    Unconfigured
  , /// Defaults loaded, refined by `set`
    Configured
  , /// Request sent, waiting on the transport
    Queried
  , /// Transport returned (success or failure)
    Responded
}

/// Uniform contract every provider adapter implements
#[async_trait]
pub trait Adapter: Send
{   fn service_type(&self) -> &str;

    fn state(&self) -> AdapterState;

    fn set(&mut self, option: &str, value: Value) -> Result<()>;

    fn get(&self, option: &str) -> Result<Option<Value>>;

    /// Set every option in `settings`. This default stops at the first
    /// error with earlier options already set; `ChatAdapter` overrides it
    /// with an all-or-nothing version.
    fn apply(&mut self, settings: &ProviderSettings) -> Result<()>
    {   for (name, value) in settings.entries()?
        {   self.set(&name, value)?;
        }
        Ok(())
    }

    /// Validate, format, send. The decoded response is kept for `one`/`all`.
    async fn query(&mut self, prompt: PromptInput) -> Result<()>;

    /// Primary completion; `""` before a successful query
    fn one(&self) -> String;

    /// Every completion in provider order; empty before a successful query
    fn all(&self) -> Vec<String>;

    fn last_response(&self) -> Option<&Value>
    {   None
    }
}

/// What a registered constructor receives
#[derive(Clone)]
pub struct AdapterContext
{   pub api_key: String
  , pub transport: Arc<dyn Transport>
}

impl fmt::Debug for AdapterContext
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("AdapterContext")
          .field("api_key", &"<redacted>")
          .finish_non_exhaustive()
    }
}

/// A fully resolved request, before it goes on the wire
#[derive(Debug, Clone)]
pub struct PreparedRequest
{   pub url: String
  , pub headers: HeaderMap
  , pub body: Value
}

/// Adapter for any provider described by a `ProviderProfile`
pub struct ChatAdapter
{   profile: ProviderProfile
  , store: PropertyStore
  , formatter: MessageFormatter
  , headers: HeaderBuilder
  , extractor: ResponseExtractor
  , transport: Arc<dyn Transport>
  , state: AdapterState
  , response: Option<Value>
}

impl ChatAdapter
{   pub fn new(
      profile: ProviderProfile
    , context: AdapterContext
    ) -> Self
    {   debug!("Creating {} adapter", profile.name);
        ChatAdapter
        {   store: PropertyStore::new(
              profile.defaults(&context.api_key)
            , profile.options
            )
          , formatter: MessageFormatter::new(profile.system_placement)
          , headers: HeaderBuilder::new(profile.auth)
              .with_extra(profile.extra_headers)
          , extractor: ResponseExtractor::new(profile.completion_path)
          , transport: context.transport
          , state: AdapterState::Configured
          , response: None
          , profile
        }
    }

    pub fn profile(&self) -> &ProviderProfile
    {   &self.profile
    }

    pub fn config(&self) -> &ProviderConfig
    {   self.store.config()
    }

    /// Message list as it would be sent for `prompt`
    pub fn format(&self, prompt: &PromptInput) -> Result<FormattedMessages>
    {   let config = self.store.config();
        self.formatter.format(prompt, config.system_prompt.as_deref())
    }

    /// URL, headers and body for `prompt`, without sending anything
    pub fn prepare(&self, prompt: &PromptInput) -> Result<PreparedRequest>
    {   let formatted = self.format(prompt)?;
        let config = self.store.config();
        let envelope = RequestEnvelope::build(
          config
        , formatted
        , self.profile.wire
        , self.profile.default_max_tokens
        );
        let body = serde_json::to_value(&envelope).map_err(|e| {
          Error::config(format!("request not serializable: {}", e))
        })?;
        Ok(PreparedRequest
        {   url: self.profile.url(&config.base_url)
          , headers: self.headers.build(&config.api_key)?
          , body
        })
    }
}

#[async_trait]
impl Adapter for ChatAdapter
{   fn service_type(&self) -> &str
    {   self.profile.name
    }

    fn state(&self) -> AdapterState
    {   self.state
    }

    fn set(&mut self, option: &str, value: Value) -> Result<()>
    {   self.store.set(option, value)
    }

    fn get(&self, option: &str) -> Result<Option<Value>>
    {   self.store.get(option)
    }

    fn apply(&mut self, settings: &ProviderSettings) -> Result<()>
    {   self.store.apply(settings)
    }

    async fn query(&mut self, prompt: PromptInput) -> Result<()>
    {   let request = self.prepare(&prompt)?;
        debug!(
          "Querying {} with model {}",
          self.profile.name, self.store.config().model
        );

        self.response = None;
        self.state = AdapterState::Queried;
        let outcome = self.transport
          .post(&request.url, request.headers, request.body)
          .await;
        self.state = AdapterState::Responded;

        match outcome
        {   Ok(envelope) => {
              self.response = Some(envelope);
              Ok(())
            }
          , Err(e) => {
              error!("{} query failed: {}", self.profile.name, e);
              Err(e)
            }
        }
    }

    fn one(&self) -> String
    {   match (self.state, &self.response)
        {   (AdapterState::Responded, Some(envelope)) => {
              self.extractor.one(envelope)
            }
          , _ => String::new()
        }
    }

    fn all(&self) -> Vec<String>
    {   match (self.state, &self.response)
        {   (AdapterState::Responded, Some(envelope)) => {
              self.extractor.all(envelope)
            }
          , _ => Vec::new()
        }
    }

    fn last_response(&self) -> Option<&Value>
    {   self.response.as_ref()
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use serde_json::json;
    use crate::error::ErrorKind;
    use crate::message::Message;
    use crate::providers::Provider;
    use crate::transport::testing::RecordingTransport;

    fn adapter(transport: Arc<RecordingTransport>) -> ChatAdapter
    {   ChatAdapter::new(
          *Provider::OpenAI.profile()
        , AdapterContext
          {   api_key: " sk-test ".into()
            , transport
          }
        )
    }

    #[test]
    fn starts_configured_with_empty_results()
    {   let a = adapter(RecordingTransport::replying(json!({})));
        assert_eq!(a.state(), AdapterState::Configured);
        assert_eq!(a.one(), "");
        assert!(a.all().is_empty());
    }

    #[test]
    fn query_stores_response_and_extracts()
    {   let transport = RecordingTransport::replying(json!({
          "choices": [{"message": {"content": "Pretoria"}}]
        }));
        let mut a = adapter(transport.clone());
        a.set("temperature", json!(0)).unwrap();
        a.set("model", json!("X")).unwrap();
        tokio_test::block_on(
          a.query("What is the capital of South Africa?".into())
        ).unwrap();

        assert_eq!(a.state(), AdapterState::Responded);
        assert_eq!(a.one(), "Pretoria");
        assert_eq!(a.all(), vec!["Pretoria"]);

        let sent = transport.last();
        assert_eq!(sent.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(sent.headers["authorization"], "Bearer sk-test");
        assert_eq!(sent.body["model"], "X");
        assert_eq!(sent.body["temperature"], 0.0);
        assert_eq!(sent.body["stream"], false);
        assert!(sent.body.get("top_p").is_none());
        assert!(!sent.body.to_string().contains("sk-test"));
    }

    #[test]
    fn empty_prompt_never_reaches_the_transport()
    {   let transport = RecordingTransport::replying(json!({}));
        let mut a = adapter(transport.clone());
        let err = tokio_test::block_on(a.query("   ".into())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = tokio_test::block_on(
          a.query(Vec::<Message>::new().into())
        ).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(transport.calls().is_empty());
        assert_eq!(a.state(), AdapterState::Configured);
    }

    #[test]
    fn transport_failure_is_surfaced_and_results_stay_empty()
    {   let transport = RecordingTransport::failing(Error::Transport
        {   status: Some(500)
          , body: "boom".into()
        });
        let mut a = adapter(transport);
        let err = tokio_test::block_on(a.query("Hi".into())).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(a.state(), AdapterState::Responded);
        assert_eq!(a.one(), "");
        assert!(a.last_response().is_none());
    }

    #[test]
    fn bad_settings_change_nothing()
    {   let mut a = adapter(RecordingTransport::replying(json!({})));
        let settings = ProviderSettings
        {   model: Some("gpt-4o".into())
          , temperature: Some(-1.0)
          , ..Default::default()
        };
        let err = a.apply(&settings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(a.get("model").unwrap(), Some(json!("gpt-4o-mini")));
    }

    #[test]
    fn conversation_is_sent_in_order_after_the_system_prompt()
    {   let transport = RecordingTransport::replying(json!({}));
        let mut a = adapter(transport.clone());
        a.set("systemPrompt", json!("S")).unwrap();
        let turns = vec![
          Message::user("Hi")
        , Message::assistant("Hello")
        , Message::user("Bye")
        ];
        tokio_test::block_on(a.query(turns.into())).unwrap();
        assert_eq!(transport.last().body["messages"], json!([
          {"role": "system", "content": "S"}
        , {"role": "user", "content": "Hi"}
        , {"role": "assistant", "content": "Hello"}
        , {"role": "user", "content": "Bye"}
        ]));
    }
}
