//! Outgoing request body shared by every chat-completion provider

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ProviderConfig;
use crate::message::{FormattedMessages, Message};

/// Provider wire names for the options whose key differs per API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireFields
{   pub stop: &'static str
  , pub random_seed: Option<&'static str>
  , pub safe_mode: Option<&'static str>
}

impl WireFields
{   pub const OPENAI: WireFields = WireFields
    {   stop: "stop"
      , random_seed: Some("seed")
      , safe_mode: None
    };
}

/// Chat request body; every unset option is left out entirely
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope
{   pub model: String
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>
  , pub messages: Vec<Message>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>
  , #[serde(flatten)]
    pub extras: Map<String, Value>
}

impl RequestEnvelope
{   pub fn build(
      config: &ProviderConfig
    , formatted: FormattedMessages
    , wire: WireFields
    , default_max_tokens: Option<u32>
    ) -> Self
    {   let mut extras = Map::new();
        if let Some(stop) = &config.stop
        {   extras.insert(wire.stop.to_string(), Value::from(stop.clone()));
        }
        if let (Some(key), Some(seed)) = (wire.random_seed, config.random_seed)
        {   extras.insert(key.to_string(), Value::from(seed));
        }
        if let (Some(key), Some(safe)) = (wire.safe_mode, config.safe_mode)
        {   extras.insert(key.to_string(), Value::from(safe));
        }

        RequestEnvelope
        {   model: config.model.clone()
          , system: formatted.system
          , messages: formatted.messages
          , temperature: config.temperature
          , top_p: config.top_p
          , max_tokens: config.max_tokens.or(default_max_tokens)
          , stream: config.stream
          , tools: config.tools.clone()
          , extras
        }
    }
}
