//! Built-in chat-completion providers.
//!
//! A provider is described by a `ProviderProfile`: the defaults and wire
//! policies that `ChatAdapter` composes into a working client. New
//! OpenAI-compatible backends (local servers, gateways) only need a
//! profile; see `ProviderProfile::openai_compatible`.

pub mod anthropic;
pub mod groq;
pub mod mistral;
pub mod openai;
pub mod xai;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigOption, ProviderConfig};
use crate::error::{Error, Result};
use crate::extract::CompletionPath;
use crate::headers::AuthScheme;
use crate::message::SystemPlacement;
use crate::request::WireFields;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Options accepted by OpenAI-style APIs: the common set plus a seed
pub const OPENAI_OPTIONS: [ConfigOption; 10] =
[   ConfigOption::Model
  , ConfigOption::BaseUrl
  , ConfigOption::SystemPrompt
  , ConfigOption::Temperature
  , ConfigOption::TopP
  , ConfigOption::MaxTokens
  , ConfigOption::Stream
  , ConfigOption::Stop
  , ConfigOption::Tools
  , ConfigOption::RandomSeed
];

/// Everything that varies between providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderProfile
{   /// Registry name, lowercase
    pub name: &'static str
  , pub base_url: &'static str
  , /// Path appended to the base URL
    pub endpoint: &'static str
  , pub default_model: &'static str
  , pub default_system_prompt: &'static str
  , pub auth: AuthScheme
  , /// Non-secret headers sent on every request
    pub extra_headers: &'static [(&'static str, &'static str)]
  , pub system_placement: SystemPlacement
  , pub completion_path: CompletionPath
  , /// Closed option set for `set`/`get`
    pub options: &'static [ConfigOption]
  , pub wire: WireFields
  , /// Sent when the caller leaves `maxTokens` unset
    pub default_max_tokens: Option<u32>
}

impl ProviderProfile
{   /// Bearer auth, `chat/completions`, `choices[i].message.content`
    pub const fn openai_compatible(
      name: &'static str
    , base_url: &'static str
    , default_model: &'static str
    ) -> Self
    {   ProviderProfile
        {   name
          , base_url
          , endpoint: "chat/completions"
          , default_model
          , default_system_prompt: DEFAULT_SYSTEM_PROMPT
          , auth: AuthScheme::Bearer
          , extra_headers: &[]
          , system_placement: SystemPlacement::Inline
          , completion_path: CompletionPath::Choices
          , options: &OPENAI_OPTIONS
          , wire: WireFields::OPENAI
          , default_max_tokens: None
        }
    }

    /// Initial configuration of a freshly constructed adapter
    pub fn defaults(&self, api_key: &str) -> ProviderConfig
    {   ProviderConfig
        {   service_type: self.name.to_string()
          , api_key: api_key.to_string()
          , base_url: self.base_url.to_string()
          , model: self.default_model.to_string()
          , system_prompt: Some(self.default_system_prompt.to_string())
          , stream: Some(false)
          , ..Default::default()
        }
    }

    /// Join a (possibly slash-less) base URL with this profile's endpoint
    pub fn url(&self, base_url: &str) -> String
    {   format!(
          "{}/{}",
          base_url.trim_end_matches('/'),
          self.endpoint.trim_start_matches('/')
        )
    }
}

/// Providers shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Provider
{   /// OpenAI (GPT models)
    OpenAI
  , /// Groq (hosted Llama, DeepSeek, Gemma)
    Groq
  , /// xAI (Grok models)
    Xai
  , /// Mistral AI
    MistralAi
  , /// Anthropic (Claude models)
    Anthropic
}

impl Provider
{   pub const ALL: [Provider; 5] =
    [   Provider::OpenAI
      , Provider::Groq
      , Provider::Xai
      , Provider::MistralAi
      , Provider::Anthropic
    ];

    pub fn profile(self) -> &'static ProviderProfile
    {   match self
        {   Provider::OpenAI => &openai::PROFILE
          , Provider::Groq => &groq::PROFILE
          , Provider::Xai => &xai::PROFILE
          , Provider::MistralAi => &mistral::PROFILE
          , Provider::Anthropic => &anthropic::PROFILE
        }
    }

    pub fn name(self) -> &'static str
    {   self.profile().name
    }
}

impl FromStr for Provider
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self>
    {   let name = s.trim().to_ascii_lowercase();
        Provider::ALL
          .iter()
          .copied()
          .find(|p| p.name() == name)
          .ok_or(Error::UnknownProvider(name))
    }
}

impl fmt::Display for Provider
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.name())
    }
}
