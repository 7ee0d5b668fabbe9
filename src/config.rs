//! Per-adapter configuration: the typed option set and its property store

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{debug, warn};

use crate::error::{Error, Result};

/// Every option name a caller may `set`/`get`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigOption
{   Model
  , BaseUrl
  , SystemPrompt
  , Temperature
  , TopP
  , MaxTokens
  , Stream
  , Stop
  , Tools
  , SafeMode
  , RandomSeed
}

impl ConfigOption
{   pub const ALL: [ConfigOption; 11] =
    [   ConfigOption::Model
      , ConfigOption::BaseUrl
      , ConfigOption::SystemPrompt
      , ConfigOption::Temperature
      , ConfigOption::TopP
      , ConfigOption::MaxTokens
      , ConfigOption::Stream
      , ConfigOption::Stop
      , ConfigOption::Tools
      , ConfigOption::SafeMode
      , ConfigOption::RandomSeed
    ];

    /// Options every chat-completion adapter understands
    pub const COMMON: [ConfigOption; 9] =
    [   ConfigOption::Model
      , ConfigOption::BaseUrl
      , ConfigOption::SystemPrompt
      , ConfigOption::Temperature
      , ConfigOption::TopP
      , ConfigOption::MaxTokens
      , ConfigOption::Stream
      , ConfigOption::Stop
      , ConfigOption::Tools
    ];

    pub fn name(self) -> &'static str
    {   match self
        {   ConfigOption::Model => "model"
          , ConfigOption::BaseUrl => "baseUrl"
          , ConfigOption::SystemPrompt => "systemPrompt"
          , ConfigOption::Temperature => "temperature"
          , ConfigOption::TopP => "topP"
          , ConfigOption::MaxTokens => "maxTokens"
          , ConfigOption::Stream => "stream"
          , ConfigOption::Stop => "stop"
          , ConfigOption::Tools => "tools"
          , ConfigOption::SafeMode => "safeMode"
          , ConfigOption::RandomSeed => "randomSeed"
        }
    }
}

impl FromStr for ConfigOption
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self>
    {   let name = s.trim();
        if name == "stopSequences"
        {   return Ok(ConfigOption::Stop);
        }
        ConfigOption::ALL
          .iter()
          .copied()
          .find(|o| o.name() == name)
          .ok_or_else(|| Error::config(
            format!("unknown option '{}'", name)
          ))
    }
}

impl fmt::Display for ConfigOption
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.name())
    }
}

/// Typed configuration owned by one adapter instance.
/// `None` means "not sent"; it is never serialized as null or zero.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig
{   pub service_type: String
  , #[serde(skip)]
    pub api_key: String
  , pub base_url: String
  , pub model: String
  , pub system_prompt: Option<String>
  , pub temperature: Option<f64>
  , pub top_p: Option<f64>
  , pub max_tokens: Option<u32>
  , pub stream: Option<bool>
  , pub stop: Option<Vec<String>>
  , pub tools: Option<Vec<Value>>
  , pub safe_mode: Option<bool>
  , pub random_seed: Option<u64>
}

impl fmt::Debug for ProviderConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("ProviderConfig")
          .field("service_type", &self.service_type)
          .field("api_key", &"<redacted>")
          .field("base_url", &self.base_url)
          .field("model", &self.model)
          .field("system_prompt", &self.system_prompt)
          .field("temperature", &self.temperature)
          .field("top_p", &self.top_p)
          .field("max_tokens", &self.max_tokens)
          .field("stream", &self.stream)
          .field("stop", &self.stop)
          .field("tools", &self.tools)
          .field("safe_mode", &self.safe_mode)
          .field("random_seed", &self.random_seed)
          .finish()
    }
}

/// Bulk settings a caller can load from a file and apply in one go
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderSettings
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_mode: Option<bool>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>
}

impl ProviderSettings
{   pub fn from_json(text: &str) -> Result<Self>
    {   serde_json::from_str(text).map_err(|e| {
          Error::config(format!("bad settings: {}", e))
        })
    }

    /// Options present in these settings, with their JSON values
    pub fn entries(&self) -> Result<Vec<(String, Value)>>
    {   match serde_json::to_value(self)
        {   Ok(Value::Object(map)) => Ok(map.into_iter().collect())
          , Ok(_) => Ok(Vec::new())
          , Err(e) => Err(Error::config(e.to_string()))
        }
    }
}

/// Key/value view over a `ProviderConfig`, closed to the options the
/// owning adapter declares. `get` hands back exactly what `set` received;
/// the typed fields hold the normalized form that goes on the wire.
#[derive(Debug, Clone)]
pub struct PropertyStore
{   config: ProviderConfig
  , supported: &'static [ConfigOption]
  , raw: HashMap<ConfigOption, Value>
}

impl PropertyStore
{   pub fn new(
      config: ProviderConfig
    , supported: &'static [ConfigOption]
    ) -> Self
    {   PropertyStore
        {   config
          , supported
          , raw: HashMap::new()
        }
    }

    pub fn config(&self) -> &ProviderConfig
    {   &self.config
    }

    pub fn supported(&self) -> &'static [ConfigOption]
    {   self.supported
    }

    pub fn supports(&self, option: ConfigOption) -> bool
    {   self.supported.contains(&option)
    }

    fn resolve(&self, name: &str) -> Result<ConfigOption>
    {   let option: ConfigOption = name.parse()?;
        if !self.supports(option)
        {   warn!(
              "Option '{}' rejected for {}",
              option, self.config.service_type
            );
            return Err(Error::config(format!(
              "option '{}' is not supported by {}",
              option, self.config.service_type
            )));
        }
        Ok(option)
    }

    /// Validate `value` and store it. `null` clears optional options.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()>
    {   let option = self.resolve(name)?;
        debug!("Setting {} on {}", option, self.config.service_type);
        let raw = value.clone();
        let c = &mut self.config;
        match option
        {   ConfigOption::Model => {
              c.model = required_string(option, value)?;
            }
          , ConfigOption::BaseUrl => {
              c.base_url = required_string(option, value)?;
            }
          , ConfigOption::SystemPrompt => {
              c.system_prompt = optional(value, |v| {
                v.as_str().map(str::to_string)
              }).ok_or_else(|| type_error(option, "a string"))?;
            }
          , ConfigOption::Temperature => {
              c.temperature = optional(value, |v| {
                v.as_f64().filter(|t| t.is_finite() && *t >= 0.0)
              }).ok_or_else(|| {
                type_error(option, "a non-negative number")
              })?;
            }
          , ConfigOption::TopP => {
              c.top_p = optional(value, |v| {
                v.as_f64().filter(|p| (0.0..=1.0).contains(p))
              }).ok_or_else(|| {
                type_error(option, "a number between 0 and 1")
              })?;
            }
          , ConfigOption::MaxTokens => {
              c.max_tokens = optional(value, |v| {
                v.as_u64()
                  .filter(|n| *n > 0)
                  .and_then(|n| u32::try_from(n).ok())
              }).ok_or_else(|| {
                type_error(option, "a positive integer")
              })?;
            }
          , ConfigOption::Stream => {
              let stream = optional(value, Value::as_bool)
                .ok_or_else(|| type_error(option, "a boolean"))?;
              if stream == Some(true)
              {   return Err(Error::config(
                    "streaming responses are not supported"
                  ));
              }
              c.stream = stream;
            }
          , ConfigOption::Stop => {
              c.stop = optional(value, string_list)
                .ok_or_else(|| {
                  type_error(option, "a string or array of strings")
                })?;
            }
          , ConfigOption::Tools => {
              c.tools = optional(value, |v| v.as_array().cloned())
                .ok_or_else(|| type_error(option, "an array"))?;
            }
          , ConfigOption::SafeMode => {
              c.safe_mode = optional(value, Value::as_bool)
                .ok_or_else(|| type_error(option, "a boolean"))?;
            }
          , ConfigOption::RandomSeed => {
              c.random_seed = optional(value, |v| {
                v.as_u64().or_else(|| {
                  v.as_str().and_then(|s| s.trim().parse().ok())
                })
              }).ok_or_else(|| {
                type_error(option, "a non-negative integer")
              })?;
            }
        }
        if raw.is_null()
        {   self.raw.remove(&option);
        } else
        {   self.raw.insert(option, raw);
        }
        Ok(())
    }

    /// Current value of an option; `None` when unset. Values that were
    /// `set` come back untouched, defaults in their typed form.
    pub fn get(&self, name: &str) -> Result<Option<Value>>
    {   let option = self.resolve(name)?;
        if let Some(value) = self.raw.get(&option)
        {   return Ok(Some(value.clone()));
        }
        let c = &self.config;
        let value = match option
        {   ConfigOption::Model => Some(Value::from(c.model.clone()))
          , ConfigOption::BaseUrl => Some(Value::from(c.base_url.clone()))
          , ConfigOption::SystemPrompt => {
              c.system_prompt.clone().map(Value::from)
            }
          , ConfigOption::Temperature => c.temperature.map(Value::from)
          , ConfigOption::TopP => c.top_p.map(Value::from)
          , ConfigOption::MaxTokens => c.max_tokens.map(Value::from)
          , ConfigOption::Stream => c.stream.map(Value::from)
          , ConfigOption::Stop => c.stop.clone().map(Value::from)
          , ConfigOption::Tools => c.tools.clone().map(Value::from)
          , ConfigOption::SafeMode => c.safe_mode.map(Value::from)
          , ConfigOption::RandomSeed => c.random_seed.map(Value::from)
        };
        Ok(value)
    }

    /// Set every option present in `settings`, all or nothing: on error
    /// the store is left exactly as it was.
    pub fn apply(&mut self, settings: &ProviderSettings) -> Result<()>
    {   let mut staged = self.clone();
        for (name, value) in settings.entries()?
        {   staged.set(&name, value)?;
        }
        *self = staged;
        Ok(())
    }
}

/// `Some(None)` for null, `Some(Some(x))` for a good value, `None` if mistyped
fn optional<T>(
  value: Value
, read: impl FnOnce(&Value) -> Option<T>
) -> Option<Option<T>>
{   if value.is_null()
    {   return Some(None);
    }
    read(&value).map(Some)
}

fn required_string(option: ConfigOption, value: Value) -> Result<String>
{   match value.as_str().map(str::trim)
    {   Some(s) if !s.is_empty() => Ok(s.to_string())
      , _ => Err(type_error(option, "a non-empty string"))
    }
}

fn string_list(value: &Value) -> Option<Vec<String>>
{   match value
    {   Value::String(s) => Some(vec![s.clone()])
      , Value::Array(items) => items
          .iter()
          .map(|i| i.as_str().map(str::to_string))
          .collect()
      , _ => None
    }
}

fn type_error(option: ConfigOption, expected: &str) -> Error
{   Error::config(format!("option '{}' expects {}", option, expected))
}
