//! Completion text out of a decoded response. Never fails: missing or
//! malformed fields degrade to an empty string / empty list.

use serde_json::Value;

/// Where a provider puts completion text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPath
{   /// `choices[i].message.content` (OpenAI-compatible)
    Choices
  , /// `content[i].text` for blocks with `type == "text"` (Anthropic)
    ContentBlocks
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseExtractor
{   path: CompletionPath
}

impl ResponseExtractor
{   pub fn new(path: CompletionPath) -> Self
    {   ResponseExtractor { path }
    }

    pub fn path(&self) -> CompletionPath
    {   self.path
    }

    /// Text of the first completion, or `""`. For `Choices` that is
    /// `choices[0]` only; a later choice never stands in for it.
    pub fn one(&self, envelope: &Value) -> String
    {   match self.path
        {   CompletionPath::Choices => envelope
              .pointer("/choices/0/message/content")
              .and_then(Value::as_str)
              .unwrap_or_default()
              .to_string()
          , CompletionPath::ContentBlocks => self
              .texts(envelope)
              .into_iter()
              .next()
              .unwrap_or_default()
        }
    }

    /// Every completion text in provider order, or `[]`
    pub fn all(&self, envelope: &Value) -> Vec<String>
    {   self.texts(envelope)
    }

    fn texts(&self, envelope: &Value) -> Vec<String>
    {   match self.path
        {   CompletionPath::Choices => items(envelope, "choices")
              .filter_map(|choice| {
                choice.pointer("/message/content")?.as_str()
              })
              .map(str::to_string)
              .collect()
          , CompletionPath::ContentBlocks => items(envelope, "content")
              .filter(|block| {
                block.get("type").and_then(Value::as_str) == Some("text")
              })
              .filter_map(|block| block.get("text")?.as_str())
              .map(str::to_string)
              .collect()
        }
    }
}

fn items<'a>(envelope: &'a Value, key: &str)
  -> impl Iterator<Item = &'a Value>
{   envelope
      .get(key)
      .and_then(Value::as_array)
      .into_iter()
      .flatten()
}
