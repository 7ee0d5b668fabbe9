use std::fmt;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category, as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{   Configuration
  , Validation
  , Transport
  , Decoding
}

/// Error type for every wrapper operation
/// Implements Clone so a failed query can be stored and replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Empty provider name or key, bad option name or value
    Configuration(String)
  , /// Provider name has no registry entry
    UnknownProvider(String)
  , /// Prompt rejected before any network call
    Validation(String)
  , /// Connection failure (no status) or non-success HTTP status
    Transport
    {   status: Option<u16>
      , body: String
    }
  , /// Response body is not valid JSON
    Decoding(String)
}

impl Error
{   pub fn kind(&self) -> ErrorKind
    {   match self
        {   Error::Configuration(_)
          | Error::UnknownProvider(_) => ErrorKind::Configuration
          , Error::Validation(_) => ErrorKind::Validation
          , Error::Transport { .. } => ErrorKind::Transport
          , Error::Decoding(_) => ErrorKind::Decoding
        }
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16>
    {   match self
        {   Error::Transport { status, .. } => *status
          , _ => None
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self
    {   Error::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self
    {   Error::Validation(msg.into())
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Configuration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::UnknownProvider(name) => {
              write!(f, "Unknown provider: {}", name)
            }
          , Error::Validation(msg) => {
              write!(f, "Invalid prompt: {}", msg)
            }
          , Error::Transport { status: Some(code), body } => {
              write!(f,
                "HTTP error (status {}): {}",
                code, body
              )
            }
          , Error::Transport { status: None, body } => {
              write!(f, "HTTP error: {}", body)
            }
          , Error::Decoding(msg) => {
              write!(f, "Parse error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   Error::Transport
        {   status: e.status().map(|s| s.as_u16())
          , body: e.to_string()
        }
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::Decoding(e.to_string())
    }
}
