//! HTTP header construction per provider auth policy

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE,
};

use crate::error::{Error, Result};

/// How a provider expects the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme
{   /// `Authorization: Bearer <key>`
    Bearer
  , /// Key as the raw value of a provider-defined header
    Header(&'static str)
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderBuilder
{   auth: AuthScheme
  , extra: &'static [(&'static str, &'static str)]
}

impl HeaderBuilder
{   pub fn new(auth: AuthScheme) -> Self
    {   HeaderBuilder
        {   auth
          , extra: &[]
        }
    }

    /// Fixed non-secret headers sent on every request (e.g. API version)
    pub fn with_extra(
      mut self
    , extra: &'static [(&'static str, &'static str)]
    ) -> Self
    {   self.extra = extra;
        self
    }

    pub fn auth(&self) -> AuthScheme
    {   self.auth
    }

    /// JSON content type plus exactly one auth header carrying the
    /// trimmed key
    pub fn build(&self, api_key: &str) -> Result<HeaderMap>
    {   let key = api_key.trim();
        if key.is_empty()
        {   return Err(Error::config("API key cannot be empty"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
          CONTENT_TYPE,
          HeaderValue::from_static("application/json")
        );

        for &(name, value) in self.extra
        {   headers.insert(
              header_name(name)?,
              HeaderValue::from_static(value)
            );
        }

        let (name, value) = match self.auth
        {   AuthScheme::Bearer => (
              AUTHORIZATION,
              format!("Bearer {}", key)
            )
          , AuthScheme::Header(name) => (
              header_name(name)?,
              key.to_string()
            )
        };
        let mut value = HeaderValue::from_str(&value).map_err(|_| {
          Error::config("API key contains characters not allowed in a header")
        })?;
        value.set_sensitive(true);
        headers.insert(name, value);

        Ok(headers)
    }
}

fn header_name(name: &str) -> Result<HeaderName>
{   HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
      Error::config(format!("invalid header name '{}': {}", name, e))
    })
}
