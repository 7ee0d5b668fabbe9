//! The object callers hold: one provider, one configuration, one query
//! at a time.

use std::sync::Arc;

use serde_json::Value;
use log::debug;

use crate::adapter::{Adapter, AdapterContext, AdapterState};
use crate::config::ProviderSettings;
use crate::error::{Error, Result};
use crate::message::PromptInput;
use crate::registry::Registry;
use crate::transport::{HttpTransport, Transport};

pub struct Wrapper
{   adapter: Box<dyn Adapter>
}

impl Wrapper
{   /// Resolve `provider` in the global registry, talk HTTP via reqwest
    pub fn new(provider: &str, api_key: &str) -> Result<Self>
    {   Wrapper::with_registry(Registry::global(), provider, api_key)
    }

    pub fn with_registry(
      registry: &Registry
    , provider: &str
    , api_key: &str
    ) -> Result<Self>
    {   Wrapper::with_transport(
          registry
        , provider
        , api_key
        , Arc::new(HttpTransport::new())
        )
    }

    pub fn with_transport(
      registry: &Registry
    , provider: &str
    , api_key: &str
    , transport: Arc<dyn Transport>
    ) -> Result<Self>
    {   if provider.trim().is_empty()
        {   return Err(Error::config("Service name cannot be empty"));
        }
        if api_key.trim().is_empty()
        {   return Err(Error::config("API key cannot be empty"));
        }

        let constructor = registry.resolve(provider)?;
        let adapter = constructor(AdapterContext
        {   api_key: api_key.to_string()
          , transport
        })?;
        debug!("Wrapper ready for {}", adapter.service_type());
        Ok(Wrapper { adapter })
    }

    pub fn from_adapter(adapter: Box<dyn Adapter>) -> Self
    {   Wrapper { adapter }
    }

    pub fn service_type(&self) -> &str
    {   self.adapter.service_type()
    }

    pub fn state(&self) -> AdapterState
    {   self.adapter.state()
    }

    pub fn set(
      &mut self
    , option: &str
    , value: impl Into<Value>
    ) -> Result<&mut Self>
    {   self.adapter.set(option, value.into())?;
        Ok(self)
    }

    pub fn get(&self, option: &str) -> Result<Option<Value>>
    {   self.adapter.get(option)
    }

    pub fn apply(&mut self, settings: &ProviderSettings) -> Result<&mut Self>
    {   self.adapter.apply(settings)?;
        Ok(self)
    }

    pub async fn query(
      &mut self
    , prompt: impl Into<PromptInput>
    ) -> Result<&mut Self>
    {   self.adapter.query(prompt.into()).await?;
        Ok(self)
    }

    /// `query` for synchronous callers, on a private current-thread
    /// runtime. Inside an async runtime use `query` instead; calling this
    /// there is a configuration error.
    pub fn query_blocking(
      &mut self
    , prompt: impl Into<PromptInput>
    ) -> Result<&mut Self>
    {   if tokio::runtime::Handle::try_current().is_ok()
        {   return Err(Error::config(
              "query_blocking called inside an async runtime; use query"
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
          .enable_all()
          .build()
          .map_err(|e| Error::Transport
          {   status: None
            , body: format!("failed to start runtime: {}", e)
          })?;
        runtime.block_on(self.adapter.query(prompt.into()))?;
        Ok(self)
    }

    pub fn one(&self) -> String
    {   self.adapter.one()
    }

    /// Same as `one`
    pub fn content(&self) -> String
    {   self.adapter.one()
    }

    pub fn all(&self) -> Vec<String>
    {   self.adapter.all()
    }

    pub fn last_response(&self) -> Option<&Value>
    {   self.adapter.last_response()
    }
}

impl std::fmt::Debug for Wrapper
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {   f.debug_struct("Wrapper")
          .field("service_type", &self.service_type())
          .field("state", &self.state())
          .finish()
    }
}
