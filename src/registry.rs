//! Provider name → adapter constructor.
//!
//! Built-ins are discovered lazily, exactly once per registry, on the first
//! lookup. `register` may run before or after discovery; discovery never
//! overwrites an entry that was registered explicitly.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Once, OnceLock, PoisonError, RwLock};

use log::{debug, info};

use crate::adapter::{Adapter, AdapterContext, ChatAdapter};
use crate::error::{Error, Result};
use crate::providers::{Provider, ProviderProfile};

pub type AdapterConstructor = Arc<
  dyn Fn(AdapterContext) -> Result<Box<dyn Adapter>> + Send + Sync
>;

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

pub struct Registry
{   entries: RwLock<HashMap<String, AdapterConstructor>>
  , discovered: Once
}

impl Registry
{   /// Empty registry; built-ins are added on first `resolve`
    pub fn new() -> Self
    {   Registry
        {   entries: RwLock::new(HashMap::new())
          , discovered: Once::new()
        }
    }

    /// Process-wide registry used by `Wrapper::new`
    pub fn global() -> &'static Registry
    {   GLOBAL_REGISTRY.get_or_init(Registry::new)
    }

    /// Add the built-in providers. Concurrent callers block until the
    /// first one finishes; later calls do nothing.
    pub fn discover(&self)
    {   self.discovered.call_once(|| {
          let mut entries = self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
          for provider in Provider::ALL
          {   let profile = *provider.profile();
              entries
                .entry(profile.name.to_string())
                .or_insert_with(|| profile_constructor(profile));
          }
          info!("Discovered {} built-in providers", Provider::ALL.len());
        });
    }

    /// Insert or replace the constructor for `name`
    pub fn register<F>(&self, name: &str, constructor: F)
    where
      F: Fn(AdapterContext) -> Result<Box<dyn Adapter>>
        + Send + Sync + 'static
    {   let key = normalize(name);
        debug!("Registering provider: {}", key);
        self.entries
          .write()
          .unwrap_or_else(PoisonError::into_inner)
          .insert(key, Arc::new(constructor));
    }

    /// Register a `ChatAdapter` built from `profile` under `profile.name`
    pub fn register_profile(&self, profile: ProviderProfile)
    {   let key = normalize(profile.name);
        debug!("Registering provider profile: {}", key);
        self.entries
          .write()
          .unwrap_or_else(PoisonError::into_inner)
          .insert(key, profile_constructor(profile));
    }

    pub fn resolve(&self, name: &str) -> Result<AdapterConstructor>
    {   self.discover();
        let key = normalize(name);
        self.entries
          .read()
          .unwrap_or_else(PoisonError::into_inner)
          .get(&key)
          .cloned()
          .ok_or(Error::UnknownProvider(key))
    }

    pub fn contains(&self, name: &str) -> bool
    {   self.resolve(name).is_ok()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String>
    {   self.discover();
        let mut names: Vec<String> = self.entries
          .read()
          .unwrap_or_else(PoisonError::into_inner)
          .keys()
          .cloned()
          .collect();
        names.sort();
        names
    }
}

impl Default for Registry
{   fn default() -> Self
    {   Registry::new()
    }
}

impl fmt::Debug for Registry
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   let entries = self.entries
          .read()
          .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort();
        f.debug_struct("Registry")
          .field("providers", &names)
          .field("discovered", &self.discovered.is_completed())
          .finish()
    }
}

fn profile_constructor(profile: ProviderProfile) -> AdapterConstructor
{   Arc::new(move |context: AdapterContext| {
      let adapter: Box<dyn Adapter>
        = Box::new(ChatAdapter::new(profile, context));
      Ok(adapter)
    })
}

fn normalize(name: &str) -> String
{   name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builtins_are_discovered_lazily()
    {   let registry = Registry::new();
        assert!(!registry.discovered.is_completed());
        assert_eq!(
          registry.names(),
          vec!["anthropic", "groq", "mistral", "openai", "xai"]
        );
        assert!(registry.resolve("OpenAI").is_ok());
    }

    #[test]
    fn unknown_names_are_configuration_errors()
    {   let err = Registry::new().resolve("unknown").err().unwrap();
        assert_eq!(err, Error::UnknownProvider("unknown".into()));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn registration_before_discovery_survives_it()
    {   let registry = Registry::new();
        registry.register("openai", |_| {
          Err(Error::config("custom openai"))
        });
        let ctor = registry.resolve("openai").unwrap();
        let context = AdapterContext
        {   api_key: "k".into()
          , transport: Arc::new(crate::transport::HttpTransport::new())
        };
        assert_eq!(
          ctor(context).err(),
          Some(Error::config("custom openai"))
        );
    }

    #[test]
    fn concurrent_first_lookups_see_every_builtin()
    {   let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
          .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
              let provider = Provider::ALL[i % Provider::ALL.len()];
              registry.resolve(provider.name()).is_ok()
            })
          })
          .collect();
        for handle in handles
        {   assert!(handle.join().unwrap());
        }
        assert_eq!(registry.names().len(), Provider::ALL.len());
    }
}
