pub mod error;
pub mod config;
pub mod message;
pub mod headers;
pub mod request;
pub mod transport;
pub mod extract;
pub mod providers;
pub mod adapter;
pub mod registry;
pub mod wrapper;

/*

aiwrap: one configuration surface and one query call over many
chat-completion APIs.

  let mut ai = Wrapper::new("mistral", &key)?;
  let answer = ai
    .set("temperature", 0)?
    .set("model", "mistral-large-latest")?
    .query("What is the capital of South Africa?")
    .await?
    .one();

aiwrap/
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # Typed options, PropertyStore, bulk settings
│   ├── message.rs      # Prompt input and message formatting
│   ├── headers.rs      # Content type + auth header per provider
│   ├── request.rs      # Request body with absent options left out
│   ├── transport.rs    # POST JSON, get JSON back
│   ├── extract.rs      # one() / all() over provider responses
│   ├── adapter.rs      # Adapter contract + ChatAdapter
│   ├── providers/      # Built-in provider profiles
│   ├── registry.rs     # Provider name -> constructor
│   └── wrapper.rs      # Caller facade
└── tests/

Streaming, retries, rate limiting, caching and token refresh are not
handled here; a custom `Transport` is the place to add them.

*/

pub use adapter::{Adapter, AdapterContext, AdapterState, ChatAdapter};
pub use config::{ConfigOption, PropertyStore, ProviderConfig, ProviderSettings};
pub use error::{Error, ErrorKind, Result};
pub use extract::{CompletionPath, ResponseExtractor};
pub use headers::{AuthScheme, HeaderBuilder};
pub use message::{Message, MessageFormatter, PromptInput, Role, SystemPlacement};
pub use providers::{Provider, ProviderProfile};
pub use registry::{AdapterConstructor, Registry};
pub use transport::{HttpTransport, Transport};
pub use wrapper::Wrapper;
