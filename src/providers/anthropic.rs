//! Anthropic Messages API.
//!
//! Differs from the OpenAI shape in four places: the key goes in
//! `x-api-key` alongside a pinned `anthropic-version`, the system prompt
//! is a top-level `system` field, `max_tokens` is mandatory, and the reply
//! is a `content` array of typed blocks (only `text` blocks are read).

use crate::config::ConfigOption;
use crate::extract::CompletionPath;
use crate::headers::AuthScheme;
use crate::message::SystemPlacement;
use crate::request::WireFields;

use super::{ProviderProfile, DEFAULT_SYSTEM_PROMPT};

pub const API_VERSION: &str = "2023-06-01";

pub const PROFILE: ProviderProfile = ProviderProfile
{   name: "anthropic"
  , base_url: "https://api.anthropic.com/v1/"
  , endpoint: "messages"
  , default_model: "claude-3-5-sonnet-20241022"
  , default_system_prompt: DEFAULT_SYSTEM_PROMPT
  , auth: AuthScheme::Header("x-api-key")
  , extra_headers: &[("anthropic-version", API_VERSION)]
  , system_placement: SystemPlacement::TopLevel
  , completion_path: CompletionPath::ContentBlocks
  , options: &ConfigOption::COMMON
  , wire: WireFields
    {   stop: "stop_sequences"
      , random_seed: None
      , safe_mode: None
    }
  , default_max_tokens: Some(1024)
};

#[cfg(test)]
mod tests
{   use serde_json::json;

    use super::*;
    use crate::adapter::{Adapter, AdapterContext, ChatAdapter};
    use crate::error::ErrorKind;
    use crate::message::Message;
    use crate::transport::testing::RecordingTransport;

    fn claude(transport: std::sync::Arc<RecordingTransport>) -> ChatAdapter
    {   ChatAdapter::new(
          PROFILE
        , AdapterContext
          {   api_key: "ak\n".into()
            , transport
          }
        )
    }

    #[test]
    fn system_prompt_is_a_top_level_field()
    {   let transport = RecordingTransport::replying(json!({
          "content": [{"type": "text", "text": "Pretoria"}]
        , "stop_reason": "end_turn"
        }));
        let mut a = claude(transport.clone());
        a.set("systemPrompt", json!("S")).unwrap();
        a.set("stopSequences", json!(["Human:"])).unwrap();
        let turns = vec![
          Message::user("Hi")
        , Message::assistant("Hello")
        , Message::user("Bye")
        ];
        tokio_test::block_on(a.query(turns.into())).unwrap();

        let sent = transport.last();
        assert_eq!(sent.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(sent.headers["x-api-key"], "ak");
        assert_eq!(sent.headers["anthropic-version"], API_VERSION);
        assert!(sent.headers.get("authorization").is_none());
        assert_eq!(sent.body["system"], "S");
        assert_eq!(sent.body["max_tokens"], 1024);
        assert_eq!(sent.body["stop_sequences"], json!(["Human:"]));
        assert_eq!(sent.body["messages"], json!([
          {"role": "user", "content": "Hi"}
        , {"role": "assistant", "content": "Hello"}
        , {"role": "user", "content": "Bye"}
        ]));
        assert_eq!(a.one(), "Pretoria");
    }

    #[test]
    fn explicit_max_tokens_wins_over_the_default()
    {   let transport = RecordingTransport::replying(json!({}));
        let mut a = claude(transport.clone());
        a.set("maxTokens", json!(50)).unwrap();
        tokio_test::block_on(a.query("Hi".into())).unwrap();
        assert_eq!(transport.last().body["max_tokens"], 50);
    }

    #[test]
    fn seed_and_safe_mode_are_not_accepted()
    {   let a = &mut claude(RecordingTransport::replying(json!({})));
        for option in ["randomSeed", "safeMode"]
        {   let err = a.set(option, json!(1)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }
}
