//! Mistral AI chat completions.
//!
//! OpenAI-shaped, with two extras: `safeMode` (sent as `safe_prompt`) and
//! `randomSeed` (sent as `random_seed`).
//!
//! The safety flag used to be called `safe_mode` on the wire; the API now
//! only documents `safe_prompt`, so that is what goes out.

use crate::config::ConfigOption;
use crate::request::WireFields;

use super::ProviderProfile;

pub const OPTIONS: [ConfigOption; 11] = ConfigOption::ALL;

pub const PROFILE: ProviderProfile = ProviderProfile
{   options: &OPTIONS
  , wire: WireFields
    {   stop: "stop"
      , random_seed: Some("random_seed")
      , safe_mode: Some("safe_prompt")
    }
  , ..ProviderProfile::openai_compatible(
        "mistral"
      , "https://api.mistral.ai/v1/"
      , "mistral-small-latest"
      )
};

#[cfg(test)]
mod tests
{   use serde_json::json;

    use super::*;
    use crate::adapter::{Adapter, AdapterContext, ChatAdapter};
    use crate::transport::testing::RecordingTransport;

    #[test]
    fn extras_use_mistral_wire_names()
    {   let transport = RecordingTransport::replying(json!({
          "choices": [{"message": {"role": "assistant", "content": "Pretoria"}}]
        }));
        let mut mistral = ChatAdapter::new(
          PROFILE
        , AdapterContext
          {   api_key: "mk".into()
            , transport: transport.clone()
          }
        );
        mistral.set("safeMode", json!(true)).unwrap();
        mistral.set("randomSeed", json!("42")).unwrap();
        mistral.set("stop", json!(["\n\n"])).unwrap();
        tokio_test::block_on(mistral.query("Capital?".into())).unwrap();

        let sent = transport.last();
        assert_eq!(sent.url, "https://api.mistral.ai/v1/chat/completions");
        assert_eq!(sent.body["safe_prompt"], true);
        assert_eq!(sent.body["random_seed"], 42);
        assert_eq!(sent.body["stop"], json!(["\n\n"]));
        assert_eq!(sent.body["model"], "mistral-small-latest");
        assert_eq!(sent.body["messages"][0]["role"], "system");
        assert!(sent.body.get("seed").is_none());
        assert_eq!(mistral.one(), "Pretoria");
    }
}
