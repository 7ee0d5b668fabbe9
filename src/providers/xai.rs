//! xAI (Grok) chat completions

use super::ProviderProfile;

pub const PROFILE: ProviderProfile = ProviderProfile::openai_compatible(
  "xai"
, "https://api.x.ai/v1/"
, "grok-2-latest"
);
