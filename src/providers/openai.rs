//! OpenAI chat completions

use super::ProviderProfile;

pub const PROFILE: ProviderProfile = ProviderProfile::openai_compatible(
  "openai"
, "https://api.openai.com/v1/"
, "gpt-4o-mini"
);
