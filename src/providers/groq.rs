//! Groq's OpenAI-compatible endpoint

use super::ProviderProfile;

pub const PROFILE: ProviderProfile = ProviderProfile::openai_compatible(
  "groq"
, "https://api.groq.com/openai/v1/"
, "llama-3.3-70b-versatile"
);
