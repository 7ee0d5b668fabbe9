//! Prompt input and provider-ready message lists

use serde::{Deserialize, Serialize};
use log::trace;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role
{   System
  , User
  , Assistant
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message
{   pub role: Role
  , pub content: String
}

impl Message
{   pub fn new(role: Role, content: impl Into<String>) -> Self
    {   Message
        {   role
          , content: content.into()
        }
    }

    pub fn system(content: impl Into<String>) -> Self
    {   Message::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self
    {   Message::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self
    {   Message::new(Role::Assistant, content)
    }
}

/// What a caller hands to `query`: one string or a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput
{   Text(String)
  , Turns(Vec<Message>)
}

impl PromptInput
{   /// At least one entry must have non-blank content
    pub fn validate(&self) -> Result<()>
    {   match self
        {   PromptInput::Text(text) => {
              if text.trim().is_empty()
              {   return Err(Error::validation("prompt is empty"));
              }
            }
          , PromptInput::Turns(turns) => {
              if turns.is_empty()
              {   return Err(Error::validation(
                    "conversation has no turns"
                  ));
              }
              if turns.iter().all(|t| t.content.trim().is_empty())
              {   return Err(Error::validation(
                    "every conversation turn is empty"
                  ));
              }
            }
        }
        Ok(())
    }
}

impl From<&str> for PromptInput
{   fn from(s: &str) -> Self
    {   PromptInput::Text(s.to_string())
    }
}

impl From<String> for PromptInput
{   fn from(s: String) -> Self
    {   PromptInput::Text(s)
    }
}

impl From<&String> for PromptInput
{   fn from(s: &String) -> Self
    {   PromptInput::Text(s.clone())
    }
}

impl From<Vec<Message>> for PromptInput
{   fn from(turns: Vec<Message>) -> Self
    {   PromptInput::Turns(turns)
    }
}

impl From<&[Message]> for PromptInput
{   fn from(turns: &[Message]) -> Self
    {   PromptInput::Turns(turns.to_vec())
    }
}

/// Where a provider wants the system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPlacement
{   /// First entry of the message list
    Inline
  , /// Separate top-level request field; system turns are lifted out
    TopLevel
}

/// Output of the formatter, ready to drop into a request body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedMessages
{   pub system: Option<String>
  , pub messages: Vec<Message>
}

#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter
{   placement: SystemPlacement
}

impl MessageFormatter
{   pub fn new(placement: SystemPlacement) -> Self
    {   MessageFormatter { placement }
    }

    pub fn placement(&self) -> SystemPlacement
    {   self.placement
    }

    pub fn format(
      &self
    , prompt: &PromptInput
    , system_prompt: Option<&str>
    ) -> Result<FormattedMessages>
    {   prompt.validate()?;

        let system = system_prompt
          .map(str::trim)
          .filter(|s| !s.is_empty())
          .map(str::to_string);

        let turns: Vec<Message> = match prompt
        {   PromptInput::Text(text) => vec![Message::user(text.clone())]
          , PromptInput::Turns(turns) => turns.clone()
        };

        let formatted = match self.placement
        {   SystemPlacement::Inline => {
              let mut messages
                = Vec::with_capacity(turns.len() + 1);
              if let Some(text) = system
              {   messages.push(Message::system(text));
              }
              messages.extend(turns);
              FormattedMessages
              {   system: None
                , messages
              }
            }
          , SystemPlacement::TopLevel => {
              let (lifted, messages): (Vec<Message>, Vec<Message>)
                = turns.into_iter()
                  .partition(|m| m.role == Role::System);
              let parts: Vec<String> = system.into_iter()
                .chain(lifted.into_iter().map(|m| m.content))
                .filter(|s| !s.trim().is_empty())
                .collect();
              FormattedMessages
              {   system: if parts.is_empty()
                  {   None
                  } else
                  {   Some(parts.join("\n\n"))
                  }
                , messages
              }
            }
        };

        if formatted.messages.is_empty()
        {   return Err(Error::validation(
              "no user or assistant turns to send"
            ));
        }

        trace!(
          "Formatted {} messages (system field: {})",
          formatted.messages.len(),
          formatted.system.is_some()
        );
        Ok(formatted)
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::ErrorKind;

    fn conversation() -> Vec<Message>
    {   vec![
          Message::user("Hi")
        , Message::assistant("Hello")
        , Message::user("Bye")
        ]
    }

    #[test]
    fn single_string_becomes_system_then_user()
    {   let out = MessageFormatter::new(SystemPlacement::Inline)
          .format(&"Capital of France?".into(), Some("Be brief."))
          .unwrap();
        assert_eq!(out.system, None);
        assert_eq!(out.messages, vec![
          Message::system("Be brief.")
        , Message::user("Capital of France?")
        ]);
    }

    #[test]
    fn inline_placement_keeps_turn_order()
    {   let out = MessageFormatter::new(SystemPlacement::Inline)
          .format(&conversation().into(), Some("S"))
          .unwrap();
        assert_eq!(out.messages, vec![
          Message::system("S")
        , Message::user("Hi")
        , Message::assistant("Hello")
        , Message::user("Bye")
        ]);
    }

    #[test]
    fn top_level_placement_moves_system_out_of_the_list()
    {   let out = MessageFormatter::new(SystemPlacement::TopLevel)
          .format(&conversation().into(), Some("S"))
          .unwrap();
        assert_eq!(out.system.as_deref(), Some("S"));
        assert_eq!(out.messages, conversation());
    }

    #[test]
    fn top_level_placement_merges_system_turns()
    {   let mut turns = vec![Message::system("Use French.")];
        turns.extend(conversation());
        let out = MessageFormatter::new(SystemPlacement::TopLevel)
          .format(&turns.into(), Some("S"))
          .unwrap();
        assert_eq!(out.system.as_deref(), Some("S\n\nUse French."));
        assert_eq!(out.messages, conversation());
    }

    #[test]
    fn blank_system_prompt_is_omitted()
    {   let out = MessageFormatter::new(SystemPlacement::Inline)
          .format(&"Hi".into(), Some("   "))
          .unwrap();
        assert_eq!(out.messages, vec![Message::user("Hi")]);
    }

    #[test]
    fn empty_inputs_are_rejected()
    {   let formatter = MessageFormatter::new(SystemPlacement::Inline);
        let empties: Vec<PromptInput> = vec![
          "".into()
        , "  \n ".into()
        , Vec::<Message>::new().into()
        , vec![Message::user(" "), Message::assistant("")].into()
        ];
        for prompt in empties
        {   let err = formatter.format(&prompt, Some("S")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{:?}", prompt);
        }
    }

    #[test]
    fn only_system_turns_leave_nothing_to_send()
    {   let err = MessageFormatter::new(SystemPlacement::TopLevel)
          .format(&vec![Message::system("rules")].into(), None)
          .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
