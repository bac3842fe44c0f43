//! Conversation-driven animation
//!
//! Maps what happens in the chat loop onto avatar animations:
//! - greeting: wave
//! - happy reply: nod
//! - utterance playback start/end: speaking/idle

mod reply;

pub use reply::{AvatarReply, Emotion};

use crate::state::AnimationState;

/// Things the conversation controller reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// The avatar opened the conversation
    Greeting,
    /// A reply arrived from the language model
    Reply(AvatarReply),
    /// Speech synthesis started reading a reply aloud
    UtteranceStarted,
    /// Speech synthesis finished
    UtteranceEnded,
}

/// Animation to request for an event, if any
pub fn animation_for(event: &ConversationEvent) -> Option<AnimationState> {
    match event {
        ConversationEvent::Greeting => Some(AnimationState::Wave),
        ConversationEvent::Reply(reply) => match reply.emotion {
            Emotion::Happy => Some(AnimationState::Nod),
            Emotion::Neutral | Emotion::Confused => None,
        },
        ConversationEvent::UtteranceStarted => Some(AnimationState::Speaking),
        ConversationEvent::UtteranceEnded => Some(AnimationState::Idle),
    }
}
