//! Voice markup: `<Say>` and `<Dial>`

use std::fmt::Write;

use super::{document, escape};

/// Speak text to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Say {
    pub text: String,
    pub voice: Option<String>,
}

impl Say {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str("<Say");
        if let Some(voice) = &self.voice {
            let _ = write!(out, r#" voice="{}""#, escape(voice));
        }
        let _ = write!(out, ">{}</Say>", escape(&self.text));
    }
}

/// Bridge the current leg to a phone number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dial {
    pub number: String,
    pub caller_id: Option<String>,
    pub answer_on_bridge: bool,
    pub timeout_secs: Option<u32>,
}

impl Dial {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            caller_id: None,
            answer_on_bridge: false,
            timeout_secs: None,
        }
    }

    pub fn caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Keep the originating leg ringing until the far end answers
    pub fn answer_on_bridge(mut self, enabled: bool) -> Self {
        self.answer_on_bridge = enabled;
        self
    }

    /// Seconds to ring before giving up
    pub fn timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str("<Dial");
        if let Some(caller_id) = &self.caller_id {
            let _ = write!(out, r#" callerId="{}""#, escape(caller_id));
        }
        if self.answer_on_bridge {
            out.push_str(r#" answerOnBridge="true""#);
        }
        if let Some(timeout) = self.timeout_secs {
            let _ = write!(out, r#" timeout="{}""#, timeout);
        }
        let _ = write!(out, "><Number>{}</Number></Dial>", escape(&self.number));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceVerb {
    Say(Say),
    Dial(Dial),
}

/// Ordered list of voice instructions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<VoiceVerb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, say: Say) -> Self {
        self.verbs.push(VoiceVerb::Say(say));
        self
    }

    pub fn dial(mut self, dial: Dial) -> Self {
        self.verbs.push(VoiceVerb::Dial(dial));
        self
    }

    pub fn verbs(&self) -> &[VoiceVerb] {
        &self.verbs
    }

    pub fn to_xml(&self) -> String {
        let mut inner = String::new();
        for verb in &self.verbs {
            match verb {
                VoiceVerb::Say(say) => say.render(&mut inner),
                VoiceVerb::Dial(dial) => dial.render(&mut inner),
            }
        }
        document(&inner)
    }
}
