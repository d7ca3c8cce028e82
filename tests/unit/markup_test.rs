//! Unit tests for call-control and messaging markup

use telephony_gateway::services::{render_auto_reply, render_call_markup};
use telephony_gateway::twiml::{Dial, MessagingResponse, Say, VoiceResponse, VoiceVerb};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[test]
fn test_dial_for_destination() {
    let markup = render_call_markup(Some("+15551234567"), "+15550001111");

    match markup.verbs() {
        [VoiceVerb::Dial(dial)] => {
            assert_eq!(dial.number, "+15551234567");
            assert_eq!(dial.caller_id.as_deref(), Some("+15550001111"));
            assert!(dial.answer_on_bridge);
            assert_eq!(dial.timeout_secs, Some(30));
        }
        other => panic!("expected a single dial, got {:?}", other),
    }

    assert_eq!(
        markup.to_xml(),
        format!(
            "{}<Response><Dial callerId=\"+15550001111\" answerOnBridge=\"true\" timeout=\"30\"><Number>+15551234567</Number></Dial></Response>",
            DECLARATION
        )
    );
}

#[test]
fn test_apology_without_destination() {
    for to in [None, Some("")] {
        let markup = render_call_markup(to, "+15550001111");

        match markup.verbs() {
            [VoiceVerb::Say(say)] => assert!(say.text.starts_with("Sorry")),
            other => panic!("expected a single say, got {:?}", other),
        }
        assert!(!markup.to_xml().contains("<Dial"));
    }
}

#[test]
fn test_dial_without_caller_id() {
    let xml = render_call_markup(Some("+15551234567"), "").to_xml();

    assert!(!xml.contains("callerId"));
    assert!(xml.contains("<Number>+15551234567</Number>"));
}

#[test]
fn test_destination_is_escaped() {
    let xml = VoiceResponse::new()
        .dial(Dial::new("<sip:a&b>"))
        .to_xml();

    assert!(xml.contains("<Number>&lt;sip:a&amp;b&gt;</Number>"));
}

#[test]
fn test_say_with_voice() {
    let xml = VoiceResponse::new()
        .say(Say::new("Hello").voice("alice"))
        .to_xml();

    assert!(xml.ends_with(r#"<Response><Say voice="alice">Hello</Say></Response>"#));
}

#[test]
fn test_auto_reply_echoes_body() {
    let reply = render_auto_reply("where are you?");

    assert_eq!(
        reply.messages(),
        ["Thanks for your message! We received: \"where are you?\"".to_string()]
    );
    assert_eq!(
        reply.to_xml(),
        format!(
            "{}<Response><Message>Thanks for your message! We received: &quot;where are you?&quot;</Message></Response>",
            DECLARATION
        )
    );
}

#[test]
fn test_empty_messaging_response() {
    assert_eq!(
        MessagingResponse::new().to_xml(),
        format!("{}<Response></Response>", DECLARATION)
    );
}

#[test]
fn test_auto_reply_drops_control_characters() {
    let xml = render_auto_reply("hi\u{0}\u{7} there").to_xml();

    assert!(xml.contains("We received: &quot;hi there&quot;"));
    assert!(!xml.chars().any(|c| c < ' '));
}
