//! Unit tests for the Twilio SMS service

use hm_core::errors::DomainError;
use hm_core::services::otp::SmsDispatcher;
use hm_shared::config::sms::TwilioCredentials;

use crate::sms::{TwilioSmsService, MAX_MESSAGE_LENGTH};

fn full_credentials() -> TwilioCredentials {
    TwilioCredentials {
        account_sid: Some("ACtest".to_string()),
        auth_token: Some("token".to_string()),
        from_number: Some("+15005550006".to_string()),
    }
}

#[test]
fn test_complete_credentials_are_configured() {
    let service = TwilioSmsService::new(&full_credentials(), 3, 10);
    assert!(service.is_configured());
    assert_eq!(service.provider_name(), "Twilio");
}

#[tokio::test]
async fn test_missing_credentials_fail_every_send() {
    let credentials = TwilioCredentials {
        auth_token: None,
        from_number: None,
        ..full_credentials()
    };
    let service = TwilioSmsService::new(&credentials, 3, 10);

    assert!(!service.is_configured());

    let err = service.send("+911234567890", "hello").await.unwrap_err();
    match err {
        DomainError::Dispatch { provider, message } => {
            assert_eq!(provider, "Twilio");
            assert!(message.contains("TWILIO_AUTH_TOKEN"));
            assert!(message.contains("TWILIO_PHONE_NUMBER"));
            assert!(!message.contains("TWILIO_ACCOUNT_SID"));
        }
        other => panic!("expected dispatch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_long_message_rejected_before_network() {
    let service = TwilioSmsService::new(&full_credentials(), 1, 10);
    let message = "x".repeat(MAX_MESSAGE_LENGTH + 1);

    let err = service.send("+911234567890", &message).await.unwrap_err();
    assert!(matches!(err, DomainError::Dispatch { ref message, .. } if message.contains("1600")));
}
