//! Unit tests for the AWS SNS SMS service

use hm_core::errors::DomainError;
use hm_core::services::otp::SmsDispatcher;
use hm_shared::config::sms::AwsSnsCredentials;

use crate::sms::{AwsSnsSmsService, MAX_MESSAGE_LENGTH};

fn full_credentials() -> AwsSnsCredentials {
    AwsSnsCredentials {
        access_key_id: Some("AKIATEST".to_string()),
        secret_access_key: Some("secret".to_string()),
        region: "ap-south-1".to_string(),
        ..AwsSnsCredentials::default()
    }
}

#[tokio::test]
async fn test_complete_credentials_are_configured() {
    let service = AwsSnsSmsService::new(&full_credentials(), 3, 10).await;

    assert!(service.is_configured());
    assert_eq!(service.region(), "ap-south-1");
    assert_eq!(service.provider_name(), "AWS SNS");
}

#[tokio::test]
async fn test_missing_credentials_fail_every_send() {
    let service = AwsSnsSmsService::new(&AwsSnsCredentials::default(), 3, 10).await;

    assert!(!service.is_configured());
    assert_eq!(service.region(), "us-east-1");

    let err = service.send("+911234567890", "hello").await.unwrap_err();
    match err {
        DomainError::Dispatch { provider, message } => {
            assert_eq!(provider, "AWS SNS");
            assert!(message.contains("AWS_ACCESS_KEY_ID"));
            assert!(message.contains("AWS_SECRET_ACCESS_KEY"));
        }
        other => panic!("expected dispatch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_long_message_rejected_before_network() {
    let service = AwsSnsSmsService::new(&full_credentials(), 1, 10).await;
    let message = "x".repeat(MAX_MESSAGE_LENGTH + 1);

    let err = service.send("+911234567890", &message).await.unwrap_err();
    assert!(matches!(err, DomainError::Dispatch { .. }));
}
