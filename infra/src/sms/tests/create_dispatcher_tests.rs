//! Unit tests for dispatcher construction

use hm_core::services::otp::SmsDispatcher;
use hm_shared::{SmsConfig, SmsProvider};

use crate::sms::{create_sms_dispatcher, to_e164, SmsDispatcherKind};

#[tokio::test]
async fn test_default_is_console() {
    let dispatcher = create_sms_dispatcher(&SmsConfig::console()).await;

    assert!(matches!(dispatcher, SmsDispatcherKind::Console(_)));
    assert_eq!(dispatcher.provider(), SmsProvider::Console);
    assert_eq!(dispatcher.provider_name(), "Console");
    assert!(dispatcher.is_configured());
}

#[tokio::test]
async fn test_unknown_provider_name_falls_back_to_console() {
    let config = SmsConfig {
        provider: SmsProvider::from_name("carrier-pigeon"),
        ..SmsConfig::console()
    };

    let dispatcher = create_sms_dispatcher(&config).await;
    assert_eq!(dispatcher.provider(), SmsProvider::Console);
}

#[tokio::test]
async fn test_enum_delegates_send() {
    let dispatcher = create_sms_dispatcher(&SmsConfig::console()).await;

    let receipt = dispatcher.send("+911234567890", "hello").await.unwrap();
    assert!(receipt.message_id.starts_with("dev-"));
}

#[cfg(feature = "twilio-sms")]
#[tokio::test]
async fn test_twilio_without_credentials_is_unconfigured() {
    let config = SmsConfig {
        provider: SmsProvider::Twilio,
        ..SmsConfig::console()
    };

    let dispatcher = create_sms_dispatcher(&config).await;
    assert_eq!(dispatcher.provider(), SmsProvider::Twilio);
    assert!(!dispatcher.is_configured());
    assert!(dispatcher.send("+911234567890", "hello").await.is_err());
}

#[cfg(feature = "aws-sns")]
#[tokio::test]
async fn test_aws_without_credentials_is_unconfigured() {
    let config = SmsConfig {
        provider: SmsProvider::AwsSns,
        ..SmsConfig::console()
    };

    let dispatcher = create_sms_dispatcher(&config).await;
    assert_eq!(dispatcher.provider(), SmsProvider::AwsSns);
    assert!(!dispatcher.is_configured());
}

#[test]
fn test_to_e164() {
    assert_eq!(to_e164("+14155552671").unwrap(), "+14155552671");
    assert_eq!(to_e164("14155552671").unwrap(), "+14155552671");
    assert_eq!(to_e164("+1 (415) 555-2671").unwrap(), "+14155552671");
    assert!(to_e164("").is_err());
}
