//! SMS provider configuration

use serde::{Deserialize, Serialize};

/// Which SMS provider delivers verification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log the message instead of sending it (development)
    #[default]
    Console,
    /// Twilio Programmable Messaging
    Twilio,
    /// AWS Simple Notification Service
    AwsSns,
}

impl SmsProvider {
    /// Parse a provider name the way `SMS_PROVIDER` is interpreted: unknown
    /// names select the console provider.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" | "mock" | "log" => Ok(SmsProvider::Console),
            "twilio" => Ok(SmsProvider::Twilio),
            "aws" | "sns" | "aws-sns" => Ok(SmsProvider::AwsSns),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}

impl std::fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmsProvider::Console => write!(f, "console"),
            SmsProvider::Twilio => write!(f, "twilio"),
            SmsProvider::AwsSns => write!(f, "aws-sns"),
        }
    }
}

/// Twilio credentials; every field is required for sending
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TwilioCredentials {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
}

impl TwilioCredentials {
    /// Read `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` and
    /// `TWILIO_PHONE_NUMBER` (or `TWILIO_FROM_NUMBER`)
    pub fn from_env() -> Self {
        Self {
            account_sid: super::env_non_empty("TWILIO_ACCOUNT_SID"),
            auth_token: super::env_non_empty("TWILIO_AUTH_TOKEN"),
            from_number: super::env_non_empty("TWILIO_PHONE_NUMBER")
                .or_else(|| super::env_non_empty("TWILIO_FROM_NUMBER")),
        }
    }

    /// Names of the variables that are still missing
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account_sid.is_none() {
            missing.push("TWILIO_ACCOUNT_SID");
        }
        if self.auth_token.is_none() {
            missing.push("TWILIO_AUTH_TOKEN");
        }
        if self.from_number.is_none() {
            missing.push("TWILIO_PHONE_NUMBER");
        }
        missing
    }
}

/// AWS SNS credentials and delivery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwsSnsCredentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: String,
    /// Sender ID (not supported in every region)
    pub sender_id: Option<String>,
    /// "Transactional" or "Promotional"
    pub sms_type: String,
}

impl Default for AwsSnsCredentials {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: "us-east-1".to_string(),
            sender_id: None,
            sms_type: "Transactional".to_string(),
        }
    }
}

impl AwsSnsCredentials {
    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`,
    /// `AWS_SNS_SENDER_ID` and `AWS_SNS_SMS_TYPE`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            access_key_id: super::env_non_empty("AWS_ACCESS_KEY_ID"),
            secret_access_key: super::env_non_empty("AWS_SECRET_ACCESS_KEY"),
            region: super::env_non_empty("AWS_REGION").unwrap_or(defaults.region),
            sender_id: super::env_non_empty("AWS_SNS_SENDER_ID"),
            sms_type: super::env_non_empty("AWS_SNS_SMS_TYPE").unwrap_or(defaults.sms_type),
        }
    }

    /// Names of the variables that are still missing
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.access_key_id.is_none() {
            missing.push("AWS_ACCESS_KEY_ID");
        }
        if self.secret_access_key.is_none() {
            missing.push("AWS_SECRET_ACCESS_KEY");
        }
        missing
    }
}

/// SMS service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Selected provider
    pub provider: SmsProvider,

    /// Print a banner with the full message to stdout (console provider)
    #[serde(default)]
    pub console_output: bool,

    /// Maximum send attempts for remote providers
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry delay in milliseconds for remote providers
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    pub twilio: TwilioCredentials,

    pub aws_sns: AwsSnsCredentials,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::default(),
            console_output: false,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            twilio: TwilioCredentials::default(),
            aws_sns: AwsSnsCredentials::default(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl SmsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let provider = super::env_non_empty("SMS_PROVIDER")
            .map(|name| SmsProvider::from_name(&name))
            .unwrap_or_default();

        Self {
            provider,
            console_output: super::env_or("SMS_CONSOLE_OUTPUT", true),
            max_retries: super::env_or("SMS_MAX_RETRIES", default_max_retries()),
            retry_delay_ms: super::env_or("SMS_RETRY_DELAY_MS", default_retry_delay_ms()),
            twilio: TwilioCredentials::from_env(),
            aws_sns: AwsSnsCredentials::from_env(),
        }
    }

    /// Console provider without stdout banner
    pub fn console() -> Self {
        Self::default()
    }
}
