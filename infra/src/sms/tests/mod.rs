//! Unit tests for SMS module

#[cfg(test)]
pub mod create_dispatcher_tests;
#[cfg(all(test, feature = "twilio-sms"))]
pub mod twilio_tests;
#[cfg(all(test, feature = "aws-sns"))]
pub mod aws_sns_tests;
