//! Console SMS Service Implementation
//!
//! Logs SMS messages instead of sending them. Used in development and as the
//! default provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use hm_core::errors::{DomainError, DomainResult};
use hm_core::services::otp::{DispatchReceipt, SmsDispatcher};
use hm_shared::phone::mask_phone_number;

use super::check_message_length;

const PROVIDER_NAME: &str = "Console";

/// SMS dispatcher that writes messages to the log
#[derive(Clone)]
pub struct ConsoleSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to print a banner with the full message to stdout
    console_output: bool,
}

impl ConsoleSmsService {
    pub fn new(console_output: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for ConsoleSmsService {
    fn default() -> Self {
        Self::new(false)
    }
}

#[async_trait]
impl SmsDispatcher for ConsoleSmsService {
    async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
        if phone_number.trim().is_empty() {
            return Err(DomainError::dispatch(PROVIDER_NAME, "Phone number is required"));
        }
        check_message_length(message).map_err(|e| e.into_dispatch(PROVIDER_NAME))?;

        let message_id = format!("dev-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            phone = %mask_phone_number(phone_number),
            message_id = %message_id,
            length = message.chars().count(),
            "SMS logged by console provider"
        );

        if self.console_output {
            println!("\n========== SMS ==========");
            println!("To:      {}", phone_number);
            println!("Message: {}", message);
            println!("=========================\n");
        }

        Ok(DispatchReceipt::delivered(message_id))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}
