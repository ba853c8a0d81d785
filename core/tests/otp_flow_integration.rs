//! End-to-end OTP flows through the public service API

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use hm_core::domain::entities::OtpRecord;
    use hm_core::errors::{DomainError, DomainResult};
    use hm_core::services::otp::{
        DispatchReceipt, ManualClock, OtpService, OtpServiceConfig, OtpStore, SmsDispatcher,
        VerifyOutcome,
    };

    // Store backed by a plain map
    #[derive(Default)]
    struct MapStore {
        records: tokio::sync::RwLock<HashMap<String, OtpRecord>>,
    }

    #[async_trait]
    impl OtpStore for MapStore {
        async fn put(&self, record: OtpRecord) -> DomainResult<()> {
            self.records
                .write()
                .await
                .insert(record.phone_number.clone(), record);
            Ok(())
        }

        async fn get(&self, phone_number: &str) -> DomainResult<Option<OtpRecord>> {
            Ok(self.records.read().await.get(phone_number).cloned())
        }

        async fn delete(&self, phone_number: &str) -> DomainResult<()> {
            self.records.write().await.remove(phone_number);
            Ok(())
        }
    }

    // Inbox that lets the test read codes the way a user would
    #[derive(Default)]
    struct Inbox {
        messages: Mutex<Vec<(String, String)>>,
    }

    impl Inbox {
        fn latest_code(&self, phone: &str) -> Option<String> {
            let messages = self.messages.lock().unwrap();
            messages
                .iter()
                .rev()
                .find(|(to, _)| to == phone)
                .and_then(|(_, body)| {
                    body.split_whitespace()
                        .map(|word| word.trim_end_matches('.'))
                        .find(|word| OtpRecord::is_well_formed_code(word))
                        .map(str::to_string)
                })
        }
    }

    #[async_trait]
    impl SmsDispatcher for Inbox {
        async fn send(&self, phone_number: &str, message: &str) -> DomainResult<DispatchReceipt> {
            self.messages
                .lock()
                .unwrap()
                .push((phone_number.to_string(), message.to_string()));
            Ok(DispatchReceipt::delivered(format!("it-{}", Uuid::new_v4())))
        }

        fn provider_name(&self) -> &str {
            "Inbox"
        }
    }

    fn setup() -> (OtpService<MapStore, Inbox>, Arc<MapStore>, Arc<Inbox>, Arc<ManualClock>) {
        let store = Arc::new(MapStore::default());
        let inbox = Arc::new(Inbox::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = OtpService::with_clock(
            Arc::clone(&store),
            Arc::clone(&inbox),
            OtpServiceConfig::default(),
            clock.clone(),
        );
        (service, store, inbox, clock)
    }

    #[tokio::test]
    async fn test_send_then_verify() {
        let (service, store, inbox, _) = setup();
        let phone = "+911234567890";

        let sent = service.send_otp(phone).await.unwrap();
        assert_eq!(sent.expires_in, 600);
        assert!(sent.message_id.starts_with("it-"));

        let stored = store.get(phone).await.unwrap().unwrap();
        assert_eq!(stored.attempts, 0);
        assert!(!stored.verified);

        let code = inbox.latest_code(phone).unwrap();
        assert_eq!(code, stored.code);

        let outcome = service.verify_otp(phone, &code).await.unwrap();
        assert!(outcome.is_success());
        assert!(!service.has_pending_otp(phone).await.unwrap());
    }

    #[tokio::test]
    async fn test_old_code_invalid_after_resend() {
        let (service, _, inbox, _) = setup();
        let phone = "+14155550123";

        service.send_otp(phone).await.unwrap();
        let first = inbox.latest_code(phone).unwrap();

        // Keep resending until the code actually changes
        let mut second = first.clone();
        while second == first {
            service.resend_otp(phone).await.unwrap();
            second = inbox.latest_code(phone).unwrap();
        }

        let outcome = service.verify_otp(phone, &first).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Mismatch { attempts_remaining: 4 });

        let outcome = service.verify_otp(phone, &second).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Verified);
    }

    #[tokio::test]
    async fn test_expiry_then_resend_recovers() {
        let (service, _, inbox, clock) = setup();
        let phone = "+447700900123";

        service.send_otp(phone).await.unwrap();
        let code = inbox.latest_code(phone).unwrap();

        clock.advance(Duration::minutes(11));
        assert_eq!(
            service.verify_otp(phone, &code).await.unwrap(),
            VerifyOutcome::Expired
        );

        service.resend_otp(phone).await.unwrap();
        let fresh = inbox.latest_code(phone).unwrap();
        assert_eq!(
            service.verify_otp(phone, &fresh).await.unwrap(),
            VerifyOutcome::Verified
        );
    }

    #[tokio::test]
    async fn test_invalid_phone_never_reaches_provider() {
        let (service, _, inbox, _) = setup();

        let err = service.send_otp("not-a-phone").await.unwrap_err();
        assert!(err.is_validation());
        assert!(inbox.messages.lock().unwrap().is_empty());

        let err = service.verify_otp("+911234567890", "12").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
