//! Test doubles for the presentation tests.

use async_trait::async_trait;
use signup_application::{GatewayError, RegistrationGateway, Submission, WriteReceipt};
use std::sync::Mutex;

/// In-memory registration sheet.
pub(crate) struct FakeSheet {
    count: Mutex<Option<u32>>,
    pub(crate) submitted: Mutex<Vec<String>>,
}

impl FakeSheet {
    pub(crate) fn with_count(count: u32) -> Self {
        Self {
            count: Mutex::new(Some(count)),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Every request fails at the transport level.
    pub(crate) fn unreachable() -> Self {
        Self {
            count: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RegistrationGateway for FakeSheet {
    async fn fetch_count(&self) -> Result<u32, GatewayError> {
        (*self.count.lock().unwrap())
            .ok_or_else(|| GatewayError::ConnectionError("unreachable".to_string()))
    }

    async fn submit(&self, submission: &Submission) -> Result<WriteReceipt, GatewayError> {
        let mut count = self.count.lock().unwrap();
        let Some(current) = count.as_mut() else {
            return Err(GatewayError::ConnectionError("unreachable".to_string()));
        };
        if *current >= signup_domain::CEILING {
            return Ok(WriteReceipt::new(200, true));
        }
        *current += 1;
        self.submitted
            .lock()
            .unwrap()
            .push(submission.record.team_name().to_string());
        Ok(WriteReceipt::new(200, false))
    }
}
