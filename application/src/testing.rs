//! Test doubles shared by the use case tests.

use crate::ports::registration_gateway::{
    GatewayError, RegistrationGateway, Submission, WriteReceipt,
};
use async_trait::async_trait;
use signup_domain::{CEILING, EmailPolicy, MemberForm, RegistrationForm, RegistrationRecord};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Gateway whose responses are set by the test.
pub(crate) struct ScriptedGateway {
    count: Mutex<Result<u32, GatewayError>>,
    write: Mutex<Result<WriteReceipt, GatewayError>>,
    fetch_delay: Mutex<Option<Duration>>,
    pub(crate) fetch_calls: AtomicUsize,
    pub(crate) submit_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn with_count(count: u32) -> Self {
        Self {
            count: Mutex::new(Ok(count)),
            write: Mutex::new(Ok(WriteReceipt::new(200, false))),
            fetch_delay: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_count(&self, count: Result<u32, GatewayError>) {
        *self.count.lock().unwrap() = count;
    }

    pub(crate) fn set_write(&self, write: Result<WriteReceipt, GatewayError>) {
        *self.write.lock().unwrap() = write;
    }

    pub(crate) fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationGateway for ScriptedGateway {
    async fn fetch_count(&self) -> Result<u32, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.count.lock().unwrap().clone()
    }

    async fn submit(&self, _submission: &Submission) -> Result<WriteReceipt, GatewayError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.write.lock().unwrap().clone()
    }
}

/// A remote sheet shared by many clients that enforces the ceiling at write
/// time, the way the spreadsheet script does.
pub(crate) struct SharedSheet {
    rows: Mutex<u32>,
}

impl SharedSheet {
    pub(crate) fn new(rows: u32) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub(crate) fn rows(&self) -> u32 {
        *self.rows.lock().unwrap()
    }
}

#[async_trait]
impl RegistrationGateway for SharedSheet {
    async fn fetch_count(&self) -> Result<u32, GatewayError> {
        tokio::task::yield_now().await;
        Ok(self.rows())
    }

    async fn submit(&self, _submission: &Submission) -> Result<WriteReceipt, GatewayError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if *rows >= CEILING {
            return Ok(WriteReceipt::new(200, true));
        }
        *rows += 1;
        Ok(WriteReceipt::new(200, false))
    }
}

pub(crate) fn valid_form() -> RegistrationForm {
    RegistrationForm::new(
        "Pixel Pushers",
        [
            MemberForm::new("Ada", "Lovelace", "ada@uni.edu"),
            MemberForm::new("Grace", "Hopper", "grace@uni.edu"),
            MemberForm::new("Alan", "Turing", "alan@uni.edu"),
        ],
    )
}

pub(crate) fn valid_record() -> RegistrationRecord {
    valid_form()
        .validate(&EmailPolicy::open())
        .expect("fixture form is valid")
}
