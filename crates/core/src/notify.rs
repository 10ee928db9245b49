//! Allocation notifier
//!
//! Best-effort delivery of booking confirmations (email/PDF dispatch lives
//! behind the `Notifier` trait). Runs strictly after the booking transaction
//! commits; a failure here is logged and never undoes or fails the booking.

use std::sync::{mpsc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Everything a delivery channel needs to render a confirmation
#[derive(Debug, Clone, Serialize)]
pub struct AllocationNotice {
    pub student_email: String,
    pub student_name: String,
    pub hall_name: String,
    pub room_number: String,
    pub receipt_id: uuid::Uuid,
    pub transaction_ref: String,
    pub amount_paid: i64,
    pub allocation_date: DateTime<Utc>,
}

/// Notification sink invoked after a booking commits
pub trait Notifier {
    fn allocation_confirmed(&self, notice: &AllocationNotice) -> Result<()>;
}

/// Notifier that records the confirmation in the log stream. Default for
/// the admin CLI where no mail relay is configured.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn allocation_confirmed(&self, notice: &AllocationNotice) -> Result<()> {
        info!(
            student = %notice.student_name,
            email = %notice.student_email,
            hall = %notice.hall_name,
            room = %notice.room_number,
            reference = %notice.transaction_ref,
            "Allocation confirmed"
        );
        Ok(())
    }
}

/// Notifier that hands notices to a background worker over a channel, so
/// delivery latency never sits on the booking path. The worker logs and
/// drops notices whose delivery fails.
pub struct ChannelNotifier {
    sender: Mutex<mpsc::Sender<AllocationNotice>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ChannelNotifier {
    /// Spawn the delivery worker. `deliver` is the actual transport
    /// (SMTP client, PDF renderer, webhook).
    pub fn spawn<F>(deliver: F) -> Self
    where
        F: Fn(&AllocationNotice) -> Result<()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<AllocationNotice>();

        let worker = thread::spawn(move || {
            for notice in receiver {
                if let Err(e) = deliver(&notice) {
                    warn!(
                        error = %e,
                        reference = %notice.transaction_ref,
                        "Allocation notice delivery failed"
                    );
                }
            }
        });

        Self {
            sender: Mutex::new(sender),
            worker: Some(worker),
        }
    }
}

impl Notifier for ChannelNotifier {
    fn allocation_confirmed(&self, notice: &AllocationNotice) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .map_err(|_| Error::Notification("notifier lock poisoned".into()))?;
        sender
            .send(notice.clone())
            .map_err(|_| Error::Notification("notifier worker stopped".into()))
    }
}

impl Drop for ChannelNotifier {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // Replace the sender so the channel disconnects and the worker
            // drains its queue and exits.
            if let Ok(mut sender) = self.sender.lock() {
                let (dummy, _) = mpsc::channel();
                *sender = dummy;
            }
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_notice() -> AllocationNotice {
        AllocationNotice {
            student_email: "ada@example.edu".into(),
            student_name: "Ada Obi".into(),
            hall_name: "Peace Hall".into(),
            room_number: "101".into(),
            receipt_id: uuid::Uuid::new_v4(),
            transaction_ref: "BU-HAMS-A1B2C3D4".into(),
            amount_paid: 50_000_00,
            allocation_date: Utc::now(),
        }
    }

    #[test]
    fn test_channel_notifier_delivers() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = delivered.clone();

        let notifier = ChannelNotifier::spawn(move |notice: &AllocationNotice| {
            sink.lock().unwrap().push(notice.transaction_ref.clone());
            Ok(())
        });

        notifier.allocation_confirmed(&sample_notice()).unwrap();
        notifier.allocation_confirmed(&sample_notice()).unwrap();
        drop(notifier); // joins the worker, draining the queue

        assert_eq!(delivered.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_channel_notifier_swallows_delivery_errors() {
        let notifier = ChannelNotifier::spawn(|_: &AllocationNotice| {
            Err(Error::Notification("smtp down".into()))
        });

        // Enqueueing still succeeds; the worker logs the failure.
        notifier.allocation_confirmed(&sample_notice()).unwrap();
    }
}
