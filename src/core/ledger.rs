//! Ledger state and its action handlers
//!
//! `LedgerState` is the single owner of everything the application tracks:
//! the transaction store, the delivery counters, the draft form, the selected
//! record and the recipient email field. It is only changed through the
//! action handlers below, each of which emits its notifications.
//!
//! The receipt delivery workflow is split in two so the state is never
//! borrowed across the gateway's latency:
//!
//! ```text
//! begin_send:    NotSent | Delivered | Failed  ->  Pending      (sent += 1, pending += 1)
//! complete_send: Pending  ->  Delivered (delivered += 1) | Failed (failed += 1)
//! ```
//!
//! A second `begin_send` for a record that is still `Pending` is rejected.

use crate::core::traits::{Clock, NoticeKind, Notifier, Sound};
use crate::core::transaction_store::TransactionStore;
use crate::core::validation::{validate_email, validate_form};
use crate::io::receipt::{export_receipt, render_receipt_text, ReceiptExport};
use crate::types::{
    AnalyticsView, DeliveryError, EmailCounters, EmailStatus, LedgerError, Receipt,
    ReceiptMessage, Transaction, TransactionForm, TransactionId, RECENT_ACTIVITY_LIMIT,
};
use std::sync::Arc;

/// A send attempt that has entered `Pending` and awaits its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    pub message: ReceiptMessage,
}

impl SendTicket {
    pub fn transaction_id(&self) -> &TransactionId {
        &self.message.transaction_id
    }
}

/// Application state owned by one controller
pub struct LedgerState {
    store: TransactionStore,
    counters: EmailCounters,
    form: TransactionForm,
    selected: Option<TransactionId>,
    receipt_email: String,
    last_timestamp: Option<i64>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl LedgerState {
    /// Create an empty ledger with a blank form dated today
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        LedgerState {
            store: TransactionStore::new(),
            counters: EmailCounters::default(),
            form: TransactionForm::blank(clock.today()),
            selected: None,
            receipt_email: String::new(),
            last_timestamp: None,
            clock,
            notifier,
        }
    }

    /// The draft form
    pub fn form(&self) -> &TransactionForm {
        &self.form
    }

    /// Edit the draft form in place
    pub fn form_mut(&mut self) -> &mut TransactionForm {
        &mut self.form
    }

    /// Replace the draft with `form` and submit it
    pub fn submit(&mut self, form: TransactionForm) -> Result<&Transaction, LedgerError> {
        self.form = form;
        self.submit_draft()
    }

    /// Validate the draft form and record it as a new transaction
    ///
    /// On success the form is reset (date set to today) and the recipient
    /// field is pre-filled with the buyer's email. On failure the user is
    /// alerted and nothing changes.
    pub fn submit_draft(&mut self) -> Result<&Transaction, LedgerError> {
        let validated = match validate_form(&self.form) {
            Ok(validated) => validated,
            Err(e) => {
                self.notifier.alert(&e.to_string());
                return Err(e.into());
            }
        };

        // Identifiers derive from the timestamp, so it must strictly increase
        let now = self.clock.now_millis();
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + 1,
            _ => now,
        };

        let tx = Transaction {
            id: TransactionId::from_millis(timestamp),
            full_name: validated.full_name,
            state: validated.state,
            date: validated.date,
            amount: validated.amount,
            email: validated.email,
            trade_percentage: validated.trade_percentage,
            pbo_name: validated.pbo_name,
            timestamp,
            email_status: EmailStatus::NotSent,
        };

        let stored = self.store.append(tx)?;
        self.last_timestamp = Some(timestamp);
        self.receipt_email = stored.email.clone();
        self.form = TransactionForm::blank(self.clock.today());

        tracing::info!(id = %stored.id, buyer = %stored.full_name, "transaction recorded");
        self.notifier.play_sound(Sound::Success);
        self.notifier.notify(NoticeKind::Success, "Transaction Saved");

        Ok(stored)
    }

    /// Select a record and pre-fill the recipient with its email
    ///
    /// Generating the same receipt twice yields the same view.
    pub fn generate_receipt(&mut self, id: &TransactionId) -> Result<Receipt, LedgerError> {
        let tx = self
            .store
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;
        let receipt = Receipt::from(tx);

        self.receipt_email = tx.email.clone();
        self.selected = Some(id.clone());
        tracing::debug!(%id, "receipt generated");

        Ok(receipt)
    }

    /// The currently selected record, if any
    pub fn selected(&self) -> Option<&Transaction> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    /// Status shown alongside the receipt view
    ///
    /// Read from the selected record, so it always matches the store.
    pub fn receipt_status(&self) -> Option<EmailStatus> {
        self.selected().map(|tx| tx.email_status)
    }

    pub fn receipt_email(&self) -> &str {
        &self.receipt_email
    }

    pub fn set_receipt_email(&mut self, email: impl Into<String>) {
        self.receipt_email = email.into();
    }

    /// Render the selected record as a downloadable CSV receipt
    ///
    /// Returns `Ok(None)` when nothing is selected.
    pub fn export_receipt(&self) -> Result<Option<ReceiptExport>, LedgerError> {
        let Some(tx) = self.selected() else {
            return Ok(None);
        };

        let export = export_receipt(&Receipt::from(tx))?;
        tracing::debug!(file = %export.file_name, "receipt exported");
        self.notifier.play_sound(Sound::Success);
        self.notifier
            .notify(NoticeKind::Success, "Receipt Downloaded as CSV");

        Ok(Some(export))
    }

    /// Start a receipt send for the selected record
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing is selected; nothing happens
    /// * `Ok(Some(ticket))` - The record is now `Pending`
    /// * `Err(LedgerError::Validation)` - The recipient email is invalid
    /// * `Err(LedgerError::SendInProgress)` - The record already has a send in flight
    pub fn begin_send(&mut self) -> Result<Option<SendTicket>, LedgerError> {
        let Some(id) = self.selected.clone() else {
            return Ok(None);
        };

        if let Err(e) = validate_email(&self.receipt_email) {
            self.notifier.alert(&e.to_string());
            return Err(e.into());
        }

        let tx = self
            .store
            .get(&id)
            .ok_or_else(|| LedgerError::transaction_not_found(&id))?;
        if tx.email_status == EmailStatus::Pending {
            return Err(LedgerError::send_in_progress(&id));
        }

        let receipt = Receipt::from(tx);
        let message = ReceiptMessage {
            transaction_id: id.clone(),
            recipient: self.receipt_email.clone(),
            subject: format!("PWAN MAX Buy to Sell receipt #{}", id),
            body: render_receipt_text(&receipt),
        };

        self.store.set_status(&id, EmailStatus::Pending)?;
        self.counters.record(EmailStatus::Pending);

        tracing::info!(%id, recipient = %message.recipient, "sending receipt");
        self.notifier.play_sound(Sound::Notification);
        self.notifier.notify(
            NoticeKind::Success,
            &format!("Sending receipt to {}...", message.recipient),
        );

        Ok(Some(SendTicket { message }))
    }

    /// Resolve a pending send with the gateway's outcome
    ///
    /// Any gateway error is recorded as `Failed`. Only the ticket's record
    /// is touched, whatever is selected now.
    pub fn complete_send(
        &mut self,
        ticket: SendTicket,
        outcome: Result<(), DeliveryError>,
    ) -> Result<EmailStatus, LedgerError> {
        let id = ticket.transaction_id();
        let recipient = &ticket.message.recipient;

        let status = match outcome {
            Ok(()) => EmailStatus::Delivered,
            Err(ref e) => {
                tracing::warn!(%id, %recipient, error = %e, "receipt delivery failed");
                EmailStatus::Failed
            }
        };

        self.store.set_status(id, status)?;
        self.counters.record(status);

        match status {
            EmailStatus::Delivered => {
                tracing::info!(%id, %recipient, "receipt delivered");
                self.notifier.play_sound(Sound::Success);
                self.notifier.notify(
                    NoticeKind::Success,
                    &format!("Receipt delivered to {}", recipient),
                );
            }
            _ => {
                self.notifier.play_sound(Sound::Error);
                self.notifier
                    .notify(NoticeKind::Error, &format!("Failed to send to {}", recipient));
            }
        }

        Ok(status)
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Transaction] {
        self.store.all()
    }

    /// Look up one record
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.store.get(id)
    }

    pub fn counters(&self) -> EmailCounters {
        self.counters
    }

    /// Counters plus the most recent send activity
    pub fn analytics(&self) -> AnalyticsView {
        AnalyticsView {
            counters: self.counters,
            recent: self.store.recent_activity(RECENT_ACTIVITY_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SteppingClock;
    use crate::types::ValidationError;
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    const START: i64 = 1_704_844_800_000;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Notice(NoticeKind, String),
        Sound(Sound),
        Alert(String),
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingNotifier {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, kind: NoticeKind, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Notice(kind, message.to_string()));
        }

        fn play_sound(&self, sound: Sound) {
            self.events.lock().unwrap().push(Event::Sound(sound));
        }

        fn alert(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Alert(message.to_string()));
        }
    }

    fn ada() -> TransactionForm {
        TransactionForm {
            full_name: "Ada Obi".to_string(),
            state: "Lagos".to_string(),
            date: "2024-01-10".to_string(),
            amount: "500000".to_string(),
            email: "ada@example.com".to_string(),
            trade_percentage: "20%".to_string(),
            pbo_name: "Chidi".to_string(),
        }
    }

    #[fixture]
    fn notifier() -> Arc<RecordingNotifier> {
        Arc::new(RecordingNotifier::default())
    }

    fn ledger_with(notifier: &Arc<RecordingNotifier>, clock: SteppingClock) -> LedgerState {
        LedgerState::new(Arc::new(clock), notifier.clone())
    }

    #[rstest]
    fn test_submit_records_not_sent_transaction(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));

        let tx = ledger.submit(ada()).unwrap().clone();

        assert_eq!(tx.id.as_str(), "1704844800000");
        assert_eq!(tx.timestamp, START);
        assert_eq!(tx.email_status, EmailStatus::NotSent);
        assert_eq!(tx.amount, Decimal::new(500000, 0));
        assert_eq!(Receipt::from(&tx).amount, "₦500,000");
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(
            notifier.take(),
            vec![
                Event::Sound(Sound::Success),
                Event::Notice(NoticeKind::Success, "Transaction Saved".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_submit_resets_form_and_prefills_recipient(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));

        ledger.submit(ada()).unwrap();

        assert_eq!(ledger.form(), &TransactionForm::blank(ledger.clock.today()));
        assert_eq!(ledger.form().date, "2024-01-10");
        assert_eq!(ledger.receipt_email(), "ada@example.com");
    }

    #[rstest]
    #[case::missing_name(TransactionForm { full_name: String::new(), ..ada() })]
    #[case::missing_agent(TransactionForm { pbo_name: String::new(), ..ada() })]
    #[case::bad_email(TransactionForm { email: "ada.example.com".to_string(), ..ada() })]
    #[case::zero_amount(TransactionForm { amount: "0".to_string(), ..ada() })]
    #[case::negative_amount(TransactionForm { amount: "-10".to_string(), ..ada() })]
    #[case::text_amount(TransactionForm { amount: "lots".to_string(), ..ada() })]
    fn test_rejected_submission_leaves_store_unchanged(
        notifier: Arc<RecordingNotifier>,
        #[case] form: TransactionForm,
    ) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));

        let result = ledger.submit(form.clone());

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(ledger.records().is_empty());
        assert_eq!(ledger.form(), &form, "draft kept for correction");
        let events = notifier.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::Alert(_)));
    }

    #[rstest]
    fn test_identifiers_unique_when_clock_stalls(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 0));

        let first = ledger.submit(ada()).unwrap().id.clone();
        let second = ledger.submit(ada()).unwrap().id.clone();
        let third = ledger.submit(ada()).unwrap().id.clone();

        assert_eq!(first.as_str(), "1704844800000");
        assert_eq!(second.as_str(), "1704844800001");
        assert_eq!(third.as_str(), "1704844800002");
    }

    #[rstest]
    fn test_generate_receipt_is_idempotent(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.set_receipt_email("someone@else.com");

        let first = ledger.generate_receipt(&id).unwrap();
        let first_email = ledger.receipt_email().to_string();
        let second = ledger.generate_receipt(&id).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_email, "ada@example.com");
        assert_eq!(ledger.receipt_email(), "ada@example.com");
        assert_eq!(ledger.selected().map(|tx| &tx.id), Some(&id));
    }

    #[rstest]
    fn test_generate_receipt_unknown_id(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));

        let result = ledger.generate_receipt(&TransactionId::from_millis(1));

        assert!(matches!(
            result,
            Err(LedgerError::TransactionNotFound { .. })
        ));
        assert!(ledger.selected().is_none());
    }

    #[rstest]
    fn test_export_without_selection_is_noop(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        ledger.submit(ada()).unwrap();
        notifier.take();

        assert_eq!(ledger.export_receipt().unwrap(), None);
        assert!(notifier.take().is_empty());
    }

    #[rstest]
    fn test_export_selected_receipt(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();
        notifier.take();

        let export = ledger.export_receipt().unwrap().unwrap();

        assert_eq!(export.file_name, "PWAN-Receipt-1704844800000.csv");
        assert!(export.contents.contains("Amount (₦):,\"₦500,000\""));
        assert_eq!(
            notifier.take(),
            vec![
                Event::Sound(Sound::Success),
                Event::Notice(NoticeKind::Success, "Receipt Downloaded as CSV".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_send_without_selection_is_noop(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        ledger.submit(ada()).unwrap();

        assert_eq!(ledger.begin_send().unwrap(), None);
        assert_eq!(ledger.counters(), EmailCounters::default());
    }

    #[rstest]
    fn test_send_with_invalid_recipient_changes_nothing(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();
        ledger.set_receipt_email("not-an-email");
        notifier.take();

        let result = ledger.begin_send();

        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::InvalidEmail { .. }))
        ));
        assert_eq!(ledger.receipt_status(), Some(EmailStatus::NotSent));
        assert_eq!(ledger.counters(), EmailCounters::default());
        assert_eq!(
            notifier.take(),
            vec![Event::Alert("Please enter a valid email address".to_string())]
        );
    }

    #[rstest]
    fn test_begin_send_moves_to_pending(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();
        notifier.take();

        let ticket = ledger.begin_send().unwrap().unwrap();

        assert_eq!(ticket.transaction_id(), &id);
        assert_eq!(ticket.message.recipient, "ada@example.com");
        assert!(ticket.message.body.contains("Receipt #: 1704844800000"));
        assert_eq!(ledger.receipt_status(), Some(EmailStatus::Pending));
        assert_eq!(
            ledger.counters(),
            EmailCounters {
                sent: 1,
                pending: 1,
                delivered: 0,
                failed: 0
            }
        );
        assert_eq!(
            notifier.take(),
            vec![
                Event::Sound(Sound::Notification),
                Event::Notice(
                    NoticeKind::Success,
                    "Sending receipt to ada@example.com...".to_string()
                ),
            ]
        );
    }

    #[rstest]
    fn test_second_send_while_pending_rejected(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();
        ledger.begin_send().unwrap().unwrap();

        let result = ledger.begin_send();

        assert!(matches!(result, Err(LedgerError::SendInProgress { .. })));
        assert_eq!(ledger.counters().sent, 1);
    }

    #[rstest]
    #[case::delivered(Ok(()), EmailStatus::Delivered, Sound::Success, NoticeKind::Success, "Receipt delivered to ada@example.com")]
    #[case::rejected(
        Err(DeliveryError::Rejected("bounced".to_string())),
        EmailStatus::Failed,
        Sound::Error,
        NoticeKind::Error,
        "Failed to send to ada@example.com"
    )]
    #[case::transport(
        Err(DeliveryError::Transport("timeout".to_string())),
        EmailStatus::Failed,
        Sound::Error,
        NoticeKind::Error,
        "Failed to send to ada@example.com"
    )]
    fn test_complete_send(
        notifier: Arc<RecordingNotifier>,
        #[case] outcome: Result<(), DeliveryError>,
        #[case] expected: EmailStatus,
        #[case] sound: Sound,
        #[case] kind: NoticeKind,
        #[case] message: &str,
    ) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();
        let ticket = ledger.begin_send().unwrap().unwrap();
        notifier.take();

        let status = ledger.complete_send(ticket, outcome).unwrap();

        assert_eq!(status, expected);
        assert_eq!(ledger.get(&id).unwrap().email_status, expected);
        assert_eq!(ledger.receipt_status(), Some(expected));
        let counters = ledger.counters();
        assert_eq!(counters.sent, 1);
        assert_eq!(counters.resolved(), 1);
        assert_eq!(
            notifier.take(),
            vec![
                Event::Sound(sound),
                Event::Notice(kind, message.to_string())
            ]
        );
    }

    #[rstest]
    fn test_failed_send_can_be_retried(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let id = ledger.submit(ada()).unwrap().id.clone();
        ledger.generate_receipt(&id).unwrap();

        let ticket = ledger.begin_send().unwrap().unwrap();
        ledger
            .complete_send(ticket, Err(DeliveryError::Rejected("bounced".to_string())))
            .unwrap();
        let ticket = ledger.begin_send().unwrap().unwrap();
        ledger.complete_send(ticket, Ok(())).unwrap();

        assert_eq!(ledger.receipt_status(), Some(EmailStatus::Delivered));
        assert_eq!(
            ledger.counters(),
            EmailCounters {
                sent: 2,
                pending: 2,
                delivered: 1,
                failed: 1
            }
        );
    }

    #[rstest]
    fn test_completion_targets_ticket_record_not_selection(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let first = ledger.submit(ada()).unwrap().id.clone();
        let second = ledger
            .submit(TransactionForm {
                full_name: "Bola Ade".to_string(),
                email: "bola@example.com".to_string(),
                ..ada()
            })
            .unwrap()
            .id
            .clone();

        ledger.generate_receipt(&first).unwrap();
        let ticket = ledger.begin_send().unwrap().unwrap();
        ledger.generate_receipt(&second).unwrap();
        ledger.complete_send(ticket, Ok(())).unwrap();

        assert_eq!(ledger.get(&first).unwrap().email_status, EmailStatus::Delivered);
        assert_eq!(ledger.get(&second).unwrap().email_status, EmailStatus::NotSent);
        assert_eq!(ledger.receipt_status(), Some(EmailStatus::NotSent));
    }

    #[rstest]
    fn test_analytics_lists_recent_sends_newest_first(notifier: Arc<RecordingNotifier>) {
        let mut ledger = ledger_with(&notifier, SteppingClock::new(START, 1_000));
        let ids: Vec<TransactionId> = (0..12)
            .map(|_| ledger.submit(ada()).unwrap().id.clone())
            .collect();
        // Leave the first record unsent
        for id in &ids[1..] {
            ledger.generate_receipt(id).unwrap();
            let ticket = ledger.begin_send().unwrap().unwrap();
            ledger.complete_send(ticket, Ok(())).unwrap();
        }

        let view = ledger.analytics();

        assert_eq!(view.recent.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(view.recent[0].id, ids[11]);
        assert_eq!(view.recent[9].id, ids[2]);
        assert_eq!(view.counters.sent, 11);
        assert_eq!(view.counters.delivered, 11);
    }
}
