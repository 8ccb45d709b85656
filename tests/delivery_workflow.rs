//! Receipt delivery workflow integration tests
//!
//! These tests drive a `ReceiptDesk` through the full submit, receipt and
//! send cycle against a scripted gateway whose outcomes are fixed in
//! advance. Latency is exercised with paused tokio time, so nothing actually
//! waits.

use async_trait::async_trait;
use futures::future::join_all;
use landtrade_ledger::core::{
    DeliveryGateway, LedgerState, PendingSend, ReceiptDesk, SteppingClock, TracingNotifier,
};
use landtrade_ledger::io::parse_receipt_csv;
use landtrade_ledger::types::{
    DeliveryError, EmailStatus, LedgerError, ReceiptMessage, TradePercentage, TransactionForm,
    ValidationError,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const START: i64 = 1_704_844_800_000;
const LATENCY: Duration = Duration::from_secs(2);

/// Gateway that plays back a fixed list of outcomes
///
/// Once the script runs out every send is delivered.
struct ScriptedGateway {
    latency: Duration,
    outcomes: Mutex<VecDeque<bool>>,
    sent: Mutex<Vec<ReceiptMessage>>,
}

impl ScriptedGateway {
    fn new(latency: Duration, outcomes: impl IntoIterator<Item = bool>) -> Arc<Self> {
        Arc::new(Self {
            latency,
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<ReceiptMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryGateway for ScriptedGateway {
    async fn send(&self, message: &ReceiptMessage) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        tokio::time::sleep(self.latency).await;

        let delivered = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if delivered {
            Ok(())
        } else {
            Err(DeliveryError::Rejected("mailbox unavailable".to_string()))
        }
    }
}

fn desk(gateway: Arc<ScriptedGateway>) -> ReceiptDesk {
    let state = LedgerState::new(
        Arc::new(SteppingClock::new(START, 1000)),
        Arc::new(TracingNotifier),
    );
    ReceiptDesk::new(state, gateway)
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

fn buyer(n: usize) -> TransactionForm {
    TransactionForm {
        full_name: format!("Buyer {}", n),
        email: format!("buyer{}@example.com", n),
        ..ada()
    }
}

#[tokio::test]
async fn test_ada_obi_is_recorded_not_sent() {
    let desk = desk(ScriptedGateway::new(Duration::ZERO, []));

    let tx = desk.submit(ada()).await.unwrap();

    assert_eq!(tx.email_status, EmailStatus::NotSent);
    assert_eq!(tx.amount, Decimal::from(500_000));
    assert_eq!(tx.trade_percentage, TradePercentage::new(20).unwrap());

    let receipt = desk.generate_receipt(&tx.id).await.unwrap();
    assert_eq!(receipt.amount, "₦500,000");
    assert_eq!(desk.records().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_send_is_pending_until_gateway_resolves() {
    let gateway = ScriptedGateway::new(LATENCY, [true]);
    let desk = desk(gateway.clone());
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();

    let sender = desk.clone();
    let send = tokio::spawn(async move { sender.send_receipt().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(desk.receipt_status().await, Some(EmailStatus::Pending));
    assert_eq!(desk.records().await[0].email_status, EmailStatus::Pending);

    let outcome = send.await.unwrap().unwrap();

    assert_eq!(outcome, Some(EmailStatus::Delivered));
    assert_eq!(desk.receipt_status().await, Some(EmailStatus::Delivered));
    assert_eq!(desk.records().await[0].email_status, EmailStatus::Delivered);
    assert_eq!(gateway.sent()[0].recipient, "ada@example.com");
}

#[tokio::test]
async fn test_invalid_recipient_changes_nothing() {
    let gateway = ScriptedGateway::new(Duration::ZERO, []);
    let desk = desk(gateway.clone());
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();
    desk.set_receipt_email("ada-at-example").await;

    let result = desk.send_receipt().await;

    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::InvalidEmail { .. }))
    ));
    assert_eq!(desk.receipt_status().await, Some(EmailStatus::NotSent));
    assert_eq!(desk.counters().await, Default::default());
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn test_send_without_selection_is_a_no_op() {
    let desk = desk(ScriptedGateway::new(Duration::ZERO, []));
    desk.submit(ada()).await.unwrap();

    assert_eq!(desk.send_receipt().await.unwrap(), None);
    assert_eq!(desk.export_receipt().await.unwrap(), None);
    assert_eq!(desk.counters().await.sent, 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_send_while_pending_is_rejected() {
    let gateway = ScriptedGateway::new(LATENCY, [true]);
    let desk = desk(gateway.clone());
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();

    let first = desk.begin_send().await.unwrap().unwrap();
    let second = desk.begin_send().await;

    assert!(matches!(second, Err(LedgerError::SendInProgress { .. })));
    assert_eq!(first.resolve().await.unwrap(), EmailStatus::Delivered);
    assert_eq!(desk.counters().await.sent, 1);
    assert_eq!(gateway.sent().len(), 1);
}

#[tokio::test]
async fn test_failed_send_can_be_retried() {
    let desk = desk(ScriptedGateway::new(Duration::ZERO, [false, true]));
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();

    assert_eq!(
        desk.send_receipt().await.unwrap(),
        Some(EmailStatus::Failed)
    );
    assert_eq!(
        desk.send_receipt().await.unwrap(),
        Some(EmailStatus::Delivered)
    );

    let counters = desk.counters().await;
    assert_eq!(counters.sent, 2);
    assert_eq!(counters.failed, 1);
    assert_eq!(counters.delivered, 1);
}

#[tokio::test]
async fn test_hundred_consecutive_sends() {
    let outcomes = (0..100).map(|i| i % 3 != 0);
    let desk = desk(ScriptedGateway::new(Duration::ZERO, outcomes));
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();

    for _ in 0..100 {
        let status = desk.send_receipt().await.unwrap().unwrap();
        assert!(status.is_terminal());
        assert_eq!(desk.receipt_status().await, Some(status));
    }

    let counters = desk.counters().await;
    assert_eq!(counters.sent, 100);
    assert_eq!(counters.pending, 100);
    assert_eq!(counters.failed, 34);
    assert_eq!(counters.delivered, 66);
    assert_eq!(counters.resolved(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_sends_for_different_records_overlap() {
    let gateway = ScriptedGateway::new(LATENCY, [true, false, true]);
    let desk = desk(gateway.clone());
    let mut pending: Vec<PendingSend> = Vec::new();

    for n in 0..3 {
        let tx = desk.submit(buyer(n)).await.unwrap();
        desk.generate_receipt(&tx.id).await.unwrap();
        pending.push(desk.begin_send().await.unwrap().unwrap());
    }

    let started = tokio::time::Instant::now();
    let outcomes = join_all(pending.into_iter().map(PendingSend::resolve)).await;

    assert!(started.elapsed() < LATENCY * 2);
    let delivered = outcomes
        .into_iter()
        .filter(|outcome| matches!(outcome, Ok(EmailStatus::Delivered)))
        .count();
    assert_eq!(delivered, 2);

    let analytics = desk.analytics().await;
    assert_eq!(analytics.counters.sent, 3);
    assert_eq!(analytics.counters.resolved(), 3);
    assert_eq!(analytics.recent.len(), 3);
    assert_eq!(analytics.recent[0].full_name, "Buyer 2");
}

#[tokio::test]
async fn test_completion_touches_only_its_own_record() {
    let desk = desk(ScriptedGateway::new(Duration::ZERO, [true]));
    let first = desk.submit(buyer(1)).await.unwrap();
    let second = desk.submit(buyer(2)).await.unwrap();

    desk.generate_receipt(&first.id).await.unwrap();
    let send = desk.begin_send().await.unwrap().unwrap();
    desk.generate_receipt(&second.id).await.unwrap();
    send.resolve().await.unwrap();

    let records = desk.records().await;
    assert_eq!(records[0].email_status, EmailStatus::Delivered);
    assert_eq!(records[1].email_status, EmailStatus::NotSent);
    assert_eq!(desk.receipt_status().await, Some(EmailStatus::NotSent));
}

#[tokio::test]
async fn test_recipient_override_is_used_for_the_send() {
    let gateway = ScriptedGateway::new(Duration::ZERO, []);
    let desk = desk(gateway.clone());
    let tx = desk.submit(ada()).await.unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();
    desk.set_receipt_email("accounts@example.com").await;

    desk.send_receipt().await.unwrap();

    let sent = gateway.sent();
    assert_eq!(sent[0].recipient, "accounts@example.com");
    assert_eq!(sent[0].subject, format!("PWAN MAX Buy to Sell receipt #{}", tx.id));
    assert!(sent[0].body.contains("Name: Ada Obi"));
}

#[tokio::test]
async fn test_exported_receipt_round_trips() {
    let desk = desk(ScriptedGateway::new(Duration::ZERO, []));
    let tx = desk
        .submit(TransactionForm {
            full_name: "Okafor, Chinedu".to_string(),
            amount: "1250.50".to_string(),
            ..ada()
        })
        .await
        .unwrap();
    desk.generate_receipt(&tx.id).await.unwrap();

    let export = desk.export_receipt().await.unwrap().unwrap();
    let parsed = parse_receipt_csv(&export.contents).unwrap();

    assert_eq!(export.file_name, format!("PWAN-Receipt-{}.csv", tx.id));
    assert_eq!(parsed.id, tx.id);
    assert_eq!(parsed.date, "2024-01-10");
    assert_eq!(parsed.full_name, "Okafor, Chinedu");
    assert_eq!(parsed.amount, tx.amount);
    assert_eq!(parsed.trade_percentage, tx.trade_percentage);
}
