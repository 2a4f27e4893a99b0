//! Test del poller dei risultati: macchina a stati, stop e riavvio

mod common;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use linkease::error::{AppError, Result};
use linkease::models::{ExecutionRecord, GeneratedPost};
use linkease::services::poller::{PollerState, ResultPoller, ResultSource};

const TICK: Duration = Duration::from_millis(20);

#[derive(Clone)]
enum Step {
    Record(ExecutionRecord),
    TransportError,
}

/// Sorgente con risposte a copione; esaurito il copione ripete l'ultimo passo.
/// Registra ogni fetch con l'id richiesto.
struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    fetched: Mutex<Vec<Uuid>>,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>, fallback: Step) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            fallback,
            fetched: Mutex::new(Vec::new()),
        })
    }

    fn always_processing() -> Arc<Self> {
        Self::new(Vec::new(), Step::Record(ExecutionRecord::processing()))
    }

    fn fetches(&self) -> Vec<Uuid> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSource for ScriptedSource {
    async fn fetch(&self, execution_id: &Uuid) -> Result<ExecutionRecord> {
        self.fetched.lock().unwrap().push(*execution_id);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Record(record) => Ok(record),
            Step::TransportError => Err(AppError::Internal("connessione rifiutata".to_string())),
        }
    }
}

fn completed_record() -> ExecutionRecord {
    let mut record = ExecutionRecord::processing();
    record.mark_completed(GeneratedPost {
        post_content: "Post generato".to_string(),
        image_url: "https://example.com/a.png".to_string(),
    });
    record
}

fn failed_record(error: &str) -> ExecutionRecord {
    let mut record = ExecutionRecord::processing();
    record.mark_failed(error.to_string());
    record
}

/// Attende che lo stato osservato soddisfi il predicato
async fn wait_for_state(
    rx: &mut watch::Receiver<PollerState>,
    predicate: impl Fn(&PollerState) -> bool,
) -> PollerState {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let state = rx.borrow();
                if predicate(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.expect("canale di stato chiuso");
        }
    })
    .await
    .expect("timeout in attesa dello stato del poller")
}

// ---------------------------------------------------------------------------
// Stati terminali
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poller_stops_after_observing_completed() {
    let source = ScriptedSource::new(
        vec![
            Step::Record(ExecutionRecord::processing()),
            Step::Record(ExecutionRecord::processing()),
            Step::Record(completed_record()),
        ],
        Step::Record(completed_record()),
    );

    let mut poller = ResultPoller::new(source.clone(), TICK);
    let mut rx = poller.subscribe();
    poller.start(Uuid::new_v4());
    assert_eq!(poller.state(), PollerState::Polling);

    let state = wait_for_state(&mut rx, |s| matches!(s, PollerState::Completed(_))).await;
    match state {
        PollerState::Completed(post) => assert_eq!(post.post_content, "Post generato"),
        other => panic!("stato inatteso: {:?}", other),
    }

    // Dopo lo stato terminale non devono esserci altri fetch
    let count = source.fetches().len();
    assert_eq!(count, 3);
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.fetches().len(), count);
}

#[tokio::test]
async fn poller_reports_the_failure_message() {
    let source = ScriptedSource::new(
        vec![Step::Record(failed_record(
            "La generazione del contenuto AI è fallita.",
        ))],
        Step::Record(ExecutionRecord::processing()),
    );

    let mut poller = ResultPoller::new(source.clone(), TICK);
    let mut rx = poller.subscribe();
    poller.start(Uuid::new_v4());

    let state = wait_for_state(&mut rx, |s| matches!(s, PollerState::Error(_))).await;
    assert_eq!(
        state,
        PollerState::Error("La generazione del contenuto AI è fallita.".to_string())
    );

    let count = source.fetches().len();
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.fetches().len(), count);
}

#[tokio::test]
async fn transport_error_stops_polling_without_retry() {
    let source = ScriptedSource::new(
        vec![Step::TransportError],
        Step::Record(ExecutionRecord::processing()),
    );

    let mut poller = ResultPoller::new(source.clone(), TICK);
    let mut rx = poller.subscribe();
    poller.start(Uuid::new_v4());

    let state = wait_for_state(&mut rx, |s| matches!(s, PollerState::Error(_))).await;
    assert_eq!(
        state,
        PollerState::Error("Impossibile recuperare i risultati.".to_string())
    );

    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.fetches().len(), 1);
}

// ---------------------------------------------------------------------------
// Stop e riavvio
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stop_tears_the_subscription_down() {
    let source = ScriptedSource::always_processing();
    let mut poller = ResultPoller::new(source.clone(), TICK);
    poller.start(Uuid::new_v4());

    tokio::time::sleep(TICK * 4).await;
    poller.stop();
    tokio::time::sleep(TICK).await;

    let count = source.fetches().len();
    assert!(count > 0, "il poller deve aver eseguito almeno un fetch");
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.fetches().len(), count);
}

#[tokio::test]
async fn restart_cancels_the_previous_subscription() {
    let source = ScriptedSource::always_processing();
    let mut poller = ResultPoller::new(source.clone(), TICK);

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    poller.start(first);
    tokio::time::sleep(TICK * 4).await;

    // Riavvio idempotente: l'intervallo precedente viene fermato
    poller.start(second);
    tokio::time::sleep(TICK).await;
    let after_restart = source.fetches().len();

    tokio::time::sleep(TICK * 5).await;
    let tail = &source.fetches()[after_restart..];
    assert!(!tail.is_empty(), "il nuovo polling deve essere attivo");
    assert!(
        tail.iter().all(|id| *id == second),
        "dopo il riavvio i fetch devono riguardare solo la nuova esecuzione"
    );
}

#[tokio::test]
async fn dropping_the_poller_stops_the_timer() {
    let source = ScriptedSource::always_processing();
    {
        let mut poller = ResultPoller::new(source.clone(), TICK);
        poller.start(Uuid::new_v4());
        tokio::time::sleep(TICK * 3).await;
    }

    tokio::time::sleep(TICK).await;
    let count = source.fetches().len();
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(source.fetches().len(), count);
}

// ---------------------------------------------------------------------------
// Transizioni guidate dal flusso di pubblicazione
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_flow_transitions() {
    let source = ScriptedSource::always_processing();
    let mut poller = ResultPoller::new(source, TICK);

    assert_eq!(poller.state(), PollerState::Idle);

    poller.mark_generating();
    assert_eq!(poller.state(), PollerState::Generating);

    poller.begin_publishing();
    assert_eq!(poller.state(), PollerState::Publishing);

    poller.mark_published();
    assert_eq!(poller.state(), PollerState::Published);

    poller.reset();
    assert_eq!(poller.state(), PollerState::Idle);
}
