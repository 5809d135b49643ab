use std::sync::{Arc, Mutex as StdMutex};

use absence_backend::logging::init_tracing;
use absence_backend::{
    initialize_backend, AbsenceBackend, AbsenceError, DbConnection, FormEdit, FormPhase,
    InMemoryStorage, KeyValueStorage, MessageSender, StaticTextProvider, SubmitOutcome,
};
use async_trait::async_trait;
use chrono::NaiveTime;
use shared::{AbsenceFormConfig, Child, PersonName};
use tempfile::TempDir;
use tokio::sync::Notify;

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn child() -> Child {
    Child::new("child-7", PersonName::new("Elsa", "Lind"))
}

/// Key-value store whose reads wait for the test to release them
struct GatedStorage {
    inner: InMemoryStorage,
    release: Notify,
}

#[async_trait]
impl KeyValueStorage for GatedStorage {
    async fn get_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.release.notified().await;
        self.inner.get_value(key).await
    }

    async fn put_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.inner.put_value(key, value).await
    }
}

/// Sender that records bodies, optionally holding each send until released
#[derive(Default)]
struct TestSender {
    sent: StdMutex<Vec<String>>,
    hold: Option<Notify>,
}

impl TestSender {
    fn holding() -> Self {
        Self {
            hold: Some(Notify::new()),
            ..Default::default()
        }
    }

    fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.notify_one();
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for TestSender {
    async fn send_message(&self, body: &str) -> anyhow::Result<()> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        self.sent.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

fn backend(storage: Arc<dyn KeyValueStorage>, sender: Arc<TestSender>) -> AbsenceBackend {
    init_tracing();
    AbsenceBackend::new(
        AbsenceFormConfig::default(),
        storage,
        sender,
        Arc::new(StaticTextProvider::swedish()),
    )
}

#[tokio::test]
async fn late_cache_read_does_not_overwrite_typed_identity() {
    let storage = Arc::new(GatedStorage {
        inner: InMemoryStorage::with_values([("@childssn.child-7", "8001019879")]),
        release: Notify::new(),
    });
    let backend = backend(storage.clone(), Arc::new(TestSender::default()));
    let form = backend.absence_form(child());

    tokio::join!(form.mount_at(hm(9, 0)), async {
        form.dispatch(FormEdit::IdentityChanged("900101-0017".to_string()))
            .await;
        storage.release.notify_one();
    });

    let state = form.state().await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.identity_input, "900101-0017");
}

#[tokio::test]
async fn cache_stores_canonical_form_and_seeds_next_session() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("cache.db").display());
    let db = DbConnection::new(&url).await.unwrap();
    let sender = Arc::new(TestSender::default());
    let backend = backend(Arc::new(db.clone()), sender.clone());

    let form = backend.absence_form(child());
    form.mount_at(hm(10, 0)).await;
    form.dispatch(FormEdit::IdentityChanged("800101-9879".to_string()))
        .await;
    assert!(matches!(form.submit().await, SubmitOutcome::Submitted(_)));

    assert_eq!(
        db.get_value("@childssn.child-7").await.unwrap().as_deref(),
        Some("8001019879")
    );

    let next = backend.absence_form(child());
    next.mount_at(hm(10, 0)).await;
    assert_eq!(next.state().await.identity_input, "8001019879");

    db.close().await;
}

#[tokio::test]
async fn submit_while_sending_is_ignored() {
    let sender = Arc::new(TestSender::holding());
    let backend = backend(Arc::new(InMemoryStorage::new()), sender.clone());
    let form = backend.absence_form(child());
    form.mount_at(hm(9, 0)).await;
    form.dispatch(FormEdit::IdentityChanged("8001019879".to_string()))
        .await;

    let (first, second) = tokio::join!(form.submit(), async {
        while form.state().await.phase != FormPhase::Submitting {
            tokio::task::yield_now().await;
        }
        let second = form.submit().await;
        sender.release();
        second
    });

    assert_eq!(second, SubmitOutcome::Ignored);
    assert!(matches!(first, SubmitOutcome::Submitted(_)));
    assert_eq!(sender.sent(), vec!["8001019879".to_string()]);
}

#[tokio::test]
async fn failed_session_recovers_after_edit() {
    let sender = Arc::new(TestSender::default());
    let storage = Arc::new(InMemoryStorage::new());
    let backend = backend(storage.clone(), sender.clone());
    let form = backend.absence_form(child());
    form.mount_at(hm(9, 0)).await;
    form.dispatch(FormEdit::IdentityChanged("8001019879".to_string()))
        .await;
    form.dispatch(FormEdit::FullDayToggled(false)).await;
    form.dispatch(FormEdit::StartTimeChanged(hm(9, 5))).await;
    form.dispatch(FormEdit::EndTimeChanged(hm(11, 0))).await;

    assert_eq!(
        form.submit().await,
        SubmitOutcome::Failed(AbsenceError::Misaligned)
    );
    assert!(storage.is_empty().await);

    let state = form.dispatch(FormEdit::StartTimeChanged(hm(9, 10))).await;
    assert_eq!(state.phase, FormPhase::Editing);

    assert!(matches!(form.submit().await, SubmitOutcome::Submitted(_)));
    assert_eq!(sender.sent(), vec!["8001019879 0910-1100".to_string()]);
}

#[tokio::test]
async fn default_stack_hands_draft_to_shell() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("absence.db").display());
    let config = AbsenceFormConfig {
        school_sms_number: "+46701234567".to_string(),
        ..Default::default()
    };

    let (backend, mut drafts) = initialize_backend(config, &url).await.unwrap();
    let form = backend.absence_form(child());
    form.mount_at(hm(13, 0)).await;
    form.dispatch(FormEdit::IdentityChanged("19800101-9879".to_string()))
        .await;
    form.dispatch(FormEdit::FullDayToggled(false)).await;
    form.dispatch(FormEdit::EndTimeChanged(hm(15, 30))).await;

    let outcome = form.submit().await;

    let draft = drafts.recv().await.unwrap();
    assert_eq!(draft.recipient, "+46701234567");
    assert_eq!(draft.body, "8001019879 1300-1530");
    match outcome {
        SubmitOutcome::Submitted(message) => assert_eq!(message.as_str(), draft.body),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn missing_school_number_is_a_messaging_failure() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("absence.db").display());

    let (backend, _drafts) = initialize_backend(AbsenceFormConfig::default(), &url)
        .await
        .unwrap();
    let form = backend.absence_form(child());
    form.mount_at(hm(9, 0)).await;
    form.dispatch(FormEdit::IdentityChanged("8001019879".to_string()))
        .await;

    assert!(matches!(
        form.submit().await,
        SubmitOutcome::Failed(AbsenceError::MessagingFailure(_))
    ));
    assert_eq!(form.state().await.phase, FormPhase::Failed);
    assert!(backend
        .storage
        .get_value("@childssn.child-7")
        .await
        .unwrap()
        .is_none());
}
