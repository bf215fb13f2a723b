use async_trait::async_trait;
use kindieval_core::summary::FAILURE_FALLBACK;
use kindieval_core::{
    AgeBand, AssessmentStatus, Child, DisabledSummaryProvider, Domain, SessionStep,
    SummaryError, SummaryProvider, TargetDraft, Tracker, TrackerError, UserRole, WorkflowError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

struct CountingProvider {
    calls: Arc<AtomicUsize>,
    reply: Result<String, SummaryError>,
}

#[async_trait]
impl SummaryProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

fn tracker_with_reply(reply: Result<String, SummaryError>) -> (Tracker, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        calls: Arc::clone(&calls),
        reply,
    };
    (Tracker::in_memory(Box::new(provider)).unwrap(), calls)
}

fn draft(code: &str, age_band: AgeBand, domain: Domain, content: &str) -> TargetDraft {
    TargetDraft {
        code: code.to_string(),
        age_band,
        domain,
        content: content.to_string(),
    }
}

#[test]
fn seeding_is_idempotent() {
    let tracker = Tracker::in_memory(Box::new(DisabledSummaryProvider)).unwrap();

    let first = tracker.seed_reference_data().unwrap();
    assert_eq!(first.targets, 8);
    assert_eq!(first.children, 5);

    let second = tracker.seed_reference_data().unwrap();
    assert_eq!(second.targets, 0);
    assert_eq!(second.children, 0);
    assert_eq!(tracker.catalog().unwrap().len(), 8);
    assert_eq!(tracker.children().unwrap().len(), 5);
    assert_eq!(tracker.catalog().unwrap()[0].code, "NT.1824.TC.1");
}

#[test]
fn teacher_roster_is_limited_to_assigned_class() {
    let tracker = Tracker::in_memory(Box::new(DisabledSummaryProvider)).unwrap();
    tracker.seed_reference_data().unwrap();

    let teacher = tracker
        .users()
        .iter()
        .find(|user| user.role == UserRole::Teacher)
        .unwrap()
        .clone();
    let admin = tracker
        .users()
        .iter()
        .find(|user| user.role == UserRole::Admin)
        .unwrap()
        .clone();

    let mine = tracker.roster_for(&teacher, None).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Nguyễn An Nhiên");

    assert_eq!(tracker.roster_for(&admin, None).unwrap().len(), 5);
    assert_eq!(
        tracker
            .roster_for(&admin, Some(AgeBand::Age5To6))
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn single_submission_yields_full_completion() {
    let (tracker, calls) = tracker_with_reply(Ok("  Bé vận động tốt.  ".to_string()));
    let t1 = tracker
        .add_target(&draft("T1", AgeBand::Age3To4, Domain::Physical, "Bò trong đường hẹp"))
        .unwrap();
    tracker
        .add_target(&draft("T2", AgeBand::Age4To5, Domain::Language, "Nghe hiểu"))
        .unwrap();
    let child = Child::new("Nguyễn An Nhiên", "2020-05-12", "Mầm 1", AgeBand::Age3To4, "Cô Lan")
        .unwrap();
    tracker.add_child(&child).unwrap();

    let mut session = tracker.start_session("Cô Lan");
    tracker.select_child(&mut session, child.id).unwrap();
    session.advance().unwrap();

    let catalog = tracker.catalog().unwrap();
    let visible: Vec<_> = session
        .visible_targets(&catalog)
        .into_iter()
        .map(|target| target.id)
        .collect();
    assert_eq!(visible, vec![t1.id]);

    session.set_status(t1.id, AssessmentStatus::Achieved).unwrap();
    let assessment = tracker.submit(&mut session).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(assessment.summary.as_deref(), Some("Bé vận động tốt."));
    assert_eq!(session.step(), SessionStep::SelectingSubject);

    let dashboard = tracker.dashboard().unwrap();
    assert_eq!(dashboard.tally.achieved, 1);
    assert_eq!(dashboard.tally.not_achieved, 0);
    assert_eq!(dashboard.tally.needs_support, 0);
    assert_eq!(dashboard.completion_percent, 100);
}

#[tokio::test]
async fn mixed_history_yields_half_completion() {
    let (tracker, _calls) = tracker_with_reply(Err(SummaryError::Transport(
        "connection refused".to_string(),
    )));
    let mut ids = Vec::new();
    for (code, content) in [("P1", "Bật tại chỗ"), ("P2", "Ném bóng"), ("P3", "Leo thang")] {
        let target = tracker
            .add_target(&draft(code, AgeBand::Age3To4, Domain::Physical, content))
            .unwrap();
        ids.push(target.id);
    }
    let child = Child::new("Trần Minh Khang", "2020-02-20", "Mầm 1", AgeBand::Age3To4, "Cô Lan")
        .unwrap();
    tracker.add_child(&child).unwrap();

    let mut session = tracker.start_session("Cô Lan");
    tracker.select_child(&mut session, child.id).unwrap();
    session.advance().unwrap();
    session.set_status(ids[0], AssessmentStatus::Achieved).unwrap();
    session.set_status(ids[1], AssessmentStatus::NotAchieved).unwrap();
    let first = tracker.submit(&mut session).await.unwrap();
    assert_eq!(first.summary.as_deref(), Some(FAILURE_FALLBACK));

    tracker.select_child(&mut session, child.id).unwrap();
    session.advance().unwrap();
    session.set_status(ids[0], AssessmentStatus::Achieved).unwrap();
    session.set_status(ids[2], AssessmentStatus::NeedsSupport).unwrap();
    let second = tracker.submit(&mut session).await.unwrap();

    let history = tracker.assessments().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);

    let dashboard = tracker.dashboard().unwrap();
    assert_eq!(dashboard.tally.achieved, 2);
    assert_eq!(dashboard.tally.not_achieved, 1);
    assert_eq!(dashboard.tally.needs_support, 1);
    assert_eq!(dashboard.completion_percent, 50);

    let row = dashboard
        .by_age_band
        .iter()
        .find(|row| row.age_band == AgeBand::Age3To4)
        .unwrap();
    assert_eq!((row.reached, row.pending), (2, 2));
}

#[tokio::test]
async fn submit_without_records_persists_nothing() {
    let (tracker, calls) = tracker_with_reply(Ok("unused".to_string()));
    tracker.seed_reference_data().unwrap();
    let child = tracker.children().unwrap().remove(1);

    let mut session = tracker.start_session("Cô Lan");
    tracker.select_child(&mut session, child.id).unwrap();
    session.advance().unwrap();

    let err = tracker.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, TrackerError::Workflow(WorkflowError::NoRecords)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.step(), SessionStep::RecordingTargets);
    assert!(tracker.assessments().unwrap().is_empty());
}

#[test]
fn selecting_unknown_child_fails() {
    let tracker = Tracker::in_memory(Box::new(DisabledSummaryProvider)).unwrap();
    let mut session = tracker.start_session("Cô Lan");
    let missing = Uuid::new_v4();

    let err = tracker.select_child(&mut session, missing).unwrap_err();
    assert!(matches!(err, TrackerError::UnknownChild(id) if id == missing));
    assert!(session.child().is_none());
}
