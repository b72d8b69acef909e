use super::*;

fn gated() -> AttributeFormController<GatedService> {
    AttributeFormController::new(GatedService::default(), FormConfig::default(), AttributeValues::new())
}

// ========================================================================
// Two selection changes in flight
// ========================================================================

#[tokio::test]
async fn test_late_response_for_old_selection_is_discarded() {
    let mut ctl = gated();
    let older_gate = ctl.service().gate(&["r1"]);
    let newer_gate = ctl.service().gate(&["r1", "r2"]);

    let older = ctl.begin_selection_change(["r1"]);
    let newer = ctl.begin_selection_change(["r1", "r2"]);
    assert!(older.version < newer.version);

    // Newer answer arrives first, older one after it
    let (older_done, newer_done, ()) = tokio::join!(
        older.run(ctl.service()),
        newer.run(ctl.service()),
        async {
            newer_gate.send(Ok(ast_for(&["r1", "r2"]))).unwrap();
            tokio::task::yield_now().await;
            older_gate.send(Ok(ast_for(&["r1"]))).unwrap();
        }
    );

    assert!(ctl.complete(newer_done).is_applied());
    assert!(ctl.complete(older_done).is_discarded());

    assert!(ctl.ast().contains_group("G2"));
    assert!(ctl.values().contains_group("G2"));
    assert!(matches!(ctl.phase(), FormPhase::Reconciled { version } if version.get() == 2));
}

#[tokio::test]
async fn test_early_response_for_old_selection_is_discarded() {
    let mut ctl = gated();
    let older_gate = ctl.service().gate(&["r1"]);
    let newer_gate = ctl.service().gate(&["r2"]);

    let older = ctl.begin_selection_change(["r1"]);
    let newer = ctl.begin_selection_change(["r2"]);

    older_gate.send(Ok(ast_for(&["r1"]))).unwrap();
    let older_done = older.run(ctl.service()).await;
    assert!(ctl.complete(older_done).is_discarded());
    // Still waiting for the newer selection
    assert!(ctl.phase().is_fetching());
    assert!(ctl.values().is_empty());

    newer_gate.send(Ok(ast_for(&["r2"]))).unwrap();
    let newer_done = newer.run(ctl.service()).await;
    assert!(ctl.complete(newer_done).is_applied());
    assert_eq!(ctl.values().group_ids().collect::<Vec<_>>(), vec!["G2"]);
}

#[tokio::test]
async fn test_stale_failure_is_not_surfaced() {
    let mut ctl = gated();
    let older_gate = ctl.service().gate(&["r1"]);
    let newer_gate = ctl.service().gate(&["r3"]);

    let older = ctl.begin_selection_change(["r1"]);
    let newer = ctl.begin_selection_change(["r3"]);

    newer_gate.send(Ok(ast_for(&["r3"]))).unwrap();
    older_gate.send(Err(FetchError::Timeout)).unwrap();
    let (older_done, newer_done) = tokio::join!(older.run(ctl.service()), newer.run(ctl.service()));

    assert!(ctl.complete(newer_done).is_applied());
    assert!(ctl.complete(older_done).is_discarded());
    assert!(ctl.last_error().is_none());
    assert!(ctl.values().contains_group("G3"));
}

#[tokio::test]
async fn test_stale_success_does_not_clear_newer_failure() {
    let mut ctl = gated();
    let older_gate = ctl.service().gate(&["r1"]);
    let newer_gate = ctl.service().gate(&["r2"]);

    let older = ctl.begin_selection_change(["r1"]);
    let newer = ctl.begin_selection_change(["r2"]);
    newer_gate.send(Err(FetchError::Transport("connection reset".into()))).unwrap();
    older_gate.send(Ok(ast_for(&["r1"]))).unwrap();

    let newer_done = newer.run(ctl.service()).await;
    assert!(matches!(ctl.complete(newer_done), ApplyOutcome::Failed(_)));

    let older_done = older.run(ctl.service()).await;
    assert!(ctl.complete(older_done).is_discarded());
    assert!(ctl.last_error().is_some());
    assert!(ctl.ast().is_empty());
}

#[tokio::test]
async fn test_completion_applies_once() {
    let mut ctl = gated();
    let gate = ctl.service().gate(&["r1"]);
    let pending = ctl.begin_selection_change(["r1"]);
    gate.send(Ok(ast_for(&["r1"]))).unwrap();

    let done = pending.run(ctl.service()).await;
    assert!(ctl.complete(done.clone()).is_applied());
    assert!(ctl.complete(done).is_discarded());
}

#[tokio::test]
async fn test_edits_during_fetch_survive_reconciliation() {
    let mut ctl = gated();
    let first = ctl.service().gate(&["r1"]);
    let pending = ctl.begin_selection_change(["r1"]);
    first.send(Ok(ast_for(&["r1"]))).unwrap();
    let done = pending.run(ctl.service()).await;
    ctl.complete(done);

    let second = ctl.service().gate(&["r1", "r2"]);
    let pending = ctl.begin_selection_change(["r1", "r2"]);
    // Form stays editable against the last applied AST
    ctl.set_text("G1", "color", "Green").unwrap();

    second.send(Ok(ast_for(&["r1", "r2"]))).unwrap();
    let done = pending.run(ctl.service()).await;
    assert!(ctl.complete(done).is_applied());
    assert_eq!(ctl.values().attribute("G1", "color").unwrap().value, text(&["Green"]));
}

#[tokio::test]
async fn test_refresh_supersedes_inflight_fetch() {
    let mut ctl = AttributeFormController::new(FlakyService::new(), FormConfig::default(), AttributeValues::new());
    let stale = ctl.begin_selection_change(["r1"]);
    let stale_done = stale.run(ctl.service()).await;

    let outcome = ctl.refresh().await;
    assert!(outcome.is_applied());
    assert!(ctl.complete(stale_done).is_discarded());
    assert_eq!(ctl.version().get(), 2);
}
