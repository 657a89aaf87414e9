mod common;

use common::{FakeJobs, date, job, operator};
use dispatch_scheduler::board::{
    AssignmentCommitter, CellKey, DragController, DragPayload, DragState, DropOutcome, Week,
    WeekGrid,
};
use serde_json::json;

#[test]
fn test_cell_key_round_trip() {
    let mut day = date(2024, 1, 1);
    for operator_id in [0, 7, 123, 98765] {
        for _ in 0..366 {
            let key = CellKey::new(operator_id, day);
            let decoded = CellKey::decode(&key.encode()).unwrap();
            assert_eq!((decoded.operator_id, decoded.date), (operator_id, day));
            day = day.succ_opt().unwrap();
        }
    }
}

#[test]
fn test_non_numeric_operator_is_rejected() {
    assert!(CellKey::decode("cell-abc-2024-03-04").is_err());
}

#[tokio::test]
async fn test_drop_on_own_cell_sends_nothing() {
    let source = job(1, Some(5), date(2024, 3, 1));
    let committer = AssignmentCommitter::new(FakeJobs::with(vec![source.clone()]));
    let mut controller = DragController::default();

    controller.pick_up(DragPayload::try_from(&source).unwrap());
    let outcome = controller.drop_on(Some("cell-5-2024-03-01"), &committer).await;

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert!(committer.updater().requests().is_empty());
    assert_eq!(controller.state(), &DragState::Idle);
}

#[tokio::test]
async fn test_drop_on_other_cell_sends_operator_and_date_only() {
    let source = job(1, Some(5), date(2024, 3, 1));
    let committer = AssignmentCommitter::new(FakeJobs::with(vec![source.clone()]));
    let mut controller = DragController::default();

    controller.pick_up(DragPayload::try_from(&source).unwrap());
    let outcome = controller.drop_on(Some("cell-7-2024-03-04"), &committer).await;

    assert_eq!(
        committer.updater().requests(),
        vec![(1, json!({"operatorId": 7, "scheduledDate": "2024-03-04"}))]
    );
    match outcome {
        DropOutcome::Committed { job } => {
            assert_eq!(job.operator_id, Some(7));
            assert_eq!(job.scheduled_date, date(2024, 3, 4));
        }
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(controller.state(), &DragState::Idle);
}

#[tokio::test]
async fn test_release_outside_or_foreign_target_sends_nothing() {
    let source = job(1, Some(5), date(2024, 3, 1));
    let committer = AssignmentCommitter::new(FakeJobs::with(vec![source.clone()]));
    let mut controller = DragController::default();

    for over in [None, Some("unassigned-list"), Some("cell-abc-2024-03-04")] {
        controller.pick_up(DragPayload::try_from(&source).unwrap());
        let outcome = controller.drop_on(over, &committer).await;
        assert_eq!(outcome, DropOutcome::Cancelled);
        assert_eq!(controller.state(), &DragState::Idle);
    }
    assert!(committer.updater().requests().is_empty());
}

#[tokio::test]
async fn test_failed_update_leaves_job_in_place() {
    // the store no longer has job 1
    let source = job(1, Some(5), date(2024, 3, 1));
    let committer = AssignmentCommitter::new(FakeJobs::with(vec![]));
    let mut controller = DragController::default();

    controller.pick_up(DragPayload::try_from(&source).unwrap());
    let outcome = controller.drop_on(Some("cell-7-2024-03-04"), &committer).await;

    assert!(matches!(outcome, DropOutcome::Failed { .. }));
    assert_eq!(controller.state(), &DragState::Idle);

    let grid = WeekGrid::build(
        Week::containing(date(2024, 3, 1)).unwrap(),
        &[operator(5, "Ana"), operator(7, "Ben")],
        &[source],
    );
    let cell = grid.cell(&CellKey::new(5, date(2024, 3, 1))).unwrap();
    assert_eq!(cell.jobs.len(), 1);
}

#[test]
fn test_unassigned_jobs_never_render() {
    let week = Week::containing(date(2024, 3, 4)).unwrap();
    let jobs: Vec<_> = week
        .days()
        .enumerate()
        .map(|(i, day)| job(i as i32 + 1, None, day))
        .collect();

    let grid = WeekGrid::build(week, &[operator(1, "Ana"), operator(2, "Ben")], &jobs);

    assert_eq!(grid.job_count(), 0);
    assert!(
        grid.rows
            .iter()
            .flat_map(|row| &row.cells)
            .all(|cell| cell.jobs.is_empty())
    );
}

#[test]
fn test_cell_keeps_source_order() {
    let day = date(2024, 3, 5);
    let jobs = vec![job(20, Some(3), day), job(4, Some(3), day), job(11, Some(3), day)];

    let grid = WeekGrid::build(Week::containing(day).unwrap(), &[operator(3, "Cleo")], &jobs);

    let cell = grid.cell(&CellKey::new(3, day)).unwrap();
    let ids: Vec<i32> = cell.jobs.iter().map(|job| job.id).collect();
    assert_eq!(ids, vec![20, 4, 11]);
}

#[test]
fn test_grid_serializes_cell_ids_for_the_drag_layer() {
    let day = date(2024, 3, 4);
    let grid = WeekGrid::build(Week::containing(day).unwrap(), &[operator(7, "Dee")], &[job(1, Some(7), day)]);

    let value = serde_json::to_value(&grid).unwrap();
    assert_eq!(value["weekStart"], "2024-03-04");
    assert_eq!(value["previousWeek"], "2024-02-26");
    assert_eq!(value["nextWeek"], "2024-03-11");
    assert_eq!(value["days"].as_array().unwrap().len(), 7);
    assert_eq!(value["rows"][0]["operator"]["groupLabel"], "North");
    assert_eq!(value["rows"][0]["cells"][0]["id"], "cell-7-2024-03-04");
    assert_eq!(value["rows"][0]["cells"][0]["jobs"][0]["id"], 1);
    assert_eq!(value["rows"][0]["cells"][1]["jobs"], json!([]));
}

#[tokio::test]
async fn test_second_drag_can_start_before_commit_runs() {
    let first = job(1, Some(5), date(2024, 3, 1));
    let second = job(2, Some(5), date(2024, 3, 2));
    let committer = AssignmentCommitter::new(FakeJobs::with(vec![first.clone(), second.clone()]));
    let mut controller = DragController::default();

    controller.pick_up(DragPayload::try_from(&first).unwrap());
    let pending = controller.release(Some("cell-6-2024-03-01"));
    controller.pick_up(DragPayload::try_from(&second).unwrap());
    assert_eq!(controller.active().map(|p| p.job_id), Some(2));

    assert!(pending.commit_with(&committer).await.is_committed());
    let moved = controller.drop_on(Some("cell-6-2024-03-02"), &committer).await;
    assert!(moved.is_committed());

    let jobs = committer.updater().jobs();
    assert!(jobs.iter().all(|job| job.operator_id == Some(6)));
}
