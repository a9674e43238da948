//! Ordering engine behaviour against the in-memory store

use std::sync::Arc;

use academy_server::ordering::engine::{self as ops, MoveOutcome};
use academy_server::ordering::{
    Collection, HealPolicy, HealStatus, OrderEngine, OrderError, OrderStore, OrderTx, Scope,
    ShiftRange,
};
use academy_server::store::{ContentStore, ItemWriter, MemoryStore, NewItem};
use shared::models::{CourseCreate, ModuleCreate, MoveDirection, TeamMemberCreate};

const TEAM: Collection = Collection::TeamMembers;

fn setup(heal: HealPolicy) -> (MemoryStore, OrderEngine<MemoryStore>) {
    let store = MemoryStore::new();
    let engine = OrderEngine::new(Arc::new(store.clone()), heal);
    (store, engine)
}

fn member(name: &str) -> TeamMemberCreate {
    TeamMemberCreate {
        name: name.to_string(),
        role: "Instructor".to_string(),
        bio: None,
        photo_url: None,
    }
}

async fn seed_team(engine: &OrderEngine<MemoryStore>, names: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in names {
        let data = member(name);
        let id = engine
            .run_atomically(TEAM, Scope::Global, move |tx| {
                Box::pin(async move {
                    let position = ops::append(tx).await?;
                    tx.insert_item(NewItem::TeamMember(data), position).await
                })
            })
            .await
            .unwrap();
        ids.push(id);
    }
    ids
}

/// `(name, sort_order)` pairs in display order
async fn team(store: &MemoryStore) -> Vec<(String, i32)> {
    store
        .list_team_members()
        .await
        .unwrap()
        .into_iter()
        .map(|m| (m.name, m.sort_order))
        .collect()
}

async fn team_names(store: &MemoryStore) -> Vec<String> {
    team(store).await.into_iter().map(|(name, _)| name).collect()
}

fn assert_dense(orders: &[(String, i32)]) {
    for (rank, (name, order)) in orders.iter().enumerate() {
        assert_eq!(*order, rank as i32, "{name} is not at its rank");
    }
}

async fn seed_course(store: &MemoryStore, slug: &str, modules: &[&str]) -> (i64, Vec<i64>) {
    let course = store
        .create_course(&CourseCreate {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
        })
        .await
        .unwrap();
    let mut module_ids = Vec::new();
    for title in modules {
        let module = store
            .create_module(&ModuleCreate {
                title: title.to_string(),
            })
            .await
            .unwrap();
        let mut tx = store
            .begin(Collection::CourseModules, Scope::Parent(course.id))
            .await
            .unwrap();
        let position = ops::append(&mut tx).await.unwrap();
        tx.insert_item(NewItem::CourseModule { module_id: module.id }, position)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        module_ids.push(module.id);
    }
    (course.id, module_ids)
}

async fn course_titles(store: &MemoryStore, course_id: i64) -> Vec<(String, i32)> {
    store
        .list_course_modules(course_id)
        .await
        .unwrap()
        .into_iter()
        .map(|d| (d.module_title, d.sort_order))
        .collect()
}

#[tokio::test]
async fn test_append_assigns_consecutive_positions() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    seed_team(&engine, &["A", "B", "C"]).await;

    let orders = team(&store).await;
    assert_eq!(team_names(&store).await, ["A", "B", "C"]);
    assert_dense(&orders);
}

#[tokio::test]
async fn test_move_last_item_forward() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;

    let report = engine
        .move_to(TEAM, Scope::Global, ids[4], 1, None)
        .await
        .unwrap();
    assert_eq!(report.value, MoveOutcome::Moved { from: 4, to: 1 });
    assert_eq!(report.heal, HealStatus::Clean);

    assert_eq!(team_names(&store).await, ["A", "E", "B", "C", "D"]);
    assert_dense(&team(&store).await);
}

#[tokio::test]
async fn test_move_first_item_backward() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;

    engine
        .move_to(TEAM, Scope::Global, ids[0], 3, None)
        .await
        .unwrap();

    assert_eq!(team_names(&store).await, ["B", "C", "D", "A", "E"]);
    assert_dense(&team(&store).await);
}

#[tokio::test]
async fn test_remove_compacts_following_items() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;

    let report = engine.remove(TEAM, Scope::Global, ids[2]).await.unwrap();
    assert_eq!(report.value, 2);

    let orders = team(&store).await;
    assert_eq!(team_names(&store).await, ["A", "B", "D", "E"]);
    assert_dense(&orders);
}

#[tokio::test]
async fn test_move_to_current_position_writes_nothing() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C"]).await;
    let writes_before = store.committed_writes();

    let report = engine
        .move_to(TEAM, Scope::Global, ids[1], 1, None)
        .await
        .unwrap();

    assert_eq!(report.value, MoveOutcome::Unchanged);
    assert_eq!(report.heal, HealStatus::Skipped);
    assert_eq!(store.committed_writes(), writes_before);
}

#[tokio::test]
async fn test_move_out_of_range_is_rejected_without_changes() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;
    let before = team(&store).await;

    let err = engine
        .move_to(TEAM, Scope::Global, ids[0], 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OutOfRange { requested: 5, max: 4 }));

    let err = engine
        .move_to(TEAM, Scope::Global, ids[0], -1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OutOfRange { requested: -1, .. }));

    assert_eq!(team(&store).await, before);
}

#[tokio::test]
async fn test_move_unknown_item_is_not_found() {
    let (_store, engine) = setup(HealPolicy::OnDrift);
    seed_team(&engine, &["A", "B"]).await;

    let err = engine
        .move_to(TEAM, Scope::Global, 42, 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemNotFound { item_id: 42, .. }));
}

#[tokio::test]
async fn test_move_step_edges_are_noops() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C"]).await;

    let up = engine
        .move_step(TEAM, Scope::Global, ids[0], MoveDirection::Up)
        .await
        .unwrap();
    assert_eq!(up.value, MoveOutcome::Unchanged);

    let down = engine
        .move_step(TEAM, Scope::Global, ids[2], MoveDirection::Down)
        .await
        .unwrap();
    assert_eq!(down.value, MoveOutcome::Unchanged);

    let step = engine
        .move_step(TEAM, Scope::Global, ids[2], MoveDirection::Up)
        .await
        .unwrap();
    assert_eq!(step.value, MoveOutcome::Moved { from: 2, to: 1 });
    assert_eq!(team_names(&store).await, ["A", "C", "B"]);
}

#[tokio::test]
async fn test_insert_at_shifts_later_modules() {
    let (store, _engine) = setup(HealPolicy::OnDrift);
    let (course_id, _) = seed_course(&store, "rust", &["M0", "M1", "M2"]).await;
    let x = store
        .create_module(&ModuleCreate { title: "X".into() })
        .await
        .unwrap();

    let mut tx = store
        .begin(Collection::CourseModules, Scope::Parent(course_id))
        .await
        .unwrap();
    let position = ops::insert_at(&mut tx, 1, Some(3)).await.unwrap();
    assert_eq!(position, 1);
    tx.insert_item(NewItem::CourseModule { module_id: x.id }, position)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        course_titles(&store, course_id).await,
        [
            ("M0".to_string(), 0),
            ("X".to_string(), 1),
            ("M1".to_string(), 2),
            ("M2".to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_insert_at_bounds() {
    let (store, _engine) = setup(HealPolicy::OnDrift);
    let (course_id, _) = seed_course(&store, "rust", &["M0", "M1"]).await;

    let mut tx = store
        .begin(Collection::CourseModules, Scope::Parent(course_id))
        .await
        .unwrap();
    // count itself is a valid insert position (append)
    assert_eq!(ops::insert_at(&mut tx, 2, None).await.unwrap(), 2);
    assert!(matches!(
        ops::insert_at(&mut tx, 3, None).await,
        Err(OrderError::OutOfRange { requested: 3, max: 2 })
    ));
    assert!(matches!(
        ops::insert_at(&mut tx, -1, None).await,
        Err(OrderError::OutOfRange { .. })
    ));
}

#[tokio::test]
async fn test_stale_expected_count_conflicts() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C"]).await;
    let before = team(&store).await;

    let err = engine
        .move_to(TEAM, Scope::Global, ids[2], 0, Some(2))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Conflict(_)));
    assert_eq!(team(&store).await, before);

    engine
        .move_to(TEAM, Scope::Global, ids[2], 0, Some(3))
        .await
        .unwrap();
    assert_eq!(team_names(&store).await, ["C", "A", "B"]);
}

#[tokio::test]
async fn test_normalize_repairs_gap() {
    let (store, engine) = setup(HealPolicy::Never);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;
    assert!(store.force_order(TEAM, ids[4], 9).await);

    assert!(engine.normalize(TEAM, Scope::Global).await.unwrap());

    assert_eq!(team_names(&store).await, ["A", "B", "C", "D", "E"]);
    assert_dense(&team(&store).await);
}

#[tokio::test]
async fn test_normalize_repairs_duplicates_preserving_order() {
    let (store, engine) = setup(HealPolicy::Never);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;
    // D collides with C, leaving a hole at 3
    assert!(store.force_order(TEAM, ids[3], 2).await);

    assert!(engine.normalize(TEAM, Scope::Global).await.unwrap());

    let orders = team(&store).await;
    assert_dense(&orders);
    let names = team_names(&store).await;
    assert_eq!(names[..2], ["A", "B"]);
    assert_eq!(names[4], "E");
    let mut middle = names[2..4].to_vec();
    middle.sort();
    assert_eq!(middle, ["C", "D"]);
}

#[tokio::test]
async fn test_normalize_on_dense_scope_reports_clean() {
    let (store, engine) = setup(HealPolicy::Never);
    seed_team(&engine, &["A", "B", "C"]).await;
    let writes_before = store.committed_writes();

    assert!(!engine.normalize(TEAM, Scope::Global).await.unwrap());
    assert_eq!(store.committed_writes(), writes_before);
}

#[tokio::test]
async fn test_consistency_pass_repairs_drift_after_move() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D"]).await;
    assert!(store.force_order(TEAM, ids[3], 7).await);

    let report = engine
        .move_to(TEAM, Scope::Global, ids[1], 0, None)
        .await
        .unwrap();

    assert!(report.heal.repaired());
    assert_eq!(team_names(&store).await, ["B", "A", "C", "D"]);
    assert_dense(&team(&store).await);
}

#[tokio::test]
async fn test_consistency_pass_disabled() {
    let (store, engine) = setup(HealPolicy::Never);
    let ids = seed_team(&engine, &["A", "B", "C", "D"]).await;
    assert!(store.force_order(TEAM, ids[3], 7).await);

    let report = engine
        .move_to(TEAM, Scope::Global, ids[1], 0, None)
        .await
        .unwrap();

    assert_eq!(report.heal, HealStatus::Skipped);
    let orders = team(&store).await;
    assert_eq!(orders.last(), Some(&("D".to_string(), 7)));
}

#[tokio::test]
async fn test_failed_commit_rolls_back_move() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E"]).await;
    let before = team(&store).await;

    store.fail_next_commit();
    let err = engine
        .move_to(TEAM, Scope::Global, ids[4], 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Transaction(_)));
    assert_eq!(team(&store).await, before);
}

#[tokio::test]
async fn test_error_inside_transaction_rolls_back_shift() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    seed_team(&engine, &["A", "B", "C"]).await;
    let before = team(&store).await;

    let result: Result<(), OrderError> = engine
        .run_atomically(TEAM, Scope::Global, |tx| {
            Box::pin(async move {
                tx.shift_range(ShiftRange::starting_at(0, 1)).await?;
                Err::<(), _>(OrderError::Transaction("aborted by caller".into()))
            })
        })
        .await;
    assert!(result.is_err());
    assert_eq!(team(&store).await, before);
}

#[tokio::test]
async fn test_scopes_are_isolated() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let (rust, rust_modules) = seed_course(&store, "rust", &["R0", "R1", "R2"]).await;
    let (go, _) = seed_course(&store, "go", &["G0", "G1"]).await;
    let go_before = course_titles(&store, go).await;

    let rust_link = store
        .find_course_module(rust, rust_modules[2])
        .await
        .unwrap()
        .unwrap();
    engine
        .move_to(Collection::CourseModules, Scope::Parent(rust), rust_link.id, 0, None)
        .await
        .unwrap();

    // A link of another course is invisible from this scope
    let go_first = store.list_course_modules(go).await.unwrap()[0].id;
    let err = engine
        .remove(Collection::CourseModules, Scope::Parent(rust), go_first)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemNotFound { .. }));

    assert_eq!(course_titles(&store, go).await, go_before);
    let rust_titles: Vec<String> = course_titles(&store, rust)
        .await
        .into_iter()
        .map(|(title, _)| title)
        .collect();
    assert_eq!(rust_titles, ["R2", "R0", "R1"]);
}

#[tokio::test]
async fn test_density_survives_mixed_operations() {
    let (store, engine) = setup(HealPolicy::Never);
    let ids = seed_team(&engine, &["A", "B", "C", "D", "E", "F"]).await;

    engine.move_to(TEAM, Scope::Global, ids[0], 5, None).await.unwrap();
    engine.remove(TEAM, Scope::Global, ids[3]).await.unwrap();
    engine
        .move_step(TEAM, Scope::Global, ids[5], MoveDirection::Up)
        .await
        .unwrap();
    seed_team(&engine, &["G"]).await;
    engine.move_to(TEAM, Scope::Global, ids[2], 0, None).await.unwrap();
    engine.remove(TEAM, Scope::Global, ids[1]).await.unwrap();

    let orders = team(&store).await;
    assert_dense(&orders);
    assert_eq!(team_names(&store).await, ["C", "F", "E", "A", "G"]);
}

#[tokio::test]
async fn test_failed_consistency_pass_keeps_committed_move() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let ids = seed_team(&engine, &["A", "B", "C"]).await;

    // The move itself opens one transaction; the pass after it cannot begin
    store.fail_begin_after(1);
    let report = engine
        .move_to(TEAM, Scope::Global, ids[2], 0, None)
        .await
        .unwrap();

    assert_eq!(report.value, MoveOutcome::Moved { from: 2, to: 0 });
    assert!(matches!(report.heal, HealStatus::Failed(ref msg) if msg.contains("begin")));
    assert_eq!(team_names(&store).await, ["C", "A", "B"]);
    assert_dense(&team(&store).await);
}

#[tokio::test]
async fn test_always_policy_checks_after_noop_move() {
    let (store, engine) = setup(HealPolicy::Always);
    let ids = seed_team(&engine, &["A", "B", "C"]).await;
    assert!(store.force_order(TEAM, ids[2], 6).await);

    let report = engine
        .move_to(TEAM, Scope::Global, ids[0], 0, None)
        .await
        .unwrap();

    assert_eq!(report.value, MoveOutcome::Unchanged);
    assert_eq!(report.heal, HealStatus::Repaired);
    assert_dense(&team(&store).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mutations_keep_scope_dense() {
    let (store, engine) = setup(HealPolicy::Never);
    let names: Vec<String> = (0..20).map(|i| format!("M{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let ids = seed_team(&engine, &refs).await;

    let mut tasks = Vec::new();
    for i in 0..100usize {
        let engine = engine.clone();
        let id = ids[i % 20];
        let target = ((i * 7) % 20) as i64;
        tasks.push(tokio::spawn(async move {
            match engine.move_to(TEAM, Scope::Global, id, target, None).await {
                Ok(_)
                | Err(OrderError::ItemNotFound { .. })
                | Err(OrderError::OutOfRange { .. }) => {}
                Err(other) => panic!("unexpected move error: {other}"),
            }
        }));
    }
    for &id in &ids[..10] {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            engine.remove(TEAM, Scope::Global, id).await.unwrap();
        }));
    }
    for i in 0..10 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            seed_team(&engine, &[format!("N{i:02}").as_str()]).await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let orders = team(&store).await;
    assert_eq!(orders.len(), 20);
    assert_dense(&orders);

    let mut survivors = team_names(&store).await;
    survivors.sort();
    let mut expected: Vec<String> = names[10..].to_vec();
    expected.extend((0..10).map(|i| format!("N{i:02}")));
    assert_eq!(survivors, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_leave_other_course_untouched() {
    let (store, engine) = setup(HealPolicy::OnDrift);
    let titles: Vec<String> = (0..8).map(|i| format!("R{i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let (rust, _) = seed_course(&store, "rust", &refs).await;
    let (go, _) = seed_course(&store, "go", &["G0", "G1", "G2"]).await;
    let go_before = course_titles(&store, go).await;

    let links: Vec<i64> = store
        .list_course_modules(rust)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();

    let mut tasks = Vec::new();
    for i in 0..64usize {
        let engine = engine.clone();
        let link = links[i % links.len()];
        let target = ((i * 3) % links.len()) as i64;
        tasks.push(tokio::spawn(async move {
            engine
                .move_to(Collection::CourseModules, Scope::Parent(rust), link, target, None)
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let rust_after = course_titles(&store, rust).await;
    assert_eq!(rust_after.len(), 8);
    assert_dense(&rust_after);
    assert_eq!(course_titles(&store, go).await, go_before);
}
