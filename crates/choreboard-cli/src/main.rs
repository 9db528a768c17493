use std::sync::Arc;

use chrono::{Duration, Utc};
use ulid::Ulid;

use choreboard_core::app::resolver::{self, Scope};
use choreboard_core::app::{BoardCounts, WorkflowEngine};
use choreboard_core::domain::{FamilyId, Member, MemberId, RepeatRule, Role, TaskDraft};
use choreboard_core::impls::{InMemoryRoster, InMemoryTaskStore, RecordingNotifier};

#[tokio::main]
async fn main() {
    // (A) 家族の roster と engine を用意
    let family = FamilyId::from_ulid(Ulid::new());
    let dana = Member::new(MemberId::from_ulid(Ulid::new()), "Dana", Role::Parent);
    let alice = Member::new(MemberId::from_ulid(Ulid::new()), "Alice", Role::Child);
    let bob = Member::new(MemberId::from_ulid(Ulid::new()), "Bob", Role::Child);
    let members = vec![dana.clone(), alice.clone(), bob.clone()];

    let roster = InMemoryRoster::new().with_family(family, members.clone());
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = WorkflowEngine::builder()
        .store(Arc::new(InMemoryTaskStore::new()))
        .roster(Arc::new(roster))
        .notifier(notifier.clone())
        .build()
        .expect("engine wiring");

    // (B) タスク投入: shared / pre-assigned recurring / due with reminder
    let dishes = engine
        .create(family, dana.id, TaskDraft::new("do the dishes"))
        .await
        .unwrap();
    let cat = engine
        .create(
            family,
            dana.id,
            TaskDraft::new("feed the cat")
                .assigned(bob.id)
                .due(Utc::now() + Duration::hours(8))
                .repeating(RepeatRule::new(1, true).unwrap()),
        )
        .await
        .unwrap();
    let homework = engine
        .create(
            family,
            dana.id,
            TaskDraft::new("homework")
                .assigned(alice.id)
                .due(Utc::now() + Duration::minutes(20))
                .remind_before(30),
        )
        .await
        .unwrap();
    println!("created: {} / {} / {}", dishes.id, cat.id, homework.id);

    // (C) claim 競争: 同じ open タスクを二人が同時に取りに行く
    let (a, b) = tokio::join!(
        engine.claim(family, dishes.id, alice.id),
        engine.claim(family, dishes.id, bob.id),
    );
    println!("claim race: alice={:?}", a.map(|t| t.status));
    println!("claim race: bob  ={:?}", b.map(|t| t.status));

    // (D) lifecycle: claim -> review -> approve
    let winner = engine.task(family, dishes.id).await.unwrap();
    let claimant = winner.claimed_by.clone().expect("race produced a claimant");
    engine
        .request_completion(family, dishes.id, claimant.id)
        .await
        .unwrap();
    let done = engine.approve(family, dishes.id, dana.id).await.unwrap();
    println!(
        "dishes: {:?} by {} at {:?}",
        done.status, claimant.name, done.completed_at
    );

    // (E) recurring auto-complete: 承認なしで次サイクルへ
    let next = engine.auto_complete(family, cat.id, bob.id).await.unwrap();
    println!(
        "feed the cat rolled over: {:?}, next due {:?}",
        next.status, next.due_at
    );

    // (F) scoped views + board counts
    let tasks = engine.tasks(family).await;
    for (label, viewer, scope) in [
        ("mine(alice)", Some(&alice), Scope::Mine),
        ("family(alice)", Some(&alice), Scope::Family),
        ("kids(dana)", Some(&dana), Scope::Kids),
    ] {
        let seen = resolver::visible(viewer, scope, &tasks, &members);
        let titles: Vec<_> = seen
            .iter()
            .map(|t| format!("{} [{}]", t.title, resolver::assignee_label(t)))
            .collect();
        println!("{label}: {titles:?}");
    }
    println!("counts: {:?}", BoardCounts::tally(&tasks));

    // (G) reminder sweep + 発火したイベントを確認
    let emitted = engine.due_soon_sweep(family).await;
    println!("due-soon intents emitted: {emitted}");
    println!(
        "events: {}",
        serde_json::to_string_pretty(&notifier.events()).unwrap()
    );
}
