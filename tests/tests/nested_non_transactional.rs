//! Saves against a store without transaction support.

#![cfg(feature = "memory")]

use pretty_assertions::assert_eq;
use quilt::{db::Policy, record, schema::NestedOptions, Db};
use std::{future::Future, pin::Pin};
use tests::{db::memory::SetupMemory, models, DbTest};

fn run<F>(policy: Policy, f: F)
where
    F: for<'a> FnOnce(&'a mut DbTest) -> Pin<Box<dyn Future<Output = ()> + 'a>>,
{
    let mut test = DbTest::new(Box::new(SetupMemory::non_transactional(policy)));
    test.run_test(f);
}

async fn setup(test: &mut DbTest) -> Db {
    let mut builder = models::builder();
    builder
        .nested_attributes("User", "addresses", NestedOptions::new())
        .unwrap();
    test.setup_db(builder).await
}

#[test]
fn best_effort_saves_without_a_transaction() {
    run(Policy::BestEffort, |test| {
        Box::pin(async move {
            assert!(!test.capability().transactions);
            let db = setup(test).await;

            let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
            db.assign_nested_attributes(
                &mut user,
                "addresses",
                vec![record! { "city" => "A" }, record! { "city" => "B" }],
            )
            .unwrap();
            db.save(&mut user).await.unwrap();

            assert!(test.log().transactions().is_empty());
            assert_eq!(3, test.log().writes());
            assert_eq!(2, user.association("addresses").len());
        })
    });
}

#[test]
fn best_effort_failure_keeps_earlier_writes() {
    run(Policy::BestEffort, |test| {
        Box::pin(async move {
            let db = setup(test).await;

            let mut owner = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
            db.assign_nested_attributes(
                &mut owner,
                "addresses",
                vec![record! { "city" => "A", "label" => "home" }],
            )
            .unwrap();
            db.save(&mut owner).await.unwrap();

            let mut user = db.new_entity("User", record! { "name" => "Bob" }).unwrap();
            db.assign_nested_attributes(
                &mut user,
                "addresses",
                vec![
                    record! { "city" => "B", "label" => "work" },
                    record! { "city" => "C", "label" => "home" },
                ],
            )
            .unwrap();

            let err = db.save(&mut user).await.unwrap_err();
            assert!(err.is_persistence_failed());

            // The entity keeps its pre-save state even though storage does not
            assert!(!user.is_persisted());
            assert!(user.has_pending_actions());

            let key = owner.key().unwrap() + 1;
            let partial = db.find("User", key).await.unwrap();
            assert_eq!(1, partial.association("addresses").len());
        })
    });
}

#[test]
fn fail_fast_refuses_to_save() {
    run(Policy::FailFast, |test| {
        Box::pin(async move {
            let db = setup(test).await;

            let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
            db.assign_nested_attributes(&mut user, "addresses", vec![record! { "city" => "A" }])
                .unwrap();

            let err = db.save(&mut user).await.unwrap_err();
            assert!(err.is_unsupported_feature(), "{err}");
            assert!(test.log().is_empty());
            assert!(!user.is_persisted());
            assert_eq!(1, user.pending_actions("addresses").len());
        })
    });
}

#[test]
fn fail_fast_reports_validation_errors_first() {
    run(Policy::FailFast, |test| {
        Box::pin(async move {
            let db = setup(test).await;

            let mut user = db.new_entity("User", record! { "name" => "" }).unwrap();
            let err = db.save(&mut user).await.unwrap_err();

            assert!(err.is_save_failed());
            assert_eq!(["can't be blank"], user.errors().get("name"));
        })
    });
}
