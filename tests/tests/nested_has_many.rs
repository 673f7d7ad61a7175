use pretty_assertions::assert_eq;
use quilt::{
    driver::operation::Transaction,
    nested::ActionKind,
    record,
    schema::{NestedOptions, RejectIf},
    stmt::{Record, Value},
    Db, Entity,
};
use serde_json::json;
use tests::{models, tests, DbTest};

async fn setup(test: &mut DbTest, options: NestedOptions) -> Db {
    let mut builder = models::builder();
    builder
        .nested_attributes("User", "addresses", options)
        .unwrap();
    test.setup_db(builder).await
}

/// Saves a user with one address in city "A" and loads it back.
async fn user_with_address(db: &Db) -> Entity {
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
    db.assign_nested_attributes(&mut user, "addresses", vec![record! { "city" => "A" }])
        .unwrap();
    db.save(&mut user).await.unwrap();

    db.find("User", user.key().unwrap()).await.unwrap()
}

fn cities(user: &Entity) -> Vec<&str> {
    user.association("addresses")
        .iter()
        .map(|address| address.get("city").as_str().unwrap())
        .collect()
}

fn kinds(user: &Entity) -> Vec<ActionKind> {
    user.pending_actions("addresses")
        .iter()
        .map(|action| action.kind())
        .collect()
}

async fn update_existing_and_create_new(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    test.log().clear();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "id" => id, "city" => "B" }, record! { "city" => "C" }],
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Update, ActionKind::Create], kinds(&user));

    db.save(&mut user).await.unwrap();

    assert_eq!(vec!["B", "C"], cities(&user));
    assert!(!user.has_pending_actions());

    if test.capability().transactions {
        assert_eq!(
            vec![Transaction::Start, Transaction::Commit],
            test.log().transactions()
        );
    }
    // Parent update, child update, child insert
    assert_eq!(3, test.log().writes());

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert_eq!(vec!["B", "C"], cities(&reloaded));
    assert_eq!(Some(id), reloaded.association("addresses")[0].key());
}

async fn destroy_with_allow_destroy(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().allow_destroy(true)).await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "id" => id, "_destroy" => true }],
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Destroy], kinds(&user));

    db.save(&mut user).await.unwrap();
    assert!(user.association("addresses").is_empty());

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert!(reloaded.association("addresses").is_empty());
}

async fn unknown_key_is_a_stale_reference(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_address(&db).await;

    test.log().clear();

    let err = db
        .assign_nested_attributes(
            &mut user,
            "addresses",
            vec![record! { "id" => 99, "city" => "X" }],
        )
        .unwrap_err();

    assert!(err.is_stale_reference());
    assert!(!user.has_pending_actions());
    assert!(user.nested_attributes("addresses").is_none());
    assert_eq!(vec!["A"], cities(&user));
    assert!(test.log().is_empty());
}

async fn destroy_marker_ignored_without_allow_destroy(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "id" => id, "city" => "B", "_destroy" => "1" }],
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Update], kinds(&user));

    db.save(&mut user).await.unwrap();
    assert!(!test.log().has_delete_by_key());

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert_eq!(vec!["B"], cities(&reloaded));
}

async fn form_payload_with_string_keys(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().allow_destroy(true)).await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    // A keyed collection as produced by form encoding. Keys are discarded
    // and the identity is a decimal string.
    let payload = json!({
        "0": { "id": id.to_string(), "zip": "1000" },
        "1": { "id": "", "city": "Porto", "_destroy": "0" },
    });

    db.assign_nested_attributes(&mut user, "addresses", payload)
        .unwrap();
    assert_eq!(vec![ActionKind::Update, ActionKind::Create], kinds(&user));

    db.save(&mut user).await.unwrap();

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert_eq!(vec!["A", "Porto"], cities(&reloaded));
    assert_eq!(
        &Value::from("1000"),
        reloaded.association("addresses")[0].get("zip")
    );
}

async fn new_record_marked_for_destroy_is_skipped(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().allow_destroy(true)).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![
            record! { "city" => "A", "_destroy" => "true" },
            record! { "city" => "B" },
        ],
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Skip, ActionKind::Create], kinds(&user));

    db.save(&mut user).await.unwrap();
    assert_eq!(vec!["B"], cities(&user));
}

async fn reject_if_skips_new_records_only(test: &mut DbTest) {
    let db = setup(
        test,
        NestedOptions::new().reject_if(RejectIf::named("missing_city")),
    )
    .await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![
            record! { "city" => "" },
            record! { "id" => id, "zip" => "4000" },
            record! { "city" => "D" },
        ],
    )
    .unwrap();
    assert_eq!(
        vec![ActionKind::Skip, ActionKind::Update, ActionKind::Create],
        kinds(&user)
    );

    db.save(&mut user).await.unwrap();
    assert_eq!(vec!["A", "D"], cities(&user));
}

async fn reject_if_does_not_hide_stale_references(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().reject_if(RejectIf::all_blank())).await;
    let mut user = user_with_address(&db).await;

    let err = db
        .assign_nested_attributes(
            &mut user,
            "addresses",
            vec![record! { "id" => 99, "city" => "" }],
        )
        .unwrap_err();
    assert!(err.is_stale_reference());
}

async fn all_blank_rejects_empty_rows(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().reject_if(RejectIf::all_blank())).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        json!([
            { "city": "", "zip": "", "_destroy": "0" },
            { "city": "Lisbon", "zip": null },
        ]),
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Skip, ActionKind::Create], kinds(&user));

    db.save(&mut user).await.unwrap();
    assert_eq!(vec!["Lisbon"], cities(&user));

    let address = db.schema().model_by_name("Address").unwrap().id;
    assert_eq!(1, test.log().writes_to(address));
}

async fn limit_rejects_oversized_payloads(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().limit(2)).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    let payload: Vec<Record> = ["A", "B", "C"]
        .into_iter()
        .map(|city| record! { "city" => city })
        .collect();

    let err = db
        .assign_nested_attributes(&mut user, "addresses", payload.clone())
        .unwrap_err();
    assert!(err.is_too_many_records());
    assert!(!user.has_pending_actions());

    db.assign_nested_attributes(&mut user, "addresses", payload[..2].to_vec())
        .unwrap();
    db.save(&mut user).await.unwrap();
    assert_eq!(vec!["A", "B"], cities(&user));
}

async fn reassignment_replaces_pending_actions(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    db.assign_nested_attributes(&mut user, "addresses", vec![record! { "city" => "A" }])
        .unwrap();
    db.assign_nested_attributes(&mut user, "addresses", vec![record! { "city" => "B" }])
        .unwrap();
    assert_eq!(1, user.pending_actions("addresses").len());

    db.save(&mut user).await.unwrap();
    assert_eq!(vec!["B"], cities(&user));

    // A second save with nothing pending only writes the parent
    test.log().clear();
    db.save(&mut user).await.unwrap();
    assert_eq!(1, test.log().writes());
    assert!(test.log().has_update_by_key());
}

async fn children_are_linked_to_the_parent(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "city" => "A" }, record! { "city" => "B" }],
    )
    .unwrap();
    db.save(&mut user).await.unwrap();

    let key = user.key().unwrap();
    for address in user.association("addresses") {
        assert!(address.is_persisted());
        assert_eq!(&Value::I64(key), address.get("user_id"));
    }
}

async fn foreign_key_is_not_reassignable(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut ann = user_with_address(&db).await;
    let bob = user_with_address(&db).await;
    let id = ann.association("addresses")[0].key().unwrap();
    let bob_key = bob.key().unwrap();

    db.assign_nested_attributes(
        &mut ann,
        "addresses",
        vec![
            record! { "id" => id, "user_id" => bob_key, "city" => "B" },
            record! { "user_id" => bob_key, "city" => "C" },
        ],
    )
    .unwrap();
    db.save(&mut ann).await.unwrap();

    let ann_key = ann.key().unwrap();
    for address in ann.association("addresses") {
        assert_eq!(&Value::I64(ann_key), address.get("user_id"));
    }

    let reloaded = db.find("User", ann_key).await.unwrap();
    assert_eq!(vec!["B", "C"], cities(&reloaded));
    assert_eq!(Some(id), reloaded.association("addresses")[0].key());

    let bob = db.find("User", bob_key).await.unwrap();
    assert_eq!(vec!["A"], cities(&bob));
}

async fn repeated_key_updates_accumulate(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_address(&db).await;
    let id = user.association("addresses")[0].key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![
            record! { "id" => id, "city" => "B" },
            record! { "id" => id.to_string(), "zip" => "9999" },
        ],
    )
    .unwrap();
    assert_eq!(vec![ActionKind::Update, ActionKind::Update], kinds(&user));

    db.save(&mut user).await.unwrap();

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    let address = &reloaded.association("addresses")[0];
    assert_eq!(vec!["B"], cities(&reloaded));
    assert_eq!(&Value::from("9999"), address.get("zip"));
}

tests!(
    update_existing_and_create_new,
    destroy_with_allow_destroy,
    unknown_key_is_a_stale_reference,
    destroy_marker_ignored_without_allow_destroy,
    form_payload_with_string_keys,
    new_record_marked_for_destroy_is_skipped,
    reject_if_skips_new_records_only,
    reject_if_does_not_hide_stale_references,
    all_blank_rejects_empty_rows,
    limit_rejects_oversized_payloads,
    reassignment_replaces_pending_actions,
    children_are_linked_to_the_parent,
    foreign_key_is_not_reassignable,
    repeated_key_updates_accumulate,
);
