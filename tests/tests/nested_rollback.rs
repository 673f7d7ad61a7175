use pretty_assertions::assert_eq;
use quilt::{driver::operation::Transaction, record, schema::NestedOptions, stmt::Value, Db, Entity};
use tests::{models, tests, DbTest};

async fn setup(test: &mut DbTest) -> Db {
    let mut builder = models::builder();
    builder
        .nested_attributes("User", "addresses", NestedOptions::new())
        .unwrap();
    test.setup_db(builder).await
}

/// Saves a user owning an address labelled "home".
async fn home_owner(db: &Db) -> Entity {
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "city" => "A", "label" => "home" }],
    )
    .unwrap();
    db.save(&mut user).await.unwrap();
    db.find("User", user.key().unwrap()).await.unwrap()
}

async fn failed_child_insert_rolls_back_the_parent(test: &mut DbTest) {
    let db = setup(test).await;
    let owner = home_owner(&db).await;

    test.log().clear();

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
    assert!(err.is_persistence_failed(), "{err}");

    assert_eq!(
        vec![Transaction::Start, Transaction::Rollback],
        test.log().transactions()
    );
    assert_eq!(1, test.log().failures());

    // In-memory state is unchanged
    assert!(!user.is_persisted());
    assert!(user.association("addresses").is_empty());
    assert_eq!(2, user.pending_actions("addresses").len());

    // Storage is unchanged: the parent and first child were rolled back
    let next_key = owner.key().unwrap() + 1;
    assert!(db.find("User", next_key).await.unwrap_err().is_record_not_found());

    let owner = db.find("User", owner.key().unwrap()).await.unwrap();
    assert_eq!(1, owner.association("addresses").len());
}

async fn failed_child_update_rolls_back_parent_update(test: &mut DbTest) {
    let db = setup(test).await;
    home_owner(&db).await;

    let mut user = db.new_entity("User", record! { "name" => "Bob" }).unwrap();
    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "city" => "B", "label" => "work" }],
    )
    .unwrap();
    db.save(&mut user).await.unwrap();
    let key = user.key().unwrap();

    let mut user = db.find("User", key).await.unwrap();
    let id = user.association("addresses")[0].key().unwrap();

    user.assign_attributes(db.schema(), record! { "name" => "Robert" })
        .unwrap();
    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "id" => id, "label" => "home" }],
    )
    .unwrap();

    let err = db.save(&mut user).await.unwrap_err();
    assert!(err.is_persistence_failed(), "{err}");

    // The pre-save association is kept in memory
    assert_eq!(
        &Value::from("work"),
        user.association("addresses")[0].get("label")
    );
    assert!(user.has_pending_actions());

    let reloaded = db.find("User", key).await.unwrap();
    assert_eq!(&Value::from("Bob"), reloaded.get("name"));
    assert_eq!(
        &Value::from("work"),
        reloaded.association("addresses")[0].get("label")
    );
}

async fn retry_after_fixing_the_payload(test: &mut DbTest) {
    let db = setup(test).await;
    home_owner(&db).await;

    let mut user = db.new_entity("User", record! { "name" => "Bob" }).unwrap();
    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "city" => "B", "label" => "home" }],
    )
    .unwrap();
    assert!(db.save(&mut user).await.is_err());

    db.assign_nested_attributes(
        &mut user,
        "addresses",
        vec![record! { "city" => "B", "label" => "office" }],
    )
    .unwrap();
    db.save(&mut user).await.unwrap();

    assert!(user.is_persisted());
    assert_eq!(1, user.association("addresses").len());
}

tests!(
    failed_child_insert_rolls_back_the_parent,
    failed_child_update_rolls_back_parent_update,
    retry_after_fixing_the_payload,
);
