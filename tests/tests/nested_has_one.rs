use pretty_assertions::assert_eq;
use quilt::{nested::ActionKind, record, schema::NestedOptions, stmt::Value, Db, Entity};
use tests::{models, tests, DbTest};

async fn setup(test: &mut DbTest, options: NestedOptions) -> Db {
    let mut builder = models::builder();
    builder.nested_attributes("User", "profile", options).unwrap();
    test.setup_db(builder).await
}

async fn user_with_profile(db: &Db, bio: &str) -> Entity {
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();
    db.assign_nested_attributes(&mut user, "profile", record! { "bio" => bio })
        .unwrap();
    db.save(&mut user).await.unwrap();

    db.find("User", user.key().unwrap()).await.unwrap()
}

fn bio(user: &Entity) -> Option<&Value> {
    user.has_one("profile").map(|profile| profile.get("bio"))
}

async fn create_profile(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let user = user_with_profile(&db, "hello").await;

    assert_eq!(Some(&Value::from("hello")), bio(&user));
    assert_eq!(1, user.association("profile").len());
}

async fn update_profile_by_key(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_profile(&db, "hello").await;
    let id = user.has_one("profile").unwrap().key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "profile",
        record! { "id" => id, "bio" => "updated", "age" => "30" },
    )
    .unwrap();
    assert_eq!(ActionKind::Update, user.pending_actions("profile")[0].kind());

    db.save(&mut user).await.unwrap();

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    let profile = reloaded.has_one("profile").unwrap();
    assert_eq!(Some(id), profile.key());
    assert_eq!(&Value::from("updated"), profile.get("bio"));
    assert_eq!(&Value::I64(30), profile.get("age"));
}

async fn create_replaces_existing_profile(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_profile(&db, "first").await;
    let first = user.has_one("profile").unwrap().key().unwrap();

    test.log().clear();

    db.assign_nested_attributes(&mut user, "profile", record! { "bio" => "second" })
        .unwrap();
    assert_eq!(ActionKind::Create, user.pending_actions("profile")[0].kind());

    db.save(&mut user).await.unwrap();
    assert!(test.log().has_delete_by_key());

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert_eq!(1, reloaded.association("profile").len());
    assert_ne!(Some(first), reloaded.has_one("profile").unwrap().key());
    assert_eq!(Some(&Value::from("second")), bio(&reloaded));
}

async fn update_only_updates_existing_profile(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().update_only(true)).await;
    let mut user = user_with_profile(&db, "first").await;
    let id = user.has_one("profile").unwrap().key().unwrap();

    db.assign_nested_attributes(&mut user, "profile", record! { "bio" => "second" })
        .unwrap();

    let action = &user.pending_actions("profile")[0];
    assert_eq!(ActionKind::Update, action.kind());
    assert_eq!(Some(id), action.target());

    db.save(&mut user).await.unwrap();

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert_eq!(Some(id), reloaded.has_one("profile").unwrap().key());
    assert_eq!(Some(&Value::from("second")), bio(&reloaded));
}

async fn update_only_creates_when_missing(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().update_only(true)).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    db.assign_nested_attributes(&mut user, "profile", record! { "bio" => "hi" })
        .unwrap();
    assert_eq!(ActionKind::Create, user.pending_actions("profile")[0].kind());

    db.save(&mut user).await.unwrap();
    assert!(user.has_one("profile").unwrap().is_persisted());
}

async fn destroy_profile(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new().allow_destroy(true)).await;
    let mut user = user_with_profile(&db, "bye").await;
    let id = user.has_one("profile").unwrap().key().unwrap();

    db.assign_nested_attributes(
        &mut user,
        "profile",
        record! { "id" => id, "_destroy" => "1" },
    )
    .unwrap();
    db.save(&mut user).await.unwrap();
    assert!(user.has_one("profile").is_none());

    let reloaded = db.find("User", user.key().unwrap()).await.unwrap();
    assert!(reloaded.has_one("profile").is_none());
}

async fn null_payload_is_a_no_op(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = user_with_profile(&db, "kept").await;

    db.assign_nested_attributes(&mut user, "profile", Value::Null)
        .unwrap();
    assert!(!user.has_pending_actions());
    assert_eq!(Some(&Value::Null), user.nested_attributes("profile"));

    db.save(&mut user).await.unwrap();
    assert_eq!(Some(&Value::from("kept")), bio(&user));
}

async fn list_payload_is_rejected(test: &mut DbTest) {
    let db = setup(test, NestedOptions::new()).await;
    let mut user = db.new_entity("User", record! { "name" => "Ann" }).unwrap();

    let err = db
        .assign_nested_attributes(&mut user, "profile", vec![record! { "bio" => "a" }])
        .unwrap_err();
    assert!(err.is_invalid_payload());
    assert!(user.nested_attributes("profile").is_none());
}

tests!(
    create_profile,
    update_profile_by_key,
    create_replaces_existing_profile,
    update_only_updates_existing_profile,
    update_only_creates_when_missing,
    destroy_profile,
    null_payload_is_a_no_op,
    list_payload_is_rejected,
);
