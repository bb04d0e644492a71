use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::UserRole;
use foodgram_domain::viewer::Viewer;
use foodgram_recipes::domain::types::NewTag;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::ingredient::{
    GetIngredientUseCase, IngredientRow, ListIngredientsUseCase, LoadIngredientsUseCase,
};
use foodgram_recipes::usecase::tag::{CreateTagUseCase, GetTagUseCase, ListTagsUseCase};
use foodgram_recipes::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase,
};

use crate::helpers::MemoryStore;

fn new_tag(name: &str, color: &str, slug: &str) -> NewTag {
    NewTag {
        name: name.to_owned(),
        color: color.to_owned(),
        slug: slug.to_owned(),
    }
}

fn row(name: &str, unit: &str) -> IngredientRow {
    IngredientRow {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

fn registration(username: &str) -> RegisterUserInput {
    RegisterUserInput {
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
    }
}

// ── Tags ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_tag_as_admin_with_normalized_color() {
    let store = MemoryStore::new();

    let tag = CreateTagUseCase { repo: store.clone() }
        .execute(UserRole::Admin, new_tag(" Lunch ", "#e26c2d", "lunch"))
        .await
        .unwrap();

    assert_eq!(tag.name, "Lunch");
    assert_eq!(tag.color, "#E26C2D");
    let fetched = GetTagUseCase { repo: store.clone() }
        .execute(tag.id)
        .await
        .unwrap();
    assert_eq!(fetched, tag);
}

#[tokio::test]
async fn should_forbid_tag_creation_for_regular_user() {
    let store = MemoryStore::new();

    let result = CreateTagUseCase { repo: store.clone() }
        .execute(UserRole::Normal, new_tag("Lunch", "#E26C2D", "lunch"))
        .await;

    assert!(
        matches!(result, Err(RecipesServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(store.state().tags.is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_tag_slug() {
    let store = MemoryStore::new();
    store.add_tag(1, "lunch");

    let result = CreateTagUseCase { repo: store.clone() }
        .execute(UserRole::Admin, new_tag("Midday", "#fff", "lunch"))
        .await;

    assert!(
        matches!(result, Err(RecipesServiceError::TagAlreadyExists)),
        "expected TagAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_tags_by_id_and_report_missing_tag() {
    let store = MemoryStore::new();
    store.add_tag(2, "dinner");
    store.add_tag(1, "breakfast");

    let tags = ListTagsUseCase { repo: store.clone() }
        .execute()
        .await
        .unwrap();
    let ids: Vec<i32> = tags.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let result = GetTagUseCase { repo: store.clone() }.execute(3).await;
    assert!(
        matches!(result, Err(RecipesServiceError::TagNotFound)),
        "expected TagNotFound, got {result:?}"
    );
}

// ── Ingredients ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_filter_ingredients_by_case_insensitive_prefix() {
    let store = MemoryStore::new();
    store.add_ingredient(1, "Sugar", "g");
    store.add_ingredient(2, "salt", "g");
    store.add_ingredient(3, "flour", "g");

    let ingredients = ListIngredientsUseCase { repo: store.clone() }
        .execute(Some(" s "))
        .await
        .unwrap();

    let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Sugar", "salt"]);
}

#[tokio::test]
async fn should_list_all_ingredients_for_blank_filter() {
    let store = MemoryStore::new();
    store.add_ingredient(1, "sugar", "g");
    store.add_ingredient(2, "flour", "g");

    let ingredients = ListIngredientsUseCase { repo: store.clone() }
        .execute(Some(""))
        .await
        .unwrap();

    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0].name, "flour");
}

#[tokio::test]
async fn should_report_missing_ingredient() {
    let store = MemoryStore::new();

    let result = GetIngredientUseCase { repo: store.clone() }.execute(1).await;

    assert!(
        matches!(result, Err(RecipesServiceError::IngredientNotFound)),
        "expected IngredientNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_load_ingredients_idempotently() {
    let store = MemoryStore::new();
    let usecase = LoadIngredientsUseCase { repo: store.clone() };
    let rows = vec![row("flour", "g"), row("milk", "ml"), row("flour", "kg")];

    let first = usecase.execute(rows.clone()).await.unwrap();
    assert_eq!(first.created, 3);
    assert_eq!(first.total, 3);

    let second = usecase.execute(rows).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.total, 3);
    assert_eq!(store.state().ingredients.len(), 3);
}

#[tokio::test]
async fn should_trim_loaded_rows() {
    let store = MemoryStore::new();
    store.add_ingredient(1, "flour", "g");

    let report = LoadIngredientsUseCase { repo: store.clone() }
        .execute(vec![row(" flour ", "g ")])
        .await
        .unwrap();

    assert_eq!(report.created, 0);
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_profile_for_identity() {
    let store = MemoryStore::new();
    let user_id = uuid::Uuid::now_v7();

    let profile = RegisterUserUseCase { repo: store.clone() }
        .execute(user_id, UserRole::Normal, registration("ada"))
        .await
        .unwrap();

    assert_eq!(profile.id, user_id);
    assert_eq!(profile.username, "ada");
    assert!(!profile.is_subscribed);
    assert_eq!(store.state().users.len(), 1);
}

#[tokio::test]
async fn should_reject_second_registration_for_same_identity() {
    let store = MemoryStore::new();
    let user_id = uuid::Uuid::now_v7();
    let usecase = RegisterUserUseCase { repo: store.clone() };
    usecase
        .execute(user_id, UserRole::Normal, registration("ada"))
        .await
        .unwrap();

    let result = usecase
        .execute(user_id, UserRole::Normal, registration("grace"))
        .await;

    assert!(
        matches!(result, Err(RecipesServiceError::UserAlreadyExists)),
        "expected UserAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let store = MemoryStore::new();
    let mut input = registration("ada");
    input.email = "not-an-email".to_owned();

    let result = RegisterUserUseCase { repo: store.clone() }
        .execute(uuid::Uuid::now_v7(), UserRole::Normal, input)
        .await;

    assert!(
        matches!(result, Err(RecipesServiceError::InvalidFormat { field: "email" })),
        "expected InvalidFormat, got {result:?}"
    );
}

#[tokio::test]
async fn should_compute_is_subscribed_per_viewer() {
    let store = MemoryStore::new();
    let reader = store.add_user("reader");
    let author = store.add_user("author");
    store.state().subscriptions.push((reader.id, author.id));
    let usecase = GetUserUseCase {
        repo: store.clone(),
        relations: store.clone(),
    };

    let as_reader = usecase.execute(author.id, Viewer::User(reader.id)).await.unwrap();
    let as_anonymous = usecase.execute(author.id, Viewer::Anonymous).await.unwrap();
    let as_self = usecase.execute(author.id, Viewer::User(author.id)).await.unwrap();

    assert!(as_reader.is_subscribed);
    assert!(!as_anonymous.is_subscribed);
    assert!(!as_self.is_subscribed);
}

#[tokio::test]
async fn should_list_users_with_pagination() {
    let store = MemoryStore::new();
    for n in 0..3 {
        store.add_user(&format!("user{n}"));
    }

    let page = ListUsersUseCase {
        repo: store.clone(),
        relations: store.clone(),
    }
    .execute(PageRequest::from_query(Some(1), Some(2)), Viewer::Anonymous)
    .await
    .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "user0");
}
