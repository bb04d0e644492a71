use foodgram_recipes::domain::types::{IngredientAmount, Membership};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::membership::{AddToListUseCase, RemoveFromListUseCase};
use foodgram_recipes::usecase::shopping_list::DownloadShoppingListUseCase;

use crate::helpers::{MemoryStore, StoredRecipe};

fn seed_recipe(store: &MemoryStore, id: i32, name: &str, ingredients: Vec<(i32, i32)>) {
    let author_id = store.add_user(&format!("author{id}")).id;
    store.state().recipes.push(StoredRecipe {
        id,
        author_id,
        name: name.to_owned(),
        image: format!("recipes/images/{id}.png"),
        text: "Cook it.".to_owned(),
        cooking_time: 15,
        pub_date: chrono::Utc::now(),
        tags: vec![],
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    });
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_add_favorite_and_return_summary() {
    let store = MemoryStore::new();
    let user = store.add_user("fan");
    seed_recipe(&store, 1, "Pancakes", vec![]);

    let summary = AddToListUseCase {
        recipes: store.clone(),
        list: store.favorites(),
    }
    .execute(user.id, 1)
    .await
    .unwrap();

    assert_eq!(summary.id, 1);
    assert_eq!(summary.name, "Pancakes");
    assert_eq!(summary.image, "recipes/images/1.png");
    assert_eq!(summary.cooking_time, 15);
    assert_eq!(store.state().favorites, vec![(user.id, 1)]);
}

#[tokio::test]
async fn should_reject_second_favorite_for_same_pair() {
    let store = MemoryStore::new();
    let user = store.add_user("fan");
    seed_recipe(&store, 1, "Pancakes", vec![]);
    let usecase = AddToListUseCase {
        recipes: store.clone(),
        list: store.favorites(),
    };
    usecase.execute(user.id, 1).await.unwrap();

    let result = usecase.execute(user.id, 1).await;

    assert!(
        matches!(
            result,
            Err(RecipesServiceError::AlreadyExists(Membership::Favorite))
        ),
        "expected AlreadyExists, got {result:?}"
    );
    assert_eq!(store.state().favorites.len(), 1);
}

#[tokio::test]
async fn should_not_favorite_missing_recipe() {
    let store = MemoryStore::new();
    let user = store.add_user("fan");

    let result = AddToListUseCase {
        recipes: store.clone(),
        list: store.favorites(),
    }
    .execute(user.id, 404)
    .await;

    assert!(
        matches!(result, Err(RecipesServiceError::RecipeNotFound)),
        "expected RecipeNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_remove_favorite() {
    let store = MemoryStore::new();
    let user = store.add_user("fan");
    seed_recipe(&store, 1, "Pancakes", vec![]);
    store.state().favorites.push((user.id, 1));

    RemoveFromListUseCase {
        recipes: store.clone(),
        list: store.favorites(),
    }
    .execute(user.id, 1)
    .await
    .unwrap();

    assert!(store.state().favorites.is_empty());
}

#[tokio::test]
async fn should_report_missing_favorite_on_remove() {
    let store = MemoryStore::new();
    let user = store.add_user("fan");
    seed_recipe(&store, 1, "Pancakes", vec![]);

    let result = RemoveFromListUseCase {
        recipes: store.clone(),
        list: store.favorites(),
    }
    .execute(user.id, 1)
    .await;

    assert!(
        matches!(
            result,
            Err(RecipesServiceError::MembershipNotFound(Membership::Favorite))
        ),
        "expected MembershipNotFound, got {result:?}"
    );
}

// ── Shopping cart ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_cart_separate_from_favorites() {
    let store = MemoryStore::new();
    let user = store.add_user("cook");
    seed_recipe(&store, 1, "Pancakes", vec![]);
    store.state().favorites.push((user.id, 1));

    AddToListUseCase {
        recipes: store.clone(),
        list: store.cart(),
    }
    .execute(user.id, 1)
    .await
    .unwrap();

    let result = AddToListUseCase {
        recipes: store.clone(),
        list: store.cart(),
    }
    .execute(user.id, 1)
    .await;
    assert!(
        matches!(
            result,
            Err(RecipesServiceError::AlreadyExists(Membership::ShoppingCart))
        ),
        "expected AlreadyExists, got {result:?}"
    );
    assert_eq!(store.state().carts, vec![(user.id, 1)]);
    assert_eq!(store.state().favorites, vec![(user.id, 1)]);
}

#[tokio::test]
async fn should_check_recipe_before_cart_removal() {
    let store = MemoryStore::new();
    let user = store.add_user("cook");

    let result = RemoveFromListUseCase {
        recipes: store.clone(),
        list: store.cart(),
    }
    .execute(user.id, 9)
    .await;

    assert!(
        matches!(result, Err(RecipesServiceError::RecipeNotFound)),
        "expected RecipeNotFound, got {result:?}"
    );
}

// ── DownloadShoppingListUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_sum_cart_ingredients_across_recipes() {
    let store = MemoryStore::new();
    let user = store.add_user("cook");
    store.add_ingredient(1, "sugar", "g");
    store.add_ingredient(2, "eggs", "pcs");
    seed_recipe(&store, 10, "Meringue", vec![(1, 100), (2, 4)]);
    seed_recipe(&store, 11, "Custard", vec![(1, 50), (2, 3)]);
    seed_recipe(&store, 12, "Not in cart", vec![(1, 1000)]);
    {
        let mut state = store.state();
        state.carts.push((user.id, 10));
        state.carts.push((user.id, 11));
    }

    let text = DownloadShoppingListUseCase { cart: store.clone() }
        .execute(user.id)
        .await
        .unwrap();

    assert_eq!(text, "eggs (pcs) - 7\nsugar (g) - 150\n");
}

#[tokio::test]
async fn should_render_empty_list_for_empty_cart() {
    let store = MemoryStore::new();
    let user = store.add_user("cook");

    let text = DownloadShoppingListUseCase { cart: store.clone() }
        .execute(user.id)
        .await
        .unwrap();

    assert!(text.is_empty());
}
