use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use foodgram_core::health::healthz;
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    ingredient::{get_ingredient, list_ingredients},
    membership::{
        add_favorite, add_to_cart, download_shopping_cart, remove_favorite, remove_from_cart,
    },
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    subscription::{list_subscriptions, subscribe, unsubscribe},
    tag::{create_tag, get_tag, list_tags},
    user::{get_me, get_user, list_users, register_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Tags
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", get(get_tag))
        // Ingredients
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Users
        .route("/users", get(list_users).post(register_user))
        .route("/users/me", get(get_me))
        .route("/users/subscriptions", get(list_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
        // Recipes
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(add_to_cart).delete(remove_from_cart),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
}
