pub mod ingredient;
pub mod membership;
pub mod projection;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;
