pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use config::Config;
pub use error::RecipeError;
pub use router::{RecipeState, recipe_router};
