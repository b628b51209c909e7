//! Favorite meal MCP Tools

use serde::Serialize;

use super::diary::LogEntryResponse;
use super::UserContext;
use crate::db::Database;
use crate::models::{FavoriteMeal, FavoriteMealCreate, LoggedEntry, Macros};

/// Response for list_favorites
#[derive(Debug, Serialize)]
pub struct FavoriteListResponse {
    pub favorites: Vec<FavoriteMeal>,
    pub count: usize,
}

/// Response for delete_favorite
#[derive(Debug, Serialize)]
pub struct DeleteFavoriteResponse {
    pub success: bool,
    pub id: i64,
}

pub fn save_favorite(
    db: &Database,
    ctx: &UserContext,
    name: &str,
    nutrition: Macros,
) -> Result<FavoriteMeal, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FavoriteMeal::create(
        &conn,
        &FavoriteMealCreate {
            user_id: ctx.user_id.clone(),
            name: name.to_string(),
            nutrition,
        },
    )
    .map_err(|e| format!("Failed to save favorite: {}", e))
}

/// Saved favorites, newest first
pub fn list_favorites(db: &Database, ctx: &UserContext) -> Result<FavoriteListResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let favorites = FavoriteMeal::list(&conn, &ctx.user_id)
        .map_err(|e| format!("Failed to list favorites: {}", e))?;

    Ok(FavoriteListResponse {
        count: favorites.len(),
        favorites,
    })
}

/// Log a saved favorite as a new diary entry on `date`
pub fn log_favorite(
    db: &Database,
    ctx: &UserContext,
    favorite_id: i64,
    date: &str,
) -> Result<LogEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let favorite = FavoriteMeal::get_by_id(&conn, favorite_id)
        .map_err(|e| format!("Failed to get favorite: {}", e))?
        .filter(|f| f.user_id == ctx.user_id)
        .ok_or_else(|| format!("Favorite not found: {}", favorite_id))?;

    let entry = LoggedEntry::create(&conn, &favorite.to_entry(date))
        .map_err(|e| format!("Failed to log favorite: {}", e))?;

    Ok(LogEntryResponse {
        entry,
        favorite_id: Some(favorite.id),
    })
}

pub fn delete_favorite(
    db: &Database,
    ctx: &UserContext,
    favorite_id: i64,
) -> Result<DeleteFavoriteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = FavoriteMeal::delete(&conn, &ctx.user_id, favorite_id)
        .map_err(|e| format!("Failed to delete favorite: {}", e))?;

    Ok(DeleteFavoriteResponse {
        success,
        id: favorite_id,
    })
}
