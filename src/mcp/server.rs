//! Nutrilog MCP Server Implementation
//!
//! Implements the MCP server with all Nutrilog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::lookup::FoodResolver;
use crate::models::Macros;
use crate::nutrition::{ActivityLevel, BodyProfile, FoodRecord, Ingredient, MealBuilder, ServingUnit, Sex};
use crate::tools::status::StatusTracker;
use crate::tools::{diary, favorites, foods, history, profile, today, UserContext};

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    resolver: FoodResolver,
    ctx: UserContext,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        resolver: FoodResolver,
        ctx: UserContext,
    ) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path, ctx.user_id.clone())),
            database,
            resolver,
            ctx,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_unit(unit: &str) -> Result<ServingUnit, McpError> {
    ServingUnit::parse(unit).ok_or_else(|| {
        McpError::invalid_params(
            format!("Unknown unit '{}'. Use gram, milliliter or item", unit),
            None,
        )
    })
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    /// "male" or "female"
    pub sex: String,
    /// sedentary, light, moderate, active, very_active
    pub activity_level: String,
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodParams {
    pub term: String,
}

/// A food with reference values and a consumed quantity
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    pub name: String,
    /// Reference kcal per 100 g/ml, or per item
    pub kcal: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carb: f64,
    /// gram, milliliter or item
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Grams, milliliters, or item count
    pub quantity: f64,
}

fn default_unit() -> String { "gram".to_string() }

impl IngredientParams {
    fn into_ingredient(self) -> Result<Ingredient, McpError> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(McpError::invalid_params(
                format!("Quantity for '{}' must be a positive number", self.name),
                None,
            ));
        }
        let unit = parse_unit(&self.unit)?;
        let food = FoodRecord::new(
            self.name,
            Macros::new(self.kcal, self.protein, self.fat, self.carb),
            unit,
        );
        Ok(Ingredient::new(food, self.quantity))
    }
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// Meal name; generated from the ingredients when omitted
    pub name: Option<String>,
    pub ingredients: Vec<IngredientParams>,
    #[serde(default)]
    pub save_as_favorite: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogEntryParams {
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    pub name: String,
    pub kcal: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carb: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetHistoryParams {
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

// ============================================================================
// Favorite Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveFavoriteParams {
    pub name: String,
    pub kcal: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carb: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFavoriteParams {
    pub id: i64,
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFavoriteParams {
    pub id: i64,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrilog service including build info, database status, and process information")]
    fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.status_tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for targets, food lookup and meal logging. Call this when starting a diary session or when unsure how to use the tools.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIARY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Record body metrics. Appends a profile snapshot and returns the new daily energy target and macro targets")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(today);
        let body = BodyProfile {
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            age_years: p.age_years,
            sex: Sex::from_str(&p.sex),
            activity_level: ActivityLevel::from_str(&p.activity_level),
        };
        let result = profile::update_profile(&self.database, &self.ctx, &date, &body)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the current profile, energy target and macro targets (2000 kcal when no profile exists)")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &self.ctx)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List all profile snapshots, oldest first (weight history)")]
    fn get_profile_history(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile_history(&self.database, &self.ctx)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Foods ---

    #[tool(description = "Look up a food by name. Exact matches in the built-in table win; otherwise up to 5 products are fetched from OpenFoodFacts (terms of 3+ characters)")]
    async fn search_food(&self, Parameters(p): Parameters<SearchFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_food(&self.resolver, &p.term)
            .await
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Compute nutrients for a quantity of a food given its reference values (per 100 g, per 100 ml, or per item)")]
    fn scale_food(&self, Parameters(p): Parameters<IngredientParams>) -> Result<CallToolResult, McpError> {
        let unit = parse_unit(&p.unit)?;
        let food = FoodRecord::new(p.name, Macros::new(p.kcal, p.protein, p.fat, p.carb), unit);
        let result = foods::scale_food(&food, p.quantity)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Log a meal built from ingredients. The name is generated when omitted. Optionally saves the meal as a favorite")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(today);

        let mut builder = MealBuilder::new();
        if let Some(name) = p.name {
            builder = builder.name(name);
        }
        for ingredient in p.ingredients {
            builder.push(ingredient.into_ingredient()?);
        }

        let result = diary::log_meal(&self.database, &self.ctx, &date, &builder, p.save_as_favorite)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a meal with known totals (kcal, protein, fat, carb)")]
    fn log_entry(&self, Parameters(p): Parameters<LogEntryParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(today);
        let nutrition = Macros::new(p.kcal, p.protein, p.fat, p.carb);
        let result = diary::log_entry(&self.database, &self.ctx, &date, &p.name, nutrition)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a diary day: entries (newest first), totals, adherence to the energy target, remaining kcal and macro progress")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(today);
        let result = diary::get_day(&self.database, &self.ctx, &date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a diary entry by ID")]
    fn delete_entry(&self, Parameters(p): Parameters<DeleteEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_entry(&self.database, &self.ctx, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get diary history grouped by date, most recent first, with daily totals and adherence. Optional inclusive date range")]
    fn get_history(&self, Parameters(p): Parameters<GetHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = history::get_history(
            &self.database,
            &self.ctx,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Favorites ---

    #[tool(description = "Save a meal template with known totals")]
    fn save_favorite(&self, Parameters(p): Parameters<SaveFavoriteParams>) -> Result<CallToolResult, McpError> {
        let nutrition = Macros::new(p.kcal, p.protein, p.fat, p.carb);
        let result = favorites::save_favorite(&self.database, &self.ctx, &p.name, nutrition)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List saved favorite meals, newest first")]
    fn list_favorites(&self) -> Result<CallToolResult, McpError> {
        let result = favorites::list_favorites(&self.database, &self.ctx)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a saved favorite meal on a date")]
    fn log_favorite(&self, Parameters(p): Parameters<LogFavoriteParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(today);
        let result = favorites::log_favorite(&self.database, &self.ctx, p.id, &date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a saved favorite meal")]
    fn delete_favorite(&self, Parameters(p): Parameters<DeleteFavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = favorites::delete_favorite(&self.database, &self.ctx, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - calorie and macro tracking against a personal energy target. \
                 IMPORTANT: Call diary_instructions before logging. \
                 Profile: update_profile/get_profile/get_profile_history. \
                 Foods: search_food, scale_food. \
                 Diary: log_meal/log_entry/get_day/delete_entry, get_history. \
                 Favorites: save_favorite/list_favorites/log_favorite/delete_favorite. \
                 Dates are ISO (YYYY-MM-DD) and default to today."
                    .into(),
            ),
        }
    }
}
