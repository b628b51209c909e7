//! Utility to record a body profile snapshot and print the resulting targets
//!
//! Usage: set_profile <weight_kg> <height_cm> <age_years> <male|female> <activity_level> [date]

use nutrilog::config::Config;
use nutrilog::models::ProfileSnapshot;
use nutrilog::nutrition::{calculate_macro_targets_with, ActivityLevel, BodyProfile, Sex};
use nutrilog::tools::today;

const USAGE: &str =
    "Usage: set_profile <weight_kg> <height_cm> <age_years> <male|female> <sedentary|light|moderate|active|very_active> [YYYY-MM-DD]";

fn parse_args(args: &[String]) -> Result<(BodyProfile, String), String> {
    if args.len() < 5 || args.len() > 6 {
        return Err(USAGE.to_string());
    }

    let weight_kg: f64 = args[0]
        .parse()
        .map_err(|_| format!("Invalid weight: {}", args[0]))?;
    let height_cm: f64 = args[1]
        .parse()
        .map_err(|_| format!("Invalid height: {}", args[1]))?;
    let age_years: u32 = args[2]
        .parse()
        .map_err(|_| format!("Invalid age: {}", args[2]))?;

    let profile = BodyProfile {
        weight_kg,
        height_cm,
        age_years,
        sex: Sex::from_str(&args[3]),
        activity_level: ActivityLevel::from_str(&args[4]),
    };
    let date = args.get(5).cloned().unwrap_or_else(today);

    Ok((profile, date))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (profile, date) = parse_args(&args)?;

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let database = nutrilog::db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        nutrilog::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        let snapshot = ProfileSnapshot::create(conn, &config.user_id, &date, &profile, &config.nutrition)?;
        let macros = calculate_macro_targets_with(&config.nutrition.macros, snapshot.energy_target);
        println!("Profile recorded for {} on {}:", snapshot.user_id, snapshot.date);
        println!("  Energy target: {} kcal", snapshot.energy_target);
        println!("  Protein: {} g", macros.protein_g);
        println!("  Fat: {} g", macros.fat_g);
        println!("  Carbs: {} g", macros.carb_g);
        Ok(())
    })?;

    Ok(())
}
