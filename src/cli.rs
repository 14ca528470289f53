use clap::{Parser, Subcommand};
use skycast_app::{FavoriteWeather, WeatherApp};
use skycast_core::{AppError, WeatherError};
use skycast_services::SaveOutcome;
use skycast_weather::{Coordinate, CurrentConditions};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Current weather for your location and saved cities"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Weather at the device location, or the fallback city.
    Home,

    /// Look up a city by name and show its current weather.
    Search {
        /// City name, e.g. "Paris" or "São Paulo".
        name: String,

        /// Save the city if it was found.
        #[arg(long)]
        save: bool,
    },

    /// List saved locations with their current weather.
    Saved,

    /// Save a location directly.
    Save {
        name: String,
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Remove a saved location by id.
    Remove { id: i64 },

    /// Detailed conditions and theme for a coordinate.
    Detail {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,

        /// Use the dark palette regardless of configuration.
        #[arg(long)]
        dark: bool,
    },
}

impl Cli {
    pub async fn run(self, app: WeatherApp) -> anyhow::Result<()> {
        match self.command {
            Command::Home => {
                let home = app.resolve_home_weather().await.map_err(report)?;
                let saved = if home.is_saved { " (saved)" } else { "" };
                println!("{}{}", home.label, saved);
                print_conditions(&app, &home.conditions);
            }
            Command::Search { name, save } => {
                let Some(found) = app.search_city(&name).await.map_err(report)? else {
                    println!("{}", not_found(&name));
                    return Ok(());
                };
                println!("{}", found.city.display_name());
                print_conditions(&app, &found.conditions);

                if save {
                    let outcome = app
                        .save_favorite(&found.city.name, found.city.coordinate)
                        .await
                        .map_err(report)?;
                    print_save_outcome(&found.city.name, &outcome);
                }
            }
            Command::Saved => {
                let entries = app.saved_with_weather().await.map_err(report)?;
                if entries.is_empty() {
                    println!("No saved locations yet. Search for a city to add one.");
                }
                for entry in &entries {
                    print_saved(&app, entry);
                }
            }
            Command::Save {
                name,
                latitude,
                longitude,
            } => {
                let outcome = app
                    .save_favorite(&name, Coordinate::new(latitude, longitude))
                    .await
                    .map_err(report)?;
                print_save_outcome(name.trim(), &outcome);
            }
            Command::Remove { id } => {
                if app.remove_favorite(id).await.map_err(report)? {
                    println!("Removed location {id}");
                } else {
                    println!("No saved location with id {id}");
                }
            }
            Command::Detail {
                latitude,
                longitude,
                dark,
            } => {
                let app = if dark { app.with_dark_mode(true) } else { app };
                let conditions = match app
                    .get_detailed_conditions(Coordinate::new(latitude, longitude))
                    .await
                {
                    Ok(conditions) => Some(conditions),
                    Err(e) => {
                        eprintln!("{}", e.user_message());
                        None
                    }
                };

                match (conditions.as_ref(), app.detail_summary(conditions.as_ref())) {
                    (Some(conditions), Some(summary)) => {
                        println!("  {} {}", summary.icon.glyph(), summary.description);
                        print_measurements(conditions);
                        println!("  Wind direction: {:.0}°", conditions.wind_direction_deg);
                        println!("  {}", if conditions.is_day { "Day" } else { "Night" });
                        println!(
                            "  Observed: {} UTC",
                            conditions.observed_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                    _ => println!("  Weather unavailable"),
                }

                let palette = app.detail_palette(conditions.as_ref());
                println!(
                    "  Theme: background {} / card {} / accent {}",
                    palette.background, palette.card_surface, palette.accent
                );
            }
        }

        Ok(())
    }
}

fn print_conditions(app: &WeatherApp, conditions: &CurrentConditions) {
    let summary = app.summary(conditions);
    println!("  {} {}", summary.icon.glyph(), summary.description);
    print_measurements(conditions);
}

fn print_measurements(conditions: &CurrentConditions) {
    println!(
        "  {:.1}°C, wind {:.1} km/h",
        conditions.temperature_c, conditions.wind_speed_kmh
    );
}

fn print_saved(app: &WeatherApp, entry: &FavoriteWeather) {
    println!("[{}] {}", entry.favorite.id, entry.favorite.city_name);
    match &entry.conditions {
        Some(conditions) => print_conditions(app, conditions),
        None => println!("  Weather unavailable"),
    }
}

fn print_save_outcome(name: &str, outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Saved(favorite) => {
            println!("Saved {} (id {})", favorite.city_name, favorite.id)
        }
        SaveOutcome::AlreadySaved => println!("{name} is already saved"),
    }
}

fn not_found(name: &str) -> &'static str {
    AppError::Weather(WeatherError::CityNotFound(name.trim().to_string())).user_message()
}

fn report(err: AppError) -> anyhow::Error {
    eprintln!("{}", err.user_message());
    err.into()
}
