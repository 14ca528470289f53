//! WMO weather code classification.
//!
//! Codes follow the Open-Meteo "weather interpretation codes" table:
//! https://open-meteo.com/en/docs#weathervariables
//!
//! Icon and palette selection use ordered `(inclusive upper bound, value)`
//! tables. The first row whose bound is `>= code` wins; negative codes never
//! match and get the default.

use serde::Serialize;

/// Human-readable phrase for a WMO code, "Unknown" for codes not in the table
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snowfall",
        73 => "Moderate snowfall",
        75 => "Heavy snowfall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Icon shown next to current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sun,
    PartlyCloudy,
    Fog,
    Rain,
    Snow,
    RainShower,
    SnowShower,
    Thunderstorm,
    Thermometer,
}

impl WeatherIcon {
    /// Emoji glyph rendered by the UI
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀️",
            Self::PartlyCloudy => "⛅",
            Self::Fog => "🌫️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::RainShower => "🌦️",
            Self::SnowShower => "🌨️",
            Self::Thunderstorm => "⛈️",
            Self::Thermometer => "🌡️",
        }
    }

    /// Stable identifier for themes that ship their own icon set
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Fog => "cloud_fog",
            Self::Rain => "cloud_rain",
            Self::Snow => "snowflake",
            Self::RainShower => "cloud_sun_rain",
            Self::SnowShower => "cloud_snow",
            Self::Thunderstorm => "cloud_lightning",
            Self::Thermometer => "thermometer",
        }
    }
}

// 57 and 67 are separate rows (drizzle, rain) that share a glyph.
const ICON_BANDS: &[(i32, WeatherIcon)] = &[
    (0, WeatherIcon::Sun),
    (3, WeatherIcon::PartlyCloudy),
    (48, WeatherIcon::Fog),
    (57, WeatherIcon::Rain),
    (67, WeatherIcon::Rain),
    (77, WeatherIcon::Snow),
    (82, WeatherIcon::RainShower),
    (86, WeatherIcon::SnowShower),
    (94, WeatherIcon::Thermometer),
    (i32::MAX, WeatherIcon::Thunderstorm),
];

pub fn icon_for(code: i32) -> WeatherIcon {
    banded(ICON_BANDS, code, WeatherIcon::Thermometer)
}

/// Five color tokens for a weather-themed screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherPalette {
    pub background: &'static str,
    pub card_surface: &'static str,
    pub accent: &'static str,
    pub primary_text: &'static str,
    pub secondary_text: &'static str,
}

impl WeatherPalette {
    const fn new(
        background: &'static str,
        card_surface: &'static str,
        accent: &'static str,
        primary_text: &'static str,
        secondary_text: &'static str,
    ) -> Self {
        Self {
            background,
            card_surface,
            accent,
            primary_text,
            secondary_text,
        }
    }

    /// Palette for a view that has no conditions to theme yet
    pub fn default_for(is_dark: bool) -> Self {
        pick(DEFAULT_PALETTES, is_dark)
    }
}

/// `(light, dark)`
type PalettePair = (WeatherPalette, WeatherPalette);

const CLEAR_PALETTES: PalettePair = (
    WeatherPalette::new("#fff8e1", "#ffffff", "#f5a623", "#333", "#666"),
    WeatherPalette::new("#1a1a2e", "#16213e", "#f5a623", "#f0f0f0", "#aaa"),
);
const PARTLY_CLOUDY_PALETTES: PalettePair = (
    WeatherPalette::new("#e3f2fd", "#ffffff", "#42a5f5", "#333", "#666"),
    WeatherPalette::new("#1b2838", "#1e3a50", "#64b5f6", "#f0f0f0", "#aaa"),
);
const FOG_PALETTES: PalettePair = (
    WeatherPalette::new("#eceff1", "#ffffff", "#78909c", "#333", "#666"),
    WeatherPalette::new("#212121", "#2c2c2c", "#9e9e9e", "#e0e0e0", "#999"),
);
const RAIN_PALETTES: PalettePair = (
    WeatherPalette::new("#e1f5fe", "#ffffff", "#0288d1", "#333", "#666"),
    WeatherPalette::new("#0d1b2a", "#1b2a3d", "#4fc3f7", "#f0f0f0", "#aaa"),
);
const SNOW_PALETTES: PalettePair = (
    WeatherPalette::new("#e8eaf6", "#ffffff", "#5c6bc0", "#333", "#666"),
    WeatherPalette::new("#1a1a2e", "#252545", "#b3e5fc", "#f0f0f0", "#aaa"),
);
const SHOWER_PALETTES: PalettePair = (
    WeatherPalette::new("#e0f2f1", "#ffffff", "#00897b", "#333", "#666"),
    WeatherPalette::new("#0d1b2a", "#1b2a3d", "#4db6ac", "#f0f0f0", "#aaa"),
);
const THUNDERSTORM_PALETTES: PalettePair = (
    WeatherPalette::new("#f3e5f5", "#ffffff", "#8e24aa", "#333", "#666"),
    WeatherPalette::new("#1a0a2e", "#2d1b4e", "#ce93d8", "#f0f0f0", "#aaa"),
);
const DEFAULT_PALETTES: PalettePair = (
    WeatherPalette::new("#f0f4f8", "#ffffff", "#0a7ea4", "#333", "#666"),
    WeatherPalette::new("#151718", "#1e1e1e", "#0a7ea4", "#ecedee", "#9ba1a6"),
);

// Showers share one palette for rain and snow (78..=86).
const PALETTE_BANDS: &[(i32, PalettePair)] = &[
    (0, CLEAR_PALETTES),
    (3, PARTLY_CLOUDY_PALETTES),
    (48, FOG_PALETTES),
    (67, RAIN_PALETTES),
    (77, SNOW_PALETTES),
    (86, SHOWER_PALETTES),
    (94, DEFAULT_PALETTES),
    (i32::MAX, THUNDERSTORM_PALETTES),
];

pub fn palette_for(code: i32, is_dark: bool) -> WeatherPalette {
    pick(banded(PALETTE_BANDS, code, DEFAULT_PALETTES), is_dark)
}

fn pick((light, dark): PalettePair, is_dark: bool) -> WeatherPalette {
    if is_dark {
        dark
    } else {
        light
    }
}

fn banded<T: Copy>(bands: &[(i32, T)], code: i32, default: T) -> T {
    if code < 0 {
        return default;
    }
    bands
        .iter()
        .find(|(upper, _)| code <= *upper)
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

/// Everything a view needs to render one set of conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionsSummary {
    pub description: &'static str,
    pub icon: WeatherIcon,
    pub palette: WeatherPalette,
}

impl ConditionsSummary {
    pub fn for_code(code: i32, is_dark: bool) -> Self {
        Self {
            description: describe(code),
            icon: icon_for(code),
            palette: palette_for(code, is_dark),
        }
    }
}
