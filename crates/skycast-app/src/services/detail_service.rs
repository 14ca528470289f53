//! City detail view theming.

use skycast_weather::{ConditionsSummary, CurrentConditions, WeatherPalette};

/// Palette for the detail view; the neutral default until conditions load
pub fn detail_palette(conditions: Option<&CurrentConditions>, is_dark: bool) -> WeatherPalette {
    conditions
        .map(|c| c.summary(is_dark).palette)
        .unwrap_or_else(|| WeatherPalette::default_for(is_dark))
}

/// Summary for a detail card, `None` until conditions load
pub fn detail_summary(
    conditions: Option<&CurrentConditions>,
    is_dark: bool,
) -> Option<ConditionsSummary> {
    conditions.map(|c| c.summary(is_dark))
}
