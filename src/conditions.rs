use serde::Serialize;

/// Icons are served from the WeatherAPI CDN; the lookup table only stores
/// the file name.
pub const ICON_BASE_URL: &str = "//cdn.weatherapi.com/weather/64x64/day/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCondition {
    pub text: String,
    pub icon: String,
}

fn lookup(code: u16) -> (&'static str, &'static str) {
    match code {
        0 => ("Clear sky", "113.png"),
        1 => ("Mainly clear", "116.png"),
        2 => ("Partly cloudy", "116.png"),
        3 => ("Overcast", "122.png"),
        45 => ("Fog", "143.png"),
        48 => ("Depositing rime fog", "143.png"),
        51 => ("Light drizzle", "266.png"),
        53 => ("Moderate drizzle", "266.png"),
        55 => ("Dense drizzle", "266.png"),
        61 => ("Slight rain", "296.png"),
        63 => ("Moderate rain", "302.png"),
        65 => ("Heavy rain", "308.png"),
        71 => ("Slight snow", "326.png"),
        73 => ("Moderate snow", "332.png"),
        75 => ("Heavy snow", "338.png"),
        95 => ("Thunderstorm", "386.png"),
        _ => ("Weather", "116.png"),
    }
}

/// Map a WMO weather code to display text and an icon URI.
///
/// Total over all codes: anything outside the table resolves to the generic
/// fallback entry.
pub fn describe(code: u16) -> WeatherCondition {
    let (text, icon) = lookup(code);
    WeatherCondition {
        text: text.to_string(),
        icon: format!("{}{}", ICON_BASE_URL, icon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe(0).text, "Clear sky");
        assert_eq!(describe(3).text, "Overcast");
        assert_eq!(describe(95).text, "Thunderstorm");
    }

    #[test]
    fn test_unknown_code_falls_back_to_default() {
        let condition = describe(42);
        assert_eq!(condition.text, "Weather");
        assert_eq!(condition.icon, format!("{}116.png", ICON_BASE_URL));

        // Total function: extremes resolve too
        assert_eq!(describe(u16::MAX).text, "Weather");
    }

    #[test]
    fn test_icon_is_full_uri() {
        assert_eq!(
            describe(61).icon,
            "//cdn.weatherapi.com/weather/64x64/day/296.png"
        );
        for code in [0, 1, 45, 75, 999] {
            assert!(describe(code).icon.starts_with(ICON_BASE_URL));
        }
    }

    #[test]
    fn test_describe_is_deterministic() {
        assert_eq!(describe(63), describe(63));
    }
}
