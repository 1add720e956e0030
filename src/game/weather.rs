//! Game-day weather, sampled once per game and held constant across all
//! plays.

use serde::{Deserialize, Serialize};
use std::fmt;

/// # `WeatherType` enum
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherType {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Wind,
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WeatherType::Clear => "Clear",
            WeatherType::Cloudy => "Cloudy",
            WeatherType::Rain => "Rain",
            WeatherType::Snow => "Snow",
            WeatherType::Wind => "Wind",
        };
        write!(f, "{}", name)
    }
}

/// # `WeatherRaw` struct
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct WeatherRaw {
    pub weather_type: WeatherType,
    pub temperature: i32,
    pub wind_speed: u32,
    pub precipitation: u32,
    pub description: String,
}

impl WeatherRaw {
    pub fn validate(&self) -> Result<(), String> {
        if !(-40..=130).contains(&self.temperature) {
            return Err(format!(
                "Temperature is not in range [-40, 130]: {}",
                self.temperature
            ));
        }
        if self.wind_speed > 100 {
            return Err(format!("Wind speed is not in range [0, 100]: {}", self.wind_speed));
        }
        if self.precipitation > 100 {
            return Err(format!(
                "Precipitation is not in range [0, 100]: {}",
                self.precipitation
            ));
        }
        Ok(())
    }
}

/// # `Weather` struct
///
/// Sampled once per game by the simulation driver and carried unchanged on
/// every [`crate::game::state::GameState`] snapshot.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Weather {
    weather_type: WeatherType,
    temperature: i32,
    wind_speed: u32,
    precipitation: u32,
    description: String,
}

impl TryFrom<WeatherRaw> for Weather {
    type Error = String;

    fn try_from(item: WeatherRaw) -> Result<Self, Self::Error> {
        item.validate()?;
        Ok(Weather {
            weather_type: item.weather_type,
            temperature: item.temperature,
            wind_speed: item.wind_speed,
            precipitation: item.precipitation,
            description: item.description,
        })
    }
}

impl<'de> Deserialize<'de> for Weather {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = WeatherRaw::deserialize(deserializer)?;
        Weather::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Default for Weather {
    fn default() -> Self {
        Weather {
            weather_type: WeatherType::Clear,
            temperature: 72,
            wind_speed: 0,
            precipitation: 0,
            description: String::from("Indoor"),
        }
    }
}

impl Weather {
    /// The forced weather for a dome home team, per the resolver's dome
    /// contract: clear, 72 degrees, no wind, no precipitation.
    ///
    /// ### Example
    /// ```
    /// use nflsim_core::game::weather::Weather;
    ///
    /// let w = Weather::indoor();
    /// assert_eq!(w.wind_speed(), 0);
    /// assert!(w.description().contains("Indoor"));
    /// ```
    pub fn indoor() -> Weather {
        Weather::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        weather_type: WeatherType,
        temperature: i32,
        wind_speed: u32,
        precipitation: u32,
        description: &str,
    ) -> Result<Weather, String> {
        let raw = WeatherRaw {
            weather_type,
            temperature,
            wind_speed,
            precipitation,
            description: String::from(description),
        };
        Weather::try_from(raw)
    }

    pub fn weather_type(&self) -> WeatherType {
        self.weather_type
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn wind_speed(&self) -> u32 {
        self.wind_speed
    }

    pub fn precipitation(&self) -> u32 {
        self.precipitation
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {}F, wind {} mph ({})",
            self.weather_type, self.temperature, self.wind_speed, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indoor_weather_is_forced_clear() {
        let w = Weather::indoor();
        assert_eq!(w.weather_type(), WeatherType::Clear);
        assert_eq!(w.precipitation(), 0);
    }

    #[test]
    fn test_rejects_absurd_temperature() {
        let result = Weather::from_properties(WeatherType::Clear, 500, 0, 0, "too hot");
        assert!(result.is_err());
    }
}
