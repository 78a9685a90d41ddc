use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Weather {
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl Weather {
    pub fn start_message(&self) -> &'static str {
        match self {
            Weather::Sun => "The sunlight turned harsh!",
            Weather::Rain => "It started to rain!",
            Weather::Sandstorm => "A sandstorm kicked up!",
            Weather::Hail => "It started to hail!",
        }
    }

    pub fn end_message(&self) -> &'static str {
        match self {
            Weather::Sun => "The harsh sunlight faded.",
            Weather::Rain => "The rain stopped.",
            Weather::Sandstorm => "The sandstorm subsided.",
            Weather::Hail => "The hail stopped.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Terrain {
    Electric,
    Grassy,
    Psychic,
    Misty,
}
