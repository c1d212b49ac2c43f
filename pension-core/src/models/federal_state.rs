use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// German federal state (Bundesland), used to look up the church-tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FederalState {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl FederalState {
    pub fn all() -> &'static [FederalState] {
        &[
            Self::BadenWuerttemberg,
            Self::Bayern,
            Self::Berlin,
            Self::Brandenburg,
            Self::Bremen,
            Self::Hamburg,
            Self::Hessen,
            Self::MecklenburgVorpommern,
            Self::Niedersachsen,
            Self::NordrheinWestfalen,
            Self::RheinlandPfalz,
            Self::Saarland,
            Self::Sachsen,
            Self::SachsenAnhalt,
            Self::SchleswigHolstein,
            Self::Thueringen,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadenWuerttemberg => "Baden-Württemberg",
            Self::Bayern => "Bayern",
            Self::Berlin => "Berlin",
            Self::Brandenburg => "Brandenburg",
            Self::Bremen => "Bremen",
            Self::Hamburg => "Hamburg",
            Self::Hessen => "Hessen",
            Self::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Self::Niedersachsen => "Niedersachsen",
            Self::NordrheinWestfalen => "Nordrhein-Westfalen",
            Self::RheinlandPfalz => "Rheinland-Pfalz",
            Self::Saarland => "Saarland",
            Self::Sachsen => "Sachsen",
            Self::SachsenAnhalt => "Sachsen-Anhalt",
            Self::SchleswigHolstein => "Schleswig-Holstein",
            Self::Thueringen => "Thüringen",
        }
    }

    /// Parses the German state name. Case-insensitive; accepts the
    /// transliterated spellings ("Baden-Wuerttemberg", "Thueringen").
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = normalize(s);
        Self::all()
            .iter()
            .copied()
            .find(|state| normalize(state.as_str()) == wanted)
    }

    /// Church tax as a fraction of income tax: 8 % in Baden-Württemberg and
    /// Bayern, 9 % everywhere else.
    pub fn church_tax_rate(&self) -> Decimal {
        match self {
            Self::BadenWuerttemberg | Self::Bayern => Decimal::new(8, 2),
            _ => Decimal::new(9, 2),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace('ü', "ue")
        .replace(' ', "-")
}
