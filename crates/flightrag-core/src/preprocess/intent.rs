//! Rule-based intent classification
//!
//! Rules are evaluated in order against the lower-cased question using
//! substring containment; the first rule whose keyword groups all hit wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified purpose of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    DelayAnalysis,
    FindFlights,
    AirportInfo,
    PassengerExperience,
    RouteRecommendation,
    MostDelayedFlights,
    ShortestJourneys,
    LongestJourneys,
    MultiLegFlights,
    LoyaltyAnalysis,
    CalculateStatistic,
    GeneralQuery,
}

impl Intent {
    pub const ALL: [Intent; 12] = [
        Intent::DelayAnalysis,
        Intent::FindFlights,
        Intent::AirportInfo,
        Intent::PassengerExperience,
        Intent::RouteRecommendation,
        Intent::MostDelayedFlights,
        Intent::ShortestJourneys,
        Intent::LongestJourneys,
        Intent::MultiLegFlights,
        Intent::LoyaltyAnalysis,
        Intent::CalculateStatistic,
        Intent::GeneralQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::DelayAnalysis => "delay_analysis",
            Intent::FindFlights => "find_flights",
            Intent::AirportInfo => "airport_info",
            Intent::PassengerExperience => "passenger_experience",
            Intent::RouteRecommendation => "route_recommendation",
            Intent::MostDelayedFlights => "most_delayed_flights",
            Intent::ShortestJourneys => "shortest_journeys",
            Intent::LongestJourneys => "longest_journeys",
            Intent::MultiLegFlights => "multi_leg_flights",
            Intent::LoyaltyAnalysis => "loyalty_analysis",
            Intent::CalculateStatistic => "calculate_statistic",
            Intent::GeneralQuery => "general_query",
        }
    }

    /// Whether structured retrieval returns one aggregate row instead of journeys
    pub fn is_statistic(&self) -> bool {
        matches!(self, Intent::CalculateStatistic)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = crate::error::FlightRagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| crate::error::FlightRagError::InvalidInput(format!("unknown intent: {}", s)))
    }
}

/// One classification rule: every group needs at least one substring hit
struct Rule {
    groups: &'static [&'static [&'static str]],
    intent: Intent,
}

const DISTANCE_NOUNS: &[&str] = &["journey", "flight", "route", "distance"];

/// Order is priority: aggregation keywords shadow delay keywords, and so on.
const RULES: &[Rule] = &[
    Rule {
        groups: &[&[
            "average",
            "mean",
            "count",
            "how many",
            "total",
            "percentage",
            "statistics",
            "stats",
        ]],
        intent: Intent::CalculateStatistic,
    },
    Rule {
        groups: &[
            &["longest", "worst", "most delayed", "maximum delay"],
            &["delay", "late"],
        ],
        intent: Intent::MostDelayedFlights,
    },
    Rule {
        groups: &[&["longest"], DISTANCE_NOUNS],
        intent: Intent::LongestJourneys,
    },
    Rule {
        groups: &[&["shortest", "fastest", "quickest", "nearest"], DISTANCE_NOUNS],
        intent: Intent::ShortestJourneys,
    },
    Rule {
        groups: &[&["multi-leg", "connection", "stop", "layover", "indirect"]],
        intent: Intent::MultiLegFlights,
    },
    Rule {
        groups: &[&["loyalty", "frequent flyer", "member", "tier"]],
        intent: Intent::LoyaltyAnalysis,
    },
    Rule {
        groups: &[&["delay", "late", "on time", "punctual", "arrival time"]],
        intent: Intent::DelayAnalysis,
    },
    Rule {
        groups: &[&["flight", "flights", "depart", "arrive"], &["from", "to"]],
        intent: Intent::FindFlights,
    },
    Rule {
        groups: &[&["airport", "terminal", "gate", "station"]],
        intent: Intent::AirportInfo,
    },
    Rule {
        groups: &[&[
            "rating",
            "satisfaction",
            "feedback",
            "experience",
            "service quality",
            "food",
            "meal",
        ]],
        intent: Intent::PassengerExperience,
    },
    Rule {
        groups: &[&["recommend", "best route", "optimal"]],
        intent: Intent::RouteRecommendation,
    },
    Rule {
        groups: &[&["flight", "flights", "journey", "journeys"]],
        intent: Intent::GeneralQuery,
    },
];

/// Classify a question into exactly one intent
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.groups
                .iter()
                .all(|group| group.iter().any(|keyword| lower.contains(keyword)))
        })
        .map(|rule| rule.intent)
        .unwrap_or(Intent::GeneralQuery)
}
