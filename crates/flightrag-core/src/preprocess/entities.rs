//! Entity extraction from free-text questions
//!
//! Every sub-extractor is independent and returns `None` on no match; the
//! extractor as a whole never fails.

use chrono::{Duration, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result limit used when a superlative is present without an explicit count
pub const DEFAULT_SUPERLATIVE_LIMIT: u32 = 10;

/// Largest result limit accepted from a question
const MAX_LIMIT: u32 = 1000;

const PASSENGER_CLASSES: &[(&str, &[&str])] = &[
    ("economy", &["economy", "eco"]),
    ("business", &["business", "biz"]),
    ("first", &["first class", "first-class", "first"]),
];

const GENERATIONS: &[&str] = &["gen z", "millennial", "boomer"];

const FLEET_TYPES: &[&str] = &[
    "A320", "A321", "A330", "A350", "A380", "B737", "B747", "B757", "B767", "B777", "B787",
];

/// Three-letter uppercase words that are never airport codes
const AIRPORT_STOPLIST: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "ANY", "CAN", "HAS", "HAD", "HOW",
    "WHO", "WHY", "OUT", "OFF", "TOP", "GEN", "AVG", "MAX", "MIN", "SUM", "USA", "UAE", "FAQ",
    "ONE", "TWO", "WAY", "NON", "PER", "VIA", "YES", "NEW", "OLD", "LOW", "HIGH", "BIZ", "ECO",
];

/// Sort direction requested by a superlative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_cypher(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Journey attribute a superlative ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortAttribute {
    #[serde(rename = "delay")]
    Delay,
    #[serde(rename = "miles")]
    Distance,
    #[serde(rename = "food_score")]
    FoodScore,
    #[serde(rename = "legs")]
    Legs,
}

impl SortAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortAttribute::Delay => "delay",
            SortAttribute::Distance => "miles",
            SortAttribute::FoodScore => "food_score",
            SortAttribute::Legs => "legs",
        }
    }

    /// Journey property holding this attribute
    pub fn journey_property(&self) -> &'static str {
        match self {
            SortAttribute::Delay => "arrival_delay_minutes",
            SortAttribute::Distance => "actual_flown_miles",
            SortAttribute::FoodScore => "food_satisfaction_score",
            SortAttribute::Legs => "number_of_legs",
        }
    }
}

impl fmt::Display for SortAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields pulled out of a question; absence means "no filter"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    pub flight_no: Option<String>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub route: Option<String>,
    pub passenger_class: Option<String>,
    pub generation: Option<String>,
    pub fleet_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub sort_order: Option<SortOrder>,
    pub sort_attribute: Option<SortAttribute>,
    pub limit: Option<u32>,
    pub number_of_legs: Option<u32>,
}

impl EntitySet {
    /// Human-readable list of the filters that will constrain retrieval
    pub fn active_filters(&self) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(ref dep) = self.departure_airport {
            filters.push(format!("Departure airport: {}", dep));
        }
        if let Some(ref arr) = self.arrival_airport {
            filters.push(format!("Arrival airport: {}", arr));
        }
        if let Some(ref class) = self.passenger_class {
            filters.push(format!("Passenger class: {}", class));
        }
        if let Some(ref generation) = self.generation {
            filters.push(format!("Generation: {}", generation));
        }
        if let Some(ref flight) = self.flight_no {
            filters.push(format!("Flight number: {}", flight));
        }
        if let Some(ref fleet) = self.fleet_type {
            filters.push(format!("Fleet type: {}", fleet));
        }
        if let Some(legs) = self.number_of_legs {
            filters.push(format!("Number of legs: {}", legs));
        }
        filters
    }
}

lazy_static! {
    // MS985, LH777, BA250
    static ref FLIGHT_RE: Regex = Regex::new(r"\b([A-Z]{2}\d{2,4})\b").unwrap();
    // CAI-DXB
    static ref ROUTE_RE: Regex = Regex::new(r"\b([A-Z]{3})-([A-Z]{3})\b").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[A-Za-z0-9]+").unwrap();
    static ref CODE_RE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
    static ref ISO_DATE_RE: Regex = Regex::new(r"\b(20\d{2})-(\d{2})-(\d{2})\b").unwrap();
    static ref LIMIT_RE: Regex =
        Regex::new(r"\b(?:top|first|last|the)\s+(\d{1,4})\b").unwrap();
    static ref LEGS_RE: Regex = Regex::new(r"\b(\d{1,2})\s*-?\s*legs?\b").unwrap();
    static ref FIRST_COUNT_RE: Regex = Regex::new(r"\bfirst\s+\d").unwrap();
}

/// Superlative phrases mapped to the ranking they request, most specific first
const SUPERLATIVES: &[(&str, SortOrder, SortAttribute)] = &[
    ("most delayed", SortOrder::Desc, SortAttribute::Delay),
    ("longest delay", SortOrder::Desc, SortAttribute::Delay),
    ("worst delay", SortOrder::Desc, SortAttribute::Delay),
    ("maximum delay", SortOrder::Desc, SortAttribute::Delay),
    ("biggest delay", SortOrder::Desc, SortAttribute::Delay),
    ("latest arrival", SortOrder::Desc, SortAttribute::Delay),
    ("least delayed", SortOrder::Asc, SortAttribute::Delay),
    ("shortest delay", SortOrder::Asc, SortAttribute::Delay),
    ("minimum delay", SortOrder::Asc, SortAttribute::Delay),
    ("most punctual", SortOrder::Asc, SortAttribute::Delay),
    ("best food", SortOrder::Desc, SortAttribute::FoodScore),
    ("best meal", SortOrder::Desc, SortAttribute::FoodScore),
    ("highest food", SortOrder::Desc, SortAttribute::FoodScore),
    ("highest rated", SortOrder::Desc, SortAttribute::FoodScore),
    ("worst food", SortOrder::Asc, SortAttribute::FoodScore),
    ("worst meal", SortOrder::Asc, SortAttribute::FoodScore),
    ("poorest food", SortOrder::Asc, SortAttribute::FoodScore),
    ("lowest food", SortOrder::Asc, SortAttribute::FoodScore),
    ("lowest rated", SortOrder::Asc, SortAttribute::FoodScore),
    ("most legs", SortOrder::Desc, SortAttribute::Legs),
    ("most stops", SortOrder::Desc, SortAttribute::Legs),
    ("most connections", SortOrder::Desc, SortAttribute::Legs),
    ("fewest legs", SortOrder::Asc, SortAttribute::Legs),
    ("fewest stops", SortOrder::Asc, SortAttribute::Legs),
    ("fewest connections", SortOrder::Asc, SortAttribute::Legs),
    ("shortest", SortOrder::Asc, SortAttribute::Distance),
    ("closest", SortOrder::Asc, SortAttribute::Distance),
    ("nearest", SortOrder::Asc, SortAttribute::Distance),
    ("longest", SortOrder::Desc, SortAttribute::Distance),
    ("farthest", SortOrder::Desc, SortAttribute::Distance),
    ("furthest", SortOrder::Desc, SortAttribute::Distance),
];

/// Verbs that make a following "at"/"in" name the arrival airport
const ARRIVAL_VERBS: &[&str] = &[
    "arrive", "arrives", "arrived", "arriving", "land", "lands", "landed", "landing",
];

const DIRECT_KEYWORDS: &[&str] = &["non-stop", "nonstop", "direct", "single leg", "single-leg"];

const LEG_WORDS: &[(&str, u32)] = &[
    ("one leg", 1),
    ("two legs", 2),
    ("three legs", 3),
    ("four legs", 4),
    ("five legs", 5),
];

/// Extract entities relative to today's local date
pub fn extract_entities(text: &str) -> EntitySet {
    extract_entities_on(text, Local::now().date_naive())
}

/// Extract entities with an explicit reference date for relative terms
pub fn extract_entities_on(text: &str, today: NaiveDate) -> EntitySet {
    extract_entities_with(text, today, DEFAULT_SUPERLATIVE_LIMIT)
}

/// Extract entities, using `superlative_limit` when a superlative has no count
pub fn extract_entities_with(text: &str, today: NaiveDate, superlative_limit: u32) -> EntitySet {
    let (departure_airport, arrival_airport) = extract_airports(text);
    let route = match (&departure_airport, &arrival_airport) {
        (Some(dep), Some(arr)) => Some(format!("{}-{}", dep, arr)),
        _ => None,
    };
    let sort = extract_sort(text);
    let limit = extract_limit(text).or_else(|| sort.map(|_| superlative_limit));

    EntitySet {
        flight_no: extract_flight_number(text),
        departure_airport,
        arrival_airport,
        route,
        passenger_class: extract_passenger_class(text),
        generation: extract_generation(text),
        fleet_type: extract_fleet_type(text),
        date: extract_date(text, today),
        sort_order: sort.map(|(order, _)| order),
        sort_attribute: sort.map(|(_, attribute)| attribute),
        limit,
        number_of_legs: extract_number_of_legs(text),
    }
}

pub fn extract_flight_number(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    FLIGHT_RE
        .captures(&upper)
        .map(|caps| caps[1].to_string())
}

/// Departure and arrival codes: explicit uppercase `XXX-YYY` route first, then
/// standalone uppercase codes assigned by a preceding "from"/"to" or
/// "arrive at"/"land in".
pub fn extract_airports(text: &str) -> (Option<String>, Option<String>) {
    for caps in ROUTE_RE.captures_iter(text) {
        let (dep, arr) = (&caps[1], &caps[2]);
        if !is_stopword(dep) && !is_stopword(arr) {
            return (Some(dep.to_string()), Some(arr.to_string()));
        }
    }

    let words: Vec<&str> = WORD_RE.find_iter(text).map(|m| m.as_str()).collect();

    let mut departure = None;
    let mut arrival = None;
    let mut unassigned: Vec<String> = Vec::new();

    for (idx, word) in words.iter().enumerate() {
        if !CODE_RE.is_match(word) || is_stopword(word) {
            continue;
        }
        let code = word.to_string();
        if departure.as_ref() == Some(&code)
            || arrival.as_ref() == Some(&code)
            || unassigned.contains(&code)
        {
            continue;
        }

        let preceding = |back: usize| {
            idx.checked_sub(back)
                .map(|i| words[i].to_lowercase())
                .unwrap_or_default()
        };
        let previous = preceding(1);
        let arrival_cue = matches!(previous.as_str(), "at" | "in")
            && ARRIVAL_VERBS.contains(&preceding(2).as_str());

        match previous.as_str() {
            "from" if departure.is_none() => departure = Some(code),
            "to" | "into" if arrival.is_none() => arrival = Some(code),
            _ if arrival_cue && arrival.is_none() => arrival = Some(code),
            _ => unassigned.push(code),
        }
    }

    let mut rest = unassigned.into_iter();
    if departure.is_none() {
        departure = rest.next();
    }
    if arrival.is_none() && departure.is_some() {
        arrival = rest.next();
    }

    (departure, arrival)
}

fn is_stopword(code: &str) -> bool {
    AIRPORT_STOPLIST.contains(&code)
}

/// Normalized passenger class, matched on word boundaries
pub fn extract_passenger_class(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();

    for (normalized, keywords) in PASSENGER_CLASSES {
        for keyword in *keywords {
            let hit = if keyword.contains(' ') {
                lower.contains(keyword)
            } else if *keyword == "first" {
                // "first 5 flights" is a limit, not a cabin
                words.contains(keyword) && !FIRST_COUNT_RE.is_match(&lower)
            } else {
                words.contains(keyword)
            };
            if hit {
                return Some(normalized.to_string());
            }
        }
    }
    None
}

pub fn extract_generation(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    GENERATIONS
        .iter()
        .find(|generation| lower.contains(*generation))
        .map(|generation| generation.to_string())
}

pub fn extract_fleet_type(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    FLEET_TYPES
        .iter()
        .find(|fleet| upper.contains(*fleet))
        .map(|fleet| fleet.to_string())
}

pub fn extract_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();

    if lower.contains("today") {
        return Some(today);
    }
    if lower.contains("tomorrow") {
        return Some(today + Duration::days(1));
    }
    if lower.contains("next week") {
        return Some(today + Duration::days(7));
    }

    ISO_DATE_RE
        .find(text)
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

/// Ranking requested by a superlative phrase
pub fn extract_sort(text: &str) -> Option<(SortOrder, SortAttribute)> {
    let lower = text.to_lowercase();
    SUPERLATIVES
        .iter()
        .find(|(phrase, _, _)| lower.contains(phrase))
        .map(|(_, order, attribute)| (*order, *attribute))
}

/// Explicit result count from "top N", "first N", "the N ..."
pub fn extract_limit(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    LIMIT_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| (1..=MAX_LIMIT).contains(n))
}

pub fn extract_number_of_legs(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    if DIRECT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Some(1);
    }
    if let Some(legs) = LEGS_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
    {
        return Some(legs);
    }
    LEG_WORDS
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, legs)| *legs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_route_question() {
        let entities =
            extract_entities_on("Show me flights from CAI to DXB tomorrow in economy", today());
        assert_eq!(entities.departure_airport.as_deref(), Some("CAI"));
        assert_eq!(entities.arrival_airport.as_deref(), Some("DXB"));
        assert_eq!(entities.route.as_deref(), Some("CAI-DXB"));
        assert_eq!(entities.passenger_class.as_deref(), Some("economy"));
        assert_eq!(entities.date, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(entities.flight_no, None);
    }

    #[test]
    fn test_top_n_shortest() {
        let entities = extract_entities_on("top 5 shortest journeys", today());
        assert_eq!(entities.sort_order, Some(SortOrder::Asc));
        assert_eq!(entities.sort_attribute, Some(SortAttribute::Distance));
        assert_eq!(entities.limit, Some(5));
        assert_eq!(entities.passenger_class, None);
        assert_eq!(entities.departure_airport, None);
    }

    #[test]
    fn test_superlative_default_limit() {
        let entities = extract_entities_on("Which flights are the most delayed?", today());
        assert_eq!(entities.sort_order, Some(SortOrder::Desc));
        assert_eq!(entities.sort_attribute, Some(SortAttribute::Delay));
        assert_eq!(entities.limit, Some(DEFAULT_SUPERLATIVE_LIMIT));
    }

    #[test]
    fn test_configured_superlative_limit() {
        let entities = extract_entities_with("the longest flights", today(), 3);
        assert_eq!(entities.limit, Some(3));
        let entities = extract_entities_with("the longest 4 flights, top 2", today(), 3);
        assert_eq!(entities.limit, Some(2));
    }

    #[test]
    fn test_no_superlative_no_limit() {
        let entities = extract_entities_on("flights from JFK", today());
        assert_eq!(entities.limit, None);
        assert_eq!(entities.sort_order, None);
    }

    #[test]
    fn test_hyphenated_route_takes_priority() {
        let (dep, arr) = extract_airports("Which fleet type has the worst delays on the CAI-DXB route to LHR?");
        assert_eq!(dep.as_deref(), Some("CAI"));
        assert_eq!(arr.as_deref(), Some("DXB"));
    }

    #[test]
    fn test_lowercase_hyphenated_words_are_not_routes() {
        let entities = extract_entities_on("Any mid-air incidents on long flights?", today());
        assert_eq!(entities.route, None);
        assert_eq!(entities.departure_airport, None);
        assert_eq!(entities.arrival_airport, None);

        let (dep, arr) = extract_airports("delays on the cai-dxb route to LHR");
        assert_eq!(dep, None);
        assert_eq!(arr.as_deref(), Some("LHR"));
    }

    #[test]
    fn test_arrive_at_is_arrival() {
        let (dep, arr) = extract_airports("Which flights arrive at DXB?");
        assert_eq!(dep, None);
        assert_eq!(arr.as_deref(), Some("DXB"));

        let (dep, arr) = extract_airports("Flights from CAI that landed in LHR late");
        assert_eq!(dep.as_deref(), Some("CAI"));
        assert_eq!(arr.as_deref(), Some("LHR"));

        let (dep, arr) = extract_airports("Meet me at ORD");
        assert_eq!(dep.as_deref(), Some("ORD"));
        assert_eq!(arr, None);
    }

    #[test]
    fn test_stoplisted_route_is_ignored() {
        let (dep, arr) = extract_airports("one-way trips from LHR");
        assert_eq!(dep.as_deref(), Some("LHR"));
        assert_eq!(arr, None);
    }

    #[test]
    fn test_direction_keywords_assign_roles() {
        let (dep, arr) = extract_airports("Flights to JFK from CAI");
        assert_eq!(dep.as_deref(), Some("CAI"));
        assert_eq!(arr.as_deref(), Some("JFK"));

        let (dep, arr) = extract_airports("Compare CAI and FRA");
        assert_eq!(dep.as_deref(), Some("CAI"));
        assert_eq!(arr.as_deref(), Some("FRA"));
    }

    #[test]
    fn test_stoplist_filters_words() {
        let (dep, arr) = extract_airports("Show THE TOP flights for ALL passengers");
        assert_eq!(dep, None);
        assert_eq!(arr, None);
    }

    #[test]
    fn test_lone_code_is_departure() {
        let (dep, arr) = extract_airports("Show me information about airport ORD");
        assert_eq!(dep.as_deref(), Some("ORD"));
        assert_eq!(arr, None);
    }

    #[test]
    fn test_flight_number() {
        assert_eq!(
            extract_flight_number("Complaints from business class passengers on ms985.").as_deref(),
            Some("MS985")
        );
        assert_eq!(extract_flight_number("no flight here"), None);
    }

    #[test]
    fn test_passenger_class_word_boundaries() {
        assert_eq!(extract_passenger_class("Business class delays").as_deref(), Some("business"));
        assert_eq!(extract_passenger_class("first class meals").as_deref(), Some("first"));
        assert_eq!(extract_passenger_class("recommend a route"), None);
        assert_eq!(extract_passenger_class("the first 5 flights"), None);
        assert_eq!(extract_passenger_class("eco seats").as_deref(), Some("economy"));
    }

    #[test]
    fn test_generation_and_fleet() {
        let entities = extract_entities_on("Delays for Gen Z passengers on the B787", today());
        assert_eq!(entities.generation.as_deref(), Some("gen z"));
        assert_eq!(entities.fleet_type.as_deref(), Some("B787"));
    }

    #[test]
    fn test_dates() {
        assert_eq!(extract_date("flights today", today()), Some(today()));
        assert_eq!(
            extract_date("next week please", today()),
            NaiveDate::from_ymd_opt(2025, 3, 21)
        );
        assert_eq!(
            extract_date("on 2024-12-01", today()),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(extract_date("on 2024-13-45", today()), None);
    }

    #[test]
    fn test_number_of_legs() {
        assert_eq!(extract_number_of_legs("non-stop flights to DXB"), Some(1));
        assert_eq!(extract_number_of_legs("direct routes"), Some(1));
        assert_eq!(extract_number_of_legs("journeys with 3 legs"), Some(3));
        assert_eq!(extract_number_of_legs("two legs"), Some(2));
        assert_eq!(extract_number_of_legs("any flights"), None);
    }

    #[test]
    fn test_limit_patterns() {
        assert_eq!(extract_limit("first 3 flights"), Some(3));
        assert_eq!(extract_limit("show the 7 worst"), Some(7));
        assert_eq!(extract_limit("top 0"), None);
        assert_eq!(extract_limit("in 2024"), None);
    }

    #[test]
    fn test_active_filters() {
        let entities = extract_entities_on("economy flights from CAI to DXB", today());
        let filters = entities.active_filters();
        assert!(filters.contains(&"Departure airport: CAI".to_string()));
        assert!(filters.contains(&"Arrival airport: DXB".to_string()));
        assert!(filters.contains(&"Passenger class: economy".to_string()));
        assert!(EntitySet::default().active_filters().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let entities = extract_entities_on("top 5 shortest journeys tomorrow", today());
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["sort_order"], "ASC");
        assert_eq!(json["sort_attribute"], "miles");
        assert_eq!(json["date"], "2025-03-15");
        assert!(json["departure_airport"].is_null());
    }

    proptest! {
        #[test]
        fn prop_extraction_never_panics(text in "\\PC{0,160}") {
            let entities = extract_entities_on(&text, today());
            if let Some(code) = entities.departure_airport {
                prop_assert_eq!(code.len(), 3);
            }
            if let Some(limit) = entities.limit {
                prop_assert!(limit >= 1 && limit <= MAX_LIMIT);
            }
        }
    }
}
