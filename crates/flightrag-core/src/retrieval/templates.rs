//! Cypher templates per intent
//!
//! Every listing template matches the same passenger/journey/flight/airport
//! path, applies the optional entity filters, and returns the same thirteen
//! columns; only extra conditions and ordering differ by intent.

use crate::preprocess::{Intent, SortAttribute, SortOrder};

const JOURNEY_PATH: &str = "MATCH (p:Passenger)-[:TOOK]->(j:Journey)-[:ON]->(f:Flight)
MATCH (f)-[:DEPARTS_FROM]->(dep:Airport)
MATCH (f)-[:ARRIVES_AT]->(arr:Airport)";

const ROUTE_FILTERS: &[&str] = &[
    "($from_airport IS NULL OR dep.station_code = $from_airport)",
    "($to_airport IS NULL OR arr.station_code = $to_airport)",
];

const STATION_FILTER: &str = "($station_code IS NULL OR dep.station_code = $station_code OR arr.station_code = $station_code)";

const ENTITY_FILTERS: &[&str] = &[
    "($passenger_class IS NULL OR toLower(j.passenger_class) = $passenger_class)",
    "($generation IS NULL OR toLower(p.generation) CONTAINS $generation)",
    "($number_of_legs IS NULL OR j.number_of_legs = $number_of_legs)",
    "($flight_number IS NULL OR toUpper(toString(f.flight_number)) = $flight_number)",
    "($fleet_type IS NULL OR toUpper(f.fleet_type_description) CONTAINS $fleet_type)",
];

const NO_CONDITIONS: &[&str] = &[];
const POSITIVE_DELAY: &[&str] = &["j.arrival_delay_minutes > 0"];
/// Yields to an extracted leg count ("non-stop" matches the multi-leg keywords)
const MULTIPLE_LEGS: &[&str] = &["($number_of_legs IS NOT NULL OR j.number_of_legs > 1)"];

/// Column list shared by listing templates and the similarity query
pub const JOURNEY_COLUMNS: &str = "RETURN j.feedback_ID AS feedback_ID,
       j.passenger_class AS passenger_class,
       j.food_satisfaction_score AS food_satisfaction_score,
       j.arrival_delay_minutes AS arrival_delay_minutes,
       j.actual_flown_miles AS actual_flown_miles,
       j.number_of_legs AS number_of_legs,
       f.flight_number AS flight_number,
       f.fleet_type_description AS fleet_type,
       dep.station_code AS departure_airport,
       arr.station_code AS arrival_airport,
       p.generation AS generation,
       p.loyalty_program_level AS loyalty_level,
       p.record_locator AS record_locator";

const STATISTIC_COLUMNS: &str = "RETURN count(j) AS total_journeys,
       avg(j.arrival_delay_minutes) AS avg_delay,
       avg(j.food_satisfaction_score) AS avg_food_score,
       avg(j.actual_flown_miles) AS avg_distance,
       min(j.arrival_delay_minutes) AS min_delay,
       max(j.arrival_delay_minutes) AS max_delay";

/// Which airport parameters a template filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirportFilter {
    /// `$from_airport` / `$to_airport`
    Route,
    /// `$station_code` at either end
    Station,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordering {
    /// Fixed by the intent
    Fixed(&'static str),
    /// Taken from the extracted sort entity, unordered without one
    FromEntities,
    /// Aggregate rows are not ordered
    None,
}

/// Shape of one intent's query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub intent: Intent,
    pub airports: AirportFilter,
    conditions: &'static [&'static str],
    ordering: Ordering,
}

impl Template {
    /// Template for an intent; exhaustive over every label
    pub fn for_intent(intent: Intent) -> Self {
        let (airports, conditions, ordering) = match intent {
            Intent::FindFlights => (AirportFilter::Route, NO_CONDITIONS, Ordering::FromEntities),
            Intent::DelayAnalysis => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed("j.arrival_delay_minutes DESC"),
            ),
            Intent::AirportInfo => (AirportFilter::Station, NO_CONDITIONS, Ordering::FromEntities),
            Intent::PassengerExperience => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed("j.food_satisfaction_score ASC"),
            ),
            Intent::RouteRecommendation => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed(
                    "j.arrival_delay_minutes ASC, j.actual_flown_miles ASC, j.food_satisfaction_score DESC",
                ),
            ),
            Intent::GeneralQuery => (AirportFilter::Route, NO_CONDITIONS, Ordering::FromEntities),
            Intent::MostDelayedFlights => (
                AirportFilter::Route,
                POSITIVE_DELAY,
                Ordering::Fixed("j.arrival_delay_minutes DESC"),
            ),
            Intent::ShortestJourneys => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed("j.actual_flown_miles ASC"),
            ),
            Intent::LongestJourneys => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed("j.actual_flown_miles DESC"),
            ),
            Intent::MultiLegFlights => (
                AirportFilter::Route,
                MULTIPLE_LEGS,
                Ordering::Fixed("j.number_of_legs DESC"),
            ),
            Intent::LoyaltyAnalysis => (
                AirportFilter::Route,
                NO_CONDITIONS,
                Ordering::Fixed("p.loyalty_program_level DESC"),
            ),
            Intent::CalculateStatistic => (AirportFilter::Route, NO_CONDITIONS, Ordering::None),
        };

        Self {
            intent,
            airports,
            conditions,
            ordering,
        }
    }

    /// Whether the template returns one aggregate row
    pub fn is_aggregate(&self) -> bool {
        self.intent.is_statistic()
    }

    /// Render Cypher text, applying an extracted sort where the intent allows it
    pub fn render(&self, sort: Option<(SortOrder, SortAttribute)>) -> String {
        let mut predicates: Vec<&str> = self.conditions.to_vec();
        match self.airports {
            AirportFilter::Route => predicates.extend_from_slice(ROUTE_FILTERS),
            AirportFilter::Station => predicates.push(STATION_FILTER),
        }
        predicates.extend_from_slice(ENTITY_FILTERS);

        let mut cypher = format!(
            "{}\nWHERE {}\n",
            JOURNEY_PATH,
            predicates.join("\n  AND ")
        );

        if self.is_aggregate() {
            cypher.push_str(STATISTIC_COLUMNS);
            return cypher;
        }

        cypher.push_str(JOURNEY_COLUMNS);

        let order_by = match self.ordering {
            Ordering::Fixed(clause) => Some(clause.to_string()),
            Ordering::FromEntities => sort.map(|(order, attribute)| {
                format!("j.{} {}", attribute.journey_property(), order.as_cypher())
            }),
            Ordering::None => None,
        };
        if let Some(clause) = order_by {
            cypher.push_str("\nORDER BY ");
            cypher.push_str(&clause);
        }
        cypher.push_str("\nLIMIT $limit");
        cypher
    }
}
