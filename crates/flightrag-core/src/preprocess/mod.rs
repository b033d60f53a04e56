//! Question preprocessing: intent classification and entity extraction

mod entities;
mod intent;

pub use entities::{
    extract_airports, extract_date, extract_entities, extract_entities_on, extract_entities_with,
    extract_fleet_type, extract_flight_number, extract_generation, extract_limit,
    extract_number_of_legs, extract_passenger_class, extract_sort, EntitySet, SortAttribute,
    SortOrder, DEFAULT_SUPERLATIVE_LIMIT,
};
pub use intent::{classify_intent, Intent};
