use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub population: i32,
    pub country_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirplaneType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airplane {
    pub id: Uuid,
    pub name: String,
    pub airplane_type_id: Uuid,
    pub rows: i32,
    pub seats_in_row: i32,
    pub image: Option<String>,
}

impl Airplane {
    pub fn capacity(&self) -> i32 {
        self.rows * self.seats_in_row
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub id: Uuid,
    pub name: String,
    pub closest_city_id: Uuid,
}

/// Directional source -> destination pair. (A, B) and (B, A) are distinct
/// routes. Nothing stops source == destination today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub distance: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crew {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl Crew {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub route_id: Uuid,
    pub airplane_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub flight_id: Uuid,
    pub order_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_rows_times_seats() {
        let plane = Airplane {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            airplane_type_id: Uuid::new_v4(),
            rows: 10,
            seats_in_row: 10,
            image: None,
        };
        assert_eq!(plane.capacity(), 100);
    }

    #[test]
    fn crew_full_name_joins_first_and_last() {
        let crew = Crew {
            id: Uuid::new_v4(),
            first_name: "Amelia".to_string(),
            last_name: "Earhart".to_string(),
        };
        assert_eq!(crew.full_name(), "Amelia Earhart");
    }
}
