//! Calendar DTOs

use chrono::NaiveDate;
use courtside_core::models::Court;
use courtside_services::CalendarData;
use serde::{Deserialize, Serialize};

use super::booking::BookingResponse;

/// Query parameters for a calendar window
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Court response DTO
#[derive(Debug, Serialize)]
pub struct CourtResponse {
    pub id: i32,
    pub venue_id: i32,
    pub name: String,
    pub status: String,
    pub sort_order: i32,
}

impl From<Court> for CourtResponse {
    fn from(court: Court) -> Self {
        Self {
            id: court.id,
            venue_id: court.venue_id,
            name: court.name,
            status: court.status.to_string(),
            sort_order: court.sort_order,
        }
    }
}

/// Calendar response DTO
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub courts: Vec<CourtResponse>,
    pub bookings: Vec<BookingResponse>,
}

impl From<CalendarData> for CalendarResponse {
    fn from(data: CalendarData) -> Self {
        Self {
            courts: data.courts.into_iter().map(Into::into).collect(),
            bookings: data.bookings.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courtside_core::models::CourtStatus;

    #[test]
    fn test_court_response_conversion() {
        let now = Utc::now();
        let court = Court {
            id: 7,
            venue_id: 1,
            name: "Court X".to_string(),
            status: CourtStatus::Active,
            sort_order: 3,
            created_at: now,
            updated_at: now,
        };

        let response = CourtResponse::from(court);
        assert_eq!(response.status, "active");
        assert_eq!(response.sort_order, 3);
    }
}
