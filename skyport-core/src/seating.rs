use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Seating geometry of the airplane operating a flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeatGeometry {
    pub rows: i32,
    pub seats_in_row: i32,
}

impl SeatGeometry {
    pub fn capacity(&self) -> i32 {
        self.rows * self.seats_in_row
    }
}

/// Decide whether a candidate (row, seat) fits the airplane's geometry.
///
/// Admissible iff `1 <= row <= rows` and `1 <= seat <= seats_in_row`. Runs on
/// every ticket write, before persistence. The rejection message names the
/// valid range so the caller can correct the request. No side effects.
pub fn validate_seat(row: i32, seat: i32, geometry: &SeatGeometry) -> Result<(), DomainError> {
    if row < 1 || row > geometry.rows {
        return Err(DomainError::Validation(format!(
            "row {} is out of range: must be between 1 and {}",
            row, geometry.rows
        )));
    }
    if seat < 1 || seat > geometry.seats_in_row {
        return Err(DomainError::Validation(format!(
            "seat {} is out of range: must be between 1 and {}",
            seat, geometry.seats_in_row
        )));
    }
    Ok(())
}

/// Read-time availability projection: capacity minus booked tickets.
/// Recomputed on every query, never stored.
pub fn seats_remaining(geometry: &SeatGeometry, booked: i64) -> i64 {
    geometry.capacity() as i64 - booked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> SeatGeometry {
        SeatGeometry { rows: 10, seats_in_row: 6 }
    }

    #[test]
    fn accepts_every_corner_of_the_cabin() {
        let g = geometry();
        for (row, seat) in [(1, 1), (1, 6), (10, 1), (10, 6), (5, 3)] {
            assert!(validate_seat(row, seat, &g).is_ok(), "({row},{seat}) should fit");
        }
    }

    #[test]
    fn rejects_rows_outside_bounds() {
        let g = geometry();
        for row in [0, -1, 11, 100] {
            let err = validate_seat(row, 1, &g).unwrap_err();
            match err {
                DomainError::Validation(msg) => {
                    assert!(msg.contains("row"), "message should name the field: {msg}");
                    assert!(msg.contains("between 1 and 10"), "message should name the range: {msg}");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_seats_outside_bounds() {
        let g = geometry();
        for seat in [0, -3, 7, 42] {
            let err = validate_seat(1, seat, &g).unwrap_err();
            match err {
                DomainError::Validation(msg) => {
                    assert!(msg.contains("seat"), "message should name the field: {msg}");
                    assert!(msg.contains("between 1 and 6"), "message should name the range: {msg}");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn row_bound_is_checked_before_seat_bound() {
        // Both out of range: the row error wins, matching the order of checks.
        let err = validate_seat(0, 0, &geometry()).unwrap_err();
        assert!(err.to_string().contains("row"));
    }

    #[test]
    fn remaining_seats_tracks_booked_count() {
        let g = SeatGeometry { rows: 10, seats_in_row: 10 };
        assert_eq!(seats_remaining(&g, 0), 100);
        assert_eq!(seats_remaining(&g, 3), 97);
        assert_eq!(seats_remaining(&g, 100), 0);
    }
}
