//! Table reservation request.

use serde::{Deserialize, Serialize};

/// Validation failures for a [`Reservation`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// A required field was left blank.
    #[error("{0} es obligatorio")]
    MissingField(&'static str),
    /// The email has no `local@domain` shape.
    #[error("email inválido: {0}")]
    InvalidEmail(String),
    /// Party size must be at least one guest.
    #[error("la reserva debe ser para al menos 1 persona")]
    NoGuests,
}

/// Reservation form data.
///
/// `date` and `time` are kept as entered; the shop confirms them by message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
}

impl Reservation {
    /// Check the fields a shop needs to confirm the booking.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ReservationError`].
    pub fn validate(&self) -> Result<(), ReservationError> {
        for (field, value) in [
            ("nombre", &self.name),
            ("fecha", &self.date),
            ("hora", &self.time),
        ] {
            if value.trim().is_empty() {
                return Err(ReservationError::MissingField(field));
            }
        }

        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(ReservationError::InvalidEmail(self.email.clone())),
        }

        if self.guests == 0 {
            return Err(ReservationError::NoGuests);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation() -> Reservation {
        Reservation {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            date: "2026-10-20".to_string(),
            time: "18:30".to_string(),
            guests: 4,
        }
    }

    #[test]
    fn test_valid_reservation() {
        assert_eq!(reservation().validate(), Ok(()));
    }

    #[test]
    fn test_blank_name() {
        let mut r = reservation();
        r.name = "  ".to_string();
        assert_eq!(r.validate(), Err(ReservationError::MissingField("nombre")));
    }

    #[test]
    fn test_invalid_email() {
        let mut r = reservation();
        r.email = "ana@".to_string();
        assert!(matches!(r.validate(), Err(ReservationError::InvalidEmail(_))));
    }

    #[test]
    fn test_zero_guests() {
        let mut r = reservation();
        r.guests = 0;
        assert_eq!(r.validate(), Err(ReservationError::NoGuests));
    }
}
