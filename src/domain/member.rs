use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::LadderError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Editable member attributes. Rank and games played are owned by the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

impl MemberDetails {
    pub fn new(name: &str, surname: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            birthday: None,
        }
    }

    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Trims text fields and lower-cases the email
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            birthday: self.birthday,
        }
    }

    pub fn validate(&self) -> Result<(), LadderError> {
        self.validate_on(Utc::now().date_naive())
    }

    fn validate_on(&self, today: NaiveDate) -> Result<(), LadderError> {
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be blank"));
        }
        if self.surname.trim().is_empty() {
            return Err(invalid("surname cannot be blank"));
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(invalid(&format!("{:?} is not a valid email address", self.email)));
        }
        if let Some(birthday) = self.birthday {
            if birthday >= today {
                return Err(invalid("birthday must be in the past"));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> LadderError {
    LadderError::InvalidMember(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_valid_member() {
        let details = MemberDetails::new("Magnus", "Carlsen", "magnus@club.test")
            .with_birthday(NaiveDate::from_ymd_opt(1990, 11, 30).unwrap());
        assert!(details.validate_on(today()).is_ok());
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let blank_name = MemberDetails::new("  ", "Carlsen", "magnus@club.test");
        let blank_surname = MemberDetails::new("Magnus", "", "magnus@club.test");

        assert!(matches!(blank_name.validate_on(today()), Err(LadderError::InvalidMember(_))));
        assert!(matches!(blank_surname.validate_on(today()), Err(LadderError::InvalidMember(_))));
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        for email in ["", "magnus", "magnus@club", "mag nus@club.test", "a@b@c.test"] {
            let details = MemberDetails::new("Magnus", "Carlsen", email);
            assert!(details.validate_on(today()).is_err(), "{}", email);
        }
    }

    #[test]
    fn test_birthday_must_be_in_the_past() {
        let details =
            MemberDetails::new("Magnus", "Carlsen", "magnus@club.test").with_birthday(today());
        assert!(details.validate_on(today()).is_err());
    }

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let details = MemberDetails::new(" Judit ", "Polgar ", " Judit@Club.Test ").normalized();
        assert_eq!(details.name, "Judit");
        assert_eq!(details.surname, "Polgar");
        assert_eq!(details.email, "judit@club.test");
    }
}
