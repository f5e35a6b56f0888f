//! Business details captured at step 2 of the wizard.

use serde::{Deserialize, Serialize};

use hure_core::{DomainError, DomainResult, EmailAddress, PhoneNumber};

/// What a clinic tells us about itself before a tenant row exists.
///
/// Email and phone are validated value objects; the names are checked here.
/// Town, country, licence, and module picks are carried as entered — the
/// superadmin reviews them during activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDetails {
    pub business_name: String,
    pub town: String,
    pub country: String,
    pub contact_name: String,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub business_license: Option<String>,
    pub modules: Vec<String>,
}

impl BusinessDetails {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        business_name: impl Into<String>,
        town: impl Into<String>,
        country: impl Into<String>,
        contact_name: impl Into<String>,
        email: EmailAddress,
        phone: PhoneNumber,
        business_license: Option<String>,
        modules: Vec<String>,
    ) -> DomainResult<Self> {
        let business_name = non_empty(business_name.into(), "business name")?;
        let contact_name = non_empty(contact_name.into(), "contact name")?;

        Ok(Self {
            business_name,
            town: town.into(),
            country: country.into(),
            contact_name,
            email,
            phone,
            business_license,
            modules,
        })
    }
}

fn non_empty(value: String, field: &str) -> DomainResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailAddress {
        EmailAddress::new("owner@clinic.example.com").unwrap()
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::new("+254700000000").unwrap()
    }

    #[test]
    fn accepts_complete_details() {
        let details = BusinessDetails::new(
            "Sunrise Clinic",
            "Nakuru",
            "Kenya",
            "A. Wanjiru",
            email(),
            phone(),
            Some("LIC-2024-118".into()),
            vec!["core".into(), "care".into()],
        )
        .unwrap();
        assert_eq!(details.business_name, "Sunrise Clinic");
    }

    #[test]
    fn rejects_blank_names() {
        assert!(
            BusinessDetails::new("  ", "Nakuru", "Kenya", "A. Wanjiru", email(), phone(), None, vec![])
                .is_err()
        );
        assert!(
            BusinessDetails::new("Sunrise", "Nakuru", "Kenya", "", email(), phone(), None, vec![])
                .is_err()
        );
    }

    #[test]
    fn trims_names() {
        let details = BusinessDetails::new(
            " Sunrise Clinic ",
            "Nakuru",
            "Kenya",
            " A. Wanjiru ",
            email(),
            phone(),
            None,
            vec![],
        )
        .unwrap();
        assert_eq!(details.business_name, "Sunrise Clinic");
        assert_eq!(details.contact_name, "A. Wanjiru");
    }
}
