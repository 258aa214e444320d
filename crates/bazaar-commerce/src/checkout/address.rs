//! Address types.

use serde::{Deserialize, Serialize};

/// A postal address, denormalized onto orders at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Company name.
    pub company: Option<String>,
    /// Address line 1.
    pub address1: String,
    /// Address line 2 (apt, suite, etc.).
    pub address2: Option<String>,
    /// City.
    pub city: String,
    /// Province.
    pub province: Option<String>,
    /// Country code (e.g., "ZA").
    pub country_code: String,
    /// Postal code.
    pub postal_code: String,
    /// Phone number.
    pub phone: Option<String>,
}

impl Address {
    /// Create a new address.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            company: None,
            address1: address1.into(),
            address2: None,
            city: city.into(),
            province: None,
            country_code: country_code.into(),
            postal_code: postal_code.into(),
            phone: None,
        }
    }

    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check if the required fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.address1.is_empty()
            && !self.city.is_empty()
            && !self.country_code.is_empty()
            && !self.postal_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_creation() {
        let addr = Address::new("Thandi", "Mokoena", "12 Long St", "Cape Town", "ZA", "8001");
        assert_eq!(addr.full_name(), "Thandi Mokoena");
        assert!(addr.is_complete());
    }

    #[test]
    fn test_incomplete_address() {
        let addr = Address::default();
        assert!(!addr.is_complete());
    }
}
