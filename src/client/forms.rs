use std::fmt;

use crate::models::{RegisterCustomerRequest, RegisterShopRequest, StoreCategory};

#[derive(Debug, PartialEq, Eq)]
pub enum FormError {
    PasswordMismatch,
    MissingField(&'static str),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::PasswordMismatch => write!(f, "Passwords do not match"),
            FormError::MissingField(field) => write!(f, "{} is required", field),
        }
    }
}

impl std::error::Error for FormError {}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Customer signup input. Validation happens entirely locally; a mismatched
/// confirmation never reaches the network.
#[derive(Debug, Default)]
pub struct CustomerSignupForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub password: String,
    pub confirm_password: String,
}

impl CustomerSignupForm {
    pub fn validate(&self) -> Result<RegisterCustomerRequest, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterCustomerRequest {
            name: required(&self.name, "Name")?,
            phone: required(&self.phone, "Phone")?,
            email: required(&self.email, "Email")?,
            location: required(&self.location, "Location")?,
            password: required(&self.password, "Password")?,
        })
    }
}

#[derive(Debug)]
pub struct ShopSignupForm {
    pub shop_name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,
    pub category: StoreCategory,
    pub password: String,
    pub confirm_password: String,
}

impl ShopSignupForm {
    pub fn validate(&self) -> Result<RegisterShopRequest, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterShopRequest {
            shop_name: required(&self.shop_name, "Shop name")?,
            owner_name: required(&self.owner_name, "Owner name")?,
            phone: required(&self.phone, "Phone")?,
            email: required(&self.email, "Email")?,
            address: required(&self.address, "Address")?,
            pincode: required(&self.pincode, "Pincode")?,
            category: self.category,
            password: required(&self.password, "Password")?,
            products: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CustomerSignupForm {
        CustomerSignupForm {
            name: "John Doe".into(),
            phone: "+91 111".into(),
            email: "john@example.com".into(),
            location: "Sector 15".into(),
            password: "customer123".into(),
            confirm_password: "customer123".into(),
        }
    }

    #[test]
    fn mismatched_passwords_fail_locally() {
        let mut bad = form();
        bad.confirm_password = "different".into();
        assert_eq!(bad.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut bad = form();
        bad.phone = "   ".into();
        assert_eq!(
            bad.validate().unwrap_err(),
            FormError::MissingField("Phone")
        );
    }

    #[test]
    fn valid_form_trims_whitespace() {
        let mut good = form();
        good.name = "  John Doe  ".into();
        let request = good.validate().unwrap();
        assert_eq!(request.name, "John Doe");
    }
}
