use crate::database::JsonStore;
use crate::models::{Customer, UpdateCustomerRequest};
use crate::utils::AppError;

/// All customers with password hashes stripped.
pub async fn list_customers(db: &JsonStore) -> Vec<Customer> {
    db.customers()
        .await
        .iter()
        .map(Customer::sanitized)
        .collect()
}

/// Apply a profile edit. Only present fields change; passwords can never
/// change through this path.
pub async fn update_customer(
    db: &JsonStore,
    request: &UpdateCustomerRequest,
) -> Result<(), AppError> {
    db.update_customers(|customers| {
        let customer = customers
            .iter_mut()
            .find(|c| c.id == request.id)
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

        if let Some(name) = &request.name {
            customer.name = name.clone();
        }
        if let Some(email) = &request.email {
            customer.email = email.clone();
        }
        if let Some(location) = &request.location {
            customer.location = location.clone();
        }
        Ok(())
    })
    .await
}
