//! Employee management (admin only).

use billing_core::validation::validate_new_employee;
use billing_core::User;
use reqwest::Method;
use tracing::info;

use crate::client::BillingClient;
use crate::error::ApiResult;
use crate::responses::{Acknowledgement, DeleteUserRequest, RegisterRequest, UsersResponse};

impl BillingClient {
    /// Staff accounts, as the backend lists them.
    pub async fn list_employees(&self) -> ApiResult<Vec<User>> {
        self.require_admin("manage employees")?;
        let request = self.authed(Method::GET, &["users"])?;
        let response: UsersResponse = self.send_json(request).await?;
        Ok(response.users)
    }

    /// Creates a staff account.
    pub async fn register_employee(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<Acknowledgement> {
        self.require_admin("manage employees")?;
        validate_new_employee(name, email, password)?;

        let request = self.authed(Method::POST, &["auth", "register"])?.json(&RegisterRequest {
            name: name.trim(),
            email: email.trim(),
            password,
        });
        let ack = self.send_ack(request, "Failed to add employee").await?;

        info!(email = %email.trim(), "Employee added");
        Ok(ack)
    }

    /// Removes a staff account. The backend wants the email and role alongside the id.
    pub async fn delete_employee(&self, user: &User) -> ApiResult<Acknowledgement> {
        self.require_admin("manage employees")?;

        let request = self
            .authed(Method::DELETE, &["users", &user.id])?
            .json(&DeleteUserRequest {
                email: &user.email,
                role: user.role,
            });
        let ack = self.send_ack(request, "Failed to delete employee").await?;

        info!(user_id = %user.id, email = %user.email, "Employee deleted");
        Ok(ack)
    }
}
