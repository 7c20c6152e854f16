//! # Staff Commands

use anyhow::Result;
use billing_api::ApiError;
use billing_core::search::filter_employees;

use crate::cli::password_or_stdin;
use crate::context::Console;
use crate::render;

pub async fn list(console: Console, search: Option<&str>) -> Result<()> {
    let users = console.client.list_employees().await?;
    let shown = filter_employees(&users, search.unwrap_or_default());

    if shown.is_empty() {
        println!("No employees found");
    } else {
        println!("{}", render::employees_table(&shown));
    }
    Ok(())
}

pub async fn add(console: Console, name: &str, email: &str, password: Option<String>) -> Result<()> {
    let password = password_or_stdin(password)?;
    console.client.register_employee(name, email, &password).await?;
    println!("Employee added");
    Ok(())
}

/// The backend needs the account's email and role, so the account is looked
/// up first.
pub async fn remove(console: Console, id: &str) -> Result<()> {
    let id = id.trim();
    let users = console.client.list_employees().await?;
    let user = users
        .iter()
        .find(|user| user.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("Employee {id} not found")))?;

    console.client.delete_employee(user).await?;
    println!("Employee deleted");
    Ok(())
}
