// Creates a dashboard login.
// Usage: cargo run --bin create_user -- <name> <email> <password>

use std::{env, sync::Arc};

use anyhow::{Result, bail};
use invoice_dashboard::{
    config::config_loader,
    domain::{
        entities::users::InsertUserEntity, repositories::users::UserRepository,
        value_objects::sessions::Credentials,
    },
    infrastructure::{
        auth::passwords::hash_password,
        postgres::{postgres_connection, repositories::users::UserPostgres},
    },
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: cargo run --bin create_user -- <name> <email> <password>");
        std::process::exit(1);
    }

    let credentials = Credentials {
        email: args[2].trim().to_string(),
        password: args[3].clone(),
        redirect_to: None,
    };
    if !credentials.is_well_formed() {
        bail!("email must look like an address and password must be at least 6 characters");
    }

    let config = config_loader::load()?;
    let pool = postgres_connection::establish_connection(&config.database.url)?;
    let users = UserPostgres::new(Arc::new(pool));

    if users.find_by_email(&credentials.email).await?.is_some() {
        bail!("a user with email {} already exists", credentials.email);
    }

    let user_id = users
        .create_user(InsertUserEntity {
            id: Uuid::new_v4(),
            name: args[1].clone(),
            email: credentials.email.clone(),
            password: hash_password(&credentials.password)?,
        })
        .await?;

    println!("Created user {} ({})", credentials.email, user_id);
    Ok(())
}
