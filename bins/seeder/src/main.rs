//! Database seeder for Cashora development and testing.
//!
//! Seeds an approved admin, an approved demo customer with a balance, and a
//! few completed transactions for the demo customer.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;

use cashora_core::account::{Account, AccountStatus, NewAccount, Profile, Role};
use cashora_core::auth::hash_password;
use cashora_core::transaction::rules::{fee_for, signed_amount};
use cashora_core::transaction::{Counterparty, NewTransaction, TransactionKind, TransactionStatus};
use cashora_core::{AccountStore, TransactionStore};
use cashora_db::{AccountRepository, TransactionRepository};

const ADMIN_EMAIL: &str = "admin@cashora.dev";
const DEMO_EMAIL: &str = "demo@cashora.dev";
const DEV_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = cashora_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;
    let accounts = AccountRepository::new(db.clone());
    let transactions = TransactionRepository::new(db);

    println!("Seeding admin account...");
    seed_account(&accounts, ADMIN_EMAIL, Role::Admin, Decimal::ZERO, "Cashora", "Admin").await?;

    println!("Seeding demo account...");
    let demo = seed_account(
        &accounts,
        DEMO_EMAIL,
        Role::User,
        Decimal::new(1000, 0),
        "Demo",
        "Customer",
    )
    .await?;

    println!("Seeding demo transactions...");
    seed_transactions(&transactions, &demo).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Inserts an approved account, or returns the existing one.
async fn seed_account(
    accounts: &AccountRepository,
    email: &str,
    role: Role,
    balance: Decimal,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Account> {
    if let Some(existing) = accounts.find_by_email(email).await? {
        println!("  {email} already exists, skipping...");
        return Ok(existing);
    }

    let password_hash = hash_password(DEV_PASSWORD)?;
    let profile = Profile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        ..Profile::default()
    };
    let mut account = NewAccount::signup(email, password_hash, profile);
    account.role = role;
    account.status = AccountStatus::Approved;
    account.balance = balance;

    let created = accounts.insert(account).await?;
    println!("  Created {email} ({role})");
    Ok(created)
}

async fn seed_transactions(
    transactions: &TransactionRepository,
    owner: &Account,
) -> anyhow::Result<()> {
    if !transactions.list_by_account(owner.id).await?.is_empty() {
        println!("  Demo transactions already exist, skipping...");
        return Ok(());
    }

    let samples = [
        (TransactionKind::Deposit, Decimal::new(500, 0), Counterparty::default()),
        (
            TransactionKind::Withdraw,
            Decimal::new(200, 0),
            Counterparty {
                bank_name: Some("First Demo Bank".to_string()),
                account_number: Some("0012345678".to_string()),
                account_holder_name: Some("Demo Customer".to_string()),
                ..Counterparty::default()
            },
        ),
        (
            TransactionKind::Send,
            Decimal::new(100, 0),
            Counterparty {
                recipient: Some("jane.doe@example.com".to_string()),
                ..Counterparty::default()
            },
        ),
    ];

    for (kind, amount, counterparty) in samples {
        let created = transactions
            .insert(NewTransaction {
                account_id: owner.id,
                kind,
                amount: signed_amount(kind, amount),
                fee: fee_for(kind, amount),
                counterparty,
            })
            .await?;
        transactions
            .update_status(created.id, TransactionStatus::Completed)
            .await?;
        println!("  Created {} of {amount}", kind.noun());
    }

    Ok(())
}
