//! Integration tests for the PostgreSQL repositories
//!
//! These tests need a migrated database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use office_api::auth::password::hash_password;
use office_api::domain::asset::{Asset, AssetCategory, NewAsset};
use office_api::domain::employee::{Employee, NewEmployee};
use office_api::domain::ledger::{Income, IncomeCategory, NewIncome};
use office_api::domain::period::DateRange;
use office_api::domain::repositories::{
    AssetFilter, AssetRepository, EmployeeFilter, EmployeeRepository, IncomeFilter,
    IncomeRepository, StoreError, UserRepository,
};
use office_api::domain::user::{Email, Role, User};
use office_api::infrastructure::repositories::{
    PostgresAssetRepository, PostgresEmployeeRepository, PostgresIncomeRepository,
    PostgresUserRepository,
};

/// Set up test database connection pool
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate test database");
    pool
}

fn unique_email(prefix: &str) -> Email {
    Email::new(format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())).expect("valid email")
}

fn test_employee(department: &str) -> Employee {
    let input = NewEmployee {
        name: "Test Employee".to_string(),
        position: "Tester".to_string(),
        department: department.to_string(),
        email: unique_email("employee"),
        phone: Some("555-0100".to_string()),
        salary: 5100.5,
        join_date: None,
        is_active: None,
    };
    Employee::new(input, Utc::now()).expect("valid employee")
}

#[tokio::test]
#[ignore]
async fn test_user_repository_create_and_find_by_email() {
    let pool = setup_test_db().await;
    let user_repo = PostgresUserRepository::new(pool.clone());

    let email = unique_email("user");
    let password_hash = hash_password("testpassword", 4).expect("hash password");
    let user = User::new("Test User", email.clone(), password_hash, Role::Manager, Utc::now())
        .expect("valid user");

    user_repo.create(&user).await.expect("Failed to create user");

    let found = user_repo
        .find_by_email(&email)
        .await
        .expect("Failed to find user by email")
        .expect("User should be found");
    assert_eq!(found.id, user.id, "User IDs should match");
    assert_eq!(found.role, Role::Manager);
    assert_eq!(found.permissions, user.permissions, "Permissions survive JSONB");

    let at = Utc::now();
    user_repo
        .update_last_login(user.id, at)
        .await
        .expect("Failed to update last login");

    user_repo.delete(user.id).await.expect("Failed to delete user");
}

#[tokio::test]
#[ignore]
async fn test_user_repository_duplicate_email_fails() {
    let pool = setup_test_db().await;
    let user_repo = PostgresUserRepository::new(pool.clone());

    let email = unique_email("duplicate");
    let first = User::new("First", email.clone(), "hash".into(), Role::Employee, Utc::now()).unwrap();
    let second = User::new("Second", email, "hash".into(), Role::Employee, Utc::now()).unwrap();

    user_repo.create(&first).await.expect("Failed to create user");
    let result = user_repo.create(&second).await;
    assert!(
        matches!(result, Err(StoreError::Conflict(_))),
        "Duplicate email should be a conflict"
    );

    user_repo.delete(first.id).await.expect("Failed to delete user");
}

#[tokio::test]
#[ignore]
async fn test_employee_and_asset_filters() {
    let pool = setup_test_db().await;
    let employees = PostgresEmployeeRepository::new(pool.clone());
    let assets = PostgresAssetRepository::new(pool.clone());

    let department = format!("Dept-{}", Uuid::new_v4().simple());
    let employee = test_employee(&department);
    employees.create(&employee).await.expect("Failed to create employee");

    let filter = EmployeeFilter {
        department: Some(department.clone()),
        is_active: Some(true),
    };
    let found = employees.find(&filter).await.expect("Failed to list employees");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].salary, 5100.5);
    assert_eq!(employees.count(&filter).await.unwrap(), 1);

    let input = NewAsset {
        name: "Desk".to_string(),
        category: AssetCategory::Furniture,
        serial_number: None,
        purchase_date: Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap(),
        purchase_price: 320.0,
        condition: None,
        assigned_to: Some(employee.id),
        location: None,
        notes: None,
        is_active: None,
    };
    let asset = Asset::new(input, Utc::now()).expect("valid asset");
    assets.create(&asset).await.expect("Failed to create asset");

    let assigned = assets
        .find(&AssetFilter {
            assigned_to: Some(employee.id),
            ..AssetFilter::default()
        })
        .await
        .expect("Failed to list assets");
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, asset.id);
    assert_eq!(assigned[0].category, AssetCategory::Furniture);

    assets.delete(asset.id).await.expect("Failed to delete asset");
    employees.delete(employee.id).await.expect("Failed to delete employee");

    let missing = employees.delete(employee.id).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[ignore]
async fn test_income_range_and_client_filter() {
    let pool = setup_test_db().await;
    let income = PostgresIncomeRepository::new(pool.clone());

    let client = format!("Client {}", Uuid::new_v4().simple());
    let date = Utc.with_ymd_and_hms(2019, 7, 31, 0, 0, 0).unwrap();
    let input = NewIncome {
        title: "Consulting".to_string(),
        amount: 1250.0,
        category: IncomeCategory::Services,
        date: Some(date),
        client: Some(client.clone()),
        payment_method: None,
        receipt_number: None,
        notes: None,
        received_by: None,
        recurring: false,
        recurring_period: None,
        taxable: None,
    };
    let entry = Income::new(input, Utc::now()).expect("valid income");
    income.create(&entry).await.expect("Failed to create income");

    let filter = IncomeFilter {
        range: Some(
            DateRange::new(Utc.with_ymd_and_hms(2019, 7, 1, 0, 0, 0).unwrap(), date).unwrap(),
        ),
        category: Some(IncomeCategory::Services),
        client: Some(client.to_uppercase()),
    };
    let found = income.find(&filter).await.expect("Failed to list income");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, entry.id);
    assert_eq!(found[0].client.as_deref(), Some(client.as_str()));

    income.delete(entry.id).await.expect("Failed to delete income");
}
