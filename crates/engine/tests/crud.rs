mod common;

use api_types::account::AccountType;
use chrono::{TimeZone, Utc};
use engine::{
    AccountPatch, CategoryPatch, EngineError, GroupPatch, Money, NewAccount, NewCategory,
    NewTransaction, TransactionPatch,
};

use common::{engine_with_db, user};

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let engine = engine_with_db().await;
    user(&engine, "alice").await;

    let err = engine.create_user(" alice ", "hash").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let found = engine.user_by_username("alice").await.unwrap();
    assert_eq!(found.hashed_password, "not-a-real-hash");
}

#[tokio::test]
async fn account_create_update_preserves_untouched_fields() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    let account = engine
        .create_account(
            NewAccount::new(alice.id, "  Main ", AccountType::Checking)
                .initial_balance(money("250.75")),
        )
        .await
        .unwrap();
    assert_eq!(account.name, "Main");
    assert_eq!(account.balance, money("250.75"));

    let updated = engine
        .update_account(
            alice.id,
            account.id,
            AccountPatch {
                account_type: Some(AccountType::Savings),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Main");
    assert_eq!(updated.account_type, AccountType::Savings);
    assert_eq!(updated.balance, money("250.75"));
    assert!(updated.updated_at >= account.updated_at);

    let err = engine
        .update_account(
            alice.id,
            account.id,
            AccountPatch {
                name: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn lists_are_sorted_by_name() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;

    for name in ["Savings", "Brokerage", "Checking"] {
        engine
            .create_account(NewAccount::new(alice.id, name, AccountType::Checking))
            .await
            .unwrap();
    }
    let names: Vec<_> = engine
        .accounts(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Brokerage", "Checking", "Savings"]);
}

#[tokio::test]
async fn category_group_reference_is_tri_state() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let household = engine.create_group(alice.id, "Household").await.unwrap();

    let groceries = engine
        .create_category(
            NewCategory::new(alice.id, "Groceries")
                .budget(money("400"))
                .group_id(household.id),
        )
        .await
        .unwrap();
    assert_eq!(groceries.group_name.as_deref(), Some("Household"));

    let renamed = engine
        .update_category(
            alice.id,
            groceries.id,
            CategoryPatch {
                name: Some("Food".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.group_id, Some(household.id));
    assert_eq!(renamed.budget, money("400"));

    let cleared = engine
        .update_category(
            alice.id,
            groceries.id,
            CategoryPatch {
                group_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.group_id, None);
    assert_eq!(cleared.group_name, None);
    assert_eq!(cleared.name, "Food");
}

#[tokio::test]
async fn deleting_group_ungroups_its_categories() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let group = engine.create_group(alice.id, "Fixed").await.unwrap();
    let rent = engine
        .create_category(NewCategory::new(alice.id, "Rent").group_id(group.id))
        .await
        .unwrap();

    engine.delete_group(alice.id, group.id).await.unwrap();

    assert!(engine.groups(alice.id).await.unwrap().is_empty());
    let rent = engine.category(alice.id, rent.id).await.unwrap();
    assert_eq!(rent.group_id, None);
}

#[tokio::test]
async fn deleting_account_or_category_removes_transactions() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let date = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();

    let main = engine
        .create_account(NewAccount::new(alice.id, "Main", AccountType::Checking))
        .await
        .unwrap();
    let card = engine
        .create_account(NewAccount::new(alice.id, "Card", AccountType::CreditCard))
        .await
        .unwrap();
    let dining = engine
        .create_category(NewCategory::new(alice.id, "Dining"))
        .await
        .unwrap();

    engine
        .create_transaction(NewTransaction::new(alice.id, main.id, money("12.00"), "lunch", date))
        .await
        .unwrap();
    engine
        .create_transaction(
            NewTransaction::new(alice.id, card.id, money("30.00"), "dinner", date)
                .category_id(dining.id),
        )
        .await
        .unwrap();
    assert_eq!(engine.transactions(alice.id).await.unwrap().len(), 2);

    engine.delete_category(alice.id, dining.id).await.unwrap();
    let left = engine.transactions(alice.id).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].description, "lunch");

    engine.delete_account(alice.id, main.id).await.unwrap();
    assert!(engine.transactions(alice.id).await.unwrap().is_empty());
    assert_eq!(
        engine.account(alice.id, main.id).await.unwrap_err(),
        EngineError::KeyNotFound("account".to_string())
    );
}

#[tokio::test]
async fn transactions_list_newest_first_with_names() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let main = engine
        .create_account(NewAccount::new(alice.id, "Main", AccountType::Checking))
        .await
        .unwrap();
    let food = engine
        .create_category(NewCategory::new(alice.id, "Food"))
        .await
        .unwrap();

    for (day, text) in [(1, "old"), (20, "new"), (10, "mid")] {
        engine
            .create_transaction(
                NewTransaction::new(
                    alice.id,
                    main.id,
                    money("5"),
                    text,
                    Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap(),
                )
                .category_id(food.id),
            )
            .await
            .unwrap();
    }

    let list = engine.transactions(alice.id).await.unwrap();
    let order: Vec<_> = list.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(order, ["new", "mid", "old"]);
    assert!(list.iter().all(|t| t.account_name == "Main"));
    assert!(list.iter().all(|t| t.category_name.as_deref() == Some("Food")));

    let by_account = engine.account_transactions(alice.id, main.id).await.unwrap();
    assert_eq!(by_account.len(), 3);
    let by_category = engine.category_transactions(alice.id, food.id).await.unwrap();
    assert_eq!(by_category.len(), 3);
}

#[tokio::test]
async fn transaction_validation_and_partial_update() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let date = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    let main = engine
        .create_account(NewAccount::new(alice.id, "Main", AccountType::Checking))
        .await
        .unwrap();
    let food = engine
        .create_category(NewCategory::new(alice.id, "Food"))
        .await
        .unwrap();

    let zero = engine
        .create_transaction(NewTransaction::new(alice.id, main.id, Money::ZERO, "x", date))
        .await
        .unwrap_err();
    assert!(matches!(zero, EngineError::InvalidAmount(_)));
    let blank = engine
        .create_transaction(NewTransaction::new(alice.id, main.id, money("1"), " ", date))
        .await
        .unwrap_err();
    assert!(matches!(blank, EngineError::InvalidInput(_)));

    let tx = engine
        .create_transaction(
            NewTransaction::new(alice.id, main.id, money("-9.99"), "coffee", date)
                .category_id(food.id),
        )
        .await
        .unwrap();
    assert!(!tx.posted);

    let updated = engine
        .update_transaction(
            alice.id,
            tx.id,
            TransactionPatch {
                posted: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.posted);
    assert_eq!(updated.amount, money("-9.99"));
    assert_eq!(updated.category_id, Some(food.id));

    let uncategorized = engine
        .update_transaction(
            alice.id,
            tx.id,
            TransactionPatch {
                category_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(uncategorized.category_id, None);
    assert_eq!(uncategorized.category_name, None);
    assert_eq!(uncategorized.description, "coffee");

    engine.delete_transaction(alice.id, tx.id).await.unwrap();
    assert!(engine.transactions(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn group_rename_keeps_id() {
    let engine = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let group = engine.create_group(alice.id, "Bills").await.unwrap();
    let renamed = engine
        .update_group(
            alice.id,
            group.id,
            GroupPatch {
                name: Some("Utilities".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.id, group.id);
    assert_eq!(renamed.name, "Utilities");
}
