//! Initial schema.
//!
//! - `users`: login identity, argon2 password hash
//! - `accounts`: where money lives, with a manually maintained balance
//! - `groups`: labels that cluster categories
//! - `categories`: budget lines, optionally inside a group
//! - `transactions`: dated amounts against an account and a category
//!
//! Money columns hold integer cents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    HashedPassword,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    AccountName,
    AccountType,
    BalanceMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    UserId,
    GroupName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    CategoryName,
    BudgetMinor,
    GroupId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    AmountMinor,
    TxDescription,
    TxDate,
    Posted,
    AccountId,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

fn timestamps<T: Iden + 'static>(table: &mut TableCreateStatement, created: T, updated: T) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null(),
        );
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users
        let mut users = Table::create()
            .table(Users::Table)
            .if_not_exists()
            .col(ColumnDef::new(Users::Id).blob().not_null().primary_key())
            .col(
                ColumnDef::new(Users::Username)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::HashedPassword).string().not_null())
            .to_owned();
        timestamps(&mut users, Users::CreatedAt, Users::UpdatedAt);
        manager.create_table(users).await?;

        // Accounts
        let mut accounts = Table::create()
            .table(Accounts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Accounts::Id).blob().not_null().primary_key())
            .col(ColumnDef::new(Accounts::UserId).blob().not_null())
            .col(ColumnDef::new(Accounts::AccountName).string().not_null())
            .col(ColumnDef::new(Accounts::AccountType).string().not_null())
            .col(
                ColumnDef::new(Accounts::BalanceMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-accounts-user_id")
                    .from(Accounts::Table, Accounts::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut accounts, Accounts::CreatedAt, Accounts::UpdatedAt);
        manager.create_table(accounts).await?;

        // Groups
        let mut groups = Table::create()
            .table(Groups::Table)
            .if_not_exists()
            .col(ColumnDef::new(Groups::Id).blob().not_null().primary_key())
            .col(ColumnDef::new(Groups::UserId).blob().not_null())
            .col(ColumnDef::new(Groups::GroupName).string().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-groups-user_id")
                    .from(Groups::Table, Groups::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(&mut groups, Groups::CreatedAt, Groups::UpdatedAt);
        manager.create_table(groups).await?;

        // Categories
        let mut categories = Table::create()
            .table(Categories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .blob()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Categories::UserId).blob().not_null())
            .col(ColumnDef::new(Categories::CategoryName).string().not_null())
            .col(
                ColumnDef::new(Categories::BudgetMinor)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(ColumnDef::new(Categories::GroupId).blob())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-categories-user_id")
                    .from(Categories::Table, Categories::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-categories-group_id")
                    .from(Categories::Table, Categories::GroupId)
                    .to(Groups::Table, Groups::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            )
            .to_owned();
        timestamps(&mut categories, Categories::CreatedAt, Categories::UpdatedAt);
        manager.create_table(categories).await?;

        // Transactions
        let mut transactions = Table::create()
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::Id)
                    .blob()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Transactions::AmountMinor)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::TxDescription)
                    .string()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::TxDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Transactions::Posted)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Transactions::AccountId).blob().not_null())
            .col(ColumnDef::new(Transactions::CategoryId).blob())
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-account_id")
                    .from(Transactions::Table, Transactions::AccountId)
                    .to(Accounts::Table, Accounts::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-transactions-category_id")
                    .from(Transactions::Table, Transactions::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        timestamps(
            &mut transactions,
            Transactions::CreatedAt,
            Transactions::UpdatedAt,
        );
        manager.create_table(transactions).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-account_id")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-category_tx_date")
                    .table(Transactions::Table)
                    .col(Transactions::CategoryId)
                    .col(Transactions::TxDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
