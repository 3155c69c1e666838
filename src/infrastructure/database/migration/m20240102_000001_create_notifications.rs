//! Notification inbox table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Notifications::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Notifications::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Notifications::Title).string().not_null())
					.col(ColumnDef::new(Notifications::Message).text().not_null())
					.col(
						ColumnDef::new(Notifications::Kind)
							.string()
							.not_null()
							.default("broadcast"),
					)
					.col(
						ColumnDef::new(Notifications::IsRead)
							.boolean()
							.not_null()
							.default(false),
					)
					.col(
						ColumnDef::new(Notifications::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_notifications_created_at")
					.table(Notifications::Table)
					.col(Notifications::CreatedAt)
					.to_owned(),
			)
			.await?;

		// Unread lookups and mark-all-read
		manager
			.create_index(
				Index::create()
					.name("idx_notifications_is_read")
					.table(Notifications::Table)
					.col(Notifications::IsRead)
					.to_owned(),
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.drop_table(Table::drop().table(Notifications::Table).to_owned())
			.await
	}
}

#[derive(DeriveIden)]
enum Notifications {
	Table,
	Id,
	Title,
	Message,
	Kind,
	IsRead,
	CreatedAt,
}
