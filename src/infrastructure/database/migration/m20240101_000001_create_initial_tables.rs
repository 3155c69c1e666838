//! Initial schema: users, cloud accounts, policies and their evaluations

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		manager
			.create_table(
				Table::create()
					.table(Users::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Users::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Users::Email).string().not_null().unique_key())
					.col(ColumnDef::new(Users::FullName).string().not_null())
					.col(ColumnDef::new(Users::PasswordHash).string().not_null())
					.col(
						ColumnDef::new(Users::IsActive)
							.boolean()
							.not_null()
							.default(true),
					)
					.col(
						ColumnDef::new(Users::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(CloudAccounts::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(CloudAccounts::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(CloudAccounts::Provider).string().not_null())
					.col(ColumnDef::new(CloudAccounts::ExternalId).string().not_null())
					.col(ColumnDef::new(CloudAccounts::DisplayName).string().not_null())
					.col(
						ColumnDef::new(CloudAccounts::Status)
							.string()
							.not_null()
							.default("pending"),
					)
					.col(ColumnDef::new(CloudAccounts::AccessMethod).string())
					.col(ColumnDef::new(CloudAccounts::Credential).text())
					.col(ColumnDef::new(CloudAccounts::ServiceEmail).string())
					.col(ColumnDef::new(CloudAccounts::TenantId).string())
					.col(
						ColumnDef::new(CloudAccounts::SyncFrequency)
							.string()
							.not_null()
							.default("daily"),
					)
					.col(
						ColumnDef::new(CloudAccounts::AutoSync)
							.boolean()
							.not_null()
							.default(true),
					)
					.col(ColumnDef::new(CloudAccounts::LastSyncedAt).timestamp_with_time_zone())
					.col(ColumnDef::new(CloudAccounts::OwnerId).integer())
					.col(
						ColumnDef::new(CloudAccounts::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(CloudAccounts::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(CloudAccounts::Table, CloudAccounts::OwnerId)
							.to(Users::Table, Users::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(Policies::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Policies::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Policies::Provider).string().not_null())
					.col(ColumnDef::new(Policies::Name).string().not_null())
					.col(ColumnDef::new(Policies::ControlId).string().not_null())
					.col(ColumnDef::new(Policies::Category).string().not_null())
					.col(
						ColumnDef::new(Policies::Severity)
							.string()
							.not_null()
							.default("medium"),
					)
					.col(ColumnDef::new(Policies::Description).text())
					.col(ColumnDef::new(Policies::PolicyType).string())
					.col(ColumnDef::new(Policies::ScopeLevel).string())
					.col(ColumnDef::new(Policies::ScopeName).string())
					.col(ColumnDef::new(Policies::ScopeId).string())
					.col(
						ColumnDef::new(Policies::ComplianceStatus)
							.string()
							.not_null()
							.default("unknown"),
					)
					.col(
						ColumnDef::new(Policies::AffectedResources)
							.integer()
							.not_null()
							.default(0),
					)
					.col(ColumnDef::new(Policies::LastReviewed).date())
					.col(ColumnDef::new(Policies::PolicyContent).text())
					.col(ColumnDef::new(Policies::Tags).string())
					.col(
						ColumnDef::new(Policies::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(Policies::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		manager
			.create_table(
				Table::create()
					.table(PolicyEvaluations::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(PolicyEvaluations::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(PolicyEvaluations::PolicyId).integer().not_null())
					.col(ColumnDef::new(PolicyEvaluations::AccountId).integer().not_null())
					.col(
						ColumnDef::new(PolicyEvaluations::Status)
							.string()
							.not_null()
							.default("unknown"),
					)
					.col(ColumnDef::new(PolicyEvaluations::Findings).text())
					.col(ColumnDef::new(PolicyEvaluations::ResourceId).string())
					.col(
						ColumnDef::new(PolicyEvaluations::LastCheckedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(PolicyEvaluations::Table, PolicyEvaluations::PolicyId)
							.to(Policies::Table, Policies::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.foreign_key(
						ForeignKey::create()
							.from(PolicyEvaluations::Table, PolicyEvaluations::AccountId)
							.to(CloudAccounts::Table, CloudAccounts::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Natural keys
		manager
			.create_index(
				Index::create()
					.name("idx_cloud_accounts_provider_external_id")
					.table(CloudAccounts::Table)
					.col(CloudAccounts::Provider)
					.col(CloudAccounts::ExternalId)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_policies_provider_control_id")
					.table(Policies::Table)
					.col(Policies::Provider)
					.col(Policies::ControlId)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_policy_evaluations_policy_account")
					.table(PolicyEvaluations::Table)
					.col(PolicyEvaluations::PolicyId)
					.col(PolicyEvaluations::AccountId)
					.unique()
					.to_owned(),
			)
			.await?;

		// Lookup indexes
		manager
			.create_index(
				Index::create()
					.name("idx_cloud_accounts_owner_id")
					.table(CloudAccounts::Table)
					.col(CloudAccounts::OwnerId)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_policy_evaluations_account_id")
					.table(PolicyEvaluations::Table)
					.col(PolicyEvaluations::AccountId)
					.to_owned(),
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		// Drop tables in reverse order of creation
		manager
			.drop_table(Table::drop().table(PolicyEvaluations::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Policies::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(CloudAccounts::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Users::Table).to_owned())
			.await?;
		Ok(())
	}
}

#[derive(DeriveIden)]
enum Users {
	Table,
	Id,
	Email,
	FullName,
	PasswordHash,
	IsActive,
	CreatedAt,
}

#[derive(DeriveIden)]
enum CloudAccounts {
	Table,
	Id,
	Provider,
	ExternalId,
	DisplayName,
	Status,
	AccessMethod,
	Credential,
	ServiceEmail,
	TenantId,
	SyncFrequency,
	AutoSync,
	LastSyncedAt,
	OwnerId,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum Policies {
	Table,
	Id,
	Provider,
	Name,
	ControlId,
	Category,
	Severity,
	Description,
	PolicyType,
	ScopeLevel,
	ScopeName,
	ScopeId,
	ComplianceStatus,
	AffectedResources,
	LastReviewed,
	PolicyContent,
	Tags,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum PolicyEvaluations {
	Table,
	Id,
	PolicyId,
	AccountId,
	Status,
	Findings,
	ResourceId,
	LastCheckedAt,
}
