//! Operator command line

pub mod commands;
pub mod render;

use crate::config::{default_data_dir, AppConfig};
use crate::operations::accounts::{AccountFilter, CloudAccountPatch, NewCloudAccount};
use crate::operations::evaluations::{EvaluationFilter, EvaluationPatch, NewEvaluation};
use crate::operations::notifications::{NewNotification, NotificationListOptions};
use crate::operations::policies::{NewPolicy, PolicyListOptions, PolicyPatch};
use crate::operations::seed::SeedOutcome;
use crate::operations::users::NewUser;
use crate::Core;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use commands::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	Human,
	Json,
}

#[derive(Parser, Debug)]
#[command(name = "cloudguard", about = "Multi-cloud compliance posture", version)]
pub struct Cli {
	/// Path to the data directory
	#[arg(long, env = "CLOUDGUARD_DATA_DIR")]
	pub data_dir: Option<PathBuf>,

	/// Output format
	#[arg(long, value_enum, default_value = "human")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

impl Cli {
	pub fn data_dir(&self) -> Result<PathBuf> {
		match &self.data_dir {
			Some(dir) => Ok(dir.clone()),
			None => default_data_dir(),
		}
	}
}

struct Output {
	format: OutputFormat,
}

impl Output {
	/// Print `value` as JSON, or run `human` for the table form
	fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
		match self.format {
			OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
			OutputFormat::Human => human(),
		}
		Ok(())
	}

	fn done<T: Serialize>(&self, value: &T, message: String) -> Result<()> {
		self.emit(value, || println!("{} {}", "✓".green(), message))
	}
}

/// Run a parsed command against the core in `config.data_dir`
///
/// `config` is the effective configuration, env overrides included.
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
	let out = Output { format: cli.format };

	// `load_or_create` wrote the file; `config` may hold env overrides
	if let Commands::Init = cli.command {
		let core = Core::new(config).await?;
		let cfg = core.config();
		return out.emit(
			&serde_json::json!({
				"data_dir": cfg.data_dir,
				"database_url": cfg.database_url(),
				"seed_enabled": cfg.seed.enabled,
			}),
			|| {
				println!("{} {}", "✓".green(), cfg.app_name.bright_cyan());
				println!("   Data dir: {}", cfg.data_dir.display());
				println!("   Database: {}", cfg.database_url());
			},
		);
	}

	let core = Core::new(config).await?;

	match cli.command {
		Commands::Init => {}

		Commands::Seed => {
			let outcome = core.seed_demo_data().await?;
			out.emit(&outcome, || match outcome {
				SeedOutcome::AlreadySeeded => println!("Demo data already present"),
				SeedOutcome::Seeded {
					accounts,
					policies,
					evaluations,
					notifications,
					..
				} => println!(
					"{} Seeded {} accounts, {} policies, {} evaluations, {} notifications",
					"✓".green(),
					accounts,
					policies,
					evaluations,
					notifications
				),
			})?;
		}

		Commands::Dashboard => {
			let snapshot = core.dashboard().build_snapshot().await?;
			out.emit(&snapshot, || {
				let (summary, providers) = render::dashboard(&snapshot);
				println!("{summary}");
				if snapshot.providers.is_empty() {
					println!("No evaluations recorded yet");
				} else {
					println!("{providers}");
				}
			})?;
		}

		Commands::Accounts(cmd) => accounts(&core, &out, cmd).await?,
		Commands::Policies(cmd) => policies(&core, &out, cmd).await?,
		Commands::Evaluations(cmd) => evaluations(&core, &out, cmd).await?,
		Commands::Notifications(cmd) => notifications(&core, &out, cmd).await?,
		Commands::Users(cmd) => users(&core, &out, cmd).await?,
	}

	Ok(())
}

async fn accounts(core: &Core, out: &Output, cmd: AccountCommands) -> Result<()> {
	let service = core.accounts();
	match cmd {
		AccountCommands::List { provider, status } => {
			let rows = service.list(AccountFilter { provider, status }).await?;
			out.emit(&rows, || println!("{}", render::accounts(&rows)))?;
		}
		AccountCommands::Show { id } => {
			let account = service.get(id).await?;
			out.emit(&account, || println!("{}", render::account_detail(&account)))?;
		}
		AccountCommands::Add {
			provider,
			external_id,
			name,
			access_method,
			service_email,
			tenant_id,
			sync_frequency,
			no_auto_sync,
			owner,
		} => {
			let mut input = NewCloudAccount::new(provider, external_id, name);
			input.access_method = access_method;
			input.service_email = service_email;
			input.tenant_id = tenant_id;
			input.sync_frequency = sync_frequency;
			input.auto_sync = !no_auto_sync;
			input.owner_id = owner;

			let created = service.create(input).await?;
			out.emit(&created.account, || {
				println!(
					"{} Registered {} ({})",
					"✓".green(),
					created.account.display_name.bright_cyan(),
					created.account.id
				);
				for n in &created.notifications {
					println!("   {} {}", n.title.bold(), n.message.dimmed());
				}
			})?;
		}
		AccountCommands::Update {
			id,
			name,
			status,
			sync_frequency,
			auto_sync,
			access_method,
			clear_credential,
		} => {
			let patch = CloudAccountPatch {
				display_name: name,
				status,
				sync_frequency,
				auto_sync,
				access_method: access_method.map(Some),
				credential: clear_credential.then_some(None),
				..Default::default()
			};
			let updated = service.update(id, patch).await?;
			out.done(&updated, format!("Updated account {}", id))?;
		}
		AccountCommands::Delete { id } => {
			let deletion = service.delete(id).await?;
			out.done(
				&deletion,
				format!(
					"Deleted account {} and {} evaluations",
					id, deletion.evaluations_removed
				),
			)?;
		}
		AccountCommands::Sync { id } => {
			let account = service.request_sync(id).await?;
			out.done(
				&account,
				format!("{} is syncing now", account.display_name),
			)?;
		}
	}
	Ok(())
}

async fn policies(core: &Core, out: &Output, cmd: PolicyCommands) -> Result<()> {
	let service = core.policies();
	match cmd {
		PolicyCommands::List {
			provider,
			offset,
			limit,
		} => {
			let rows = service
				.list(PolicyListOptions {
					provider,
					offset,
					limit,
				})
				.await?;
			out.emit(&rows, || println!("{}", render::policies(&rows)))?;
		}
		PolicyCommands::Show { id, document } => {
			let policy = service.get(id).await?;
			out.emit(&policy, || {
				println!("{}", render::policy_detail(&policy));
				if document {
					if let Some(content) = &policy.policy_content {
						println!("{}", content);
					}
				}
			})?;
		}
		PolicyCommands::Add {
			provider,
			control_id,
			name,
			category,
			severity,
			description,
			tags,
			document,
		} => {
			let mut input =
				NewPolicy::new(provider, control_id, name, category).with_severity(severity);
			input.description = description;
			input.tags = tags;
			input.policy_content = match document {
				Some(path) => Some(std::fs::read_to_string(path)?),
				None => None,
			};

			let created = service.create(input).await?;
			out.done(
				&created,
				format!("Created policy {} ({})", created.control_id, created.id),
			)?;
		}
		PolicyCommands::Update {
			id,
			name,
			control_id,
			category,
			severity,
			compliance_status,
			affected_resources,
			description,
			tags,
		} => {
			let patch = PolicyPatch {
				name,
				control_id,
				category,
				severity,
				compliance_status,
				affected_resources,
				description: description.map(Some),
				tags: tags.map(Some),
				..Default::default()
			};
			let updated = service.update(id, patch).await?;
			out.done(&updated, format!("Updated policy {}", id))?;
		}
		PolicyCommands::Delete { id } => {
			let deletion = service.delete(id).await?;
			out.done(
				&deletion,
				format!(
					"Deleted policy {} and {} evaluations",
					id, deletion.evaluations_removed
				),
			)?;
		}
	}
	Ok(())
}

fn verdict(args: VerdictArgs) -> NewEvaluation {
	NewEvaluation {
		policy_id: args.policy,
		account_id: args.account,
		status: args.status,
		findings: args.findings,
		resource_id: args.resource,
	}
}

async fn evaluations(core: &Core, out: &Output, cmd: EvaluationCommands) -> Result<()> {
	let service = core.evaluations();
	match cmd {
		EvaluationCommands::List {
			policy,
			account,
			status,
			limit,
		} => {
			let rows = service
				.list(EvaluationFilter {
					policy_id: policy,
					account_id: account,
					status,
					limit,
					..Default::default()
				})
				.await?;
			out.emit(&rows, || println!("{}", render::evaluations(&rows)))?;
		}
		EvaluationCommands::Show {
			id,
			policy,
			account,
		} => {
			let evaluation = match (id, policy, account) {
				(Some(id), _, _) => service.get(id).await?,
				(None, Some(policy), Some(account)) => service.get_by_pair(policy, account).await?,
				_ => anyhow::bail!("pass an id, or both --policy and --account"),
			};
			out.emit(&evaluation, || {
				println!("{}", render::evaluations(std::slice::from_ref(&evaluation)))
			})?;
		}
		EvaluationCommands::Add(args) => {
			let created = service.create(verdict(args)).await?;
			out.done(
				&created,
				format!(
					"Evaluation {} is {}",
					created.id,
					render::compliance(created.status)
				),
			)?;
		}
		EvaluationCommands::Record(args) => {
			let change = service.record(verdict(args)).await?;
			let e = &change.evaluation;
			out.done(
				e,
				format!(
					"{} evaluation {}: {}",
					if change.created { "Created" } else { "Refreshed" },
					e.id,
					render::compliance(e.status)
				),
			)?;
			if change.violation.is_some() && out.format == OutputFormat::Human {
				println!("   {}", "Policy violation raised".red());
			}
		}
		EvaluationCommands::Update {
			id,
			status,
			findings,
			clear_findings,
			resource,
		} => {
			let patch = EvaluationPatch {
				status,
				findings: if clear_findings {
					Some(None)
				} else {
					findings.map(Some)
				},
				resource_id: resource.map(Some),
			};
			let updated = service.update(id, patch).await?;
			out.done(
				&updated,
				format!("Evaluation {} is {}", id, render::compliance(updated.status)),
			)?;
		}
		EvaluationCommands::Delete { id } => {
			service.delete(id).await?;
			out.done(&serde_json::json!({ "id": id }), format!("Deleted evaluation {}", id))?;
		}
	}
	Ok(())
}

async fn notifications(core: &Core, out: &Output, cmd: NotificationCommands) -> Result<()> {
	let inbox = core.notifications();
	match cmd {
		NotificationCommands::List {
			unread,
			offset,
			limit,
		} => {
			let rows = inbox
				.list(NotificationListOptions {
					unread_only: unread,
					offset,
					limit,
				})
				.await?;
			out.emit(&rows, || {
				if rows.is_empty() {
					println!("Inbox is empty");
				} else {
					println!("{}", render::notifications(&rows));
				}
			})?;
		}
		NotificationCommands::Add {
			title,
			message,
			kind,
		} => {
			let created = inbox
				.create(NewNotification::broadcast(title, message).with_kind(kind))
				.await?;
			out.done(&created, format!("Posted notification {}", created.id))?;
		}
		NotificationCommands::Read { id } => {
			let read = inbox.mark_read(id).await?;
			out.done(&read, format!("Marked {} read", id))?;
		}
		NotificationCommands::ReadAll => {
			let count = inbox.mark_all_read().await?;
			out.done(
				&serde_json::json!({ "marked": count }),
				format!("Marked {} notifications read", count),
			)?;
		}
	}
	Ok(())
}

async fn users(core: &Core, out: &Output, cmd: UserCommands) -> Result<()> {
	let directory = core.users();
	match cmd {
		UserCommands::List => {
			let rows = directory.list().await?;
			out.emit(&rows, || println!("{}", render::users(&rows)))?;
		}
		UserCommands::Register {
			email,
			full_name,
			password,
		} => {
			let created = directory
				.register(NewUser::new(email, full_name, password))
				.await?;
			out.done(&created, format!("Registered {} ({})", created.email, created.id))?;
		}
		UserCommands::Delete { id } => {
			let deletion = directory.delete(id).await?;
			out.done(
				&deletion,
				format!(
					"Deleted user {} with {} accounts",
					id, deletion.accounts_removed
				),
			)?;
		}
	}
	Ok(())
}
