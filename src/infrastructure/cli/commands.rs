//! CLI command definitions
//!
//! Only the clap enums live here; handling is in `mod.rs`.

use crate::domain::{
	parse_field, AccountStatus, CloudProvider, ComplianceStatus, NotificationKind,
	PolicySeverity, SyncFrequency,
};
use clap::Subcommand;
use std::path::PathBuf;
use std::str::FromStr;

/// Closed-set flags use the core parser: exact snake_case, nothing else
fn closed<T: FromStr>(value: &str) -> crate::Result<T> {
	parse_field("value", value)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Create the data directory, config and database
	Init,
	/// Seed demo data if the store has not been seeded
	Seed,
	/// Show the compliance dashboard
	Dashboard,
	/// Cloud account operations
	#[command(subcommand)]
	Accounts(AccountCommands),
	/// Policy operations
	#[command(subcommand)]
	Policies(PolicyCommands),
	/// Evaluation operations
	#[command(subcommand)]
	Evaluations(EvaluationCommands),
	/// Notification inbox
	#[command(subcommand)]
	Notifications(NotificationCommands),
	/// User directory
	#[command(subcommand)]
	Users(UserCommands),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
	/// List accounts, newest first
	List {
		#[arg(long, value_parser = closed::<CloudProvider>)]
		provider: Option<CloudProvider>,
		#[arg(long, value_parser = closed::<AccountStatus>)]
		status: Option<AccountStatus>,
	},
	/// Show one account
	Show { id: i32 },
	/// Register an account and run provisioning
	Add {
		#[arg(long, value_parser = closed::<CloudProvider>)]
		provider: CloudProvider,
		#[arg(long)]
		external_id: String,
		#[arg(long)]
		name: String,
		#[arg(long)]
		access_method: Option<String>,
		#[arg(long)]
		service_email: Option<String>,
		#[arg(long)]
		tenant_id: Option<String>,
		#[arg(long, value_parser = closed::<SyncFrequency>, default_value = "daily")]
		sync_frequency: SyncFrequency,
		/// Disable automatic sync
		#[arg(long)]
		no_auto_sync: bool,
		#[arg(long)]
		owner: Option<i32>,
	},
	/// Patch an account; omitted flags are left untouched
	Update {
		id: i32,
		#[arg(long)]
		name: Option<String>,
		#[arg(long, value_parser = closed::<AccountStatus>)]
		status: Option<AccountStatus>,
		#[arg(long, value_parser = closed::<SyncFrequency>)]
		sync_frequency: Option<SyncFrequency>,
		#[arg(long)]
		auto_sync: Option<bool>,
		#[arg(long)]
		access_method: Option<String>,
		/// Remove the stored credential
		#[arg(long)]
		clear_credential: bool,
	},
	/// Delete an account and its evaluations
	Delete { id: i32 },
	/// Request a manual sync
	Sync { id: i32 },
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
	/// List policies by provider and control id
	List {
		#[arg(long, value_parser = closed::<CloudProvider>)]
		provider: Option<CloudProvider>,
		#[arg(long)]
		offset: Option<u64>,
		#[arg(long)]
		limit: Option<u64>,
	},
	/// Show one policy
	Show {
		id: i32,
		/// Print the policy document as well
		#[arg(long)]
		document: bool,
	},
	/// Define a control
	Add {
		#[arg(long, value_parser = closed::<CloudProvider>)]
		provider: CloudProvider,
		#[arg(long)]
		control_id: String,
		#[arg(long)]
		name: String,
		#[arg(long)]
		category: String,
		#[arg(long, value_parser = closed::<PolicySeverity>, default_value = "medium")]
		severity: PolicySeverity,
		#[arg(long)]
		description: Option<String>,
		/// Comma-delimited tags
		#[arg(long)]
		tags: Option<String>,
		/// File holding the raw policy document
		#[arg(long)]
		document: Option<PathBuf>,
	},
	/// Patch a policy; omitted flags are left untouched
	Update {
		id: i32,
		#[arg(long)]
		name: Option<String>,
		#[arg(long)]
		control_id: Option<String>,
		#[arg(long)]
		category: Option<String>,
		#[arg(long, value_parser = closed::<PolicySeverity>)]
		severity: Option<PolicySeverity>,
		#[arg(long, value_parser = closed::<ComplianceStatus>)]
		compliance_status: Option<ComplianceStatus>,
		#[arg(long)]
		affected_resources: Option<i32>,
		#[arg(long)]
		description: Option<String>,
		#[arg(long)]
		tags: Option<String>,
	},
	/// Delete a policy and its evaluations
	Delete { id: i32 },
}

#[derive(Subcommand, Debug)]
pub enum EvaluationCommands {
	/// List evaluations, most recently checked first
	List {
		#[arg(long)]
		policy: Option<i32>,
		#[arg(long)]
		account: Option<i32>,
		#[arg(long, value_parser = closed::<ComplianceStatus>)]
		status: Option<ComplianceStatus>,
		#[arg(long)]
		limit: Option<u64>,
	},
	/// Show one evaluation by id, or by --policy and --account
	Show {
		#[arg(required_unless_present_all = ["policy", "account"])]
		id: Option<i32>,
		#[arg(long, requires = "account")]
		policy: Option<i32>,
		#[arg(long, requires = "policy")]
		account: Option<i32>,
	},
	/// Create the evaluation for a new pair
	Add(VerdictArgs),
	/// Create or refresh the evaluation for a pair
	Record(VerdictArgs),
	/// Patch an evaluation; always refreshes last_checked_at
	Update {
		id: i32,
		#[arg(long, value_parser = closed::<ComplianceStatus>)]
		status: Option<ComplianceStatus>,
		#[arg(long, conflicts_with = "clear_findings")]
		findings: Option<String>,
		#[arg(long)]
		clear_findings: bool,
		#[arg(long)]
		resource: Option<String>,
	},
	/// Delete an evaluation
	Delete { id: i32 },
}

#[derive(clap::Args, Debug)]
pub struct VerdictArgs {
	#[arg(long)]
	pub policy: i32,
	#[arg(long)]
	pub account: i32,
	#[arg(long, value_parser = closed::<ComplianceStatus>, default_value = "unknown")]
	pub status: ComplianceStatus,
	#[arg(long)]
	pub findings: Option<String>,
	#[arg(long)]
	pub resource: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
	/// List notifications, newest first
	List {
		#[arg(long)]
		unread: bool,
		#[arg(long)]
		offset: Option<u64>,
		#[arg(long)]
		limit: Option<u64>,
	},
	/// Post a notification
	Add {
		title: String,
		message: String,
		#[arg(long, value_parser = closed::<NotificationKind>, default_value = "broadcast")]
		kind: NotificationKind,
	},
	/// Mark one notification read
	Read { id: i32 },
	/// Mark every notification read
	ReadAll,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
	/// List users
	List,
	/// Register a user
	Register {
		email: String,
		full_name: String,
		#[arg(long, env = "CLOUDGUARD_PASSWORD")]
		password: String,
	},
	/// Delete a user with their accounts
	Delete { id: i32 },
}
