//! Human-readable output

use crate::domain::{AccountStatus, ComplianceStatus, PolicySeverity};
use crate::infrastructure::database::entities::{
	cloud_account, notification, policy, policy_evaluation, user,
};
use crate::operations::dashboard::DashboardSnapshot;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Table};

fn table(header: Vec<&str>) -> Table {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL).set_header(header);
	table
}

fn when(at: &DateTime<Utc>) -> String {
	at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn or_dash(value: Option<&str>) -> String {
	value.unwrap_or("-").to_string()
}

pub fn compliance(status: ComplianceStatus) -> ColoredString {
	let label = status.as_ref();
	match status {
		ComplianceStatus::Compliant => label.green(),
		ComplianceStatus::NonCompliant => label.red().bold(),
		ComplianceStatus::Warning => label.yellow(),
		ComplianceStatus::Unknown => label.dimmed(),
	}
}

fn account_status(status: AccountStatus) -> ColoredString {
	let label = status.as_ref();
	match status {
		AccountStatus::Connected => label.green(),
		AccountStatus::Pending => label.yellow(),
		AccountStatus::Error => label.red(),
	}
}

fn severity(severity: PolicySeverity) -> ColoredString {
	let label = severity.as_ref();
	match severity {
		PolicySeverity::Critical => label.red().bold(),
		PolicySeverity::High => label.red(),
		PolicySeverity::Medium => label.yellow(),
		PolicySeverity::Low => label.normal(),
	}
}

pub fn accounts(rows: &[cloud_account::Model]) -> Table {
	let mut t = table(vec![
		"ID", "Provider", "External ID", "Name", "Status", "Sync", "Last synced",
	]);
	for a in rows {
		t.add_row(vec![
			a.id.to_string(),
			a.provider.code(),
			a.external_id.clone(),
			a.display_name.clone(),
			account_status(a.status).to_string(),
			format!(
				"{}{}",
				a.sync_frequency.as_ref(),
				if a.auto_sync { "" } else { " (manual)" }
			),
			a.last_synced_at.as_ref().map(when).unwrap_or_else(|| "never".to_string()),
		]);
	}
	t
}

pub fn account_detail(a: &cloud_account::Model) -> Table {
	let mut t = table(vec!["Field", "Value"]);
	t.add_row(vec!["ID".to_string(), a.id.to_string()]);
	t.add_row(vec!["Provider".to_string(), a.provider.code()]);
	t.add_row(vec!["External ID".to_string(), a.external_id.clone()]);
	t.add_row(vec!["Name".to_string(), a.display_name.clone()]);
	t.add_row(vec!["Status".to_string(), account_status(a.status).to_string()]);
	t.add_row(vec!["Access method".to_string(), or_dash(a.access_method.as_deref())]);
	t.add_row(vec!["Service email".to_string(), or_dash(a.service_email.as_deref())]);
	t.add_row(vec!["Tenant".to_string(), or_dash(a.tenant_id.as_deref())]);
	t.add_row(vec![
		"Credential".to_string(),
		if a.credential.is_some() { "stored" } else { "-" }.to_string(),
	]);
	t.add_row(vec!["Sync frequency".to_string(), a.sync_frequency.as_ref().to_string()]);
	t.add_row(vec!["Auto sync".to_string(), a.auto_sync.to_string()]);
	t.add_row(vec![
		"Last synced".to_string(),
		a.last_synced_at.as_ref().map(when).unwrap_or_else(|| "never".to_string()),
	]);
	t.add_row(vec![
		"Owner".to_string(),
		a.owner_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
	]);
	t.add_row(vec!["Created".to_string(), when(&a.created_at)]);
	t.add_row(vec!["Updated".to_string(), when(&a.updated_at)]);
	t
}

pub fn policies(rows: &[policy::Model]) -> Table {
	let mut t = table(vec![
		"ID", "Provider", "Control", "Name", "Category", "Severity", "Status",
	]);
	for p in rows {
		t.add_row(vec![
			p.id.to_string(),
			p.provider.code(),
			p.control_id.clone(),
			p.name.clone(),
			p.category.clone(),
			severity(p.severity).to_string(),
			compliance(p.compliance_status).to_string(),
		]);
	}
	t
}

pub fn policy_detail(p: &policy::Model) -> Table {
	let mut t = table(vec!["Field", "Value"]);
	t.add_row(vec!["ID".to_string(), p.id.to_string()]);
	t.add_row(vec!["Provider".to_string(), p.provider.code()]);
	t.add_row(vec!["Control".to_string(), p.control_id.clone()]);
	t.add_row(vec!["Name".to_string(), p.name.clone()]);
	t.add_row(vec!["Category".to_string(), p.category.clone()]);
	t.add_row(vec!["Severity".to_string(), severity(p.severity).to_string()]);
	t.add_row(vec!["Description".to_string(), or_dash(p.description.as_deref())]);
	t.add_row(vec!["Type".to_string(), or_dash(p.policy_type.as_deref())]);
	t.add_row(vec![
		"Scope".to_string(),
		format!(
			"{} {} ({})",
			or_dash(p.scope_level.as_deref()),
			or_dash(p.scope_name.as_deref()),
			or_dash(p.scope_id.as_deref())
		),
	]);
	t.add_row(vec!["Compliance".to_string(), compliance(p.compliance_status).to_string()]);
	t.add_row(vec!["Affected resources".to_string(), p.affected_resources.to_string()]);
	t.add_row(vec![
		"Last reviewed".to_string(),
		p.last_reviewed
			.map(|d| d.to_string())
			.unwrap_or_else(|| "-".to_string()),
	]);
	t.add_row(vec!["Tags".to_string(), p.tag_list().join(", ")]);
	t.add_row(vec!["Updated".to_string(), when(&p.updated_at)]);
	t
}

pub fn evaluations(rows: &[policy_evaluation::Model]) -> Table {
	let mut t = table(vec![
		"ID", "Policy", "Account", "Status", "Resource", "Findings", "Last checked",
	]);
	for e in rows {
		t.add_row(vec![
			e.id.to_string(),
			e.policy_id.to_string(),
			e.account_id.to_string(),
			compliance(e.status).to_string(),
			or_dash(e.resource_id.as_deref()),
			or_dash(e.findings.as_deref()),
			when(&e.last_checked_at),
		]);
	}
	t
}

pub fn notifications(rows: &[notification::Model]) -> Table {
	let mut t = table(vec!["ID", "", "Type", "Title", "Message", "Created"]);
	for n in rows {
		t.add_row(vec![
			n.id.to_string(),
			if n.is_read { " ".to_string() } else { "●".blue().to_string() },
			n.kind.as_ref().to_string(),
			n.title.clone(),
			n.message.clone(),
			when(&n.created_at),
		]);
	}
	t
}

pub fn users(rows: &[user::Model]) -> Table {
	let mut t = table(vec!["ID", "Email", "Name", "Active", "Created"]);
	for u in rows {
		t.add_row(vec![
			u.id.to_string(),
			u.email.clone(),
			u.full_name.clone(),
			u.is_active.to_string(),
			when(&u.created_at),
		]);
	}
	t
}

pub fn dashboard(snapshot: &DashboardSnapshot) -> (Table, Table) {
	let s = &snapshot.summary;
	let mut summary = table(vec!["Evaluations", "Compliant", "Non-compliant", "Warning", "Unknown"]);
	summary.add_row(vec![
		s.total_policies.to_string(),
		s.compliant.to_string().green().to_string(),
		s.non_compliant.to_string().red().to_string(),
		s.warning.to_string().yellow().to_string(),
		s.unknown.to_string(),
	]);

	let mut providers = table(vec![
		"Provider", "Accounts", "Compliant", "Non-compliant", "Warning", "Unknown",
	]);
	for p in &snapshot.providers {
		providers.add_row(vec![
			p.provider.code(),
			p.accounts.to_string(),
			p.compliant.to_string(),
			p.non_compliant.to_string(),
			p.warning.to_string(),
			p.unknown.to_string(),
		]);
	}

	(summary, providers)
}
