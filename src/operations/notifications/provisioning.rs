//! Onboarding notifications written when an account is registered
//!
//! Four steps, two seconds apart, all committed with the account itself.

use super::{insert, NewNotification};
use crate::domain::{CloudProvider, NotificationKind};
use crate::error::Result;
use crate::infrastructure::database::entities::{cloud_account, notification};
use chrono::{DateTime, Duration, Utc};
use sea_orm::ConnectionTrait;

/// Gap between consecutive provisioning steps
pub const STEP_INTERVAL_SECS: i64 = 2;

/// Title and message of each step, in order
pub fn provisioning_steps(display_name: &str, provider: CloudProvider) -> [(String, String); 4] {
	[
		(
			"Initializing secure workspace".to_string(),
			format!("Preparing guardrails for {} ({})", display_name, provider.code()),
		),
		(
			"Building connectors".to_string(),
			"Linking IAM roles, service principals, and API integrations".to_string(),
		),
		(
			"Deploying baseline policies".to_string(),
			"Activating 25 critical controls and monitoring rules".to_string(),
		),
		(
			"Provisioning complete".to_string(),
			format!("{} is ready to ingest findings", display_name),
		),
	]
}

/// Write the provisioning sequence for `account`, starting at `started_at`
pub(crate) async fn provision<C: ConnectionTrait>(
	conn: &C,
	account: &cloud_account::Model,
	started_at: DateTime<Utc>,
) -> Result<Vec<notification::Model>> {
	let mut written = Vec::with_capacity(4);

	for (step, (title, message)) in provisioning_steps(&account.display_name, account.provider)
		.into_iter()
		.enumerate()
	{
		let input = NewNotification {
			title,
			message,
			kind: NotificationKind::Provisioning,
		};
		let at = started_at + Duration::seconds(STEP_INTERVAL_SECS * step as i64);
		written.push(insert(conn, &input, at).await?);
	}

	Ok(written)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn steps_name_the_account_and_provider() {
		let steps = provisioning_steps("Prod", CloudProvider::Azure);

		assert_eq!(steps[0].1, "Preparing guardrails for Prod (AZURE)");
		assert_eq!(steps[3].0, "Provisioning complete");
		assert_eq!(steps[3].1, "Prod is ready to ingest findings");
	}

	#[test]
	fn fixed_steps_do_not_depend_on_the_account() {
		let a = provisioning_steps("A", CloudProvider::Aws);
		let b = provisioning_steps("B", CloudProvider::Gcp);
		assert_eq!(a[1], b[1]);
		assert_eq!(a[2], b[2]);
	}
}
