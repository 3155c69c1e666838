//! Notification inbox
//!
//! Notifications are append-only apart from the read flag. Other services
//! write them through [`insert`] inside their own transactions.

pub mod provisioning;

use crate::domain::NotificationKind;
use crate::error::{CoreError, Result};
use crate::infrastructure::database::entities::notification;
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{time, validation};
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
	QueryOrder, QuerySelect, Set,
};
use sea_orm::sea_query::Expr;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Input for a new notification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewNotification {
	pub title: String,
	pub message: String,
	#[serde(default, rename = "type")]
	pub kind: NotificationKind,
}

impl NewNotification {
	pub fn broadcast(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			message: message.into(),
			kind: NotificationKind::Broadcast,
		}
	}

	pub fn with_kind(mut self, kind: NotificationKind) -> Self {
		self.kind = kind;
		self
	}

	pub(crate) fn validate(&self) -> Result<()> {
		validation::require_length("title", &self.title, 1, 255)?;
		validation::require_non_empty("message", &self.message)
	}
}

/// Listing options for the inbox
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationListOptions {
	pub unread_only: bool,
	pub offset: Option<u64>,
	pub limit: Option<u64>,
}

/// Write one notification on the given connection or transaction
pub(crate) async fn insert<C: ConnectionTrait>(
	conn: &C,
	input: &NewNotification,
	created_at: DateTime<Utc>,
) -> Result<notification::Model> {
	input.validate()?;

	let model = notification::ActiveModel {
		title: Set(input.title.clone()),
		message: Set(input.message.clone()),
		kind: Set(input.kind),
		is_read: Set(false),
		created_at: Set(created_at),
		..Default::default()
	};

	Ok(model.insert(conn).await?)
}

/// Read/unread state and listing of notifications
pub struct NotificationInbox {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl NotificationInbox {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Create a standalone notification, broadcast by default
	pub async fn create(&self, input: NewNotification) -> Result<notification::Model> {
		let _slot = self.db.write_slot().await;
		let created = insert(self.db.conn(), &input, time::now()).await?;

		info!(id = created.id, kind = created.kind.as_ref(), "Created notification");
		self.events.emit(Event::NotificationCreated {
			id: created.id,
			kind: created.kind,
		});

		Ok(created)
	}

	pub async fn get(&self, id: i32) -> Result<notification::Model> {
		notification::Entity::find_by_id(id)
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("notification", id))
	}

	/// Newest first, ties broken by id
	pub async fn list(&self, options: NotificationListOptions) -> Result<Vec<notification::Model>> {
		let mut query = notification::Entity::find();
		if options.unread_only {
			query = query.filter(notification::Column::IsRead.eq(false));
		}

		let rows = query
			.order_by_desc(notification::Column::CreatedAt)
			.order_by_desc(notification::Column::Id)
			.offset(options.offset)
			.limit(options.limit)
			.all(self.db.conn())
			.await?;

		debug!(count = rows.len(), "Listed notifications");
		Ok(rows)
	}

	/// Mark one notification read; already-read records come back unchanged
	pub async fn mark_read(&self, id: i32) -> Result<notification::Model> {
		let _slot = self.db.write_slot().await;
		let existing = self.get(id).await?;
		if existing.is_read {
			return Ok(existing);
		}

		let mut model: notification::ActiveModel = existing.into();
		model.is_read = Set(true);
		let updated = model.update(self.db.conn()).await?;

		debug!(id, "Marked notification read");
		self.events.emit(Event::NotificationsRead { count: 1 });

		Ok(updated)
	}

	/// Mark every unread notification read in a single statement
	pub async fn mark_all_read(&self) -> Result<u64> {
		let _slot = self.db.write_slot().await;
		let result = notification::Entity::update_many()
			.col_expr(notification::Column::IsRead, Expr::value(true))
			.filter(notification::Column::IsRead.eq(false))
			.exec(self.db.conn())
			.await?;

		info!(count = result.rows_affected, "Marked all notifications read");
		if result.rows_affected > 0 {
			self.events.emit(Event::NotificationsRead {
				count: result.rows_affected,
			});
		}

		Ok(result.rows_affected)
	}

	pub async fn unread_count(&self) -> Result<u64> {
		Ok(notification::Entity::find()
			.filter(notification::Column::IsRead.eq(false))
			.count(self.db.conn())
			.await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_kind_from_type_field() {
		let input: NewNotification = serde_json::from_str(
			r#"{"title": "Scan finished", "message": "47 resources", "type": "build_complete"}"#,
		)
		.unwrap();
		assert_eq!(input.kind, NotificationKind::BuildComplete);
	}

	#[test]
	fn kind_defaults_to_broadcast() {
		let input: NewNotification =
			serde_json::from_str(r#"{"title": "Hello", "message": "world"}"#).unwrap();
		assert_eq!(input.kind, NotificationKind::Broadcast);
	}

	#[test]
	fn rejects_unknown_kind() {
		let result = serde_json::from_str::<NewNotification>(
			r#"{"title": "Hello", "message": "world", "type": "alert"}"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn validates_lengths() {
		assert!(NewNotification::broadcast("", "body").validate().is_err());
		assert!(NewNotification::broadcast("t".repeat(256), "body").validate().is_err());
		assert!(NewNotification::broadcast("title", "").validate().is_err());
		assert!(NewNotification::broadcast("t", "b").validate().is_ok());
	}
}
