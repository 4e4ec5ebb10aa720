//! # Calendar Commands
//!
//! Reminders, events and notes: CRUD, completion toggling, per-day and
//! date-range listings.
//!
//! Listings come back in chronological order (date, then time) unless a
//! different sort is requested.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use backoffice_core::dates::{parse_dmy_field, parse_hm_field};
use backoffice_core::table::{Column, RowAction};
use backoffice_core::validation::{validate_name, FormValidator};
use backoffice_core::{
    new_id, validate_date_range, CellValue, DataTable, DateRange, FieldErrors, Page, PageRequest,
    Reminder, ReminderKind, SortDirection,
};
use backoffice_store::ListQuery;

use super::{finish_form, optional_reason, with_search, with_sort, SortField, SortSpec};
use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSortKey {
    /// Date and time together.
    When,
    Title,
    Kind,
}

impl SortField<Reminder> for ReminderSortKey {
    fn value(self, reminder: &Reminder) -> CellValue {
        match self {
            ReminderSortKey::When => reminder
                .date
                .and_time(reminder.time)
                .format("%Y-%m-%dT%H:%M")
                .to_string()
                .into(),
            ReminderSortKey::Title => reminder.title.to_lowercase().into(),
            ReminderSortKey::Kind => reminder.kind.to_string().into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderQuery {
    pub search: String,
    pub kind: Option<ReminderKind>,
    pub completed: Option<bool>,
    pub sort: Option<SortSpec<ReminderSortKey>>,
    pub page: Option<PageRequest>,
}

fn chronological(list: ListQuery<Reminder>) -> ListQuery<Reminder> {
    with_sort(list, Some(SortSpec::ascending(ReminderSortKey::When)))
}

pub async fn list_reminders(
    store: &StoreState,
    query: ReminderQuery,
) -> Result<Page<Reminder>, ApiError> {
    let mut list = with_search(ListQuery::new(), &query.search, |r: &Reminder| {
        format!("{} {}", r.title, r.description)
    })?;

    if let Some(kind) = query.kind {
        list = list.filter(move |r| r.kind == kind);
    }
    if let Some(completed) = query.completed {
        list = list.filter(move |r| r.completed == completed);
    }

    list = match query.sort {
        Some(sort) => with_sort(list, Some(sort)),
        None => chronological(list),
    };
    if let Some(page) = query.page {
        list = list.page(page);
    }

    Ok(store.reminders.list(list).await?)
}

/// Everything scheduled on one day.
pub async fn reminders_on(store: &StoreState, date: NaiveDate) -> Result<Vec<Reminder>, ApiError> {
    let list = chronological(ListQuery::new().filter(move |r: &Reminder| r.date == date));
    Ok(store.reminders.list(list).await?.items)
}

/// Everything scheduled inside a picked range.
///
/// `from` and `to` are raw `DD-MM-YYYY` picker input, checked against
/// `today` before any lookup.
pub async fn reminders_between(
    store: &StoreState,
    from: &str,
    to: &str,
    today: NaiveDate,
) -> Result<(DateRange, Vec<Reminder>), ApiError> {
    let range = validate_date_range(from, to, today)?;
    let list = chronological(ListQuery::new().filter(move |r: &Reminder| range.contains(r.date)));
    Ok((range, store.reminders.list(list).await?.items))
}

/// Upcoming open reminders from `today` on, soonest first.
pub async fn upcoming(
    store: &StoreState,
    today: NaiveDate,
    limit: usize,
) -> Result<Vec<Reminder>, ApiError> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    let list = ListQuery::new()
        .filter(move |r: &Reminder| !r.completed && r.date >= today)
        .sort_by(|r| ReminderSortKey::When.value(r), SortDirection::Ascending)
        .page(PageRequest::new(1, limit));
    Ok(store.reminders.list(list).await?.items)
}

/// Add/Edit Reminder dialog. `date` is `DD-MM-YYYY`, `time` is `HH:MM`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
}

impl ReminderForm {
    fn validate(&self, id: String, completed: bool) -> Result<Reminder, FieldErrors> {
        let mut form = FormValidator::new();
        form.check(validate_name("title", &self.title));
        let date = form.value(parse_dmy_field("date", &self.date));
        let time = form.value(parse_hm_field("time", &self.time));

        let parsed = date.zip(time).map(|(date, time)| Reminder {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            date,
            time,
            kind: self.kind,
            completed,
        });
        finish_form(form, parsed)
    }
}

pub async fn create_reminder(store: &StoreState, form: ReminderForm) -> Result<Reminder, ApiError> {
    let reminder = form.validate(new_id(), false)?;

    let reminder = store.reminders.create(reminder).await?;
    store.history.record_created(&reminder).await?;

    info!(id = %reminder.id, kind = %reminder.kind, "Reminder created");
    Ok(reminder)
}

/// Replaces a reminder's details; the completed flag is kept.
pub async fn update_reminder(
    store: &StoreState,
    id: &str,
    form: ReminderForm,
    reason: Option<String>,
) -> Result<Reminder, ApiError> {
    let existing = store.reminders.require(id).await?;
    let updated = form.validate(existing.id.clone(), existing.completed)?;

    store.reminders.update(updated.clone()).await?;
    store
        .history
        .record_updated(&existing, &updated, optional_reason(reason))
        .await?;

    info!(id = %id, "Reminder updated");
    Ok(updated)
}

pub async fn delete_reminder(
    store: &StoreState,
    id: &str,
    reason: Option<String>,
) -> Result<Reminder, ApiError> {
    let removed = store.reminders.remove(id).await?;
    store
        .history
        .record_deleted(&removed, optional_reason(reason))
        .await?;

    info!(id = %id, "Reminder deleted");
    Ok(removed)
}

pub async fn toggle_completed(store: &StoreState, id: &str) -> Result<Reminder, ApiError> {
    let existing = store.reminders.require(id).await?;
    let updated = Reminder {
        completed: !existing.completed,
        ..existing.clone()
    };

    store.reminders.update(updated.clone()).await?;
    store.history.record_updated(&existing, &updated, None).await?;

    info!(id = %id, completed = updated.completed, "Reminder toggled");
    Ok(updated)
}

/// Agenda table with a single Done/Undo toggle per row.
pub fn reminder_table(reminders: Vec<Reminder>, config: &ConfigState) -> DataTable<Reminder> {
    let columns = vec![
        Column::new("date", "Date", |r: &Reminder| r.date.into()).sortable(),
        Column::new("time", "Time", |r: &Reminder| r.time.into())
            .sortable()
            .width("80px"),
        Column::new("title", "Title", |r: &Reminder| r.title.as_str().into()).sortable(),
        Column::new("type", "Type", |r: &Reminder| r.kind.to_string().into()).sortable(),
        Column::new("completed", "Done", |r: &Reminder| r.completed.into()).searchable(false),
    ];

    DataTable::new(reminders, columns)
        .with_options(config.table_options())
        .with_row_action(RowAction::new("toggle_completed", "Toggle Done"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::table::ActionsView;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn seeded() -> StoreState {
        StoreState::seeded(today())
    }

    fn ids(reminders: &[Reminder]) -> Vec<&str> {
        reminders.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_reminders_on_today_in_time_order() {
        let store = seeded();
        let found = reminders_on(&store, today()).await.unwrap();
        assert_eq!(ids(&found), ["r-1", "r-2"]);
    }

    #[tokio::test]
    async fn test_reminders_between_validates_range() {
        let store = seeded();

        let (range, found) = reminders_between(&store, "08-03-2024", "15-03-2024", today())
            .await
            .unwrap();
        assert_eq!(range.days(), 8);
        assert_eq!(ids(&found), ["r-5", "r-3", "r-1", "r-2"]);

        let err = reminders_between(&store, "15-03-2024", "01-03-2024", today())
            .await
            .unwrap_err();
        assert_eq!(err.message, "from: Start date must be before end date");

        let err = reminders_between(&store, "01-03-2024", "20-03-2024", today())
            .await
            .unwrap_err();
        assert_eq!(err.field("to"), Some("End date cannot be in the future"));
    }

    #[tokio::test]
    async fn test_create_and_toggle() {
        let store = StoreState::empty();
        let form = ReminderForm {
            title: "Call courier".to_string(),
            description: String::new(),
            date: "16-03-2024".to_string(),
            time: "09:15".to_string(),
            kind: ReminderKind::Reminder,
        };

        let created = create_reminder(&store, form).await.unwrap();
        assert!(!created.completed);

        let toggled = toggle_completed(&store, &created.id).await.unwrap();
        assert!(toggled.completed);
        let toggled = toggle_completed(&store, &created.id).await.unwrap();
        assert!(!toggled.completed);

        assert_eq!(store.history.for_record("Reminder", &created.id).await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_time() {
        let store = StoreState::empty();
        let form = ReminderForm {
            title: "Call courier".to_string(),
            date: "16-03-2024".to_string(),
            time: "25:99".to_string(),
            ..ReminderForm::default()
        };
        let err = create_reminder(&store, form).await.unwrap_err();
        assert!(err.field("time").is_some());
        assert!(err.field("date").is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_completed() {
        let store = seeded();
        let form = ReminderForm {
            title: "Restock green tea".to_string(),
            description: "Ordered 24 boxes".to_string(),
            date: "14-03-2024".to_string(),
            time: "09:00".to_string(),
            kind: ReminderKind::Reminder,
        };
        let updated = update_reminder(&store, "r-3", form, None).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.description, "Ordered 24 boxes");
    }

    #[tokio::test]
    async fn test_list_and_upcoming() {
        let store = seeded();

        let events = list_reminders(
            &store,
            ReminderQuery {
                kind: Some(ReminderKind::Event),
                ..ReminderQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ids(&events.items), ["r-2", "r-4"]);

        let done = list_reminders(
            &store,
            ReminderQuery {
                completed: Some(true),
                ..ReminderQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ids(&done.items), ["r-3"]);

        let next = upcoming(&store, today() + Duration::days(1), 5).await.unwrap();
        assert_eq!(ids(&next), ["r-4", "r-6"]);

        let soonest = upcoming(&store, today() + Duration::days(1), 1).await.unwrap();
        assert_eq!(ids(&soonest), ["r-4"]);
        assert!(upcoming(&store, today(), 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reminder_table_single_button() {
        let store = seeded();
        let reminders = store.reminders.all().await.unwrap();
        let first = reminders[0].clone();
        let table = reminder_table(reminders, &ConfigState::default());

        assert!(matches!(table.actions_for(&first), ActionsView::Button(_)));
        let click = table.trigger_action("r-1", "toggle_completed").unwrap();
        assert_eq!(click.row_id, "r-1");
    }
}
