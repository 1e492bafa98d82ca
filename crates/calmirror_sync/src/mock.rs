// In-memory store and provider used by the unit tests.

use calmirror_common::{
    Account, AccountCredentials, BatchOutcome, BoxFuture, CalendarProvider, EventFieldsUpdate,
    FieldMapping, MappingColumn, MirrorEvent, ProviderError, ProviderEvent, ProviderEventDraft,
    RecordFailure,
};
use calmirror_db::{
    AccountRepository, DbError, FieldMappingRepository, MirrorEventRepository,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StoreData {
    accounts: Vec<Account>,
    events: Vec<MirrorEvent>,
    mappings: Vec<FieldMapping>,
    /// Provider ids whose writes fail.
    failing_writes: HashSet<String>,
    write_calls: usize,
    next_id: usize,
}

/// Mirror store keeping everything in vectors.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, id: &str) -> Account {
        let account = Account {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            google_id: format!("google-{}", id),
            access_token: format!("token-{}", id),
            refresh_token: None,
            expiry_date: None,
        };
        self.data.lock().unwrap().accounts.push(account.clone());
        account
    }

    pub fn add_event(&self, event: MirrorEvent) {
        self.data.lock().unwrap().events.push(event);
    }

    /// All rows, soft-deleted included.
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.data.lock().unwrap().events.clone()
    }

    pub fn event(&self, provider_event_id: &str) -> Option<MirrorEvent> {
        self.events()
            .into_iter()
            .find(|e| e.provider_event_id == provider_event_id)
    }

    pub fn mappings(&self) -> Vec<FieldMapping> {
        self.data.lock().unwrap().mappings.clone()
    }

    pub fn fail_writes_for(&self, provider_event_id: &str) {
        self.data
            .lock()
            .unwrap()
            .failing_writes
            .insert(provider_event_id.to_string());
    }

    /// Number of bulk update and soft-delete calls made so far.
    pub fn write_calls(&self) -> usize {
        self.data.lock().unwrap().write_calls
    }
}

impl AccountRepository for MemoryStore {
    async fn upsert_by_email(&self, credentials: AccountCredentials) -> Result<Account, DbError> {
        let mut data = self.data.lock().unwrap();
        if let Some(existing) = data
            .accounts
            .iter_mut()
            .find(|a| a.email == credentials.email)
        {
            existing.google_id = credentials.google_id;
            existing.access_token = credentials.access_token;
            if credentials.refresh_token.is_some() {
                existing.refresh_token = credentials.refresh_token;
            }
            if credentials.expiry_date.is_some() {
                existing.expiry_date = credentials.expiry_date;
            }
            return Ok(existing.clone());
        }

        data.next_id += 1;
        let account = Account {
            id: format!("acc{}", data.next_id),
            email: credentials.email,
            google_id: credentials.google_id,
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            expiry_date: credentials.expiry_date,
        };
        data.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, DbError> {
        let data = self.data.lock().unwrap();
        Ok(data.accounts.iter().find(|a| a.id == account_id).cloned())
    }
}

impl MirrorEventRepository for MemoryStore {
    async fn find_active(&self, account_id: &str) -> Result<Vec<MirrorEvent>, DbError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .events
            .iter()
            .filter(|e| e.account_id == account_id && !e.deleted)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: &MirrorEvent) -> Result<(), DbError> {
        let mut data = self.data.lock().unwrap();
        let taken = data.events.iter().any(|e| {
            e.account_id == event.account_id && e.provider_event_id == event.provider_event_id
        });
        if taken {
            return Err(DbError::Duplicate(event.provider_event_id.clone()));
        }
        data.events.push(event.clone());
        Ok(())
    }

    async fn bulk_update(
        &self,
        account_id: &str,
        updates: &[EventFieldsUpdate],
    ) -> Result<BatchOutcome, DbError> {
        let mut data = self.data.lock().unwrap();
        data.write_calls += 1;
        let mut outcome = BatchOutcome::default();
        for update in updates {
            if data.failing_writes.contains(&update.provider_event_id) {
                outcome
                    .failed
                    .push(RecordFailure::new(&update.provider_event_id, "write refused"));
                continue;
            }
            match data.events.iter_mut().find(|e| {
                e.account_id == account_id
                    && e.provider_event_id == update.provider_event_id
                    && !e.deleted
            }) {
                Some(row) => {
                    row.title = update.title.clone();
                    row.start = update.start;
                    row.end = update.end;
                    outcome.applied += 1;
                }
                None => outcome.failed.push(RecordFailure::new(
                    &update.provider_event_id,
                    "no active mirror row",
                )),
            }
        }
        Ok(outcome)
    }

    async fn bulk_soft_delete(
        &self,
        account_id: &str,
        provider_event_ids: &[String],
    ) -> Result<BatchOutcome, DbError> {
        let mut data = self.data.lock().unwrap();
        data.write_calls += 1;
        if provider_event_ids
            .iter()
            .any(|id| data.failing_writes.contains(id))
        {
            return Ok(BatchOutcome {
                applied: 0,
                failed: provider_event_ids
                    .iter()
                    .map(|id| RecordFailure::new(id, "write refused"))
                    .collect(),
            });
        }
        let mut outcome = BatchOutcome::default();
        for row in data.events.iter_mut().filter(|e| {
            e.account_id == account_id && !e.deleted && provider_event_ids.contains(&e.provider_event_id)
        }) {
            row.deleted = true;
            outcome.applied += 1;
        }
        Ok(outcome)
    }
}

impl FieldMappingRepository for MemoryStore {
    async fn replace_active(
        &self,
        account_id: &str,
        columns: &[MappingColumn],
    ) -> Result<FieldMapping, DbError> {
        let mut data = self.data.lock().unwrap();
        for mapping in data.mappings.iter_mut().filter(|m| m.account_id == account_id) {
            mapping.is_active = false;
        }
        data.next_id += 1;
        let mapping = FieldMapping {
            id: format!("map{}", data.next_id),
            account_id: account_id.to_string(),
            columns: columns.to_vec(),
            is_active: true,
            created_at: None,
        };
        data.mappings.push(mapping.clone());
        Ok(mapping)
    }

    async fn find_active_mapping(&self, account_id: &str) -> Result<Option<FieldMapping>, DbError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .mappings
            .iter()
            .find(|m| m.account_id == account_id && m.is_active)
            .cloned())
    }
}

#[derive(Default)]
struct ProviderData {
    events: Vec<ProviderEvent>,
    created: Vec<ProviderEventDraft>,
    subscriptions: Vec<String>,
    list_error: Option<ProviderError>,
    create_error: Option<ProviderError>,
    subscribe_error: Option<ProviderError>,
    list_calls: usize,
}

/// Calendar provider serving a fixed event list.
#[derive(Clone, Default)]
pub struct MockProvider {
    data: Arc<Mutex<ProviderData>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_events(&self, events: Vec<ProviderEvent>) {
        self.data.lock().unwrap().events = events;
    }

    pub fn fail_list(&self, error: ProviderError) {
        self.data.lock().unwrap().list_error = Some(error);
    }

    pub fn fail_create(&self, error: ProviderError) {
        self.data.lock().unwrap().create_error = Some(error);
    }

    pub fn fail_subscribe(&self, error: ProviderError) {
        self.data.lock().unwrap().subscribe_error = Some(error);
    }

    pub fn created(&self) -> Vec<ProviderEventDraft> {
        self.data.lock().unwrap().created.clone()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.data.lock().unwrap().subscriptions.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.data.lock().unwrap().list_calls
    }
}

impl CalendarProvider for MockProvider {
    fn list_events(&self, _account: &Account) -> BoxFuture<'_, Vec<ProviderEvent>, ProviderError> {
        Box::pin(async move {
            let mut data = self.data.lock().unwrap();
            data.list_calls += 1;
            match &data.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(data.events.clone()),
            }
        })
    }

    fn create_event(
        &self,
        _account: &Account,
        draft: ProviderEventDraft,
    ) -> BoxFuture<'_, String, ProviderError> {
        Box::pin(async move {
            let mut data = self.data.lock().unwrap();
            if let Some(e) = &data.create_error {
                return Err(e.clone());
            }
            data.created.push(draft);
            Ok(format!("gcal-{}", data.created.len()))
        })
    }

    fn subscribe(
        &self,
        account: &Account,
        callback_address: &str,
    ) -> BoxFuture<'_, String, ProviderError> {
        let channel_id = format!("channel-{}-1717236000000", account.id);
        let address = callback_address.to_string();
        Box::pin(async move {
            let mut data = self.data.lock().unwrap();
            if let Some(e) = &data.subscribe_error {
                return Err(e.clone());
            }
            data.subscriptions.push(address);
            Ok(channel_id)
        })
    }
}
