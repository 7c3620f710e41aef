//! In-memory store implementations.
//!
//! All three stores are constructed once at startup and threaded through the
//! server state — there is no module-level global, so tests get a fresh
//! store each. A process restart discards everything except what seeding
//! recreates.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
  Error, Result,
  admin::{Admin, NewAdmin},
  contact::{Contact, ContactPatch, LeadStatus, NewContact},
  settings::{Settings, SettingsUpdate},
  store::ContactStore,
};

// ─── Contact store ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ContactsInner {
  contacts: Vec<Contact>,
  /// Last id handed out. Strictly increasing for the process lifetime;
  /// deliberately independent of `contacts.len()` so deletions can never
  /// cause an id collision.
  next_id:  u64,
}

/// In-memory [`ContactStore`] backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
  inner: RwLock<ContactsInner>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ContactStore for MemoryStore {
  type Error = std::convert::Infallible;

  async fn append(&self, input: NewContact) -> Result<Contact, Self::Error> {
    let mut inner = self.inner.write().await;
    inner.next_id += 1;
    let contact = Contact {
      id:           inner.next_id,
      name:         input.name,
      email:        input.email,
      company:      input.company,
      contact_type: input.contact_type,
      messenger:    input.messenger,
      username:     input.username,
      message:      input.message,
      status:       LeadStatus::New,
      notes:        None,
      assigned_to:  None,
      created_at:   Utc::now(),
      updated_at:   None,
    };
    inner.contacts.push(contact.clone());
    Ok(contact)
  }

  async fn all(&self) -> Result<Vec<Contact>, Self::Error> {
    Ok(self.inner.read().await.contacts.clone())
  }

  async fn by_id(&self, id: u64) -> Result<Option<Contact>, Self::Error> {
    let inner = self.inner.read().await;
    Ok(inner.contacts.iter().find(|c| c.id == id).cloned())
  }

  async fn by_email(
    &self,
    email: &str,
  ) -> Result<Option<Contact>, Self::Error> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .contacts
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case(email))
        .cloned(),
    )
  }

  async fn update(
    &self,
    id: u64,
    patch: ContactPatch,
  ) -> Result<Option<Contact>, Self::Error> {
    let mut inner = self.inner.write().await;
    let Some(contact) = inner.contacts.iter_mut().find(|c| c.id == id) else {
      return Ok(None);
    };
    if let Some(status) = patch.status {
      contact.status = status;
    }
    if let Some(notes) = patch.notes {
      contact.notes = Some(notes);
    }
    if let Some(assigned_to) = patch.assigned_to {
      contact.assigned_to = Some(assigned_to);
    }
    contact.updated_at = Some(Utc::now());
    Ok(Some(contact.clone()))
  }

  async fn delete(&self, id: u64) -> Result<bool, Self::Error> {
    let mut inner = self.inner.write().await;
    let before = inner.contacts.len();
    inner.contacts.retain(|c| c.id != id);
    Ok(inner.contacts.len() < before)
  }
}

// ─── Admin directory ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AdminsInner {
  admins:  Vec<Admin>,
  next_id: u64,
}

/// In-memory admin-user directory. Emails are unique case-insensitively.
#[derive(Debug, Default)]
pub struct AdminDirectory {
  inner: RwLock<AdminsInner>,
}

impl AdminDirectory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create an admin. The email is stored trimmed and lower-cased; a
  /// duplicate (case-insensitive) fails with [`Error::EmailTaken`].
  pub async fn create(&self, input: NewAdmin) -> Result<Admin> {
    let email = input.email.trim().to_lowercase();
    let mut inner = self.inner.write().await;
    if inner.admins.iter().any(|a| a.email.eq_ignore_ascii_case(&email)) {
      return Err(Error::EmailTaken);
    }
    inner.next_id += 1;
    let admin = Admin {
      id:            inner.next_id,
      email,
      password_hash: input.password_hash,
      name:          input.name.trim().to_string(),
      role:          input.role,
      created_at:    Utc::now(),
      last_login:    None,
    };
    inner.admins.push(admin.clone());
    Ok(admin)
  }

  pub async fn by_id(&self, id: u64) -> Option<Admin> {
    let inner = self.inner.read().await;
    inner.admins.iter().find(|a| a.id == id).cloned()
  }

  pub async fn by_email(&self, email: &str) -> Option<Admin> {
    let inner = self.inner.read().await;
    inner
      .admins
      .iter()
      .find(|a| a.email.eq_ignore_ascii_case(email.trim()))
      .cloned()
  }

  /// Stamp `last_login` on a successful login.
  pub async fn record_login(&self, id: u64) -> Result<Admin> {
    let mut inner = self.inner.write().await;
    let admin = inner
      .admins
      .iter_mut()
      .find(|a| a.id == id)
      .ok_or(Error::AdminNotFound(id))?;
    admin.last_login = Some(Utc::now());
    Ok(admin.clone())
  }

  /// Replace the stored password hash after a verified change.
  pub async fn set_password_hash(&self, id: u64, hash: String) -> Result<()> {
    let mut inner = self.inner.write().await;
    let admin = inner
      .admins
      .iter_mut()
      .find(|a| a.id == id)
      .ok_or(Error::AdminNotFound(id))?;
    admin.password_hash = hash;
    Ok(())
  }

  /// All admins. Hashes never leave serialization anyway, but callers should
  /// treat the returned records as sensitive.
  pub async fn all(&self) -> Vec<Admin> {
    self.inner.read().await.admins.clone()
  }
}

// ─── Settings store ──────────────────────────────────────────────────────────

/// Holder for the singleton [`Settings`] record.
#[derive(Debug)]
pub struct SettingsStore {
  inner: RwLock<Settings>,
}

impl Default for SettingsStore {
  fn default() -> Self {
    SettingsStore {
      inner: RwLock::new(Settings::default()),
    }
  }
}

impl SettingsStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn get(&self) -> Settings {
    self.inner.read().await.clone()
  }

  /// Merge a partial update and return the resulting record.
  pub async fn merge(&self, update: SettingsUpdate) -> Settings {
    let mut settings = self.inner.write().await;
    settings.merge(update);
    settings.clone()
  }

  /// Restore the compiled-in defaults and return them.
  pub async fn reset(&self) -> Settings {
    let mut settings = self.inner.write().await;
    *settings = Settings::default();
    settings.clone()
  }
}
