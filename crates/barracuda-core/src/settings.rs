//! Site settings — a single mutable record that lives for the process
//! lifetime.
//!
//! Updates are shallow merges: a present top-level field replaces the stored
//! one, and a present option group replaces that group wholesale. Unknown
//! keys in an update are ignored (the typed fields are the allow-list).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
  pub tracking_id:      String,
  pub google_analytics: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
  pub email_on_new_contact:      bool,
  pub email_on_new_registration: bool,
  pub daily_digest:              bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSettings {
  pub telegram: String,
  pub skype:    String,
  pub email:    String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
  pub site_name:               String,
  pub site_description:        String,
  pub company_name:            String,
  pub contact_email:           String,
  pub maintenance_mode:        bool,
  pub allow_new_registrations: bool,
  pub analytics:               AnalyticsSettings,
  pub notifications:           NotificationSettings,
  pub social:                  SocialSettings,
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      site_name:               "Affiiate".to_string(),
      site_description:        "Premium Casino Affiliate Network".to_string(),
      company_name:            "Barracuda Marketing".to_string(),
      contact_email:           "contact@affiiate.com".to_string(),
      maintenance_mode:        false,
      allow_new_registrations: true,
      analytics:               AnalyticsSettings {
        tracking_id:      String::new(),
        google_analytics: false,
      },
      notifications:           NotificationSettings {
        email_on_new_contact:      true,
        email_on_new_registration: true,
        daily_digest:              false,
      },
      social:                  SocialSettings {
        telegram: "https://t.me/affiiate".to_string(),
        skype:    "live:affiiate".to_string(),
        email:    "contact@affiiate.com".to_string(),
      },
    }
  }
}

/// Partial settings update — every field optional, absent means unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
  pub site_name:               Option<String>,
  pub site_description:        Option<String>,
  pub company_name:            Option<String>,
  pub contact_email:           Option<String>,
  pub maintenance_mode:        Option<bool>,
  pub allow_new_registrations: Option<bool>,
  pub analytics:               Option<AnalyticsSettings>,
  pub notifications:           Option<NotificationSettings>,
  pub social:                  Option<SocialSettings>,
}

impl Settings {
  /// Apply a partial update in place.
  pub fn merge(&mut self, update: SettingsUpdate) {
    if let Some(v) = update.site_name {
      self.site_name = v;
    }
    if let Some(v) = update.site_description {
      self.site_description = v;
    }
    if let Some(v) = update.company_name {
      self.company_name = v;
    }
    if let Some(v) = update.contact_email {
      self.contact_email = v;
    }
    if let Some(v) = update.maintenance_mode {
      self.maintenance_mode = v;
    }
    if let Some(v) = update.allow_new_registrations {
      self.allow_new_registrations = v;
    }
    if let Some(v) = update.analytics {
      self.analytics = v;
    }
    if let Some(v) = update.notifications {
      self.notifications = v;
    }
    if let Some(v) = update.social {
      self.social = v;
    }
  }
}
