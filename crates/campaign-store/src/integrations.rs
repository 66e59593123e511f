//! Advertising platform integration records.
//!
//! The set of platforms is fixed. Static metadata (field descriptors and
//! setup guides) is compiled in; only connection state is persisted.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Supported advertising platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformId {
    Facebook,
    Instagram,
    Linkedin,
    GoogleAds,
    Twitter,
    Tiktok,
    Youtube,
}

impl PlatformId {
    pub const ALL: [PlatformId; 7] = [
        PlatformId::Facebook,
        PlatformId::Instagram,
        PlatformId::Linkedin,
        PlatformId::GoogleAds,
        PlatformId::Twitter,
        PlatformId::Tiktok,
        PlatformId::Youtube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Facebook => "facebook",
            PlatformId::Instagram => "instagram",
            PlatformId::Linkedin => "linkedin",
            PlatformId::GoogleAds => "google_ads",
            PlatformId::Twitter => "twitter",
            PlatformId::Tiktok => "tiktok",
            PlatformId::Youtube => "youtube",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Input kind of a credential field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Password,
    Url,
}

/// Describes one credential a platform needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub placeholder: String,
    pub description: String,
    pub required: bool,
}

/// Setup instructions for a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationGuide {
    pub title: String,
    pub steps: Vec<String>,
    pub docs_url: String,
}

/// A platform integration and its connection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: PlatformId,
    pub name: String,
    pub is_connected: bool,
    #[serde(default)]
    pub config: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<i64>,
    pub fields: Vec<IntegrationField>,
    pub guide: IntegrationGuide,
}

impl Integration {
    /// Keys of required fields that are missing or blank in `config`.
    pub fn missing_required(&self, config: &IndexMap<String, String>) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| config.get(&f.key).map_or(true, |v| v.trim().is_empty()))
            .map(|f| f.key.clone())
            .collect()
    }
}

/// Connection state as persisted. Unknown keys in saved records are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavedIntegration {
    pub id: String,
    #[serde(default)]
    pub is_connected: bool,
    #[serde(default)]
    pub config: IndexMap<String, String>,
    #[serde(default)]
    pub last_sync: Option<i64>,
}

/// Overlay saved connection state onto the compiled-in defaults.
///
/// Saved records for platforms that no longer exist are dropped.
pub(crate) fn merge_saved(saved: &[SavedIntegration]) -> Vec<Integration> {
    default_integrations()
        .into_iter()
        .map(|mut integration| {
            if let Some(state) = saved.iter().find(|s| s.id == integration.id.as_str()) {
                integration.is_connected = state.is_connected;
                integration.config = state.config.clone();
                integration.last_sync = state.last_sync;
            }
            integration
        })
        .collect()
}

fn field(key: &str, label: &str, kind: FieldKind, placeholder: &str, description: &str, required: bool) -> IntegrationField {
    IntegrationField {
        key: key.to_string(),
        label: label.to_string(),
        kind,
        placeholder: placeholder.to_string(),
        description: description.to_string(),
        required,
    }
}

fn guide(title: &str, docs_url: &str, steps: &[&str]) -> IntegrationGuide {
    IntegrationGuide {
        title: title.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        docs_url: docs_url.to_string(),
    }
}

fn integration(id: PlatformId, name: &str, fields: Vec<IntegrationField>, guide: IntegrationGuide) -> Integration {
    Integration {
        id,
        name: name.to_string(),
        is_connected: false,
        config: IndexMap::new(),
        last_sync: None,
        fields,
        guide,
    }
}

/// The seeded integration list, all disconnected.
pub fn default_integrations() -> Vec<Integration> {
    use FieldKind::{Password, Text};

    vec![
        integration(
            PlatformId::Facebook,
            "Facebook Ads",
            vec![
                field("adAccountId", "Ad Account ID", Text, "act_123456789", "Your Business Manager Ad Account ID.", true),
                field("accessToken", "System User Access Token", Password, "EAA...", "A permanent token with \"ads_management\" permission.", true),
                field("pixelId", "Pixel ID (Optional)", Text, "12345...", "For tracking conversion events.", false),
            ],
            guide(
                "Meta Graph API Setup",
                "https://developers.facebook.com/docs/marketing-api/get-started",
                &[
                    "Open Business Settings and select your Business Portfolio.",
                    "Under Users > System Users, add an admin system user.",
                    "Generate a token for your app with \"ads_management\" and \"ads_read\".",
                    "Paste the access token here.",
                    "Copy the Ad Account ID (starts with act_) from Ad Account settings.",
                ],
            ),
        ),
        integration(
            PlatformId::Instagram,
            "Instagram Business",
            vec![
                field("igUserId", "Instagram User ID", Text, "17841...", "The ID of the IG Business account connected to your Page.", true),
                field("facebookPageId", "Linked Facebook Page ID", Text, "1000...", "The Facebook Page backing this IG account.", true),
            ],
            guide(
                "Instagram Graph API",
                "https://developers.facebook.com/docs/instagram-api/getting-started",
                &[
                    "Make sure the Instagram account is a Professional account linked to a Facebook Page.",
                    "Reuse the Facebook Ads token if it covers Instagram permissions.",
                    "Query \"me/accounts?fields=instagram_business_account\" in the Graph API Explorer.",
                    "Enter the returned instagram_business_account ID.",
                ],
            ),
        ),
        integration(
            PlatformId::Linkedin,
            "LinkedIn Ads",
            vec![
                field("clientId", "Client ID", Text, "86...", "From LinkedIn Developer Portal.", true),
                field("clientSecret", "Client Secret", Password, "...", "App secret key.", true),
                field("adAccountId", "Ad Account URN", Text, "urn:li:sponsoredAccount:123", "Your advertising account identifier.", true),
            ],
            guide(
                "LinkedIn Marketing API",
                "https://www.linkedin.com/developers/apps",
                &[
                    "Create an app in the LinkedIn Developer Portal.",
                    "Request access to the Marketing Developer Platform product.",
                    "Copy the Client ID and Client Secret from the Auth tab.",
                    "Format the Campaign Manager account number as \"urn:li:sponsoredAccount:123\".",
                ],
            ),
        ),
        integration(
            PlatformId::GoogleAds,
            "Google Ads",
            vec![
                field("customerId", "Customer ID", Text, "123-456-7890", "Your Google Ads account number (dashes allowed).", true),
                field("developerToken", "Developer Token", Password, "...", "Token from your Manager Account (MCC).", true),
            ],
            guide(
                "Google Ads API Setup",
                "https://developers.google.com/google-ads/api/docs/first-call/overview",
                &[
                    "Sign in to a Google Ads Manager Account (MCC).",
                    "Open Tools & Settings > Setup > API Center.",
                    "Apply for a Developer Token.",
                    "Copy the 10-digit Customer ID from the dashboard header.",
                ],
            ),
        ),
        integration(
            PlatformId::Twitter,
            "X (Twitter) Ads",
            vec![
                field("apiKey", "API Key", Text, "...", "Consumer Key from Developer Portal.", true),
                field("apiSecret", "API Secret", Password, "...", "Consumer Secret.", true),
                field("adAccountId", "Ads Account ID", Text, "18ce...", "Base-36 Account ID.", true),
            ],
            guide(
                "X Ads API Access",
                "https://developer.twitter.com/en/docs/twitter-ads-api/getting-started",
                &[
                    "Apply for Ads API access in the developer portal.",
                    "Create a Project and App to obtain keys and tokens.",
                    "Read the Ads Account ID from the Ads Manager URL.",
                ],
            ),
        ),
        integration(
            PlatformId::Tiktok,
            "TikTok Ads",
            vec![
                field("appId", "App ID", Text, "...", "From TikTok for Business Developers.", true),
                field("accessToken", "Access Token", Password, "...", "Long-lived access token.", true),
                field("advertiserId", "Advertiser ID", Text, "...", "Target ad account ID.", true),
            ],
            guide(
                "TikTok Marketing API",
                "https://ads.tiktok.com/marketing_api/docs",
                &[
                    "Register as a developer on TikTok for Business.",
                    "Create an app with the Marketing API scope.",
                    "Generate an access token for your own account.",
                    "Copy the Advertiser ID from Ads Manager.",
                ],
            ),
        ),
        integration(
            PlatformId::Youtube,
            "YouTube",
            vec![
                field("channelId", "Channel ID", Text, "UC...", "Your YouTube Channel ID.", true),
                field("clientId", "OAuth Client ID", Text, "...", "From Google Cloud Console.", true),
            ],
            guide(
                "YouTube Data API",
                "https://console.cloud.google.com/apis/library/youtube.googleapis.com",
                &[
                    "Enable YouTube Data API v3 in Google Cloud Console.",
                    "Create OAuth 2.0 credentials.",
                    "Find the Channel ID under YouTube Studio > Settings > Channel > Advanced.",
                ],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_platform() {
        let defaults = default_integrations();
        assert_eq!(defaults.len(), PlatformId::ALL.len());
        for (integration, id) in defaults.iter().zip(PlatformId::ALL) {
            assert_eq!(integration.id, id);
            assert!(!integration.is_connected);
            assert!(integration.fields.iter().any(|f| f.required));
        }
    }

    #[test]
    fn test_platform_id_serde() {
        let json = serde_json::to_string(&PlatformId::GoogleAds).unwrap();
        assert_eq!(json, "\"google_ads\"");
        assert_eq!("tiktok".parse::<PlatformId>(), Ok(PlatformId::Tiktok));
    }

    #[test]
    fn test_merge_saved_overlays_state() {
        let saved: Vec<SavedIntegration> = serde_json::from_str(
            r#"[
                {"id": "linkedin", "name": "Renamed", "isConnected": true,
                 "config": {"clientId": "abc"}, "lastSync": 42},
                {"id": "myspace", "isConnected": true}
            ]"#,
        )
        .unwrap();

        let merged = merge_saved(&saved);
        assert_eq!(merged.len(), 7);
        let linkedin = merged.iter().find(|i| i.id == PlatformId::Linkedin).unwrap();
        assert!(linkedin.is_connected);
        assert_eq!(linkedin.name, "LinkedIn Ads");
        assert_eq!(linkedin.config.get("clientId").map(String::as_str), Some("abc"));
        assert_eq!(linkedin.last_sync, Some(42));
    }

    #[test]
    fn test_missing_required() {
        let youtube = default_integrations()
            .into_iter()
            .find(|i| i.id == PlatformId::Youtube)
            .unwrap();
        let mut config = IndexMap::new();
        config.insert("channelId".to_string(), "UC1".to_string());
        config.insert("clientId".to_string(), "  ".to_string());
        assert_eq!(youtube.missing_required(&config), vec!["clientId".to_string()]);
    }
}
