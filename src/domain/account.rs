//! User profile, login grant, rewards and FAQ entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cached profile persisted next to the auth token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub user_status: Option<String>,
}

impl UserProfile {
    /// Name for greetings: full name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return Some(full);
        }
        self.user_name
            .clone()
            .or_else(|| self.email.clone())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Credentials and profile returned by a successful login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<String>,
    pub profile: Option<UserProfile>,
}

/// Calendar date as the profile endpoints encode it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOfBirth {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Full account details from `/user/v1/getinfo`.
///
/// Unknown fields are kept so an edit round-trips everything the backend
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<DateOfBirth>,
    pub user_status: String,
    pub is_masked_email: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields a user may change through `/user/v1/editinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfileEdit {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }

    /// Apply the edit on top of the fetched info.
    #[must_use]
    pub fn apply(&self, mut info: UserInfo) -> UserInfo {
        if let Some(username) = &self.username {
            info.username = username.clone();
        }
        if let Some(first) = &self.first_name {
            info.first_name = first.clone();
        }
        if let Some(last) = &self.last_name {
            info.last_name = last.clone();
        }
        info
    }
}

/// Reward category as named by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewardCategory {
    Login,
    PredictionStreak,
    Unspecified,
}

impl RewardCategory {
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().trim_start_matches("REWARDCATEGORY_TYPE_") {
            "LOGIN" => Self::Login,
            "PREDICTIONSTREAK" => Self::PredictionStreak,
            _ => Self::Unspecified,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Daily login",
            Self::PredictionStreak => "Prediction streak",
            Self::Unspecified => "Other",
        }
    }
}

/// One reward line from `/user/v1/getrewards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub category: RewardCategory,
    pub last_rewarded_at: Option<String>,
    pub base_amt: Decimal,
    pub multiplier: Decimal,
}

impl Reward {
    /// Amount credited per reward: base × multiplier.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.base_amt * self.multiplier
    }
}

/// One FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn display_name_prefers_full_name() {
        let profile = UserProfile {
            first_name: Some("Asha".into()),
            last_name: Some(" ".into()),
            user_name: Some("asha99".into()),
            ..UserProfile::default()
        };
        assert_eq!(profile.display_name().as_deref(), Some("Asha"));

        let profile = UserProfile {
            email: Some("a@b.c".into()),
            ..UserProfile::default()
        };
        assert_eq!(profile.display_name().as_deref(), Some("a@b.c"));
    }

    #[test]
    fn user_info_keeps_unknown_fields() {
        let info: UserInfo = serde_json::from_value(json!({
            "username": "asha",
            "email": "a@b.c",
            "firstName": "Asha",
            "referralCode": "XYZ",
        }))
        .unwrap();
        let edited = ProfileEdit {
            last_name: Some("Rao".into()),
            ..ProfileEdit::default()
        }
        .apply(info);
        let back = serde_json::to_value(&edited).unwrap();
        assert_eq!(back["referralCode"], "XYZ");
        assert_eq!(back["lastName"], "Rao");
        assert_eq!(back["firstName"], "Asha");
    }

    #[test]
    fn reward_amount_multiplies() {
        let reward = Reward {
            category: RewardCategory::from_wire("REWARDCATEGORY_TYPE_LOGIN"),
            last_rewarded_at: None,
            base_amt: dec!(2.5),
            multiplier: dec!(3),
        };
        assert_eq!(reward.category, RewardCategory::Login);
        assert_eq!(reward.amount(), dec!(7.5));
    }
}
