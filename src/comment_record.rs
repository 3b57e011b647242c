use super::*;

#[derive(Debug, Deserialize)]
pub(crate) struct CommentRecord {
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) avatar: Option<String>,
  #[serde(default)]
  pub(crate) comment: Option<String>,
  #[serde(default)]
  pub(crate) created_date: String,
  #[serde(default, deserialize_with = "deserialize_flexible_bool")]
  pub(crate) has_replies: bool,
  #[serde(deserialize_with = "deserialize_lenient_u64")]
  pub(crate) id: u64,
  #[serde(default, deserialize_with = "deserialize_optional_u64")]
  pub(crate) parent_id: Option<u64>,
  #[serde(default, deserialize_with = "deserialize_optional_string")]
  pub(crate) sender_username: Option<String>,
  #[serde(default)]
  pub(crate) server_date: String,
}
