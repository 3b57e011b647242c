use super::*;

#[derive(Clone, Debug)]
pub(crate) struct Comment {
  pub(crate) author: String,
  pub(crate) avatar: Option<String>,
  pub(crate) content: String,
  pub(crate) created: String,
  pub(crate) has_replies: bool,
  pub(crate) id: u64,
  pub(crate) parent: Option<u64>,
  pub(crate) server_date: String,
}

impl From<CommentRecord> for Comment {
  fn from(record: CommentRecord) -> Self {
    let author = record
      .sender_username
      .filter(|name| !name.is_empty())
      .unwrap_or_else(|| "Anonymous".to_string());

    Self {
      author,
      avatar: record.avatar.filter(|url| !url.is_empty()),
      content: record.comment.unwrap_or_default(),
      created: record.created_date,
      has_replies: record.has_replies,
      id: record.id,
      parent: record.parent_id,
      server_date: record.server_date,
    }
  }
}
