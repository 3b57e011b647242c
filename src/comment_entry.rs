use super::*;

pub(crate) struct CommentEntry {
  pub(crate) author: String,
  pub(crate) avatar: Option<String>,
  pub(crate) body: String,
  pub(crate) children: Vec<usize>,
  pub(crate) created_label: String,
  pub(crate) depth: usize,
  pub(crate) expanded: bool,
  pub(crate) has_replies: bool,
  pub(crate) id: u64,
  pub(crate) parent: Option<usize>,
}

impl CommentEntry {
  pub(crate) fn body(&self) -> &str {
    self.body.as_str()
  }

  pub(crate) fn has_loaded_replies(&self) -> bool {
    !self.children.is_empty()
  }

  pub(crate) fn header(&self) -> String {
    if self.created_label.is_empty() {
      self.author.clone()
    } else {
      format!("{} · {}", self.author, self.created_label)
    }
  }

  pub(crate) fn new(
    comment: Comment,
    depth: usize,
    date_format: DateFormat,
  ) -> Self {
    let created_label =
      format_timestamp(&comment.created, &comment.server_date, date_format);

    Self {
      author: comment.author,
      avatar: comment.avatar,
      body: sanitize_comment(&comment.content),
      children: Vec::new(),
      created_label,
      depth,
      expanded: false,
      has_replies: comment.has_replies,
      id: comment.id,
      parent: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_comment() -> Comment {
    Comment {
      author: "Bob".to_string(),
      avatar: None,
      content: "<b>hi</b> there".to_string(),
      created: "2024-05-01 10:00:00".to_string(),
      has_replies: true,
      id: 1,
      parent: None,
      server_date: "2024-05-01 12:00:00".to_string(),
    }
  }

  #[test]
  fn new_entries_start_collapsed_with_sanitized_bodies() {
    let entry = CommentEntry::new(sample_comment(), 0, DateFormat::TimeAgo);

    assert!(!entry.expanded);
    assert!(!entry.has_loaded_replies());
    assert_eq!(entry.body(), "hi there");
    assert_eq!(entry.header(), "Bob · 2 hours ago");
  }

  #[test]
  fn iso_labels_render_calendar_dates() {
    let entry = CommentEntry::new(sample_comment(), 1, DateFormat::Iso);

    assert_eq!(entry.created_label, "2024-05-01");
    assert_eq!(entry.depth, 1);
  }
}
