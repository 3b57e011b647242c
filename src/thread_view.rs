use super::*;

pub(crate) struct ThreadView {
  pub(crate) entries: Vec<CommentEntry>,
  pub(crate) offset: usize,
  pub(crate) selected: Option<usize>,
}

impl Default for ThreadView {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
      offset: 0,
      selected: None,
    }
  }
}

impl ThreadView {
  pub(crate) fn append_roots(
    &mut self,
    comments: Vec<Comment>,
    date_format: DateFormat,
  ) {
    self.entries.extend(
      comments
        .into_iter()
        .map(|comment| CommentEntry::new(comment, 0, date_format)),
    );

    self.relink();

    if self.selected.is_none() && !self.entries.is_empty() {
      self.selected = Some(0);
    }
  }

  pub(crate) fn collapse(&mut self, idx: usize) {
    if let Some(entry) = self.entries.get_mut(idx) {
      entry.expanded = false;
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn ensure_selection_visible(&mut self) {
    let mut current = self.selected;

    while let Some(idx) = current {
      if self.is_visible(idx) {
        self.selected = Some(idx);
        return;
      }

      current = self.entries.get(idx).and_then(|entry| entry.parent);
    }

    self.selected = self.visible_indexes().first().copied();
  }

  pub(crate) fn entry(&self, idx: usize) -> Option<&CommentEntry> {
    self.entries.get(idx)
  }

  pub(crate) fn expand(&mut self, idx: usize) {
    if let Some(entry) = self.entries.get_mut(idx) {
      entry.expanded = true;
    }
  }

  pub(crate) fn find(&self, id: u64) -> Option<usize> {
    self.entries.iter().position(|entry| entry.id == id)
  }

  pub(crate) fn is_visible(&self, idx: usize) -> bool {
    let mut current = Some(idx);

    while let Some(i) = current {
      if let Some(parent) = self.entries.get(i).and_then(|entry| entry.parent) {
        if let Some(parent_entry) = self.entries.get(parent)
          && !parent_entry.expanded
        {
          return false;
        }

        current = Some(parent);
      } else {
        break;
      }
    }

    true
  }

  pub(crate) fn move_by(&mut self, delta: isize) {
    let (visible, selected_pos) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let current = selected_pos.unwrap_or(0);
    let max_index = visible.len().saturating_sub(1);

    let target = if delta >= 0 {
      let delta_usize = usize::try_from(delta).unwrap_or(usize::MAX);
      current.saturating_add(delta_usize).min(max_index)
    } else {
      let magnitude = delta
        .checked_abs()
        .and_then(|value| usize::try_from(value).ok())
        .unwrap_or(usize::MAX);

      current.saturating_sub(magnitude)
    };

    self.selected = Some(visible[target]);
  }

  pub(crate) fn page_down(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    let delta = isize::try_from(step).unwrap_or(isize::MAX);
    self.move_by(delta);
  }

  pub(crate) fn page_up(&mut self, amount: usize) {
    let step = amount.saturating_sub(1).max(1);
    let delta = isize::try_from(step).unwrap_or(isize::MAX);
    self.move_by(-delta);
  }

  fn relink(&mut self) {
    let mut ancestors: Vec<usize> = Vec::new();

    for idx in 0..self.entries.len() {
      let depth = self.entries[idx].depth;

      while ancestors.len() > depth {
        ancestors.pop();
      }

      let parent = ancestors.last().copied();

      self.entries[idx].parent = parent;
      self.entries[idx].children.clear();

      if let Some(parent) = parent {
        self.entries[parent].children.push(idx);
      }

      ancestors.push(idx);
    }
  }

  pub(crate) fn replace_roots(
    &mut self,
    comments: Vec<Comment>,
    date_format: DateFormat,
  ) {
    self.entries = comments
      .into_iter()
      .map(|comment| CommentEntry::new(comment, 0, date_format))
      .collect();

    self.relink();

    self.offset = 0;
    self.selected = if self.entries.is_empty() { None } else { Some(0) };
  }

  pub(crate) fn replies_affordance(&self, idx: usize) -> RepliesAffordance {
    match self.entries.get(idx) {
      Some(entry) if entry.has_replies => {
        if entry.expanded {
          RepliesAffordance::Hide
        } else {
          RepliesAffordance::Show
        }
      }
      _ => RepliesAffordance::None,
    }
  }

  pub(crate) fn select_index_at(&mut self, pos: usize) {
    let (visible, _) = self.visible_with_selection();

    if visible.is_empty() {
      self.selected = None;
      return;
    }

    let index = pos.min(visible.len().saturating_sub(1));

    self.selected = Some(visible[index]);
  }

  pub(crate) fn select_last(&mut self) {
    let (visible, _) = self.visible_with_selection();

    if !visible.is_empty() {
      self.select_index_at(visible.len().saturating_sub(1));
    }
  }

  pub(crate) fn select_next(&mut self) {
    self.move_by(1);
  }

  pub(crate) fn select_previous(&mut self) {
    self.move_by(-1);
  }

  pub(crate) fn selected_entry(&self) -> Option<&CommentEntry> {
    self.selected.and_then(|idx| self.entries.get(idx))
  }

  pub(crate) fn selection_is_last_visible(&self) -> bool {
    let (visible, selected_pos) = self.visible_with_selection();

    match (visible.len(), selected_pos) {
      (0, _) => true,
      (count, Some(pos)) => pos + 1 == count,
      _ => false,
    }
  }

  pub(crate) fn set_replies(
    &mut self,
    parent_idx: usize,
    comments: Vec<Comment>,
    date_format: DateFormat,
  ) {
    let Some(parent_entry) = self.entries.get(parent_idx) else {
      return;
    };

    let parent_depth = parent_entry.depth;
    let start = parent_idx + 1;

    let mut end = start;

    while self
      .entries
      .get(end)
      .is_some_and(|entry| entry.depth > parent_depth)
    {
      end += 1;
    }

    let child_depth = parent_depth + 1;

    let replies = comments
      .into_iter()
      .map(|comment| CommentEntry::new(comment, child_depth, date_format))
      .collect::<Vec<_>>();

    let removed = end - start;
    let added = replies.len();

    match self.selected {
      Some(selected) if selected >= start && selected < end => {
        self.selected = Some(parent_idx);
      }
      Some(selected) if selected >= end => {
        self.selected = Some(selected - removed + added);
      }
      _ => {}
    }

    self.entries.splice(start..end, replies);

    self.relink();

    if let Some(entry) = self.entries.get_mut(parent_idx) {
      entry.expanded = true;
    }

    self.ensure_selection_visible();
  }

  pub(crate) fn visible_indexes(&self) -> Vec<usize> {
    let mut visible = Vec::new();

    for idx in 0..self.entries.len() {
      if self.is_visible(idx) {
        visible.push(idx);
      }
    }

    visible
  }

  pub(crate) fn visible_with_selection(&self) -> (Vec<usize>, Option<usize>) {
    let visible = self.visible_indexes();

    let selected_pos = self
      .selected
      .and_then(|selected| visible.iter().position(|&idx| idx == selected));

    (visible, selected_pos)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_comment(id: u64, has_replies: bool) -> Comment {
    Comment {
      author: format!("user{id}"),
      avatar: None,
      content: format!("comment {id}"),
      created: "2024-05-01 10:00:00".to_string(),
      has_replies,
      id,
      parent: None,
      server_date: "2024-05-01 12:00:00".to_string(),
    }
  }

  fn make_view() -> ThreadView {
    let mut view = ThreadView::default();

    view.replace_roots(
      vec![make_comment(1, true), make_comment(2, false)],
      DateFormat::Iso,
    );

    view
  }

  #[test]
  fn leafless_comments_expose_no_replies_affordance() {
    let view = make_view();

    assert_eq!(view.replies_affordance(0), RepliesAffordance::Show);
    assert_eq!(view.replies_affordance(1), RepliesAffordance::None);
  }

  #[test]
  fn exactly_one_affordance_shows_per_expandable_comment() {
    let mut view = make_view();

    view.set_replies(0, vec![make_comment(10, false)], DateFormat::Iso);
    assert_eq!(view.replies_affordance(0), RepliesAffordance::Hide);

    view.collapse(0);
    assert_eq!(view.replies_affordance(0), RepliesAffordance::Show);
  }

  #[test]
  fn set_replies_inserts_children_after_the_parent() {
    let mut view = make_view();

    view.set_replies(
      0,
      vec![make_comment(10, false), make_comment(11, false)],
      DateFormat::Iso,
    );

    assert_eq!(view.entries.len(), 4);
    assert_eq!(view.entries[1].id, 10);
    assert_eq!(view.entries[1].depth, 1);
    assert_eq!(view.entries[1].parent, Some(0));
    assert_eq!(view.entries[0].children, vec![1, 2]);
    assert_eq!(view.entries[3].id, 2);
    assert_eq!(view.entries[3].parent, None);
  }

  #[test]
  fn set_replies_replaces_previous_children() {
    let mut view = make_view();

    view.set_replies(0, vec![make_comment(10, false)], DateFormat::Iso);
    view.set_replies(0, vec![make_comment(11, false), make_comment(12, false)], DateFormat::Iso);

    assert_eq!(view.entries.len(), 4);
    assert_eq!(view.entries[1].id, 11);
    assert_eq!(view.entries[2].id, 12);
  }

  #[test]
  fn collapsed_children_are_retained_but_invisible() {
    let mut view = make_view();

    view.set_replies(0, vec![make_comment(10, false)], DateFormat::Iso);
    assert_eq!(view.visible_indexes(), vec![0, 1, 2]);

    view.collapse(0);
    assert_eq!(view.visible_indexes(), vec![0, 2]);
    assert!(view.entries[0].has_loaded_replies());
  }

  #[test]
  fn collapsing_promotes_a_hidden_selection_to_the_parent() {
    let mut view = make_view();

    view.set_replies(0, vec![make_comment(10, false)], DateFormat::Iso);
    view.select_index_at(1);
    assert_eq!(view.selected, Some(1));

    view.collapse(0);
    assert_eq!(view.selected, Some(0));
  }

  #[test]
  fn selection_past_replaced_children_is_adjusted() {
    let mut view = make_view();

    view.select_index_at(1);
    assert_eq!(view.selected, Some(1));

    view.set_replies(0, vec![make_comment(10, false)], DateFormat::Iso);

    assert_eq!(view.selected, Some(2));
    assert_eq!(view.entries[2].id, 2);
  }

  #[test]
  fn selection_is_last_visible_tracks_the_bottom_row() {
    let mut view = make_view();

    assert!(!view.selection_is_last_visible());

    view.select_last();
    assert!(view.selection_is_last_visible());
  }

  #[test]
  fn empty_reply_pages_leave_the_cache_empty() {
    let mut view = make_view();

    view.set_replies(0, Vec::new(), DateFormat::Iso);

    assert!(view.entries[0].expanded);
    assert!(!view.entries[0].has_loaded_replies());
  }
}
