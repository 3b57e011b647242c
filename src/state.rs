use super::*;

pub(crate) struct State {
  compose: Option<ComposeInput>,
  config: Config,
  has_more: bool,
  help: HelpView,
  list_height: usize,
  message: String,
  next_request_id: u64,
  offset: usize,
  pending_effects: Vec<Effect>,
  pending_replies: Option<PendingReplies>,
  pending_root: Option<PendingRoot>,
  pending_submit: Option<PendingSubmit>,
  thread: ThreadView,
  too_short_message: String,
  transient_message: Option<TransientMessage>,
}

impl State {
  fn apply_root_page(&mut self, records: Vec<CommentRecord>, reset: bool) {
    let count = records.len();

    let comments = records.into_iter().map(Comment::from).collect::<Vec<_>>();

    if reset {
      self.offset = count;
      self.thread.replace_roots(comments, self.config.date_format);
    } else {
      self.offset = self.offset.saturating_add(count);
      self.thread.append_roots(comments, self.config.date_format);
    }

    // One-way policy: a short page retires load-more for the whole session.
    if count < self.config.page_size {
      self.has_more = false;
    }
  }

  fn cancel_compose(&mut self) {
    if let Some(compose) = self.compose.take() {
      self.message = compose.message_backup;
    }
  }

  pub(crate) fn compose_input_command(
    &mut self,
    key: KeyEvent,
  ) -> Option<Command> {
    if self.compose.is_some() {
      Some(self.handle_compose_key(key))
    } else {
      None
    }
  }

  pub(crate) fn dispatch_command(
    &mut self,
    command: Command,
  ) -> Result<CommandDispatch> {
    debug_assert!(
      self.pending_effects.is_empty(),
      "command dispatch should start without pending effects"
    );

    let mut should_exit = false;

    match command {
      Command::Quit => {
        should_exit = true;
      }
      Command::ShowHelp => self.help.show(&mut self.message),
      Command::HideHelp => self.help.hide(&mut self.message),
      Command::SelectNext => self.select_next(),
      Command::SelectPrevious => self.thread.select_previous(),
      Command::PageDown => self.page_down(),
      Command::PageUp => self.page_up(),
      Command::SelectFirst => self.thread.select_index_at(0),
      Command::SelectLast => self.thread.select_last(),
      Command::ToggleReplies => self.toggle_replies(),
      Command::LoadMore => self.request_root(false),
      Command::StartCompose => self.start_compose(None),
      Command::StartReply => self.start_reply(),
      Command::CancelCompose => self.cancel_compose(),
      Command::SubmitCompose => self.submit_compose(),
      Command::OpenAvatar => self.open_avatar(),
      Command::None => {}
    }

    Ok(CommandDispatch {
      effects: std::mem::take(&mut self.pending_effects),
      should_exit,
    })
  }

  fn handle_compose_key(&mut self, key: KeyEvent) -> Command {
    match key.code {
      KeyCode::Esc => Command::CancelCompose,
      KeyCode::Enter => Command::SubmitCompose,
      KeyCode::Backspace => {
        if let Some(compose) = self.compose.as_mut() {
          compose.buffer.pop();
        }

        self.update_compose_message();

        Command::None
      }
      KeyCode::Char(ch) => {
        let modifiers = key.modifiers;

        if modifiers.contains(KeyModifiers::CONTROL)
          || modifiers.contains(KeyModifiers::ALT)
          || modifiers.contains(KeyModifiers::SUPER)
        {
          return Command::None;
        }

        if let Some(compose) = self.compose.as_mut() {
          compose.buffer.push(ch);
        }

        self.update_compose_message();

        Command::None
      }
      _ => Command::None,
    }
  }

  pub(crate) fn handle_event(&mut self, event: Event) {
    match event {
      Event::Replies {
        parent_id,
        request_id,
        result,
      } => {
        let Some(pending) = self.pending_replies.as_ref() else {
          return;
        };

        if pending.request_id != request_id || pending.parent_id != parent_id {
          return;
        }

        self.pending_replies = None;

        match result {
          Ok(records) => {
            let comments =
              records.into_iter().map(Comment::from).collect::<Vec<_>>();

            if let Some(parent_idx) = self.thread.find(parent_id) {
              self
                .thread
                .set_replies(parent_idx, comments, self.config.date_format);
            } else {
              tracing::debug!(
                parent_id,
                "replies arrived for a comment no longer shown"
              );
            }

            self.restore_browse_message();
          }
          Err(error) => {
            tracing::warn!(parent_id, %error, "failed to load replies");

            self.restore_browse_message();

            if !self.help.is_visible() {
              self
                .set_transient_message(format!("Could not load replies: {error}"));
            }
          }
        }
      }
      Event::RootComments { request_id, result } => {
        let Some(pending) = self.pending_root.as_ref() else {
          return;
        };

        if pending.request_id != request_id {
          return;
        }

        let Some(pending) = self.pending_root.take() else {
          return;
        };

        match result {
          Ok(records) => {
            self.apply_root_page(records, pending.reset);

            self.restore_browse_message();
          }
          Err(error) => {
            // The offset is untouched, so repeating the action retries the
            // same page.
            tracing::warn!(%error, "failed to load comments");

            self.restore_browse_message();

            if !self.help.is_visible() {
              self.set_transient_message(format!(
                "Could not load comments: {error}"
              ));
            }
          }
        }
      }
      Event::Submitted { request_id, result } => {
        let Some(pending) = self.pending_submit.as_ref() else {
          return;
        };

        if pending.request_id != request_id {
          return;
        }

        let Some(pending) = self.pending_submit.take() else {
          return;
        };

        self.restore_browse_message();

        match result {
          Ok(body) if body.trim() == SUBMIT_SUCCESS => {
            match pending.parent {
              Some(parent_id) => self.request_replies(parent_id),
              None => self.request_root(true),
            }

            if !self.help.is_visible() {
              self.set_transient_message("Comment posted".to_string());
            }
          }
          Ok(body) => {
            tracing::warn!(body = body.trim(), "backend rejected the comment");

            if !self.help.is_visible() {
              self.set_transient_message("Could not post comment".to_string());
            }
          }
          Err(error) => {
            tracing::warn!(%error, "failed to post comment");

            if !self.help.is_visible() {
              self
                .set_transient_message(format!("Could not post comment: {error}"));
            }
          }
        }
      }
    }
  }

  pub(crate) fn help(&self) -> &HelpView {
    &self.help
  }

  pub(crate) fn help_is_visible(&self) -> bool {
    self.help.is_visible()
  }

  pub(crate) fn message(&self) -> &str {
    &self.message
  }

  pub(crate) fn new(config: Config, initial: Vec<CommentRecord>) -> Self {
    let too_short_message =
      TOO_SHORT_TEMPLATE.replace("{{min}}", &config.min_chars.to_string());

    let mut state = Self {
      compose: None,
      config,
      has_more: true,
      help: HelpView::new(),
      list_height: 0,
      message: BROWSE_STATUS.into(),
      next_request_id: 0,
      offset: 0,
      pending_effects: Vec::new(),
      pending_replies: None,
      pending_root: None,
      pending_submit: None,
      thread: ThreadView::default(),
      too_short_message,
      transient_message: None,
    };

    state.apply_root_page(initial, true);

    state
  }

  fn open_avatar(&mut self) {
    let Some(entry) = self.thread.selected_entry() else {
      return;
    };

    match entry.avatar.clone() {
      Some(url) => self.pending_effects.push(Effect::OpenUrl { url }),
      None => {
        self.set_transient_message("No avatar for this comment".to_string());
      }
    }
  }

  fn page_down(&mut self) {
    let jump = self.page_jump();

    self.thread.page_down(jump);

    if self.thread.selection_is_last_visible() && self.has_more {
      self.request_root(false);
    }
  }

  fn page_jump(&self) -> usize {
    self.list_height.saturating_sub(1).max(1)
  }

  fn page_up(&mut self) {
    let jump = self.page_jump();

    self.thread.page_up(jump);
  }

  fn request_replies(&mut self, parent_id: u64) {
    if self.pending_replies.is_some() {
      return;
    }

    let request_id = self.next_request_id;

    self.next_request_id = self.next_request_id.wrapping_add(1);

    self.pending_replies = Some(PendingReplies {
      parent_id,
      request_id,
    });

    if !self.help.is_visible() && self.compose.is_none() {
      self.message = LOADING_REPLIES_STATUS.into();
    }

    self.pending_effects.push(Effect::FetchReplies {
      amount: self.config.max_replies,
      parent_id,
      request_id,
    });
  }

  fn request_root(&mut self, reset: bool) {
    // Serialized by design: a second trigger while one page is in flight is
    // dropped instead of racing the offset.
    if self.pending_root.is_some() {
      return;
    }

    if !reset && !self.has_more {
      return;
    }

    let request_id = self.next_request_id;

    self.next_request_id = self.next_request_id.wrapping_add(1);

    self.pending_root = Some(PendingRoot { request_id, reset });

    if !self.help.is_visible() && self.compose.is_none() {
      self.message = LOADING_COMMENTS_STATUS.into();
    }

    let offset = if reset { 0 } else { self.offset };

    self.pending_effects.push(Effect::FetchRootComments {
      amount: self.config.page_size,
      offset,
      request_id,
    });
  }

  fn restore_browse_message(&mut self) {
    if self.help.is_visible() {
      return;
    }

    if let Some(compose) = &self.compose {
      self.message = truncate(&compose.prompt(), 80);
    } else {
      self.message = BROWSE_STATUS.into();
    }
  }

  fn select_next(&mut self) {
    self.thread.select_next();

    if self.thread.selection_is_last_visible() && self.has_more {
      self.request_root(false);
    }
  }

  pub(crate) fn set_list_height(&mut self, height: usize) {
    self.list_height = height;
  }

  pub(crate) fn set_transient_message(&mut self, message: String) {
    let original = self.transient_message.as_ref().map_or_else(
      || self.message.clone(),
      |transient| transient.original().to_string(),
    );

    self.transient_message =
      Some(TransientMessage::new(message.clone(), original));

    self.message = message;
  }

  pub(crate) fn show_load_more(&self) -> bool {
    self.has_more && self.pending_root.is_none()
  }

  fn start_compose(&mut self, parent: Option<u64>) {
    if self.compose.is_some() {
      return;
    }

    let backup = self.message.clone();

    self.compose = Some(ComposeInput::new(backup, parent));

    self.update_compose_message();
  }

  fn start_reply(&mut self) {
    let Some(entry) = self.thread.selected_entry() else {
      return;
    };

    if entry.depth > REPLY_COMPOSE_DEPTH {
      self.set_transient_message(
        "Only top-level comments can be replied to".to_string(),
      );

      return;
    }

    let parent = Some(entry.id);

    self.start_compose(parent);
  }

  fn submit_compose(&mut self) {
    let Some(compose) = self.compose.as_ref() else {
      return;
    };

    if compose.buffer.chars().count() < self.config.min_chars {
      let message = self.too_short_message.clone();

      self.set_transient_message(message);

      return;
    }

    if self.pending_submit.is_some() {
      return;
    }

    let Some(compose) = self.compose.take() else {
      return;
    };

    let request_id = self.next_request_id;

    self.next_request_id = self.next_request_id.wrapping_add(1);

    self.pending_submit = Some(PendingSubmit {
      parent: compose.parent,
      request_id,
    });

    if !self.help.is_visible() {
      self.message = POSTING_STATUS.into();
    }

    self.pending_effects.push(Effect::SubmitComment {
      content: compose.buffer,
      parent: compose.parent,
      request_id,
    });
  }

  pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
    std::mem::take(&mut self.pending_effects)
  }

  pub(crate) fn thread(&self) -> &ThreadView {
    &self.thread
  }

  pub(crate) fn thread_mut(&mut self) -> &mut ThreadView {
    &mut self.thread
  }

  fn toggle_replies(&mut self) {
    let Some(idx) = self.thread.selected else {
      return;
    };

    let Some(entry) = self.thread.entry(idx) else {
      return;
    };

    if !entry.has_replies {
      return;
    }

    if entry.expanded {
      self.thread.collapse(idx);
      return;
    }

    // Cache by presence: replies already rendered only need to become
    // visible again.
    if entry.has_loaded_replies() {
      self.thread.expand(idx);
      return;
    }

    let parent_id = entry.id;

    self.request_replies(parent_id);
  }

  fn update_compose_message(&mut self) {
    if let Some(compose) = &self.compose {
      let prompt = compose.prompt();
      self.message = truncate(&prompt, 80);
    }
  }

  pub(crate) fn update_transient_message(&mut self) {
    if let Some(transient) = self.transient_message.clone() {
      if self.message != transient.current() {
        self.transient_message = None;
      } else if transient.is_expired() {
        self.message = transient.original().to_string();
        self.transient_message = None;
      }
    }
  }
}
