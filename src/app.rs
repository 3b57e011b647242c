use super::*;

pub(crate) struct App {
  client: Client,
  event_rx: UnboundedReceiver<Event>,
  event_tx: UnboundedSender<Event>,
  handle: Handle,
  state: State,
}

impl App {
  fn comment_list_item(
    thread: &ThreadView,
    idx: usize,
    available_width: u16,
  ) -> ListItem<'static> {
    let Some(entry) = thread.entry(idx) else {
      return ListItem::new(Line::raw(String::new()));
    };

    let depth_indent = "  ".repeat(entry.depth);
    let indent = format!("{BASE_INDENT}{depth_indent}");

    let mut lines = vec![Line::from(vec![
      Span::raw(indent.clone()),
      Span::styled(entry.header(), Style::default().fg(Color::White)),
    ])];

    if !entry.body().is_empty() {
      let prefix_width = indent.chars().count();

      let max_width = usize::from(available_width);
      let wrap_width = max_width.saturating_sub(prefix_width).max(1);

      for line in wrap_text(entry.body(), wrap_width) {
        lines.push(Line::from(vec![
          Span::raw(indent.clone()),
          Span::styled(line, Style::default().fg(Color::DarkGray)),
        ]));
      }
    }

    let affordance = match thread.replies_affordance(idx) {
      RepliesAffordance::Hide => Some("[-] hide replies"),
      RepliesAffordance::None => None,
      RepliesAffordance::Show => Some("[+] show replies"),
    };

    if let Some(label) = affordance {
      lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
      ]));
    }

    lines.push(Line::from(Span::raw(indent)));

    ListItem::new(lines)
  }

  fn draw(&mut self, frame: &mut Frame) {
    let layout = Layout::default()
      .direction(Direction::Vertical)
      .margin(1)
      .constraints([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
      ])
      .split(frame.area());

    self.state.set_list_height(layout[1].height as usize);

    let title = Line::from(vec![
      Span::styled(
        "backtalk",
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled(" · comments", Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(title), layout[0]);

    let show_load_more = self.state.show_load_more();

    let thread = self.state.thread();

    let (visible, selected_pos) = thread.visible_with_selection();

    let mut list_items: Vec<ListItem> = if visible.is_empty() {
      vec![ListItem::new(Line::from(vec![
        Span::raw(BASE_INDENT),
        Span::raw("No comments yet."),
      ]))]
    } else {
      visible
        .iter()
        .map(|&idx| Self::comment_list_item(thread, idx, layout[1].width))
        .collect()
    };

    if show_load_more {
      list_items.push(ListItem::new(Line::from(vec![
        Span::raw(BASE_INDENT),
        Span::styled(
          "load more comments (m)",
          Style::default().fg(Color::DarkGray),
        ),
      ])));
    }

    let offset = thread.offset.min(selected_pos.unwrap_or(0));

    let mut list_state = ListState::default()
      .with_selected(selected_pos)
      .with_offset(offset);

    let list = List::new(list_items)
      .highlight_style(
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("");

    frame.render_stateful_widget(list, layout[1], &mut list_state);

    self.state.thread_mut().offset = list_state.offset();

    let status = Paragraph::new(self.state.message().to_string())
      .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, layout[2]);

    self.state.help().draw(frame);
  }

  fn execute_effect(&mut self, effect: Effect) {
    match effect {
      Effect::FetchReplies {
        amount,
        parent_id,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        let handle = self.handle.clone();

        handle.spawn(async move {
          let _ = sender.send(Event::Replies {
            parent_id,
            request_id,
            result: client.fetch_replies(parent_id, amount).await,
          });
        });
      }
      Effect::FetchRootComments {
        amount,
        offset,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        let handle = self.handle.clone();

        handle.spawn(async move {
          let _ = sender.send(Event::RootComments {
            request_id,
            result: client.fetch_root_comments(offset, amount).await,
          });
        });
      }
      Effect::OpenUrl { url } => match webbrowser::open(&url) {
        Ok(()) => {
          self.state.set_transient_message(format!(
            "Opened in browser: {}",
            truncate(&url, 80)
          ));
        }
        Err(error) => {
          self
            .state
            .set_transient_message(format!("Could not open link: {error}"));
        }
      },
      Effect::SubmitComment {
        content,
        parent,
        request_id,
      } => {
        let (client, sender) = (self.client.clone(), self.event_tx.clone());

        let handle = self.handle.clone();

        handle.spawn(async move {
          let _ = sender.send(Event::Submitted {
            request_id,
            result: client.submit_comment(content, parent).await,
          });
        });
      }
    }
  }

  pub(crate) fn new(client: Client, state: State) -> Self {
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    Self {
      client,
      event_rx,
      event_tx,
      handle: Handle::current(),
      state,
    }
  }

  fn process_pending_events(&mut self) {
    self.state.update_transient_message();

    while let Ok(event) = self.event_rx.try_recv() {
      self.state.handle_event(event);

      // Successful submissions queue their follow-up reload here.
      for effect in self.state.take_effects() {
        self.execute_effect(effect);
      }
    }
  }

  pub(crate) fn run(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
  ) -> Result {
    loop {
      self.process_pending_events();

      terminal.draw(|frame| self.draw(frame))?;

      if !crossterm_event::poll(Duration::from_millis(200))? {
        self.process_pending_events();
        continue;
      }

      let CrosstermEvent::Key(key) = crossterm_event::read()? else {
        self.process_pending_events();
        continue;
      };

      if key.kind != KeyEventKind::Press {
        self.process_pending_events();
        continue;
      }

      let command = if self.state.help_is_visible() {
        HelpView::handle_key(key)
      } else if let Some(command) = self.state.compose_input_command(key) {
        command
      } else {
        Command::from_browse_key(key)
      };

      match self.state.dispatch_command(command) {
        Ok(dispatch) => {
          for effect in dispatch.effects {
            self.execute_effect(effect);
          }

          if dispatch.should_exit {
            break;
          }

          self.process_pending_events();
        }
        Err(error) => {
          self.state.take_effects();
          self.state.set_transient_message(format!("error: {error}"));
          self.process_pending_events();
        }
      }
    }

    Ok(())
  }
}
