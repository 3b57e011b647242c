use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
  CancelCompose,
  HideHelp,
  LoadMore,
  None,
  OpenAvatar,
  PageDown,
  PageUp,
  Quit,
  SelectFirst,
  SelectLast,
  SelectNext,
  SelectPrevious,
  ShowHelp,
  StartCompose,
  StartReply,
  SubmitCompose,
  ToggleReplies,
}

impl Command {
  pub(crate) fn from_browse_key(key: KeyEvent) -> Self {
    let modifiers = key.modifiers;

    match key.code {
      KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit,
      KeyCode::Char('?') => Command::ShowHelp,
      KeyCode::Down | KeyCode::Char('j') => Command::SelectNext,
      KeyCode::Up | KeyCode::Char('k') => Command::SelectPrevious,
      KeyCode::PageDown => Command::PageDown,
      KeyCode::PageUp => Command::PageUp,
      KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
        Command::PageDown
      }
      KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
        Command::PageUp
      }
      KeyCode::Home => Command::SelectFirst,
      KeyCode::End => Command::SelectLast,
      KeyCode::Enter | KeyCode::Char(' ') => Command::ToggleReplies,
      KeyCode::Char('m' | 'M') => Command::LoadMore,
      KeyCode::Char('c' | 'C') => Command::StartCompose,
      KeyCode::Char('r' | 'R') => Command::StartReply,
      KeyCode::Char('o' | 'O') => Command::OpenAvatar,
      _ => Command::None,
    }
  }
}
