use super::*;

#[derive(Clone)]
pub(crate) struct TransientMessage {
  current: String,
  original: String,
  shown_at: Instant,
}

impl TransientMessage {
  const TTL: Duration = Duration::from_secs(3);

  pub(crate) fn current(&self) -> &str {
    &self.current
  }

  pub(crate) fn is_expired(&self) -> bool {
    self.shown_at.elapsed() >= Self::TTL
  }

  pub(crate) fn new(current: String, original: String) -> Self {
    Self {
      current,
      original,
      shown_at: Instant::now(),
    }
  }

  pub(crate) fn original(&self) -> &str {
    &self.original
  }
}
