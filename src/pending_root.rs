pub(crate) struct PendingRoot {
  pub(crate) request_id: u64,
  pub(crate) reset: bool,
}
