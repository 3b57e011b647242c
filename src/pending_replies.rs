pub(crate) struct PendingReplies {
  pub(crate) parent_id: u64,
  pub(crate) request_id: u64,
}
