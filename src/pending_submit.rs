pub(crate) struct PendingSubmit {
  pub(crate) parent: Option<u64>,
  pub(crate) request_id: u64,
}
