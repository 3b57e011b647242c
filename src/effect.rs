#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
  FetchReplies {
    amount: usize,
    parent_id: u64,
    request_id: u64,
  },
  FetchRootComments {
    amount: usize,
    offset: usize,
    request_id: u64,
  },
  OpenUrl {
    url: String,
  },
  SubmitComment {
    content: String,
    parent: Option<u64>,
    request_id: u64,
  },
}
