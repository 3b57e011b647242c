use super::*;

pub(crate) enum Event {
  Replies {
    parent_id: u64,
    request_id: u64,
    result: Result<Vec<CommentRecord>>,
  },
  RootComments {
    request_id: u64,
    result: Result<Vec<CommentRecord>>,
  },
  Submitted {
    request_id: u64,
    result: Result<String>,
  },
}
