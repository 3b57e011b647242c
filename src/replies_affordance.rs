#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RepliesAffordance {
  Hide,
  None,
  Show,
}
