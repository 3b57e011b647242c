use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DateFormat {
  Iso,
  TimeAgo,
}

impl FromStr for DateFormat {
  type Err = anyhow::Error;

  fn from_str(value: &str) -> Result<Self> {
    match value {
      "ISO" | "iso" => Ok(DateFormat::Iso),
      "timeAgo" | "timeago" => Ok(DateFormat::TimeAgo),
      other => Err(anyhow!(
        "invalid date format `{other}`, expected `ISO` or `timeAgo`"
      )),
    }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct Config {
  pub(crate) date_format: DateFormat,
  pub(crate) endpoint: String,
  pub(crate) game_id: String,
  pub(crate) max_replies: usize,
  pub(crate) min_chars: usize,
  pub(crate) page_size: usize,
}

impl Config {
  const DEFAULT_DATE_FORMAT: &str = "timeAgo";
  const DEFAULT_MAX_REPLIES: usize = 10;
  const DEFAULT_MIN_CHARS: usize = 3;
  const DEFAULT_PAGE_SIZE: usize = 5;

  pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let endpoint = lookup("BACKTALK_ENDPOINT")
      .context("BACKTALK_ENDPOINT must point at the comment endpoint")?;

    let game_id = lookup("BACKTALK_GAME_ID")
      .context("BACKTALK_GAME_ID must name the board to read")?;

    let page_size =
      Self::positive_number(&lookup, "BACKTALK_PAGE_SIZE", Self::DEFAULT_PAGE_SIZE)?;

    let max_replies = Self::positive_number(
      &lookup,
      "BACKTALK_MAX_REPLIES",
      Self::DEFAULT_MAX_REPLIES,
    )?;

    let min_chars = match lookup("BACKTALK_MIN_CHARS") {
      Some(value) => value
        .parse()
        .with_context(|| format!("BACKTALK_MIN_CHARS is not a number: `{value}`"))?,
      None => Self::DEFAULT_MIN_CHARS,
    };

    let date_format = lookup("BACKTALK_DATE_FORMAT")
      .unwrap_or_else(|| Self::DEFAULT_DATE_FORMAT.to_string())
      .parse()
      .context("BACKTALK_DATE_FORMAT is not a supported mode")?;

    Ok(Self {
      date_format,
      endpoint,
      game_id,
      max_replies,
      min_chars,
      page_size,
    })
  }

  pub(crate) fn load() -> Result<Self> {
    Self::from_lookup(|name| env::var(name).ok())
  }

  fn positive_number<F>(lookup: F, name: &str, default: usize) -> Result<usize>
  where
    F: Fn(&str) -> Option<String>,
  {
    let Some(value) = lookup(name) else {
      return Ok(default);
    };

    let parsed = value
      .parse::<usize>()
      .with_context(|| format!("{name} is not a number: `{value}`"))?;

    if parsed == 0 {
      return Err(anyhow!("{name} must be at least 1"));
    }

    Ok(parsed)
  }
}

#[cfg(test)]
mod tests {
  use {super::*, std::collections::HashMap};

  fn lookup_from(
    pairs: &[(&str, &str)],
  ) -> impl Fn(&str) -> Option<String> + use<> {
    let map = pairs
      .iter()
      .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
      .collect::<HashMap<_, _>>();

    move |name: &str| map.get(name).cloned()
  }

  fn required() -> Vec<(&'static str, &'static str)> {
    vec![
      ("BACKTALK_ENDPOINT", "https://example.com/comments.php"),
      ("BACKTALK_GAME_ID", "42"),
    ]
  }

  #[test]
  fn defaults_match_the_widget_construction_defaults() {
    let config = Config::from_lookup(lookup_from(&required())).unwrap();

    assert_eq!(config.page_size, 5);
    assert_eq!(config.max_replies, 10);
    assert_eq!(config.min_chars, 3);
    assert_eq!(config.date_format, DateFormat::TimeAgo);
  }

  #[test]
  fn explicit_values_override_defaults() {
    let mut pairs = required();
    pairs.push(("BACKTALK_PAGE_SIZE", "12"));
    pairs.push(("BACKTALK_DATE_FORMAT", "ISO"));

    let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

    assert_eq!(config.page_size, 12);
    assert_eq!(config.date_format, DateFormat::Iso);
  }

  #[test]
  fn missing_endpoint_is_an_error() {
    let error = Config::from_lookup(lookup_from(&[("BACKTALK_GAME_ID", "42")]))
      .unwrap_err();

    assert!(error.to_string().contains("BACKTALK_ENDPOINT"));
  }

  #[test]
  fn unknown_date_format_fails_at_load() {
    let mut pairs = required();
    pairs.push(("BACKTALK_DATE_FORMAT", "relative"));

    assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
  }

  #[test]
  fn zero_page_size_is_rejected() {
    let mut pairs = required();
    pairs.push(("BACKTALK_PAGE_SIZE", "0"));

    assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
  }
}
