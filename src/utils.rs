use super::*;

pub(crate) fn deserialize_flexible_bool<'de, D>(
  deserializer: D,
) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;

  match value {
    None | Some(Value::Null) => Ok(false),
    Some(Value::Bool(flag)) => Ok(flag),
    Some(Value::Number(number)) => {
      Ok(number.as_f64().is_some_and(|number| number != 0.0))
    }
    Some(Value::String(text)) => match text.trim() {
      "" | "0" | "false" => Ok(false),
      "1" | "true" => Ok(true),
      other => Err(de::Error::invalid_value(
        Unexpected::Str(other),
        &"a boolean flag",
      )),
    },
    Some(Value::Array(_)) => {
      Err(de::Error::invalid_type(Unexpected::Seq, &"a boolean flag"))
    }
    Some(Value::Object(_)) => {
      Err(de::Error::invalid_type(Unexpected::Map, &"a boolean flag"))
    }
  }
}

pub(crate) fn deserialize_lenient_u64<'de, D>(
  deserializer: D,
) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;

  u64_from_value(&value)
}

pub(crate) fn deserialize_optional_string<'de, D>(
  deserializer: D,
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;

  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(Value::Bool(b)) => Err(de::Error::invalid_type(
      Unexpected::Bool(b),
      &"string or number",
    )),
    Some(Value::Array(_)) => Err(de::Error::invalid_type(
      Unexpected::Seq,
      &"string or number",
    )),
    Some(Value::Object(_)) => Err(de::Error::invalid_type(
      Unexpected::Map,
      &"string or number",
    )),
  }
}

pub(crate) fn deserialize_optional_u64<'de, D>(
  deserializer: D,
) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;

  match value {
    None | Some(Value::Null) => Ok(None),
    Some(value) => u64_from_value(&value).map(Some),
  }
}

pub(crate) fn format_timestamp(
  created: &str,
  reference: &str,
  format: DateFormat,
) -> String {
  let Some(created_at) = parse_timestamp(created) else {
    tracing::warn!(created, "unparseable comment timestamp");
    return created.to_string();
  };

  match format {
    DateFormat::Iso => created_at.format("%Y-%m-%d").to_string(),
    DateFormat::TimeAgo => {
      let Some(reference_at) = parse_timestamp(reference) else {
        tracing::warn!(reference, "unparseable server reference time");
        return created.to_string();
      };

      time_ago(
        reference_at
          .signed_duration_since(created_at)
          .num_seconds(),
      )
    }
  }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
  if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
    return Some(parsed.naive_utc());
  }

  NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok()
}

pub(crate) fn sanitize_comment(text: &str) -> String {
  let mut stripped = String::with_capacity(text.len());
  let mut inside_tag = false;

  for ch in text.chars() {
    match ch {
      '<' => {
        inside_tag = true;
        stripped.push(' ');
      }
      '>' => inside_tag = false,
      _ if inside_tag => {}
      _ => stripped.push(ch),
    }
  }

  let decoded = html_escape::decode_html_entities(&stripped);

  decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn time_ago(seconds: i64) -> String {
  fn band(count: i64, unit: &str) -> String {
    if count == 1 {
      format!("1 {unit} ago")
    } else {
      format!("{count} {unit}s ago")
    }
  }

  let seconds = seconds.max(0);

  let years = seconds / (3600 * 24 * 365);
  let months = seconds / (3600 * 24 * 30);
  let days = seconds / (3600 * 24);
  let hours = seconds / 3600;
  let minutes = seconds / 60;

  if years > 0 {
    band(years, "year")
  } else if months > 0 {
    band(months, "month")
  } else if days > 0 {
    band(days, "day")
  } else if hours > 0 {
    band(hours, "hour")
  } else if minutes > 0 {
    band(minutes, "minute")
  } else {
    "just now".to_string()
  }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
  if text.chars().count() <= max_chars {
    return text.to_string();
  }

  let truncated = text.chars().take(max_chars).collect::<String>();

  format!("{}...", truncated.trim_end())
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
  if text.is_empty() {
    return Vec::new();
  }

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_width = 0;

  for word in text.split_whitespace() {
    let word_width = word.chars().count();

    if current.is_empty() {
      current.push_str(word);
      current_width = word_width;
    } else if current_width + 1 + word_width <= width {
      current.push(' ');
      current.push_str(word);
      current_width += 1 + word_width;
    } else {
      lines.push(current);
      current = word.to_string();
      current_width = word_width;
    }
  }

  if !current.is_empty() {
    lines.push(current);
  }

  if lines.is_empty() {
    vec![text.to_string()]
  } else {
    lines
  }
}

fn u64_from_value<E>(value: &Value) -> Result<u64, E>
where
  E: de::Error,
{
  match value {
    Value::Number(number) => number.as_u64().ok_or_else(|| {
      de::Error::invalid_value(
        Unexpected::Other("non-integer number"),
        &"an unsigned integer id",
      )
    }),
    Value::String(text) => text.trim().parse().map_err(|_| {
      de::Error::invalid_value(Unexpected::Str(text), &"an unsigned integer id")
    }),
    Value::Bool(flag) => Err(de::Error::invalid_type(
      Unexpected::Bool(*flag),
      &"an unsigned integer id",
    )),
    Value::Null => Err(de::Error::invalid_type(
      Unexpected::Unit,
      &"an unsigned integer id",
    )),
    Value::Array(_) => Err(de::Error::invalid_type(
      Unexpected::Seq,
      &"an unsigned integer id",
    )),
    Value::Object(_) => Err(de::Error::invalid_type(
      Unexpected::Map,
      &"an unsigned integer id",
    )),
  }
}

#[cfg(test)]
mod tests {
  use {super::*, serde::Deserialize};

  #[derive(Deserialize)]
  struct FlagWrapper {
    #[serde(deserialize_with = "deserialize_flexible_bool")]
    value: bool,
  }

  #[derive(Deserialize)]
  struct IdWrapper {
    #[serde(deserialize_with = "deserialize_lenient_u64")]
    value: u64,
  }

  fn parse_flag(input: &str) -> Result<bool, serde_json::Error> {
    serde_json::from_str::<FlagWrapper>(input).map(|wrapper| wrapper.value)
  }

  fn parse_id(input: &str) -> Result<u64, serde_json::Error> {
    serde_json::from_str::<IdWrapper>(input).map(|wrapper| wrapper.value)
  }

  #[test]
  fn flexible_bool_accepts_backend_encodings() {
    assert!(parse_flag(r#"{"value": true}"#).unwrap());
    assert!(parse_flag(r#"{"value": 1}"#).unwrap());
    assert!(parse_flag(r#"{"value": "1"}"#).unwrap());
    assert!(!parse_flag(r#"{"value": "0"}"#).unwrap());
    assert!(!parse_flag(r#"{"value": 0}"#).unwrap());
    assert!(!parse_flag(r#"{"value": null}"#).unwrap());
    assert!(parse_flag(r#"{"value": "maybe"}"#).is_err());
  }

  #[test]
  fn lenient_id_accepts_numbers_and_strings() {
    assert_eq!(parse_id(r#"{"value": 42}"#).unwrap(), 42);
    assert_eq!(parse_id(r#"{"value": "42"}"#).unwrap(), 42);
    assert!(parse_id(r#"{"value": "forty-two"}"#).is_err());
    assert!(parse_id(r#"{"value": null}"#).is_err());
  }

  #[test]
  fn timestamps_parse_backend_and_rfc3339_formats() {
    assert!(parse_timestamp("2024-05-01 10:00:00").is_some());
    assert!(parse_timestamp("2024-05-01T10:00:00Z").is_some());
    assert!(parse_timestamp("yesterday").is_none());
  }

  #[test]
  fn iso_mode_formats_calendar_dates() {
    assert_eq!(
      format_timestamp(
        "2024-05-01 10:00:00",
        "2024-06-01 10:00:00",
        DateFormat::Iso
      ),
      "2024-05-01"
    );
  }

  #[test]
  fn time_ago_shows_the_largest_nonzero_band() {
    let reference = "2024-05-01 12:00:00";

    assert_eq!(
      format_timestamp("2024-05-01 11:58:30", reference, DateFormat::TimeAgo),
      "1 minute ago"
    );

    assert_eq!(
      format_timestamp("2024-05-01 09:00:00", reference, DateFormat::TimeAgo),
      "3 hours ago"
    );

    assert_eq!(
      format_timestamp("2024-04-28 12:00:00", reference, DateFormat::TimeAgo),
      "3 days ago"
    );

    assert_eq!(
      format_timestamp("2024-03-15 12:00:00", reference, DateFormat::TimeAgo),
      "1 month ago"
    );
  }

  #[test]
  fn time_ago_prefers_years_over_month_counts() {
    assert_eq!(
      format_timestamp(
        "2023-03-28 12:00:00",
        "2024-05-01 12:00:00",
        DateFormat::TimeAgo
      ),
      "1 year ago"
    );
  }

  #[test]
  fn time_ago_collapses_fresh_and_future_timestamps() {
    let reference = "2024-05-01 12:00:00";

    assert_eq!(
      format_timestamp("2024-05-01 11:59:30", reference, DateFormat::TimeAgo),
      "just now"
    );

    assert_eq!(
      format_timestamp("2024-05-01 12:00:30", reference, DateFormat::TimeAgo),
      "just now"
    );
  }

  #[test]
  fn unparseable_timestamps_fall_back_to_the_raw_value() {
    assert_eq!(
      format_timestamp("yesterday", "2024-05-01 12:00:00", DateFormat::TimeAgo),
      "yesterday"
    );
  }

  #[test]
  fn sanitize_comment_strips_tags_and_decodes_entities() {
    assert_eq!(
      sanitize_comment("<p>Hello &amp; <i>goodbye</i></p>"),
      "Hello & goodbye"
    );
  }

  #[test]
  fn sanitize_comment_collapses_whitespace() {
    assert_eq!(
      sanitize_comment("Multiple   spaces\nand\tlines"),
      "Multiple spaces and lines"
    );
  }

  #[test]
  fn truncate_appends_ellipsis_when_exceeding_limit() {
    assert_eq!(truncate("This is a longer line", 4), "This...");
    assert_eq!(truncate("short", 10), "short");
  }

  #[test]
  fn wrap_text_wraps_longer_text() {
    assert_eq!(
      wrap_text("hello brave new world", 11),
      vec!["hello brave".to_string(), "new world".to_string()]
    );

    assert_eq!(wrap_text("", 10), Vec::<String>::new());
  }
}
