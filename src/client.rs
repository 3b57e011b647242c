use super::*;

#[derive(Clone)]
pub(crate) struct Client {
  client: reqwest::Client,
  endpoint: String,
  game_id: String,
}

impl Client {
  pub(crate) async fn fetch_replies(
    &self,
    parent_id: u64,
    amount: usize,
  ) -> Result<Vec<CommentRecord>> {
    tracing::debug!(parent_id, amount, "loading replies");

    let form = [
      ("load_replies", "true".to_string()),
      ("amount", amount.to_string()),
      ("game_id", self.game_id.clone()),
      ("parent_id", parent_id.to_string()),
    ];

    Ok(
      self
        .client
        .post(&self.endpoint)
        .form(&form)
        .send()
        .await?
        .json()
        .await?,
    )
  }

  pub(crate) async fn fetch_root_comments(
    &self,
    offset: usize,
    amount: usize,
  ) -> Result<Vec<CommentRecord>> {
    tracing::debug!(offset, amount, "loading root comments");

    let form = [
      ("load_root_comments", "true".to_string()),
      ("game_id", self.game_id.clone()),
      ("offset", offset.to_string()),
      ("amount", amount.to_string()),
    ];

    Ok(
      self
        .client
        .post(&self.endpoint)
        .form(&form)
        .send()
        .await?
        .json()
        .await?,
    )
  }

  pub(crate) fn new(config: &Config) -> Self {
    Self {
      client: reqwest::Client::new(),
      endpoint: config.endpoint.clone(),
      game_id: config.game_id.clone(),
    }
  }

  pub(crate) async fn submit_comment(
    &self,
    content: String,
    parent: Option<u64>,
  ) -> Result<String> {
    tracing::debug!(?parent, chars = content.chars().count(), "posting comment");

    // The backend reads `parent` as the literal string `null` for root
    // comments.
    let parent = parent.map_or_else(|| "null".to_string(), |id| id.to_string());

    let form = [
      ("send_comment", "true".to_string()),
      ("game_id", self.game_id.clone()),
      ("parent", parent),
      ("content", content),
    ];

    Ok(
      self
        .client
        .post(&self.endpoint)
        .form(&form)
        .send()
        .await?
        .text()
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    serde_json::json,
    wiremock::{
      Mock, MockServer, ResponseTemplate,
      matchers::{body_string_contains, method, path},
    },
  };

  fn test_client(server: &MockServer) -> Client {
    Client::new(&Config {
      date_format: DateFormat::TimeAgo,
      endpoint: format!("{}/includes/comment.php", server.uri()),
      game_id: "42".to_string(),
      max_replies: 10,
      min_chars: 3,
      page_size: 5,
    })
  }

  #[tokio::test]
  async fn fetch_root_comments_sends_the_pagination_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/includes/comment.php"))
      .and(body_string_contains("load_root_comments=true"))
      .and(body_string_contains("game_id=42"))
      .and(body_string_contains("offset=10"))
      .and(body_string_contains("amount=5"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
        {
          "id": "1",
          "parent_id": null,
          "created_date": "2024-05-01 10:00:00",
          "comment": "First!",
          "has_replies": "1",
          "server_date": "2024-05-01 12:00:00",
          "sender_username": null,
          "avatar": "https://example.com/a.png"
        }
      ])))
      .expect(1)
      .mount(&server)
      .await;

    let records = test_client(&server)
      .fetch_root_comments(10, 5)
      .await
      .expect("fetch succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
    assert!(records[0].has_replies);
  }

  #[tokio::test]
  async fn fetch_replies_sends_the_parent_and_bound() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/includes/comment.php"))
      .and(body_string_contains("load_replies=true"))
      .and(body_string_contains("game_id=42"))
      .and(body_string_contains("parent_id=7"))
      .and(body_string_contains("amount=10"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .expect(1)
      .mount(&server)
      .await;

    let records = test_client(&server)
      .fetch_replies(7, 10)
      .await
      .expect("fetch succeeds");

    assert!(records.is_empty());
  }

  #[tokio::test]
  async fn submit_comment_encodes_a_null_parent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/includes/comment.php"))
      .and(body_string_contains("send_comment=true"))
      .and(body_string_contains("parent=null"))
      .and(body_string_contains("content=nice+level"))
      .respond_with(ResponseTemplate::new(200).set_body_string("success"))
      .expect(1)
      .mount(&server)
      .await;

    let body = test_client(&server)
      .submit_comment("nice level".to_string(), None)
      .await
      .expect("submit succeeds");

    assert_eq!(body, "success");
  }

  #[tokio::test]
  async fn submit_comment_sends_the_parent_id_when_replying() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/includes/comment.php"))
      .and(body_string_contains("send_comment=true"))
      .and(body_string_contains("parent=7"))
      .respond_with(ResponseTemplate::new(200).set_body_string("flood"))
      .expect(1)
      .mount(&server)
      .await;

    let body = test_client(&server)
      .submit_comment("me too".to_string(), Some(7))
      .await
      .expect("submit succeeds");

    assert_eq!(body, "flood");
  }

  #[tokio::test]
  async fn malformed_payloads_surface_as_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/includes/comment.php"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops"))
      .mount(&server)
      .await;

    let result = test_client(&server).fetch_root_comments(0, 5).await;

    assert!(result.is_err());
  }
}
