use async_trait::async_trait;
use quiz_core::model::Question;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::json::parse_questions;
use crate::repository::{QuestionSource, StorageError};

/// Question bank fetched once per load from an `http(s)` URL.
///
/// There is no retry policy; a failed fetch is reported as-is.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: Client,
    url: Url,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_client(Client::new(), url)
    }

    #[must_use]
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound);
        }
        if !status.is_success() {
            return Err(StorageError::Connection(format!(
                "unexpected status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let questions = parse_questions(&body)?;
        tracing::debug!(url = %self.url, questions = questions.len(), "fetched question bank");
        Ok(questions)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
