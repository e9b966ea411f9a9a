use super::{
    ChatsQuery, DirectMessagesQuery, GroupsQuery, MessagePage, MessagesQuery, Transport,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Chat, Group, Id, Me, User};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const TOKEN_HEADER: &str = "X-Access-Token";

/// Every JSON answer is wrapped as `{"response": ..., "meta": {...}}`.
#[derive(Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    #[serde(default)]
    meta: Meta,
}

#[derive(Deserialize, Default)]
struct Meta {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    errors: Vec<String>,
}

/// [`Transport`] over the public GroupMe REST API.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Config,
}

impl HttpTransport {
    pub fn new(config: Config) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing client, e.g. the one the media retriever holds.
    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    /// GET a JSON endpoint. `Ok(None)` means 304 Not Modified, which the
    /// messages endpoints use for "nothing here".
    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, self.config.token.as_str())
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn get_required<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.get(url, query).await?.ok_or(Error::Api {
            status: StatusCode::NOT_MODIFIED.as_u16(),
            message: format!("unexpected 304 from {}", url),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
            .ok()
            .filter(|env| !env.meta.errors.is_empty())
            .map(|env| env.meta.errors.join(", "))
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_slice(&body)?;
    envelope.response.ok_or_else(|| Error::Api {
        status: if envelope.meta.code == 0 {
            status.as_u16()
        } else {
            envelope.meta.code
        },
        message: "response body was empty".to_string(),
    })
}

fn push_page(params: &mut Vec<(&'static str, String)>, page: Option<u32>, per_page: Option<u32>) {
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    if let Some(per_page) = per_page {
        params.push(("per_page", per_page.to_string()));
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn index_groups(&self, query: &GroupsQuery) -> Result<Vec<Group>> {
        let mut params = Vec::new();
        push_page(&mut params, query.page, query.per_page);
        if let Some(omit) = &query.omit {
            params.push(("omit", omit.clone()));
        }
        self.get_required(&self.api("/groups"), &params).await
    }

    async fn index_chats(&self, query: &ChatsQuery) -> Result<Vec<Chat>> {
        let mut params = Vec::new();
        push_page(&mut params, query.page, query.per_page);
        self.get_required(&self.api("/chats"), &params).await
    }

    async fn index_relations(&self) -> Result<Vec<User>> {
        let url = format!("{}/relations", self.config.v4_base);
        self.get_required(&url, &[]).await
    }

    async fn show_group(&self, group_id: &Id) -> Result<Group> {
        self.get_required(&self.api(&format!("/groups/{}", group_id)), &[])
            .await
    }

    async fn remove_member(&self, group_id: &Id, membership_id: &Id) -> Result<()> {
        let url = self.api(&format!(
            "/groups/{}/members/{}/remove",
            group_id, membership_id
        ));
        let response = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, self.config.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn index_messages(&self, group_id: &Id, query: &MessagesQuery) -> Result<MessagePage> {
        let mut params = Vec::new();
        if let Some(cursor) = &query.cursor {
            let (key, value) = cursor.query_pair();
            params.push((key, value.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        let url = self.api(&format!("/groups/{}/messages", group_id));
        Ok(self.get(&url, &params).await?.unwrap_or_default())
    }

    async fn index_direct_messages(
        &self,
        other_user_id: &Id,
        query: &DirectMessagesQuery,
    ) -> Result<MessagePage> {
        let mut params = vec![("other_user_id", other_user_id.to_string())];
        if let Some(cursor) = &query.cursor {
            let (key, value) = cursor.query_pair();
            params.push((key, value.to_string()));
        }
        Ok(self
            .get(&self.api("/direct_messages"), &params)
            .await?
            .unwrap_or_default())
    }

    async fn my_user(&self) -> Result<Me> {
        self.get_required(&self.api("/users/me"), &[]).await
    }
}
