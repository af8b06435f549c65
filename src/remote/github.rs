//! GitHub repository contents API.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Response, StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::{
    config::RepositoryConfig,
    error::RemoteError,
    remote::{
        codec::{decode_content, encode_content},
        ContentStore, RemoteFile,
    },
};

const MEDIA_JSON: &str = "application/vnd.github+json";
const MEDIA_RAW: &str = "application/vnd.github.raw";

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha:      String,
    #[serde(default)]
    content:  String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WrittenContent,
}

#[derive(Debug, Deserialize)]
struct WrittenContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha:     Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch:  Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha:     &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch:  Option<&'a str>,
}

pub struct GithubStore {
    client:  reqwest::Client,
    api_url: Url,
    owner:   String,
    repo:    String,
    branch:  Option<String>,
}

impl GithubStore {
    pub fn new(
        config: &RepositoryConfig,
        token: &str,
        user_agent: &str,
    ) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_JSON));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| RemoteError::Unauthorized)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            api_url: Url::parse(&config.api_url)?,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contents_url(&self, path: &str) -> Result<Url, RemoteError> {
        let mut segments = vec!["repos", self.owner.as_str(), self.repo.as_str(), "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        self.endpoint(&segments)
    }

    /// Reads name the branch in the query, writes in the body.
    fn read_url(&self, path: &str) -> Result<Url, RemoteError> {
        let mut url = self.contents_url(path)?;
        if let Some(branch) = &self.branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }
        Ok(url)
    }

    /// Files above the API's inline size limit come back without content and
    /// have to be fetched raw.
    async fn read_raw(&self, path: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(self.read_url(path)?)
            .header(ACCEPT, MEDIA_RAW)
            .send()
            .await?;
        Ok(check(response, path)?.text().await?)
    }
}

fn check(response: Response, path: &str) -> Result<Response, RemoteError> {
    match response.status() {
        s if s.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RemoteError::Unauthorized),
        StatusCode::NOT_FOUND => Err(RemoteError::NotFound(path.to_string())),
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            Err(RemoteError::Conflict(path.to_string()))
        }
        s => Err(RemoteError::Status {
            status: s.as_u16(),
            path:   path.to_string(),
        }),
    }
}

impl ContentStore for GithubStore {
    async fn authenticate(&self) -> Result<String, RemoteError> {
        let response = self.client.get(self.endpoint(&["user"])?).send().await?;
        let user: User = check(response, "user")?.json().await?;
        info!("Logged in as {}.", user.login);
        Ok(user.login)
    }

    async fn read(&self, path: &str) -> Result<RemoteFile, RemoteError> {
        debug!("Reading {path}");
        let response = self.client.get(self.read_url(path)?).send().await?;
        let body: ContentResponse = check(response, path)?.json().await?;
        let content = match body.encoding.as_deref() {
            Some("none") => self.read_raw(path).await?,
            _ => decode_content(path, &body.content)?,
        };
        Ok(RemoteFile {
            path: path.to_string(),
            content,
            sha: body.sha,
        })
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, RemoteError> {
        debug!("Writing {path}");
        let request = WriteRequest {
            message,
            content: encode_content(content),
            sha,
            branch: self.branch.as_deref(),
        };
        let response = self
            .client
            .put(self.contents_url(path)?)
            .json(&request)
            .send()
            .await?;
        let body: WriteResponse = check(response, path)?.json().await?;
        info!("Wrote {path}.");
        Ok(body.content.sha)
    }

    async fn delete(&self, path: &str, message: &str, sha: &str) -> Result<(), RemoteError> {
        debug!("Deleting {path}");
        let request = DeleteRequest {
            message,
            sha,
            branch: self.branch.as_deref(),
        };
        let response = self
            .client
            .delete(self.contents_url(path)?)
            .json(&request)
            .send()
            .await?;
        check(response, path)?;
        info!("Deleted {path}.");
        Ok(())
    }
}
