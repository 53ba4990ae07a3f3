//! Typed HTTP client for the book manager API

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::collections::{AddBooksRequest, RemoveBooksRequest};
use crate::domain::{
    Book, BookFilter, BookInput, Collection, CollectionInput, ErrorBody, ErrorItem,
};
use crate::services::ReconcileOutcome;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a structured error body
    #[error("API returned {status}")]
    Api {
        status: StatusCode,
        errors: Vec<ErrorItem>,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

fn book_path(isbn: &str) -> String {
    format!("/books/{}", urlencoding::encode(isbn))
}

pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    /// `base_url` is scheme + authority, e.g. `http://localhost:8000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        // Error bodies are best-effort; an unreadable one still carries the status
        let errors = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.errors)
            .unwrap_or_default();
        ClientError::Api { status, errors }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), ClientError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(self.request(method, path).json(body)).await
    }

    pub async fn add_book(&self, input: &BookInput) -> Result<Book, ClientError> {
        self.send_json(Method::POST, "/books", input).await
    }

    pub async fn get_book(&self, isbn: &str) -> Result<Book, ClientError> {
        Self::send(self.request(Method::GET, &book_path(isbn))).await
    }

    pub async fn edit_book(&self, isbn: &str, input: &BookInput) -> Result<Book, ClientError> {
        self.send_json(Method::PUT, &book_path(isbn), input).await
    }

    pub async fn remove_book(&self, isbn: &str) -> Result<(), ClientError> {
        Self::send_empty(self.request(Method::DELETE, &book_path(isbn))).await
    }

    pub async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        let text_fields = [
            ("isbn", &filter.isbn),
            ("title", &filter.title),
            ("author", &filter.author),
            ("description", &filter.description),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value
                && !value.is_empty()
            {
                query.push((name, value.clone()));
            }
        }
        if let Some(year) = filter.published_year {
            query.push(("published", year.to_string()));
        }
        if !filter.genres.is_empty() {
            query.push(("genres", filter.genres.join(",")));
        }

        Self::send(self.request(Method::GET, "/books").query(&query)).await
    }

    pub async fn add_collection(&self, input: &CollectionInput) -> Result<Collection, ClientError> {
        self.send_json(Method::POST, "/collections", input).await
    }

    pub async fn get_collection(&self, id: i32) -> Result<Collection, ClientError> {
        Self::send(self.request(Method::GET, &format!("/collections/{}", id))).await
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        Self::send(self.request(Method::GET, "/collections")).await
    }

    pub async fn add_books_to_collection(
        &self,
        id: i32,
        isbns: Vec<String>,
    ) -> Result<ReconcileOutcome, ClientError> {
        let body = AddBooksRequest {
            books_to_add: isbns,
        };
        self.send_json(Method::POST, &format!("/collections/{}/addbooks", id), &body)
            .await
    }

    pub async fn remove_books_from_collection(
        &self,
        id: i32,
        isbns: Vec<String>,
    ) -> Result<ReconcileOutcome, ClientError> {
        let body = RemoveBooksRequest {
            books_to_remove: isbns,
        };
        self.send_json(
            Method::POST,
            &format!("/collections/{}/removebooks", id),
            &body,
        )
        .await
    }
}
