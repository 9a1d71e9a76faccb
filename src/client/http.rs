use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    AddProductRequest, BookItemRequest, BookItemResponse, Booking, BookingsResponse, Chat,
    ChatsResponse, Customer, CustomerLoginResponse, CustomersResponse, DeleteProductRequest,
    ItemRequest, LoginRequest, MessageResponse, RegisterCustomerRequest, RegisterShopRequest,
    RegisterShopResponse, RequestItemRequest, RequestItemResponse, RequestsResponse, SaveChatRequest,
    ShopkeeperLoginResponse, Store, StoresResponse, UpdateBookingStatusRequest,
    UpdateCustomerRequest, UpdateProductRequest, UpdateStoreRequest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ClientError {
    /// The request never completed: connection refused, DNS, broken pipe.
    Transport(reqwest::Error),
    Timeout,
    /// The server answered but rejected the operation; carries its message.
    Api(String),
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "transport error: {}", e),
            ClientError::Timeout => write!(f, "request timed out"),
            ClientError::Api(msg) => write!(f, "{}", msg),
            ClientError::Decode(msg) => write!(f, "bad response body: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(e)
        }
    }
}

/// Bounded retry for idempotent reads. Writes are never retried; a booking
/// that may or may not have landed must surface the error instead.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry attempt (1-based), doubling each time.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Typed client for the marketplace API. One method per endpoint; envelope
/// failures (`success: false`) become `ClientError::Api`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<ApiClient, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> ApiClient {
        self.retry = retry;
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        loop {
            match self.http.get(&url).send().await {
                Ok(response) => return decode(response).await,
                Err(e) if attempt < self.retry.max_retries && retryable(&e) => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    log::debug!(
                        "🔁 GET {} failed ({}), retry {}/{} in {:?}",
                        path,
                        e,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;
        decode(response).await
    }
}

fn retryable(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect()
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ClientError::from)?;
    if !status.is_success() {
        // Error statuses still carry a `{success, message}` body.
        let message = serde_json::from_slice::<MessageResponse>(&bytes)
            .ok()
            .and_then(|m| m.message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ClientError::Api(message));
    }
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

fn rejected(message: Option<String>) -> ClientError {
    ClientError::Api(message.unwrap_or_else(|| "request rejected".to_string()))
}

/// The full marketplace API surface, one method per endpoint. A trait so
/// front-ends and tests can swap in fakes.
#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn register_customer(&self, request: &RegisterCustomerRequest) -> Result<(), ClientError>;
    async fn login_customer(&self, request: &LoginRequest) -> Result<Customer, ClientError>;
    async fn register_shop(&self, request: &RegisterShopRequest) -> Result<u64, ClientError>;
    async fn login_shopkeeper(&self, request: &LoginRequest) -> Result<Store, ClientError>;

    async fn stores(&self) -> Result<Vec<Store>, ClientError>;
    async fn update_store(&self, request: &UpdateStoreRequest) -> Result<(), ClientError>;
    async fn customers(&self) -> Result<Vec<Customer>, ClientError>;
    async fn update_customer(&self, request: &UpdateCustomerRequest) -> Result<(), ClientError>;

    async fn add_product(&self, request: &AddProductRequest) -> Result<(), ClientError>;
    async fn update_product(&self, request: &UpdateProductRequest) -> Result<(), ClientError>;
    async fn delete_product(&self, request: &DeleteProductRequest) -> Result<(), ClientError>;

    async fn bookings(&self) -> Result<Vec<Booking>, ClientError>;
    async fn book_item(&self, request: &BookItemRequest) -> Result<u64, ClientError>;
    async fn update_booking_status(
        &self,
        request: &UpdateBookingStatusRequest,
    ) -> Result<(), ClientError>;

    async fn requests(&self) -> Result<Vec<ItemRequest>, ClientError>;
    async fn request_item(&self, request: &RequestItemRequest) -> Result<u64, ClientError>;

    async fn chats(&self) -> Result<Vec<Chat>, ClientError>;
    async fn save_chat(&self, request: &SaveChatRequest) -> Result<(), ClientError>;
}

#[async_trait]
impl MarketApi for ApiClient {
    async fn register_customer(&self, request: &RegisterCustomerRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/customer-register", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn login_customer(&self, request: &LoginRequest) -> Result<Customer, ClientError> {
        let response: CustomerLoginResponse = self.post_json("/api/customer-login", request).await?;
        match (response.success, response.user) {
            (true, Some(user)) => Ok(user),
            (_, _) => Err(rejected(response.message)),
        }
    }

    async fn register_shop(&self, request: &RegisterShopRequest) -> Result<u64, ClientError> {
        let response: RegisterShopResponse = self.post_json("/api/register-shop", request).await?;
        match (response.success, response.shop_id) {
            (true, Some(id)) => Ok(id),
            (_, _) => Err(rejected(response.message)),
        }
    }

    async fn login_shopkeeper(&self, request: &LoginRequest) -> Result<Store, ClientError> {
        let response: ShopkeeperLoginResponse =
            self.post_json("/api/shopkeeper-login", request).await?;
        match (response.success, response.user) {
            (true, Some(user)) => Ok(user),
            (_, _) => Err(rejected(response.message)),
        }
    }

    async fn stores(&self) -> Result<Vec<Store>, ClientError> {
        let response: StoresResponse = self.get_json("/api/stores").await?;
        if response.success {
            Ok(response.stores)
        } else {
            Err(rejected(response.message))
        }
    }

    async fn update_store(&self, request: &UpdateStoreRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/update-store", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn customers(&self) -> Result<Vec<Customer>, ClientError> {
        let response: CustomersResponse = self.get_json("/api/customers").await?;
        if response.success {
            Ok(response.customers)
        } else {
            Err(rejected(response.message))
        }
    }

    async fn update_customer(&self, request: &UpdateCustomerRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/update-customer", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn add_product(&self, request: &AddProductRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/add-product", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn update_product(&self, request: &UpdateProductRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/update-product", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn delete_product(&self, request: &DeleteProductRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/delete-product", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn bookings(&self) -> Result<Vec<Booking>, ClientError> {
        let response: BookingsResponse = self.get_json("/api/bookings").await?;
        if response.success {
            Ok(response.bookings)
        } else {
            Err(ClientError::Api("could not load bookings".to_string()))
        }
    }

    async fn book_item(&self, request: &BookItemRequest) -> Result<u64, ClientError> {
        let response: BookItemResponse = self.post_json("/api/book-item", request).await?;
        match (response.success, response.booking_id) {
            (true, Some(id)) => Ok(id),
            (_, _) => Err(rejected(response.message)),
        }
    }

    async fn update_booking_status(
        &self,
        request: &UpdateBookingStatusRequest,
    ) -> Result<(), ClientError> {
        let response: MessageResponse =
            self.post_json("/api/update-booking-status", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }

    async fn requests(&self) -> Result<Vec<ItemRequest>, ClientError> {
        let response: RequestsResponse = self.get_json("/api/requests").await?;
        if response.success {
            Ok(response.requests)
        } else {
            Err(ClientError::Api("could not load requests".to_string()))
        }
    }

    async fn request_item(&self, request: &RequestItemRequest) -> Result<u64, ClientError> {
        let response: RequestItemResponse = self.post_json("/api/request-item", request).await?;
        match (response.success, response.request_id) {
            (true, Some(id)) => Ok(id),
            (_, _) => Err(rejected(response.message)),
        }
    }

    async fn chats(&self) -> Result<Vec<Chat>, ClientError> {
        let response: ChatsResponse = self.get_json("/api/chats").await?;
        if response.success {
            Ok(response.chats)
        } else {
            Err(ClientError::Api("could not load chats".to_string()))
        }
    }

    async fn save_chat(&self, request: &SaveChatRequest) -> Result<(), ClientError> {
        let response: MessageResponse = self.post_json("/api/save-chat", request).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.message))
        }
    }
}

/// The one capability the chat poller needs. Narrower than [`MarketApi`] so
/// tests can drive the poller with a few lines of fake.
#[async_trait]
pub trait ChatSource: Send + Sync {
    async fn fetch_chats(&self) -> Result<Vec<Chat>, ClientError>;
}

#[async_trait]
impl ChatSource for ApiClient {
    async fn fetch_chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.chats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_millis(250));
        assert_eq!(policy.delay(2), Duration::from_millis(500));
        assert_eq!(policy.delay(3), Duration::from_millis(1000));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
