// HTTP implementations of the remote service traits (reqwest)

use super::{
    AuthService, CategorizeRequest, Credentials, ExpenseCategorizer, ExpenseRegistrar,
    LoginResponse, RecommendationReport, RecommendationRequest, RegisterExpenseRequest,
    SavingsAdvisor,
};
use crate::config::AppConfig;
use crate::entities::Expense;
use crate::errors::{AppError, AppResult};
use crate::reconciliation::CategorizationSuggestion;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CATEGORIZE_FLOW: &str = "autoCategorizeExpenseFlow";
const RECOMMEND_FLOW: &str = "personalizedExpenseRecommendationsFlow";

/// Flow endpoints take `{"data": input}`
#[derive(Serialize)]
struct FlowRequest<'a, T> {
    data: &'a T,
}

/// ...and answer `{"result": output}`
#[derive(Deserialize)]
struct FlowResponse<T> {
    result: T,
}

/// One reqwest client shared by every remote collaborator
#[derive(Clone)]
pub struct HttpServices {
    client: Client,
    auth_url: String,
    register_expense_url: String,
    ai_base_url: String,
    ai_api_key: Option<String>,
}

impl HttpServices {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("expense-pilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpServices {
            client,
            auth_url: config.auth_url.clone(),
            register_expense_url: config.register_expense_url.clone(),
            ai_base_url: config.ai_base_url.trim_end_matches('/').to_string(),
            ai_api_key: config.ai_api_key.clone(),
        })
    }

    fn flow_url(&self, flow: &str) -> String {
        format!("{}/{}", self.ai_base_url, flow)
    }

    async fn run_flow<I, O>(&self, flow: &str, input: &I) -> AppResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let mut request = self.client.post(self.flow_url(flow)).json(&FlowRequest { data: input });
        if let Some(key) = &self.ai_api_key {
            request = request.bearer_auth(key);
        }

        let response: FlowResponse<O> = send_json(request).await?;
        Ok(response.result)
    }
}

/// Send a request and decode a JSON body, mapping failures onto AppError
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> AppResult<T> {
    let response = request.send().await?;
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Remote {
        status: status.as_u16(),
        message: if body.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        },
    })
}

#[async_trait]
impl AuthService for HttpServices {
    async fn login(&self, credentials: &Credentials) -> AppResult<String> {
        let response = self.client.post(&self.auth_url).json(credentials).send().await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AppError::Unauthorized);
        }

        let login: LoginResponse = ensure_success(response).await?.json().await?;
        Ok(login.token)
    }
}

#[async_trait]
impl ExpenseRegistrar for HttpServices {
    async fn register(&self, token: &str, request: &RegisterExpenseRequest) -> AppResult<Expense> {
        send_json(
            self.client
                .post(&self.register_expense_url)
                .bearer_auth(token)
                .json(request),
        )
        .await
    }
}

#[async_trait]
impl ExpenseCategorizer for HttpServices {
    async fn categorize(&self, description: &str) -> AppResult<CategorizationSuggestion> {
        let input = CategorizeRequest {
            description: description.to_string(),
        };
        self.run_flow(CATEGORIZE_FLOW, &input).await
    }
}

#[async_trait]
impl SavingsAdvisor for HttpServices {
    async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendationReport> {
        self.run_flow(RECOMMEND_FLOW, request).await
    }
}
