// Expense Pilot - Web Server
// Dashboard backend with Axum: login, guarded dashboard API, AI helpers

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{Local, NaiveDate};
use expense_pilot::remote::CategorizeRequest;
use expense_pilot::{
    export, guard, logging, AppConfig, AppError, AuthService, Category, CategoryForm, Credentials,
    DashboardQuery, DashboardView, ExpenseCategorizer, ExpenseDraft, ExpenseForm,
    ExpenseRegistrar, GuardOutcome, HttpServices, Income, IncomeForm, Notice, Reconciliation,
    RecommendationReport, SavingsAdvisor, Session, SessionStore, ValidationError,
};
use expense_pilot::entities::Expense;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const TOKEN_COOKIE: &str = "token";

/// Shared application state
#[derive(Clone)]
struct AppState {
    sessions: Arc<SessionStore>,
    auth: Arc<dyn AuthService>,
    registrar: Arc<dyn ExpenseRegistrar>,
    categorizer: Arc<dyn ExpenseCategorizer>,
    advisor: Arc<dyn SavingsAdvisor>,
    secure_cookies: bool,
}

impl AppState {
    fn new(config: AppConfig, services: HttpServices) -> Self {
        let services = Arc::new(services);
        AppState {
            secure_cookies: config.secure_cookies,
            sessions: Arc::new(SessionStore::new(config)),
            auth: services.clone(),
            registrar: services.clone(),
            categorizer: services.clone(),
            advisor: services,
        }
    }

    fn cookie(&self, value: &str, extra: &str) -> String {
        let secure = if self.secure_cookies { "; Secure" } else { "" };
        format!("{}={}; HttpOnly; Path=/; SameSite=Lax{}{}", TOKEN_COOKIE, value, extra, secure)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, message: String) -> Self {
        Self {
            success: false,
            data,
            error: Some(message),
        }
    }
}

/// Domain error on its way out as an HTTP response
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Validation(_) | AppError::Overflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateCategory(_) | AppError::Busy(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Network(_) | AppError::Remote { .. } | AppError::MalformedToken => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }

        // field errors travel in `data` so the form can show them inline
        let fields: Vec<ValidationError> = match &self.0 {
            AppError::Validation(errors) => errors.clone(),
            _ => Vec::new(),
        };
        (status, Json(ApiResponse::err(fields, self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Token of the request's session, put in place by the guard
#[derive(Clone)]
struct SessionToken(String);

/// The request's live session, put in place by the guard
type ActiveSession = Arc<Session>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ============================================================================
// Session Guard
// ============================================================================

/// Bearer header first, then the `token` cookie
fn request_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Protected routes: no token, no render
///
/// The guard only asks whether a token is present. A token must also belong
/// to a session started by `/login`; unknown or expired ones go back to login.
async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request_token(request.headers());

    let token = match (guard::check(token.clone()), token) {
        (GuardOutcome::Allowed, Some(token)) => token,
        (GuardOutcome::Redirect(to), _) => return Redirect::to(to).into_response(),
        (GuardOutcome::Allowed, None) => return Redirect::to(guard::LOGIN_PATH).into_response(),
    };

    let Some(session) = state.sessions.get(&token) else {
        tracing::debug!("token has no live session, redirecting to {}", guard::LOGIN_PATH);
        return Redirect::to(guard::LOGIN_PATH).into_response();
    };

    request.extensions_mut().insert(SessionToken(token));
    request.extensions_mut().insert::<ActiveSession>(session);
    next.run(request).await
}

// ============================================================================
// Auth Handlers
// ============================================================================

#[derive(Serialize)]
struct LoginBody {
    token: String,
}

/// POST /login - Exchange credentials for a token (also set as a cookie)
async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    let token = state.auth.login(&credentials).await.map_err(|e| {
        tracing::warn!("login failed: {}", e);
        e
    })?;
    if !guard::is_cookie_safe(&token) {
        tracing::error!("auth service issued a token that cannot be stored in a cookie");
        return Err(AppError::MalformedToken.into());
    }

    state.sessions.start(&token)?;
    let cookie = state.cookie(&token, "");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::ok(LoginBody { token })),
    )
        .into_response())
}

/// POST /logout - Drop the session and its records
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = request_token(&headers) {
        state.sessions.end(&token);
    }
    let cookie = state.cookie("", "; Max-Age=0");
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(ApiResponse::ok("logged out")),
    )
}

// ============================================================================
// Dashboard Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/dashboard - Filtered tables, totals and chart data
async fn get_dashboard(
    Extension(session): Extension<ActiveSession>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<DashboardView> {
    let view = session.dashboard().view(&query)?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/categories
async fn get_categories(
    Extension(session): Extension<ActiveSession>,
) -> ApiResult<Vec<Category>> {
    let categories = session.dashboard().registry().list_all().to_vec();
    Ok(Json(ApiResponse::ok(categories)))
}

/// POST /api/categories - Create a category
async fn create_category(
    Extension(session): Extension<ActiveSession>,
    Json(form): Json<CategoryForm>,
) -> ApiResult<Category> {
    let category = session.dashboard().create_category(&form, today())?;
    Ok(Json(ApiResponse::ok(category)))
}

#[derive(Serialize)]
struct Outcome<T> {
    #[serde(flatten)]
    value: T,
    notice: Notice,
}

/// POST /api/expenses - Register an expense with the remote service
async fn register_expense(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    Extension(session): Extension<ActiveSession>,
    Json(form): Json<ExpenseForm>,
) -> ApiResult<Outcome<Expense>> {
    let expense = session
        .register_expense(state.registrar.as_ref(), &token.0, &form, today())
        .await?;

    let notice = Notice::success("Expense added", format!("{} was recorded.", expense.name));
    Ok(Json(ApiResponse::ok(Outcome { value: expense, notice })))
}

/// GET /api/expenses/draft - Pending form state (classifier fills it in)
async fn get_draft(
    Extension(session): Extension<ActiveSession>,
) -> ApiResult<ExpenseDraft> {
    let draft = session.dashboard().draft().clone();
    Ok(Json(ApiResponse::ok(draft)))
}

/// POST /api/expenses/categorize - Ask the classifier, reconcile the answer
async fn categorize_expense(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    Json(request): Json<CategorizeRequest>,
) -> ApiResult<Outcome<Reconciliation>> {
    let result = session
        .auto_categorize(state.categorizer.as_ref(), &request.description)
        .await?;

    let message = result.message(session.dashboard().registry());
    let notice = if result.matched {
        Notice::success("AI Suggestion", message)
    } else {
        Notice::info("AI Suggestion", message)
    };
    Ok(Json(ApiResponse::ok(Outcome { value: result, notice })))
}

/// GET /api/expenses/export - Filtered expense table as CSV
async fn export_expenses(
    Extension(session): Extension<ActiveSession>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, ApiError> {
    let csv = {
        let dashboard = session.dashboard();
        export::expenses_to_csv(&dashboard.table_expenses(&query), dashboard.registry())?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/incomes - Record an income locally
async fn add_income(
    Extension(session): Extension<ActiveSession>,
    Json(form): Json<IncomeForm>,
) -> ApiResult<Income> {
    let income = session.dashboard().add_income(&form, today())?;
    Ok(Json(ApiResponse::ok(income)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AdvisorParams {
    monthly_income: Option<Decimal>,
    financial_goals: Option<String>,
}

/// POST /api/recommendations - Savings advice over the filtered expenses
async fn get_recommendations(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    Query(query): Query<DashboardQuery>,
    Json(params): Json<AdvisorParams>,
) -> ApiResult<RecommendationReport> {
    let report = session
        .recommendations(
            state.advisor.as_ref(),
            &query,
            params.monthly_income,
            params.financial_goals,
        )
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET / - Serve login page
async fn serve_login() -> impl IntoResponse {
    Html(include_str!("../web/login.html"))
}

/// GET /dashboard - Serve dashboard page
async fn serve_dashboard() -> impl IntoResponse {
    Html(include_str!("../web/dashboard.html"))
}

// ============================================================================
// Router
// ============================================================================

fn build_router(state: AppState) -> Router {
    let guard_layer = || middleware::from_fn_with_state(state.clone(), require_session);

    let protected_api = Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/categories", get(get_categories).post(create_category))
        .route("/expenses", post(register_expense))
        .route("/expenses/draft", get(get_draft))
        .route("/expenses/categorize", post(categorize_expense))
        .route("/expenses/export", get(export_expenses))
        .route("/incomes", post(add_income))
        .route("/recommendations", post(get_recommendations))
        .route_layer(guard_layer());

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .merge(protected_api);

    let pages = Router::new()
        .route("/dashboard", get(serve_dashboard))
        .route_layer(guard_layer());

    Router::new()
        .route("/", get(serve_login))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(pages)
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = AppConfig::load()?;
    let services = HttpServices::from_config(&config)?;
    tracing::info!(
        auth = %config.auth_url,
        register = %config.register_expense_url,
        ai = %config.ai_base_url,
        "remote services configured"
    );

    let addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, services));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderValue, Request as HttpRequest};
    use expense_pilot::remote::{RecommendationRequest, RegisterExpenseRequest};
    use expense_pilot::{AppResult, CategorizationSuggestion};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// All four remote collaborators, answering from memory
    struct FakeServices {
        issued_token: &'static str,
    }

    #[async_trait]
    impl AuthService for FakeServices {
        async fn login(&self, credentials: &Credentials) -> AppResult<String> {
            if credentials.password == "secret" {
                Ok(self.issued_token.to_string())
            } else {
                Err(AppError::Unauthorized)
            }
        }
    }

    #[async_trait]
    impl ExpenseRegistrar for FakeServices {
        async fn register(&self, _token: &str, request: &RegisterExpenseRequest) -> AppResult<Expense> {
            Ok(Expense {
                id: "srv-1".to_string(),
                name: request.name.clone(),
                category: request.category_id,
                amount: request.amount,
                date: request.date,
            })
        }
    }

    #[async_trait]
    impl ExpenseCategorizer for FakeServices {
        async fn categorize(&self, _description: &str) -> AppResult<CategorizationSuggestion> {
            Ok(CategorizationSuggestion {
                category: "Groceries".to_string(),
                confidence: 0.6,
            })
        }
    }

    #[async_trait]
    impl SavingsAdvisor for FakeServices {
        async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendationReport> {
            Ok(RecommendationReport {
                recommendations: vec![],
                summary: format!("{} expenses reviewed", request.expenses.len()),
            })
        }
    }

    fn state_with(issued_token: &'static str, secure_cookies: bool) -> AppState {
        let fake = Arc::new(FakeServices { issued_token });
        AppState {
            sessions: Arc::new(SessionStore::new(AppConfig::default())),
            auth: fake.clone(),
            registrar: fake.clone(),
            categorizer: fake.clone(),
            advisor: fake,
            secure_cookies,
        }
    }

    fn app() -> Router {
        build_router(state_with("jwt-abc", false))
    }

    fn login_request(password: &str) -> HttpRequest<Body> {
        HttpRequest::post("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"username": "ana", "password": password}).to_string()))
            .unwrap()
    }

    async fn logged_in_app() -> Router {
        let app = app();
        let response = app.clone().oneshot(login_request("secret")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        app
    }

    fn get_with_cookie(uri: &str) -> HttpRequest<Body> {
        HttpRequest::get(uri)
            .header(header::COOKIE, "theme=dark; token=jwt-abc")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> HttpRequest<Body> {
        HttpRequest::post(uri)
            .header(header::AUTHORIZATION, "Bearer jwt-abc")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_sent_to_login(response: &Response) {
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app()
            .oneshot(HttpRequest::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], "OK");
    }

    #[tokio::test]
    async fn test_protected_routes_redirect_without_token() {
        for uri in ["/dashboard", "/api/dashboard", "/api/categories"] {
            let response = app()
                .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_sent_to_login(&response);
        }
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_rejects_bad_password() {
        let response = app().oneshot(login_request("secret")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("token=jwt-abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let response = app().oneshot(login_request("nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_secure_cookie_when_configured() {
        let app = build_router(state_with("jwt-abc", true));

        let response = app.clone().oneshot(login_request("secret")).await.unwrap();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.ends_with("; Secure"));

        let response = app.oneshot(post_json("/logout", json!({}))).await.unwrap();
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[tokio::test]
    async fn test_token_unfit_for_cookie_is_refused() {
        let state = state_with("abc; Path=/admin", false);
        let app = build_router(state.clone());

        let response = app.oneshot(login_request("secret")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_unissued_token_is_redirected_without_a_session() {
        let state = state_with("jwt-abc", false);
        let app = build_router(state.clone());

        for i in 0..50 {
            let request = HttpRequest::get("/api/dashboard")
                .header(header::AUTHORIZATION, format!("Bearer forged-{}", i))
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_sent_to_login(&response);
        }

        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_blank_bearer_falls_through_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        headers.insert(header::COOKIE, HeaderValue::from_static("token=jwt-abc"));
        assert_eq!(request_token(&headers).as_deref(), Some("jwt-abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer jwt-xyz"));
        assert_eq!(request_token(&headers).as_deref(), Some("jwt-xyz"));

        headers.remove(header::COOKIE);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer    "));
        assert_eq!(request_token(&headers), None);
    }

    #[tokio::test]
    async fn test_blank_bearer_with_cookie_reaches_dashboard() {
        let app = logged_in_app().await;
        let request = HttpRequest::get("/api/categories")
            .header(header::AUTHORIZATION, "Bearer ")
            .header(header::COOKIE, "token=jwt-abc")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_flow_over_http() {
        let app = logged_in_app().await;

        let response = app.clone().oneshot(get_with_cookie("/api/categories")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 6);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/expenses",
                json!({"name": "Gas", "category": 2, "amount": 40.0, "date": "2024-06-05"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["id"], "srv-1");
        assert_eq!(body["data"]["notice"]["kind"], "success");

        let response = app
            .clone()
            .oneshot(post_json("/api/incomes", json!({"source": "Salary", "amount": 3000, "date": "2024-06-01"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_with_cookie("/api/dashboard?year=2024&month=5"))
            .await
            .unwrap();
        let view = json_body(response).await;
        assert_eq!(view["data"]["expenses"].as_array().unwrap().len(), 1);
        assert_eq!(view["data"]["totals"]["balance"].as_f64(), Some(2960.0));

        let response = app
            .clone()
            .oneshot(get_with_cookie("/api/expenses/export"))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.contains("2024-06-05,Gas,Transport,40.00"));
    }

    #[tokio::test]
    async fn test_oversized_income_is_refused_and_dashboard_still_renders() {
        let app = logged_in_app().await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/api/incomes",
                    json!({"source": "Windfall", "amount": 5e28, "date": "2024-06-01"}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        let response = app.oneshot(get_with_cookie("/api/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["data"]["incomes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_expense_returns_field_errors() {
        let app = logged_in_app().await;

        let response = app
            .oneshot(post_json("/api/expenses", json!({"name": "x"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        let fields: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"amount"));
    }

    #[tokio::test]
    async fn test_unmatched_suggestion_falls_back_to_other() {
        let app = logged_in_app().await;

        let response = app
            .clone()
            .oneshot(post_json("/api/expenses/categorize", json!({"description": "Weekly shop"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["matched"], false);
        assert_eq!(body["data"]["category"], 6);
        assert_eq!(body["data"]["notice"]["kind"], "info");

        let response = app.oneshot(get_with_cookie("/api/expenses/draft")).await.unwrap();
        let draft = json_body(response).await;
        assert_eq!(draft["data"]["name"], "Weekly shop");
        assert_eq!(draft["data"]["category"], 6);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = logged_in_app().await;
        app.clone()
            .oneshot(post_json("/api/incomes", json!({"source": "Salary", "amount": 3000, "date": "2024-06-01"})))
            .await
            .unwrap();

        let response = app.clone().oneshot(post_json("/logout", json!({}))).await.unwrap();
        assert!(response.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

        let response = app.clone().oneshot(get_with_cookie("/api/dashboard")).await.unwrap();
        assert_sent_to_login(&response);

        // logging in again starts from an empty session
        app.clone().oneshot(login_request("secret")).await.unwrap();
        let response = app.oneshot(get_with_cookie("/api/dashboard")).await.unwrap();
        let view = json_body(response).await;
        assert!(view["data"]["incomes"].as_array().unwrap().is_empty());
    }
}
