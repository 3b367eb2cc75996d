//! HTTP surface: routes under `/api/v1`, JSON envelopes and error mapping.
//!
//! Every handler resolves the `lang` query parameter first and answers in that
//! language, error messages included.

use crate::catalog::LocalizedCatalog;
use crate::context::AppContext;
use crate::error::Error as CatalogError;
use crate::i18n::{messages, Language, Translator};
use crate::model::{Exercise, NamedRecord, TaxonomyKind};
use crate::pagination::{Page, PageMetadata, PageRequest};
use crate::query::{FilterSpec, QueryEngine, SortSpec};
use axum::async_trait;
use axum::extract::{FromRequestParts, OriginalUri, Path, Query, State};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use url::form_urlencoded;

#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
    public_base_url: Option<Arc<str>>,
}

impl AppState {
    async fn catalog(&self, language: Language) -> Result<LocalizedCatalog, ApiError> {
        match self.context.localized(language).await {
            Ok(localized) => Ok(localized),
            Err(err) => {
                let translator = self.context.translator(language).await;
                Err(ApiError::from_core(err, &translator))
            }
        }
    }

    /// Absolute URL of the current path, without its query string.
    fn base_url(&self, headers: &HeaderMap, uri: &Uri) -> String {
        let origin = match &self.public_base_url {
            Some(url) => url.to_string(),
            None => {
                let host = headers
                    .get(HOST)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("localhost");
                format!("http://{}", host)
            }
        };
        format!("{}{}", origin, uri.path())
    }
}

pub fn router(context: Arc<AppContext>, public_base_url: Option<String>) -> Router {
    let state = AppState {
        context,
        public_base_url: public_base_url.map(Arc::from),
    };

    let api = Router::new()
        .route("/exercises", get(get_all_exercises))
        .route("/exercises/search", get(search_exercises))
        .route("/exercises/filter", get(filter_exercises))
        .route("/exercises/:exercise_id", get(get_exercise))
        .route("/bodyparts", get(list_body_parts))
        .route("/bodyparts/:name/exercises", get(exercises_by_body_part))
        .route("/equipments", get(list_equipments))
        .route("/equipments/:name/exercises", get(exercises_by_equipment))
        .route("/muscles", get(list_muscles))
        .route("/muscles/:name/exercises", get(exercises_by_muscle));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ==================== Errors ====================

/// A failed request, already rendered in the caller's language.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn from_core(err: CatalogError, translator: &Translator) -> Self {
        match &err {
            CatalogError::NotFound { exercise_id } => Self {
                status: StatusCode::NOT_FOUND,
                message: translator
                    .message(&messages::EXERCISE_NOT_FOUND, &[("exerciseId", exercise_id.as_str())]),
            },
            CatalogError::DataSourceUnavailable { .. } => {
                error!("Catalog unavailable: {}", err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: translator.message(&messages::DATA_UNAVAILABLE, &[]),
                }
            }
        }
    }

    fn missing_param(param: &str, translator: &Translator) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: translator.message(&messages::MISSING_QUERY_PARAM, &[("param", param)]),
        }
    }

    fn route_not_found(path: &str, translator: &Translator) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: translator.message(&messages::ROUTE_NOT_FOUND, &[("path", path)]),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

// ==================== Envelopes ====================

#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    success: bool,
    metadata: PageMetadata,
    data: Vec<T>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
}

fn data<T>(data: T) -> Json<DataEnvelope<T>> {
    Json(DataEnvelope {
        success: true,
        data,
    })
}

fn paginated<T>(page: Page<T>, base_url: &str, params: &[(&str, String)]) -> Json<PageEnvelope<T>> {
    let metadata = page.metadata(base_url, params);
    Json(PageEnvelope {
        success: true,
        metadata,
        data: page.items,
    })
}

// ==================== Query parameters ====================

/// Values that fail to parse are treated as absent so they fall back to their
/// defaults instead of rejecting the request.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// `true`/`false`, `1`/`0` and `yes`/`no` in any case; anything else is absent.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }))
}

/// Query-string parameters that never reject a request. A repeated key keeps
/// its first value; a query that still cannot be read falls back to
/// `T::default()`, so every parameter takes its default.
struct Params<T>(T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Params(parse_params(parts.uri.query().unwrap_or_default())))
    }
}

fn parse_params<T: DeserializeOwned + Default>(query: &str) -> T {
    let mut seen = HashSet::new();
    let first_values = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(
            form_urlencoded::parse(query.as_bytes()).filter(|(name, _)| seen.insert(name.clone())),
        )
        .finish();

    let parsed = format!("/?{}", first_values)
        .parse::<Uri>()
        .ok()
        .and_then(|uri| Query::<T>::try_from_uri(&uri).ok());
    match parsed {
        Some(Query(params)) => params,
        None => {
            warn!("Unreadable query string '{}', using defaults", query);
            T::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    #[serde(default, deserialize_with = "lenient")]
    offset: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<i64>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default, deserialize_with = "lenient")]
    offset: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<i64>,
    q: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    threshold: Option<f64>,
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterParams {
    #[serde(default, deserialize_with = "lenient")]
    offset: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<i64>,
    search: Option<String>,
    muscles: Option<String>,
    equipment: Option<String>,
    body_parts: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByNameParams {
    #[serde(default, deserialize_with = "lenient")]
    offset: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    include_secondary: Option<bool>,
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LangParams {
    lang: Option<String>,
}

/// Missing and unrecognized tags both resolve to the default language; only
/// the latter is worth a warning.
fn resolve_language(raw: Option<&str>) -> Language {
    if let Some(raw) = raw.filter(|raw| Language::parse(raw).is_none()) {
        warn!("Unsupported language '{}', using {}", raw, Language::canonical());
    }
    Language::normalize(raw)
}

/// Comma-separated list; blank entries are dropped.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parameters carried into pagination links, in request order; absent ones
/// are left out.
fn link_params<const N: usize>(params: [(&'static str, Option<String>); N]) -> Vec<(&'static str, String)> {
    params
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
}

// ==================== Handlers ====================

async fn get_all_exercises(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Params(params): Params<ListParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let language = resolve_language(params.lang.as_deref());
    let localized = state.catalog(language).await?;

    let sort = SortSpec::resolve(
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
        SortSpec::LISTING,
    );
    let page = QueryEngine::new(&localized).get_all_exercises(
        params.search.as_deref(),
        sort,
        PageRequest::new(params.offset, params.limit),
    );

    let links = link_params([
        ("search", params.search),
        ("sortBy", params.sort_by),
        ("sortOrder", params.sort_order),
        ("lang", params.lang),
    ]);
    Ok(paginated(page, &state.base_url(&headers, &uri), &links))
}

async fn search_exercises(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Params(params): Params<SearchParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let language = resolve_language(params.lang.as_deref());
    let localized = state.catalog(language).await?;

    let query = match params.q.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => query.to_string(),
        _ => return Err(ApiError::missing_param("q", &localized.translator)),
    };
    let page = QueryEngine::new(&localized).search(
        &query,
        params.threshold,
        PageRequest::new(params.offset, params.limit),
    );

    let links = link_params([
        ("q", Some(query)),
        ("threshold", params.threshold.map(|t| t.to_string())),
        ("lang", params.lang),
    ]);
    Ok(paginated(page, &state.base_url(&headers, &uri), &links))
}

async fn filter_exercises(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Params(params): Params<FilterParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let language = resolve_language(params.lang.as_deref());
    let localized = state.catalog(language).await?;

    let spec = FilterSpec {
        search: params.search.clone(),
        target_muscles: split_list(params.muscles.as_deref()),
        equipments: split_list(params.equipment.as_deref()),
        body_parts: split_list(params.body_parts.as_deref()),
        sort: SortSpec::resolve(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            SortSpec::FILTER,
        ),
    };
    let page = QueryEngine::new(&localized).filter(&spec, PageRequest::new(params.offset, params.limit));

    let links = link_params([
        ("search", params.search),
        ("muscles", params.muscles),
        ("equipment", params.equipment),
        ("bodyParts", params.body_parts),
        ("sortBy", params.sort_by),
        ("sortOrder", params.sort_order),
        ("lang", params.lang),
    ]);
    Ok(paginated(page, &state.base_url(&headers, &uri), &links))
}

async fn get_exercise(
    State(state): State<AppState>,
    Path(exercise_id): Path<String>,
    Params(params): Params<LangParams>,
) -> Result<Json<DataEnvelope<Exercise>>, ApiError> {
    let language = resolve_language(params.lang.as_deref());
    let localized = state.catalog(language).await?;

    QueryEngine::new(&localized)
        .get_exercise_by_id(&exercise_id)
        .map(data)
        .map_err(|err| ApiError::from_core(err, &localized.translator))
}

async fn list_taxonomy(
    state: &AppState,
    kind: TaxonomyKind,
    lang: Option<&str>,
) -> Result<Json<DataEnvelope<Vec<NamedRecord>>>, ApiError> {
    let localized = state.catalog(resolve_language(lang)).await?;
    Ok(data(QueryEngine::new(&localized).taxonomy(kind)))
}

async fn list_body_parts(
    State(state): State<AppState>,
    Params(params): Params<LangParams>,
) -> Result<Json<DataEnvelope<Vec<NamedRecord>>>, ApiError> {
    list_taxonomy(&state, TaxonomyKind::BodyPart, params.lang.as_deref()).await
}

async fn list_equipments(
    State(state): State<AppState>,
    Params(params): Params<LangParams>,
) -> Result<Json<DataEnvelope<Vec<NamedRecord>>>, ApiError> {
    list_taxonomy(&state, TaxonomyKind::Equipment, params.lang.as_deref()).await
}

async fn list_muscles(
    State(state): State<AppState>,
    Params(params): Params<LangParams>,
) -> Result<Json<DataEnvelope<Vec<NamedRecord>>>, ApiError> {
    list_taxonomy(&state, TaxonomyKind::Muscle, params.lang.as_deref()).await
}

async fn exercises_by_name(
    state: &AppState,
    kind: TaxonomyKind,
    name: &str,
    params: ByNameParams,
    base_url: String,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let language = resolve_language(params.lang.as_deref());
    let localized = state.catalog(language).await?;

    let engine = QueryEngine::new(&localized);
    let request = PageRequest::new(params.offset, params.limit);
    let page = match kind {
        TaxonomyKind::BodyPart => engine.get_exercises_by_body_part(name, request),
        TaxonomyKind::Equipment => engine.get_exercises_by_equipment(name, request),
        TaxonomyKind::Muscle => {
            engine.get_exercises_by_muscle(name, params.include_secondary.unwrap_or(false), request)
        }
    };

    let include_secondary = match kind {
        TaxonomyKind::Muscle => params.include_secondary.map(|v| v.to_string()),
        _ => None,
    };
    let links = link_params([("includeSecondary", include_secondary), ("lang", params.lang)]);
    Ok(paginated(page, &base_url, &links))
}

async fn exercises_by_body_part(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(name): Path<String>,
    Params(params): Params<ByNameParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let base_url = state.base_url(&headers, &uri);
    exercises_by_name(&state, TaxonomyKind::BodyPart, &name, params, base_url).await
}

async fn exercises_by_equipment(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(name): Path<String>,
    Params(params): Params<ByNameParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let base_url = state.base_url(&headers, &uri);
    exercises_by_name(&state, TaxonomyKind::Equipment, &name, params, base_url).await
}

async fn exercises_by_muscle(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(name): Path<String>,
    Params(params): Params<ByNameParams>,
) -> Result<Json<PageEnvelope<Exercise>>, ApiError> {
    let base_url = state.base_url(&headers, &uri);
    exercises_by_name(&state, TaxonomyKind::Muscle, &name, params, base_url).await
}

async fn route_not_found(State(state): State<AppState>, OriginalUri(uri): OriginalUri) -> ApiError {
    let lang = uri.query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == "lang")
            .map(|(_, value)| value.into_owned())
    });
    let translator = state.context.translator(resolve_language(lang.as_deref())).await;
    ApiError::route_not_found(uri.path(), &translator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(None), Vec::<String>::new());
        assert_eq!(split_list(Some(" chest , ,upper arms,")), vec!["chest", "upper arms"]);
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(None), Language::EN_US);
        assert_eq!(resolve_language(Some("ZH")), Language::ZH_CN);
        assert_eq!(resolve_language(Some("klingon")), Language::EN_US);
    }

    #[test]
    fn test_link_params_skip_absent() {
        let params = link_params([
            ("search", None),
            ("sortBy", Some("name".to_string())),
            ("lang", Some("zh".to_string())),
        ]);
        assert_eq!(
            params,
            vec![("sortBy", "name".to_string()), ("lang", "zh".to_string())]
        );
    }

    #[test]
    fn test_lenient_params_fall_back() {
        let params: ListParams = parse_params("offset=abc&limit=5&sortBy=name");
        assert_eq!(params.offset, None);
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.sort_by.as_deref(), Some("name"));

        let params: ListParams = parse_params("");
        assert_eq!(params.limit, None);
        assert_eq!(params.lang, None);
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let params: ListParams = parse_params("limit=2&lang=zh&limit=3&lang=en&search=curl+bar");
        assert_eq!(params.limit, Some(2));
        assert_eq!(params.lang.as_deref(), Some("zh"));
        assert_eq!(params.search.as_deref(), Some("curl bar"));
    }

    #[test]
    fn test_include_secondary_flag_spellings() {
        for (raw, expected) in [
            ("true", Some(true)),
            ("TRUE", Some(true)),
            ("1", Some(true)),
            ("yes", Some(true)),
            ("false", Some(false)),
            ("0", Some(false)),
            ("no", Some(false)),
            ("maybe", None),
        ] {
            let params: ByNameParams = parse_params(&format!("includeSecondary={}", raw));
            assert_eq!(params.include_secondary, expected, "{}", raw);
        }
    }

    #[test]
    fn test_error_messages_are_localized() {
        let translator = Translator::canonical();
        let err = ApiError::from_core(
            CatalogError::NotFound {
                exercise_id: "nope".to_string(),
            },
            &translator,
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "exercise nope not found.");

        let err = ApiError::missing_param("q", &translator);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Query parameter 'q' is required.");
    }
}
