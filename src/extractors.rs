use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;
use std::convert::Infallible;

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: Option<String>,
}

/// City taken from the path, then the `city` query parameter
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

impl CityParam {
    /// Get the city value or use a default
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            if !city.trim().is_empty() {
                return Ok(CityParam(Some(city)));
            }
        }

        if let Ok(Query(query)) = Query::<CityQuery>::from_request_parts(parts, state).await {
            return Ok(CityParam(query.city));
        }

        Ok(CityParam(None))
    }
}
