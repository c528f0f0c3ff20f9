use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    Form, Json,
};
use serde::de::DeserializeOwned;
use shared::api::error::{Nothing, ServerError};

/// Request body that may be sent as json or as an html form post
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOrForm<T>(pub T);

fn body_mime(req: &Request) -> Option<mime::Mime> {
    req.headers()
        .get(header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_mime(&req) {
            Some(m)
                if m.type_() == mime::APPLICATION
                    && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)) =>
            {
                let Json(value) = Json::<T>::from_request(req, state).await?;
                Ok(Self(value))
            },
            Some(m) if m.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() => {
                let Form(value) = Form::<T>::from_request(req, state).await?;
                Ok(Self(value))
            },
            _ => Err(ServerError::Rejection {
                code: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: format!(
                    "Expected request with `Content-Type: {}` or `Content-Type: {}`",
                    mime::APPLICATION_JSON,
                    mime::APPLICATION_WWW_FORM_URLENCODED
                ),
            }),
        }
    }
}
