use crate::session::{Session, SessionStore};
use crate::token::TokenSource;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

/// Resolves the request's session and stores it in request extensions.
///
/// Requests without a token, with an unknown/expired token, or hitting a store failure pass
/// through without a `Session`.
#[derive(Clone)]
pub struct SessionMiddleware {
    store: Arc<dyn SessionStore>,
    source: TokenSource,
}

impl SessionMiddleware {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            source: TokenSource::default(),
        }
    }

    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.source = source;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            store: self.store.clone(),
            source: self.source.clone(),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    store: Arc<dyn SessionStore>,
    source: TokenSource,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let token = self.source.extract(req.request());

        Box::pin(async move {
            if let Some(token) = token {
                match store.resolve(&token).await {
                    Ok(Some(session)) => {
                        tracing::debug!(user_id = %session.user.id, "session resolved");
                        req.extensions_mut().insert(session);
                    }
                    Ok(None) => {
                        tracing::debug!("session token did not match an active session");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "session lookup failed; continuing unauthenticated");
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Session attached by `SessionMiddleware`, if any
#[derive(Debug, Clone, Default)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    pub fn as_ref(&self) -> Option<&Session> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<Session> {
        self.0
    }
}

impl FromRequest for MaybeSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeSession(req.extensions().get::<Session>().cloned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionError, SessionUser};
    use actix_web::{test, web, App, HttpResponse};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    struct FixedStore {
        token: &'static str,
        session: Session,
    }

    #[async_trait]
    impl SessionStore for FixedStore {
        async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError> {
            Ok((token == self.token).then(|| self.session.clone()))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn resolve(&self, _token: &str) -> Result<Option<Session>, SessionError> {
            Err(SessionError::Store(sqlx::Error::PoolTimedOut))
        }
    }

    async fn whoami(session: MaybeSession) -> HttpResponse {
        match session.as_ref() {
            Some(s) => HttpResponse::Ok().body(s.user.id.to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    fn session_for(id: Uuid) -> Session {
        Session {
            user: SessionUser {
                id,
                name: Some("Ada".to_string()),
                email: None,
                image: None,
            },
            expires: Utc::now() + Duration::days(1),
        }
    }

    #[actix_rt::test]
    async fn test_attaches_session_for_known_token() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(FixedStore {
            token: "good",
            session: session_for(user_id),
        });
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(store))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer good"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_rt::test]
    async fn test_unknown_token_is_anonymous() {
        let store = Arc::new(FixedStore {
            token: "good",
            session: session_for(Uuid::new_v4()),
        });
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(store))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer bad"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous".as_bytes());
    }

    #[actix_rt::test]
    async fn test_store_failure_is_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(Arc::new(BrokenStore)))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer anything"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous".as_bytes());
    }
}
