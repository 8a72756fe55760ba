use actix_web::{HttpResponse, Responder, web};
use serde::de::MapAccess;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::{HashlinkerError, Result};
use crate::routing::RouteStore;
use crate::storage::fields::{self, FoldedFields};
use crate::storage::{AuthMode, SecretsStore};

/// Body of `POST /post/new-route`
///
/// Field names are matched case-insensitively and `null` reads as empty.
#[derive(Debug, Clone, Default)]
pub struct AddRouteRequest {
    pub auth_tok: String,
    pub secret_auth: String,
    pub routes: Vec<String>,
}

impl FoldedFields for AddRouteRequest {
    const EXPECTING: &'static str = "an add-route request object";

    fn read_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> std::result::Result<bool, A::Error> {
        match key {
            "authtok" => self.auth_tok = fields::string(map)?,
            "secretauth" => self.secret_auth = fields::string(map)?,
            "routes" => self.routes = fields::string_list(map)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for AddRouteRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        fields::deserialize_folded(deserializer)
    }
}

impl AddRouteRequest {
    /// Decode the first JSON value in `body`; anything after it is ignored.
    pub fn decode(body: &[u8]) -> Result<Self> {
        serde_json::Deserializer::from_slice(body)
            .into_iter::<AddRouteRequest>()
            .next()
            .unwrap_or_else(|| Err(serde::de::Error::custom("empty request body")))
            .map_err(HashlinkerError::from)
    }
}

/// Where credentials come from and how they are checked
#[derive(Clone, Debug)]
pub struct NewRouteSettings {
    pub secrets: SecretsStore,
    pub auth_mode: AuthMode,
}

pub struct NewRouteService {}

impl NewRouteService {
    /// Register new destination URLs.
    ///
    /// The writer lock is taken before the body is decoded and held until the
    /// rebuilt table is published. Decode, secrets and authorization failures
    /// are logged and answered with an empty 200, like a success. Only a
    /// persistence failure produces a 500.
    pub async fn add_new_route(
        body: web::Bytes,
        store: web::Data<Arc<RouteStore>>,
        settings: web::Data<NewRouteSettings>,
    ) -> impl Responder {
        let mut writer = store.lock();

        let req = match AddRouteRequest::decode(&body) {
            Ok(req) => req,
            Err(e) => {
                warn!(
                    "non-fatal error: could not read request body for new route - {}",
                    e
                );
                return HttpResponse::Ok().finish();
            }
        };

        let secrets = match settings.secrets.load() {
            Ok(secrets) => secrets,
            Err(e) => {
                warn!("non-fatal error: could not read secrets file - {}", e);
                return HttpResponse::Ok().finish();
            }
        };

        if let Err(e) = secrets.verify(&req.auth_tok, &req.secret_auth, settings.auth_mode) {
            warn!("login attempt denied - {}", e.message());
            return HttpResponse::Ok().finish();
        }

        match writer.append(&req.routes) {
            Ok(table) => {
                info!(
                    "added {} routes, table now holds {} keys",
                    req.routes.len(),
                    table.len()
                );
                HttpResponse::Ok().finish()
            }
            Err(e) => {
                error!("{}", e);
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}
