// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

use odoo_rpc::constants::{METHOD_FIELDS_GET, METHOD_READ, METHOD_SEARCH, METHOD_SEARCH_READ};
use odoo_rpc::{Domain, ExecuteCall, RawValue, RpcTransport, UserId};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::decode::{as_array, as_foreign_key, as_integer, as_string};
use crate::error::render_chain;
use crate::{
    BusinessObjectType, DecodeError, DiscoveredModel, FieldMap, IntrospectionError, RecordId,
    parse_field_map,
};

const MODEL_REGISTRY: &str = "ir.model";

pub struct Credentials {
    pub database: String,
    pub user: String,
    pub api_key: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Which models discovery considers, and the paging window over them.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub domain: Domain,
    pub offset: usize,
    pub limit: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            domain: Domain::new().with("state", "=", "base"),
            offset: 0,
            limit: 1000,
        }
    }
}

impl DiscoveryOptions {
    /// Only discover the given models (no restriction if `models` is empty).
    pub fn restricted_to(mut self, models: &[String]) -> Self {
        if !models.is_empty() {
            self.domain = self.domain.with("model", "in", models.to_vec());
        }
        self
    }
}

/// A connection to one database as one user, for the duration of a generation run.
///
/// Authentication happens once, on first need, no matter how many callers need it concurrently.
/// Field maps are fetched once per model and shared afterwards.
pub struct Session {
    transport: Arc<dyn RpcTransport>,
    credentials: Credentials,
    identity: OnceCell<UserId>,
    field_maps: Mutex<HashMap<String, Arc<OnceCell<Arc<FieldMap>>>>>,
}

impl Session {
    pub fn new(transport: Arc<dyn RpcTransport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            identity: OnceCell::new(),
            field_maps: Mutex::new(HashMap::new()),
        }
    }

    pub fn database(&self) -> &str {
        &self.credentials.database
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.initialized()
    }

    /// Authenticate, unless already done. A failed attempt is not cached.
    pub async fn authenticate(&self) -> Result<UserId, IntrospectionError> {
        self.identity
            .get_or_try_init(|| async {
                let Credentials {
                    database,
                    user,
                    api_key,
                } = &self.credentials;

                info!(%database, %user, "Authenticating");

                let response = self
                    .transport
                    .authenticate(database, user, api_key, Map::new())
                    .await
                    .map_err(|source| IntrospectionError::Authentication {
                        database: database.clone(),
                        user: user.clone(),
                        source,
                    })?;

                match response {
                    RawValue::Boolean(false) => Err(IntrospectionError::AuthenticationRejected {
                        database: database.clone(),
                        user: user.clone(),
                    }),
                    response => as_integer(&response, "authentication response")
                        .map(UserId)
                        .map_err(IntrospectionError::AuthenticationResponse),
                }
            })
            .await
            .copied()
    }

    pub fn model(&self, name: impl Into<String>) -> ModelSession<'_> {
        ModelSession {
            session: self,
            name: name.into(),
        }
    }

    async fn execute(
        &self,
        model: &str,
        method: &'static str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<RawValue, IntrospectionError> {
        let identity = self.authenticate().await?;

        debug!(model, method, "Executing remote call");

        self.transport
            .execute(ExecuteCall {
                database: &self.credentials.database,
                identity,
                credential: &self.credentials.api_key,
                model,
                method,
                args,
                kwargs,
            })
            .await
            .map_err(|source| IntrospectionError::RemoteCall {
                operation: method,
                model: model.to_string(),
                source,
            })
    }

    fn field_map_cell(&self, model: &str) -> Arc<OnceCell<Arc<FieldMap>>> {
        let mut field_maps = self
            .field_maps
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        field_maps.entry(model.to_string()).or_default().clone()
    }

    /// Ids of the `ir.model` records matching the discovery options.
    pub async fn discover_model_ids(
        &self,
        options: &DiscoveryOptions,
    ) -> Result<Vec<RecordId>, IntrospectionError> {
        self.model(MODEL_REGISTRY)
            .search(&options.domain, options.offset, options.limit)
            .await
    }

    pub async fn describe_model(&self, id: RecordId) -> Result<DiscoveredModel, IntrospectionError> {
        let record = self
            .model(MODEL_REGISTRY)
            .read(id, &["id", "name", "model"])
            .await?;

        let attribute = |key: &str| {
            let value = record.get(key).unwrap_or(&RawValue::Null);
            as_string(value, &format!("{MODEL_REGISTRY} #{id} '{key}'"))
                .map(str::to_string)
                .map_err(response_error(METHOD_READ, MODEL_REGISTRY))
        };

        Ok(DiscoveredModel {
            id,
            name: attribute("model")?,
            label: attribute("name")?,
        })
    }

    /// Discover models, skipping any whose description cannot be read.
    pub async fn discover_models(
        &self,
        options: &DiscoveryOptions,
    ) -> Result<Vec<DiscoveredModel>, IntrospectionError> {
        let ids = self.discover_model_ids(options).await?;
        debug!(count = ids.len(), "Discovered model ids");

        let mut models = Vec::with_capacity(ids.len());
        for id in ids {
            match self.describe_model(id).await {
                Ok(model) => models.push(model),
                Err(error) => {
                    warn!(%id, error = %render_chain(&error), "Skipping model");
                }
            }
        }
        Ok(models)
    }

    /// Discover models and fetch the fields of each.
    ///
    /// A model whose fields cannot be fetched or parsed is kept, with no fields.
    pub async fn introspect(
        &self,
        options: &DiscoveryOptions,
    ) -> Result<Vec<BusinessObjectType>, IntrospectionError> {
        self.authenticate().await?;

        let models = self.discover_models(options).await?;
        info!(count = models.len(), "Discovered models");

        let mut types = Vec::with_capacity(models.len());
        for DiscoveredModel { name, label, .. } in models {
            let fields = match self.model(name.as_str()).get_fields().await {
                Ok(fields) => {
                    info!(model = %name, count = fields.len(), "Fetched fields");
                    fields
                }
                Err(error) => {
                    warn!(
                        model = %name,
                        error = %render_chain(&error),
                        "Unable to fetch fields, continuing without them"
                    );
                    Arc::new(FieldMap::new())
                }
            };

            types.push(BusinessObjectType {
                name,
                label,
                fields,
            });
        }

        Ok(types)
    }
}

fn response_error(
    operation: &'static str,
    model: &str,
) -> impl FnOnce(DecodeError) -> IntrospectionError {
    let model = model.to_string();
    move |source| IntrospectionError::Response {
        operation,
        model,
        source,
    }
}

fn paging(offset: usize, limit: usize) -> Map<String, Value> {
    let mut kwargs = Map::new();
    kwargs.insert("offset".to_string(), Value::from(offset));
    kwargs.insert("limit".to_string(), Value::from(limit));
    kwargs
}

fn field_list(fields: &[&str]) -> Value {
    Value::Array(fields.iter().map(|field| Value::from(*field)).collect())
}

/// Operations on one model, through a [`Session`].
pub struct ModelSession<'a> {
    session: &'a Session,
    name: String,
}

impl ModelSession<'_> {
    /// The model's fields, fetched on first use and cached for the session's lifetime.
    pub async fn get_fields(&self) -> Result<Arc<FieldMap>, IntrospectionError> {
        let cell = self.session.field_map_cell(&self.name);

        cell.get_or_try_init(|| async {
            let response = self
                .session
                .execute(&self.name, METHOD_FIELDS_GET, vec![], Map::new())
                .await?;
            let fields = parse_field_map(&self.name, &response)?;
            debug!(model = %self.name, count = fields.len(), "Parsed fields");
            Ok::<_, IntrospectionError>(Arc::new(fields))
        })
        .await
        .cloned()
    }

    pub async fn search(
        &self,
        domain: &Domain,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<RecordId>, IntrospectionError> {
        let response = self
            .session
            .execute(
                &self.name,
                METHOD_SEARCH,
                vec![domain.to_value()],
                paging(offset, limit),
            )
            .await?;

        as_array(&response, "search response")
            .and_then(|ids| {
                ids.iter()
                    .map(|id| as_foreign_key(id, "search response id"))
                    .collect()
            })
            .map_err(response_error(METHOD_SEARCH, &self.name))
    }

    /// Read one record. All fields are read when `fields` is empty.
    pub async fn read(&self, id: RecordId, fields: &[&str]) -> Result<RawValue, IntrospectionError> {
        let mut kwargs = Map::new();
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), field_list(fields));
        }

        let response = self
            .session
            .execute(
                &self.name,
                METHOD_READ,
                vec![Value::Array(vec![Value::from(id)])],
                kwargs,
            )
            .await?;

        match as_array(&response, "read response")
            .map_err(response_error(METHOD_READ, &self.name))?
        {
            [record] => Ok(record.clone()),
            records => Err(IntrospectionError::UnexpectedRecordCount {
                model: self.name.clone(),
                id,
                count: records.len(),
            }),
        }
    }

    pub async fn search_read(
        &self,
        domain: &Domain,
        offset: usize,
        limit: usize,
        fields: &[&str],
    ) -> Result<Vec<RawValue>, IntrospectionError> {
        let mut kwargs = paging(offset, limit);
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), field_list(fields));
        }

        let response = self
            .session
            .execute(
                &self.name,
                METHOD_SEARCH_READ,
                vec![domain.to_value()],
                kwargs,
            )
            .await?;

        as_array(&response, "search_read response")
            .map(<[RawValue]>::to_vec)
            .map_err(response_error(METHOD_SEARCH_READ, &self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use odoo_rpc::TransportError;
    use odoo_rpc::test_support::{RecordedCall, ScriptedTransport, fault};
    use serde_json::json;
    use test_log::test;

    use crate::FieldKind;

    fn credentials() -> Credentials {
        Credentials {
            database: "odoo".to_string(),
            user: "admin".to_string(),
            api_key: "secret".to_string(),
        }
    }

    fn session(transport: &Arc<ScriptedTransport>) -> Session {
        Session::new(transport.clone(), credentials())
    }

    fn partner_fields() -> RawValue {
        RawValue::from(json!({
            "name": {"type": "char", "string": "Name", "required": true},
            "active": {"type": "boolean", "string": "Active", "required": false},
        }))
    }

    /// A server with three models in `ir.model`: `res.partner` (readable), id 2 (unreadable) and
    /// `x.props` (fields the parser does not understand).
    fn server(call: &RecordedCall) -> Result<RawValue, TransportError> {
        let reply = match (call.model.as_str(), call.method.as_str()) {
            ("ir.model", "search") => json!([1, 2, 3]),
            ("ir.model", "read") => match call.args[0][0].as_i64() {
                Some(1) => json!([{"id": 1, "name": "Contact", "model": "res.partner"}]),
                Some(3) => json!([{"id": 3, "name": "Properties", "model": "x.props"}]),
                _ => return Err(fault("Record does not exist or has been deleted.")),
            },
            ("res.partner", "fields_get") => return Ok(partner_fields()),
            ("x.props", "fields_get") => json!({"data": {"type": "properties"}}),
            _ => return Err(fault("Unexpected call")),
        };
        Ok(RawValue::from(reply))
    }

    #[test(tokio::test)]
    async fn concurrent_callers_share_one_authentication() {
        let transport = Arc::new(ScriptedTransport::new(server));
        let session = session(&transport);

        assert!(!session.is_authenticated());

        let identities = join_all((0..5).map(|_| session.authenticate())).await;

        assert!(
            identities
                .into_iter()
                .all(|identity| identity.unwrap() == UserId(2))
        );
        assert_eq!(transport.authentication_count(), 1);
        assert!(session.is_authenticated());

        session.model("res.partner").get_fields().await.unwrap();
        assert_eq!(transport.authentication_count(), 1);
    }

    #[tokio::test]
    async fn rejected_credentials_are_not_cached() {
        let transport = Arc::new(
            ScriptedTransport::new(server).with_authentication(|| Ok(RawValue::Boolean(false))),
        );
        let session = session(&transport);

        let error = session.authenticate().await.unwrap_err();
        assert!(matches!(
            error,
            IntrospectionError::AuthenticationRejected { .. }
        ));
        assert!(!session.is_authenticated());

        let error = session.model("res.partner").get_fields().await.unwrap_err();
        assert!(matches!(
            error,
            IntrospectionError::AuthenticationRejected { .. }
        ));
        assert_eq!(transport.authentication_count(), 2);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn authentication_transport_failure() {
        let transport = Arc::new(
            ScriptedTransport::new(server).with_authentication(|| Err(fault("Access Denied"))),
        );

        let error = session(&transport).authenticate().await.unwrap_err();

        match error {
            IntrospectionError::Authentication { database, user, .. } => {
                assert_eq!(database, "odoo");
                assert_eq!(user, "admin");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn fields_are_fetched_once() {
        let transport = Arc::new(ScriptedTransport::new(server));
        let session = session(&transport);

        let fetches = join_all((0..3).map(|_| async {
            session.model("res.partner").get_fields().await.unwrap()
        }))
        .await;

        assert_eq!(transport.call_count("res.partner", "fields_get"), 1);
        assert!(Arc::ptr_eq(&fetches[0], &fetches[2]));

        let fields = session.model("res.partner").get_fields().await.unwrap();
        assert_eq!(transport.call_count("res.partner", "fields_get"), 1);
        assert_eq!(fields["name"].kind, FieldKind::ShortText);
        assert!(fields["name"].flags.required);
    }

    #[test(tokio::test)]
    async fn introspection_skips_unreadable_models_and_keeps_unparsable_ones() {
        let transport = Arc::new(ScriptedTransport::new(server));
        let session = session(&transport);

        let types = session
            .introspect(&DiscoveryOptions::default())
            .await
            .unwrap();

        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["res.partner", "x.props"]);

        assert_eq!(types[0].label, "Contact");
        assert_eq!(
            types[0].fields.keys().collect::<Vec<_>>(),
            vec!["name", "active"]
        );
        assert_eq!(types[0].required_field_names().collect::<Vec<_>>(), vec!["name"]);
        assert!(types[1].fields.is_empty());

        assert_eq!(transport.authentication_count(), 1);
        assert!(
            transport
                .calls()
                .iter()
                .all(|call| call.identity == UserId(2))
        );
    }

    #[tokio::test]
    async fn discovery_sends_domain_and_paging() {
        let transport = Arc::new(ScriptedTransport::new(server));
        let session = session(&transport);

        let options = DiscoveryOptions {
            offset: 10,
            limit: 20,
            ..DiscoveryOptions::default()
        }
        .restricted_to(&["res.partner".to_string()]);

        let ids = session.discover_model_ids(&options).await.unwrap();
        assert_eq!(
            ids,
            vec![RecordId::new(1), RecordId::new(2), RecordId::new(3)]
        );

        let call = &transport.calls()[0];
        assert_eq!(
            call.args,
            vec![json!([["state", "=", "base"], ["model", "in", ["res.partner"]]])]
        );
        assert_eq!(call.kwargs.get("offset"), Some(&json!(10)));
        assert_eq!(call.kwargs.get("limit"), Some(&json!(20)));
    }

    #[tokio::test]
    async fn describe_model_reads_name_and_label() {
        let transport = Arc::new(ScriptedTransport::new(server));
        let session = session(&transport);

        let model = session.describe_model(RecordId::new(1)).await.unwrap();
        assert_eq!(
            model,
            DiscoveredModel {
                id: RecordId::new(1),
                name: "res.partner".to_string(),
                label: "Contact".to_string(),
            }
        );

        let call = &transport.calls()[0];
        assert_eq!(call.args, vec![json!([1])]);
        assert_eq!(call.kwargs.get("fields"), Some(&json!(["id", "name", "model"])));
    }

    #[tokio::test]
    async fn remote_failures_name_the_operation() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Err(fault("Access Denied"))
        }));
        let session = session(&transport);

        let error = session
            .model("res.partner")
            .search(&Domain::new(), 0, 80)
            .await
            .unwrap_err();

        match error {
            IntrospectionError::RemoteCall {
                operation, model, ..
            } => {
                assert_eq!(operation, "search");
                assert_eq!(model, "res.partner");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_requires_exactly_one_record() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(RawValue::Array(vec![]))));
        let session = session(&transport);

        let error = session
            .model("res.partner")
            .read(RecordId::new(7), &[])
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            IntrospectionError::UnexpectedRecordCount { count: 0, .. }
        ));
        assert!(transport.calls()[0].kwargs.is_empty());
    }

    #[tokio::test]
    async fn search_read_returns_records() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(RawValue::from(json!([
                {"id": 1, "name": "Azure Interior"},
                {"id": 2, "name": "Deco Addict"},
            ])))
        }));
        let session = session(&transport);

        let records = session
            .model("res.partner")
            .search_read(&Domain::new().with("is_company", "=", true), 0, 2, &["name"])
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("name"), Some(&RawValue::from("Deco Addict")));

        let call = &transport.calls()[0];
        assert_eq!(call.method, "search_read");
        assert_eq!(call.kwargs.get("fields"), Some(&json!(["name"])));
    }

    #[test]
    fn credentials_debug_hides_the_key() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("admin"));
    }
}
