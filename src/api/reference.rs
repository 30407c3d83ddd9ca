//! References: a client plus a location, with the database operations.
//!
//! | operation | verb   | result                         |
//! |-----------|--------|--------------------------------|
//! | `get`     | GET    | the value, `null` when absent  |
//! | `set`     | PUT    | the written data, echoed       |
//! | `push`    | POST   | the generated child name       |
//! | `update`  | PATCH  | the written fields, echoed     |
//! | `remove`  | DELETE | nothing                        |
//!
//! `put`, `post`, `patch` and `delete` issue the same verbs and hand back the
//! server's JSON reply untouched. Under [`DatabaseRef::silent`] the echo of
//! `set` and `update` is `null`.

use crate::transport::{Verb, request::Request};
use crate::{DbPath, Error, PrintMode, Query, WriteSizeLimit};
use serde::Serialize;
use serde_json::Value;
use std::{fmt, time::Duration};
use url::Url;

#[cfg(any(feature = "async", feature = "blocking"))]
use serde::de::DeserializeOwned;

/// Options a reference applies to every request it issues. They travel with
/// `child`, `parent` and `root`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RefOptions {
    timeout: Option<Duration>,
    silent: bool,
    write_size_limit: Option<WriteSizeLimit>,
}

impl RefOptions {
    fn request(&self, verb: Verb, path: &DbPath) -> Request {
        let mut req = Request::new(verb, path.clone()).timeout(self.timeout);
        // A push needs its reply to learn the generated name.
        if self.silent && verb.is_write() && verb != Verb::Post {
            req = req.query_pair("print", PrintMode::Silent.as_str());
        }
        if let (true, Some(limit)) = (verb.is_write(), self.write_size_limit) {
            req = req.query_pair("writeSizeLimit", limit.as_str());
        }
        req
    }

    fn read(&self, path: &DbPath, query: &Query) -> Result<Request, Error> {
        let pairs = query.to_pairs()?;
        Ok(Request::new(Verb::Get, path.clone())
            .timeout(self.timeout)
            .query_pairs(pairs))
    }

    fn write<T: Serialize + ?Sized>(
        &self,
        verb: Verb,
        path: &DbPath,
        value: &T,
    ) -> Result<Request, Error> {
        self.request(verb, path).json(value)
    }

    /// `PATCH` merges the top-level children of an object; anything else is
    /// refused by the server.
    fn merge<T: Serialize + ?Sized>(&self, path: &DbPath, value: &T) -> Result<Request, Error> {
        let value = serde_json::to_value(value).map_err(Error::payload)?;
        if !value.is_object() {
            return Err(Error::invalid_request("update requires a JSON object payload"));
        }
        self.write(Verb::Patch, path, &value)
    }
}

/// Child keys of a shallow read; a leaf or a missing location has none.
fn shallow_keys(value: Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.into_iter().map(|(key, _)| key).collect(),
        _ => Vec::new(),
    }
}

/// A location in the database, bound to an async [`crate::Client`].
#[derive(Clone)]
#[cfg(feature = "async")]
pub struct DatabaseRef {
    client: crate::Client,
    path: DbPath,
    options: RefOptions,
}

#[cfg(feature = "async")]
impl DatabaseRef {
    pub(crate) fn new(client: crate::Client, path: DbPath) -> Self {
        Self {
            client,
            path,
            options: RefOptions::default(),
        }
    }

    fn at(&self, path: DbPath) -> Self {
        Self {
            client: self.client.clone(),
            path,
            options: self.options,
        }
    }

    /// Navigate to `path` below this location; no request is made.
    #[must_use]
    pub fn child(&self, path: &str) -> Self {
        self.at(self.path.child(path))
    }

    /// `None` at the database root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.path.parent().map(|path| self.at(path))
    }

    #[must_use]
    pub fn root(&self) -> Self {
        self.at(DbPath::root())
    }

    /// Last key of the location, `None` at the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    /// Alias of [`DatabaseRef::key`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.key()
    }

    #[must_use]
    pub fn path(&self) -> &DbPath {
        &self.path
    }

    /// REST endpoint of this location (`….json`), without credentials.
    pub fn url(&self) -> Result<Url, Error> {
        self.client.config().rest_url(&self.path)
    }

    /// Override the client timeout for requests issued through this reference.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Ask for `print=silent` replies to writes, which then return no body.
    /// `push` is exempt since it needs the generated name.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.options.silent = true;
        self
    }

    /// Send `writeSizeLimit` with every write.
    #[must_use]
    pub fn write_size_limit(mut self, limit: WriteSizeLimit) -> Self {
        self.options.write_size_limit = Some(limit);
        self
    }

    /// `GET`: the value at this location, `null` when absent.
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self) -> Result<T, Error> {
        self.client
            .send_json(self.options.request(Verb::Get, &self.path))
            .await
    }

    /// `GET` with ordering, filtering and formatting parameters.
    pub async fn get_with<T: DeserializeOwned + Send + 'static>(
        &self,
        query: &Query,
    ) -> Result<T, Error> {
        self.client
            .send_json(self.options.read(&self.path, query)?)
            .await
    }

    /// `GET ?shallow=true`: the child keys without their values.
    pub async fn shallow_keys(&self) -> Result<Vec<String>, Error> {
        let value: Value = self.get_with(&Query::new().shallow()).await?;
        Ok(shallow_keys(value))
    }

    /// `PUT`: replace the data at this location. Returns the data as the
    /// server stored it, with server values resolved.
    pub async fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Put, &self.path, value)?)
            .await
    }

    /// `POST`: add a child under a server-generated, chronologically ordered name.
    pub async fn push<T: Serialize + ?Sized>(&self, value: &T) -> Result<crate::PushId, Error> {
        self.client
            .send_json(self.options.write(Verb::Post, &self.path, value)?)
            .await
    }

    /// `PATCH`: merge the fields of `value` (a JSON object) into this location.
    /// Keys may be nested paths such as `"profile/age"`.
    /// Returns the written fields as the server stored them.
    pub async fn update<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.merge(&self.path, value)?)
            .await
    }

    /// `DELETE`: remove this location and everything below it.
    pub async fn remove(&self) -> Result<(), Error> {
        let req = self.options.request(Verb::Delete, &self.path);
        self.client.execute_request(&req).await.map(drop)
    }

    /// `PUT`, returning the server's reply.
    pub async fn put<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Put, &self.path, value)?)
            .await
    }

    /// `POST`, returning the server's reply (`{"name": …}`).
    pub async fn post<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Post, &self.path, value)?)
            .await
    }

    /// `PATCH`, returning the server's reply.
    pub async fn patch<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.merge(&self.path, value)?)
            .await
    }

    /// `DELETE`, returning the server's reply (`null`).
    pub async fn delete(&self) -> Result<Value, Error> {
        self.client
            .send_json(self.options.request(Verb::Delete, &self.path))
            .await
    }
}

#[cfg(feature = "async")]
impl fmt::Display for DatabaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.client.config().location(&self.path))
    }
}

#[cfg(feature = "async")]
impl fmt::Debug for DatabaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseRef")
            .field("location", &self.to_string())
            .field("options", &self.options)
            .finish()
    }
}

/// A location in the database, bound to a [`crate::BlockingClient`].
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingDatabaseRef {
    client: crate::BlockingClient,
    path: DbPath,
    options: RefOptions,
}

#[cfg(feature = "blocking")]
impl BlockingDatabaseRef {
    pub(crate) fn new(client: crate::BlockingClient, path: DbPath) -> Self {
        Self {
            client,
            path,
            options: RefOptions::default(),
        }
    }

    fn at(&self, path: DbPath) -> Self {
        Self {
            client: self.client.clone(),
            path,
            options: self.options,
        }
    }

    #[must_use]
    pub fn child(&self, path: &str) -> Self {
        self.at(self.path.child(path))
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.path.parent().map(|path| self.at(path))
    }

    #[must_use]
    pub fn root(&self) -> Self {
        self.at(DbPath::root())
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.key()
    }

    #[must_use]
    pub fn path(&self) -> &DbPath {
        &self.path
    }

    pub fn url(&self) -> Result<Url, Error> {
        self.client.config().rest_url(&self.path)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn silent(mut self) -> Self {
        self.options.silent = true;
        self
    }

    #[must_use]
    pub fn write_size_limit(mut self, limit: WriteSizeLimit) -> Self {
        self.options.write_size_limit = Some(limit);
        self
    }

    /// `GET`
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.client
            .send_json(self.options.request(Verb::Get, &self.path))
    }

    /// `GET` with query parameters.
    pub fn get_with<T: DeserializeOwned>(&self, query: &Query) -> Result<T, Error> {
        self.client.send_json(self.options.read(&self.path, query)?)
    }

    /// `GET ?shallow=true`
    pub fn shallow_keys(&self) -> Result<Vec<String>, Error> {
        let value: Value = self.get_with(&Query::new().shallow())?;
        Ok(shallow_keys(value))
    }

    /// `PUT`, returning the stored data.
    pub fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Put, &self.path, value)?)
    }

    /// `POST`
    pub fn push<T: Serialize + ?Sized>(&self, value: &T) -> Result<crate::PushId, Error> {
        self.client
            .send_json(self.options.write(Verb::Post, &self.path, value)?)
    }

    /// `PATCH`, returning the written fields.
    pub fn update<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client.send_json(self.options.merge(&self.path, value)?)
    }

    /// `DELETE`
    pub fn remove(&self) -> Result<(), Error> {
        let req = self.options.request(Verb::Delete, &self.path);
        self.client.execute_request(&req).map(drop)
    }

    pub fn put<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Put, &self.path, value)?)
    }

    pub fn post<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client
            .send_json(self.options.write(Verb::Post, &self.path, value)?)
    }

    pub fn patch<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.client.send_json(self.options.merge(&self.path, value)?)
    }

    pub fn delete(&self) -> Result<Value, Error> {
        self.client
            .send_json(self.options.request(Verb::Delete, &self.path))
    }
}

#[cfg(feature = "blocking")]
impl fmt::Display for BlockingDatabaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.client.config().location(&self.path))
    }
}

#[cfg(feature = "blocking")]
impl fmt::Debug for BlockingDatabaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingDatabaseRef")
            .field("location", &self.to_string())
            .field("options", &self.options)
            .finish()
    }
}
