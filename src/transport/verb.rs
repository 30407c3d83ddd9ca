use http::Method;
use std::fmt;

/// The HTTP verbs the database REST API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

struct Traits {
    name: &'static str,
    payload: bool,
    replayable: bool,
}

impl Verb {
    const fn traits(self) -> Traits {
        // name, carries a JSON payload, replaying it converges to the same state
        let (name, payload, replayable) = match self {
            Self::Get => ("GET", false, true),
            Self::Put => ("PUT", true, true),
            Self::Post => ("POST", true, false),
            Self::Patch => ("PATCH", true, false),
            Self::Delete => ("DELETE", false, true),
        };
        Traits {
            name,
            payload,
            replayable,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.traits().name
    }

    /// `PUT`, `POST` and `PATCH` send a JSON body.
    #[must_use]
    pub const fn carries_payload(self) -> bool {
        self.traits().payload
    }

    /// A push creates a new child on every call and a patch may hold server
    /// increments, so only `GET`, `PUT` and `DELETE` are safe to send twice.
    #[must_use]
    pub const fn is_idempotent(self) -> bool {
        self.traits().replayable
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Get)
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Put => Method::PUT,
            Self::Post => Method::POST,
            Self::Patch => Method::PATCH,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        verb.method()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_get_put_delete_replay() {
        let replayable: Vec<_> = [Verb::Get, Verb::Put, Verb::Post, Verb::Patch, Verb::Delete]
            .into_iter()
            .filter(|verb| verb.is_idempotent())
            .collect();
        assert_eq!(replayable, vec![Verb::Get, Verb::Put, Verb::Delete]);
    }

    #[test]
    fn payload_verbs_match_writes_with_bodies() {
        assert!(Verb::Patch.carries_payload());
        assert!(!Verb::Delete.carries_payload());
        assert!(Verb::Delete.is_write());
        assert_eq!(Method::from(Verb::Patch), Method::PATCH);
        assert_eq!(Verb::Post.to_string(), "POST");
    }
}
