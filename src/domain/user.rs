use serde::{Deserialize, Serialize};

use super::name::format_user_name;

/// A directory entry as served by the remote endpoint. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates are kept as the strings the endpoint sends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

impl UserRecord {
    /// Canonical `"Last, First (Title)"` label.
    pub fn display_name(&self) -> String {
        format_user_name(&self.name)
    }
}

#[cfg(test)]
impl UserRecord {
    /// Creates a record with only an id and a display name set.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            company: Company::default(),
            address: Address::default(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company.name = company.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    #[test]
    fn test_decode_full_record() {
        let user: UserRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "Bret");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(user.address.geo.lng, "81.1496");
        assert_eq!(user.display_name(), "Graham, Leanne");
    }

    #[test]
    fn test_decode_tolerates_missing_profile_fields() {
        let user: UserRecord = serde_json::from_str(r#"{"id": 7, "name": "Kurtis Weissnat"}"#).unwrap();
        assert_eq!(user, UserRecord::new(7, "Kurtis Weissnat"));
    }

    #[test]
    fn test_decode_requires_id_and_name() {
        assert!(serde_json::from_str::<UserRecord>(r#"{"name": "No Id"}"#).is_err());
        assert!(serde_json::from_str::<UserRecord>(r#"{"id": 3}"#).is_err());
    }
}
