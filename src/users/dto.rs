use serde::Deserialize;

/// Request body for creating or replacing a user. Any client-supplied
/// `id`/`_id` key is ignored; identifiers come from the store.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_ignores_client_supplied_ids() {
        let json = r#"{
            "_id": "64b5f0c2a1b2c3d4e5f60718",
            "id": "sneaky",
            "name": "Ann",
            "email": "ann@x.com",
            "password": "Abc123!"
        }"#;
        let payload: UserPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.name, "Ann");
        assert_eq!(payload.email, "ann@x.com");
    }

    #[test]
    fn payload_requires_all_fields() {
        let json = r#"{"name": "Ann", "email": "ann@x.com"}"#;
        assert!(serde_json::from_str::<UserPayload>(json).is_err());
    }
}
