use serde::Serialize;
use serde_json::Value;

/// Basic account details from `GET /api/users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
}

impl UserSummary {
    /// Accepts the bare user or one wrapped in `user` / `data`.
    pub fn from_json(raw: &Value) -> Self {
        let user = ["/user", "/data/user", "/data"]
            .iter()
            .find_map(|p| raw.pointer(p).filter(|v| v.is_object()))
            .unwrap_or(raw);
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| user.get(k).and_then(Value::as_str))
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let name = {
            let full = text(&["name", "fullName", "username"]);
            if full.is_empty() {
                let joined = format!("{} {}", text(&["firstName"]), text(&["lastName"]));
                joined.trim().to_string()
            } else {
                full
            }
        };
        Self {
            id: text(&["_id", "id"]),
            name,
            email: text(&["email"]),
            role: text(&["role", "userType"]),
            avatar: text(&["avatar", "profileImage", "profilePicture"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wrapped_user_with_split_name() {
        let user = UserSummary::from_json(&json!({
            "success": true,
            "user": { "_id": "u1", "firstName": "Ada", "lastName": "Lovelace", "role": "freelancer" }
        }));
        assert_eq!(user.id, "u1");
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.role, "freelancer");
        assert_eq!(user.email, "");
    }

    #[test]
    fn bare_user() {
        let user = UserSummary::from_json(&json!({ "id": "u2", "name": "Grace", "profileImage": "/g.png" }));
        assert_eq!(user.name, "Grace");
        assert_eq!(user.avatar, "/g.png");
    }
}
