use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Numeric role carried by the session: 1 = Admin, 2 = Tutor, 3 = Student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Tutor,
    Student,
}

impl Role {
    /// Any code outside 1..=3 is an unknown role.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Role::Admin),
            2 => Some(Role::Tutor),
            3 => Some(Role::Student),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Role::Admin => 1,
            Role::Tutor => 2,
            Role::Student => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Tutor => "Tutor",
            Role::Student => "Estudiante",
        }
    }
}

/// Serde adapter storing `Option<Role>` as its numeric code (0 when unknown).
pub mod role_code {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Role;

    pub fn serialize<S: Serializer>(role: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(role.map(Role::code).unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
        let code = Option::<i64>::deserialize(deserializer)?;
        Ok(code.and_then(Role::from_code))
    }
}

/// The authenticated user as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(with = "role_code", default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub subjects: BTreeSet<i64>,
}

impl User {
    pub fn new(id: i64, role: Option<Role>) -> Self {
        Self {
            id,
            role,
            subjects: BTreeSet::new(),
        }
    }

    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = i64>) -> Self {
        self.subjects = subjects.into_iter().collect();
        self
    }

    pub fn is_affiliated_with(&self, subject_id: i64) -> bool {
        self.subjects.contains(&subject_id)
    }
}

/// User record as returned by the users listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiUser {
    pub u_id: Option<i64>,
    pub u_name: Option<String>,
    pub u_email: Option<String>,
    pub u_role: Option<i64>,
    pub u_semester: Option<i64>,
    pub subjects: Option<Vec<i64>>,
}

/// Display model for user listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "role_code")]
    pub role: Option<Role>,
    pub role_label: String,
    pub semester: Option<u8>,
    pub subjects: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListMode {
    All,
    Tutors,
    Students,
}

impl UserListMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserListMode::All => "all",
            UserListMode::Tutors => "tutors",
            UserListMode::Students => "students",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        for role in [Role::Admin, Role::Tutor, Role::Student] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code(0), None);
        assert_eq!(Role::from_code(4), None);
    }

    #[test]
    fn user_deserializes_unknown_role_as_none() {
        let user: User = serde_json::from_str(r#"{"id": 5, "role": 9, "subjects": [1, 2]}"#).unwrap();
        assert_eq!(user.role, None);
        assert!(user.is_affiliated_with(2));

        let tutor: User = serde_json::from_str(r#"{"id": 5, "role": 2}"#).unwrap();
        assert_eq!(tutor.role, Some(Role::Tutor));
        assert!(tutor.subjects.is_empty());
    }
}
