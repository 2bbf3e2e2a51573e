//! User records and their profile document.
//!
//! A user profile is a large, mostly flat document. Every field other than
//! `image` is required; unknown fields are dropped when the document is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::{FieldReader, FieldViolation, Violations};
use super::{Blog, BlogId, Record, RecordId};

/// Identifier of a stored [`User`].
pub type UserId = RecordId<User>;

/// Minimum password length accepted on create and update.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Hair description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hair {
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Latitude and longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Postal address with coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}

/// Payment card and account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub card_expire: String,
    pub card_number: String,
    pub card_type: String,
    pub currency: String,
    pub iban: String,
}

/// Employer details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub department: String,
    pub name: String,
    pub title: String,
    pub address: Address,
}

/// Crypto wallet details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crypto {
    pub coin: String,
    pub wallet: String,
    pub network: String,
}

/// Validated user profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub maiden_name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password: String,
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub blood_group: String,
    pub height: f64,
    pub weight: f64,
    pub eye_color: String,
    pub hair: Hair,
    pub domain: String,
    pub ip: String,
    pub mac_address: String,
    pub university: String,
    pub address: Address,
    pub bank: Bank,
    pub company: Company,
    pub ein: String,
    pub ssn: String,
    pub user_agent: String,
    pub crypto: Crypto,
    pub role: String,
}

fn read_address(parent: FieldReader<'_>, key: &str, violations: &mut Violations) -> Address {
    let nested = parent.nested(key, violations);
    let fields = nested.reader();
    let address = fields.string("address", violations);
    let city = fields.string("city", violations);
    let state = fields.string("state", violations);
    let postal_code = fields.string("postalCode", violations);
    let coordinates = fields.nested("coordinates", violations);
    let point = coordinates.reader();
    Address {
        address,
        city,
        state,
        postal_code,
        coordinates: Coordinates {
            lat: point.number("lat", violations),
            lng: point.number("lng", violations),
        },
    }
}

impl UserProfile {
    /// Validate a raw document, reporting every violation found.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::UserProfile;
    /// use serde_json::json;
    ///
    /// let violations = UserProfile::from_document(&json!({ "firstName": "Ada" }))
    ///     .expect_err("incomplete profile");
    /// assert!(violations.iter().any(|v| v.field == "lastName"));
    /// ```
    pub fn from_document(document: &Value) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Violations::default();
        let root = FieldReader::root(document, &mut violations);
        let v = &mut violations;

        let first_name = root.string("firstName", v);
        let last_name = root.string("lastName", v);
        let maiden_name = root.string("maidenName", v);
        let age = root.positive_integer("age", v);
        let gender = root.string("gender", v);
        let email = root.email("email", v);
        let phone = root.string("phone", v);
        let username = root.string("username", v);
        let password = root.string_min_len("password", PASSWORD_MIN_LEN, v);
        let birth_date = root.string("birthDate", v);
        let image = root.optional_string("image", v);
        let blood_group = root.string("bloodGroup", v);
        let height = root.positive_number("height", v);
        let weight = root.positive_number("weight", v);
        let eye_color = root.string("eyeColor", v);
        let hair_doc = root.nested("hair", v);
        let hair = Hair {
            color: hair_doc.reader().string("color", v),
            kind: hair_doc.reader().string("type", v),
        };
        let domain = root.string("domain", v);
        let ip = root.string("ip", v);
        let mac_address = root.string("macAddress", v);
        let university = root.string("university", v);
        let address = read_address(root, "address", v);
        let bank_doc = root.nested("bank", v);
        let bank_fields = bank_doc.reader();
        let bank = Bank {
            card_expire: bank_fields.string("cardExpire", v),
            card_number: bank_fields.string("cardNumber", v),
            card_type: bank_fields.string("cardType", v),
            currency: bank_fields.string("currency", v),
            iban: bank_fields.string("iban", v),
        };
        let company_doc = root.nested("company", v);
        let company_fields = company_doc.reader();
        let company = Company {
            department: company_fields.string("department", v),
            name: company_fields.string("name", v),
            title: company_fields.string("title", v),
            address: read_address(company_fields, "address", v),
        };
        let ein = root.string("ein", v);
        let ssn = root.string("ssn", v);
        let user_agent = root.string("userAgent", v);
        let crypto_doc = root.nested("crypto", v);
        let crypto = Crypto {
            coin: crypto_doc.reader().string("coin", v),
            wallet: crypto_doc.reader().string("wallet", v),
            network: crypto_doc.reader().string("network", v),
        };
        let role = root.string("role", v);

        violations.finish(Self {
            first_name,
            last_name,
            maiden_name,
            age,
            gender,
            email,
            phone,
            username,
            password,
            birth_date,
            image,
            blood_group,
            height,
            weight,
            eye_color,
            hair,
            domain,
            ip,
            mac_address,
            university,
            address,
            bank,
            company,
            ein,
            ssn,
            user_agent,
            crypto,
            role,
        })
    }

    /// Apply a partial update and re-validate the merged document.
    ///
    /// Top-level keys in `patch` replace the stored values wholesale; nested
    /// objects are not merged field by field.
    pub fn merge_patch(&self, patch: &Value) -> Result<Self, Vec<FieldViolation>> {
        let Value::Object(changes) = patch else {
            return Err(vec![FieldViolation::new("document", "must be a JSON object")]);
        };
        let mut merged = match serde_json::to_value(self) {
            Ok(Value::Object(current)) => current,
            _ => Map::new(),
        };
        for (key, value) in changes {
            merged.insert(key.clone(), value.clone());
        }
        Self::from_document(&Value::Object(merged))
    }

    /// Replace the profile image URL.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        if image.is_some() {
            self.image = image;
        }
        self
    }
}

/// Stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Blogs authored by this user, oldest first.
    pub blogs: Vec<BlogId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for User {
    const NOUN: &'static str = "user";
}

impl User {
    /// Build a freshly created user with no blogs.
    pub fn new(id: UserId, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            blogs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A user with the blogs they wrote expanded in place of their ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub blogs_count: usize,
    pub blogs: Vec<Blog>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDetail {
    /// Combine a user with their blogs.
    pub fn new(user: User, blogs: Vec<Blog>) -> Self {
        Self {
            id: user.id,
            profile: user.profile,
            blogs_count: blogs.len(),
            blogs,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::user_document;
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn valid_document_is_accepted_with_lenient_numbers() {
        let profile = UserProfile::from_document(&user_document()).expect("valid profile");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.weight, 54.0);
        assert_eq!(profile.address.coordinates.lng, 77.59);
        assert!(profile.image.is_none());
    }

    #[rstest]
    fn unknown_fields_are_stripped() {
        let mut document = user_document();
        document["favouriteColour"] = json!("teal");
        let profile = UserProfile::from_document(&document).expect("valid profile");
        let value = serde_json::to_value(profile).expect("serialise");
        assert!(value.get("favouriteColour").is_none());
    }

    #[rstest]
    #[case("firstName")]
    #[case("email")]
    #[case("role")]
    #[case("crypto")]
    fn missing_required_field_is_named(#[case] field: &str) {
        let mut document = user_document();
        document.as_object_mut().expect("object").remove(field);
        let violations = UserProfile::from_document(&document).expect_err("invalid");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, field);
    }

    #[rstest]
    fn all_violations_are_reported_together() {
        let mut document = user_document();
        document["age"] = json!(-1);
        document["email"] = json!("nope");
        document["password"] = json!("123");
        document["company"]["address"]["city"] = json!("");
        let violations = UserProfile::from_document(&document).expect_err("invalid");
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["age", "email", "password", "company.address.city"]);
    }

    #[rstest]
    fn merge_patch_replaces_top_level_keys() {
        let profile = UserProfile::from_document(&user_document()).expect("valid profile");
        let merged = profile
            .merge_patch(&json!({ "lastName": "King", "hair": { "color": "Grey", "type": "Straight" } }))
            .expect("valid patch");
        assert_eq!(merged.last_name, "King");
        assert_eq!(merged.hair.kind, "Straight");
        assert_eq!(merged.first_name, "Ada");
    }

    #[rstest]
    fn merge_patch_revalidates_the_result() {
        let profile = UserProfile::from_document(&user_document()).expect("valid profile");
        let violations = profile
            .merge_patch(&json!({ "email": "not-an-address" }))
            .expect_err("invalid patch");
        assert_eq!(violations[0].field, "email");
    }

    #[rstest]
    fn user_serialises_flat_with_camel_case_keys() {
        let profile = UserProfile::from_document(&user_document()).expect("valid profile");
        let now = Utc::now();
        let user = User::new(UserId::random(), profile, now);
        let value = serde_json::to_value(&user).expect("serialise");
        assert_eq!(value["firstName"], json!("Ada"));
        assert_eq!(value["blogs"], json!([]));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("profile").is_none());
    }
}
