use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: i64,
}

impl UserClaims {
    /// Claims for `user_id` that expire `hours` from now.
    pub fn for_user(user_id: uuid::Uuid, hours: i64) -> Self {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(hours)).timestamp();
        Self {
            sub: user_id.to_string(),
            exp,
        }
    }
}

pub fn generate_token<K: AsRef<[u8]>>(
    claims: UserClaims,
    key: K,
) -> jsonwebtoken::errors::Result<String> {
    let header = Header::default();
    let key = EncodingKey::from_secret(key.as_ref());

    let token = jsonwebtoken::encode(&header, &claims, &key)?;
    Ok(token)
}

pub fn process_token<K: AsRef<[u8]>>(
    token: &str,
    key: K,
) -> jsonwebtoken::errors::Result<TokenData<UserClaims>> {
    let validation = Validation::default();
    let key = DecodingKey::from_secret(key.as_ref());

    let claims = jsonwebtoken::decode::<UserClaims>(token, &key, &validation)?;
    Ok(claims)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let id = uuid::Uuid::new_v4();
        let token = generate_token(UserClaims::for_user(id, 1), "key-a").unwrap();

        let decoded = process_token(&token, "key-a").unwrap();
        assert_eq!(decoded.claims.sub, id.to_string());

        assert!(process_token(&token, "key-b").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let id = uuid::Uuid::new_v4();
        let token = generate_token(UserClaims::for_user(id, -2), "key").unwrap();
        assert!(process_token(&token, "key").is_err());
    }
}
